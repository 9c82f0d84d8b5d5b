//! Identifier casing predicates shared by the naming rules.

/// `PascalCase`: an ASCII uppercase letter followed by ASCII letters or digits.
#[must_use]
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `camelCase`: an ASCII lowercase letter followed by ASCII letters or digits.
#[must_use]
pub fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Interface names: `I` followed by a `PascalCase` name (`IOrderRepository`).
#[must_use]
pub fn is_interface_name(name: &str) -> bool {
    name.strip_prefix('I').is_some_and(is_pascal_case)
}

/// Whether the text joins words by case change (`placeOrder`, `PlaceOrder`).
#[must_use]
pub fn has_case_hump(text: &str) -> bool {
    text.chars()
        .zip(text.chars().skip(1))
        .any(|(a, b)| a.is_lowercase() && b.is_uppercase())
}
