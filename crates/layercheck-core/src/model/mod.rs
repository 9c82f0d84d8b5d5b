//! Symbol model: the normalized snapshot of a codebase handed to the engine.
//!
//! The model is produced by an external front end, deserialized through the
//! DTO layer in [`dto`] and validated by [`loader`]. Once constructed, a
//! [`SymbolModel`] is immutable; every analysis run reads it through shared
//! references only.
//!
//! ```text
//! JSON text
//!   ↓ serde (DTO layer)
//! SymbolModelDto
//!   ↓ loader::load (validation, cross-references)
//! SymbolModel (aggregate root)
//! ```

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

pub mod dto;
pub mod loader;

pub use loader::{from_file, from_json, load, load_shards, LoadModelError, ModelError};

// ────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────

/// Identifier of a module (e.g., `Shop.Infrastructure`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    /// Creates a module id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Globally unique identifier of a symbol (e.g., `Shop.Domain.Order.Total`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(String);

impl SymbolId {
    /// Creates a symbol id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SymbolId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────
// Value types
// ────────────────────────────────────────────

/// Architectural tier of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Entities and domain rules. Depends on nothing.
    Domain,
    /// Use cases orchestrating the domain.
    Application,
    /// Persistence, messaging and other adapters.
    Infrastructure,
    /// Controllers and the outer HTTP surface.
    Api,
}

impl Layer {
    /// All layers, innermost first.
    pub const ALL: [Self; 4] = [
        Self::Domain,
        Self::Application,
        Self::Infrastructure,
        Self::Api,
    ];

    /// Parses a layer tag, ignoring ASCII case.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str().eq_ignore_ascii_case(tag))
    }

    /// Canonical display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "Domain",
            Self::Application => "Application",
            Self::Infrastructure => "Infrastructure",
            Self::Api => "API",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of declaration a symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Class, struct, record or enum.
    Type,
    /// Interface type.
    Interface,
    /// Method or function.
    Method,
    /// Property.
    Property,
}

impl SymbolKind {
    /// Parses a kind tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "type" => Some(Self::Type),
            "interface" => Some(Self::Interface),
            "method" => Some(Self::Method),
            "property" => Some(Self::Property),
            _ => None,
        }
    }

    /// Returns true for types and interfaces.
    #[must_use]
    pub fn is_type(self) -> bool {
        matches!(self, Self::Type | Self::Interface)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Type => "type",
            Self::Interface => "interface",
            Self::Method => "method",
            Self::Property => "property",
        };
        f.write_str(tag)
    }
}

/// Structural metrics measured by the front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Deepest block nesting inside the body.
    pub nesting_depth: u32,
    /// Lines spanned by the declaration.
    pub line_count: u32,
    /// Declared parameter count.
    pub parameter_count: u32,
}

/// An outgoing dependency of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Use of another symbol.
    Symbol(SymbolId),
    /// Use of a module as a whole (e.g., a namespace import).
    Module(ModuleId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(id) => write!(f, "{id}"),
            Self::Module(id) => write!(f, "module {id}"),
        }
    }
}

/// A blocking wait on an asynchronous operation, as flagged by the front end.
///
/// This is the closed set of call shapes the front end reports. A symbol
/// with no entries is treated as non-blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockingWait {
    /// `task.Result`
    Result,
    /// `task.Wait()`
    Wait,
    /// `task.GetAwaiter().GetResult()`
    GetResult,
    /// `Task.WaitAll(...)`
    WaitAll,
    /// `Task.WaitAny(...)`
    WaitAny,
}

impl BlockingWait {
    /// Parses a wire tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "result" => Some(Self::Result),
            "wait" => Some(Self::Wait),
            "get-result" => Some(Self::GetResult),
            "wait-all" => Some(Self::WaitAll),
            "wait-any" => Some(Self::WaitAny),
            _ => None,
        }
    }

    /// Source-level call shape, for messages.
    #[must_use]
    pub fn call_shape(self) -> &'static str {
        match self {
            Self::Result => ".Result",
            Self::Wait => ".Wait()",
            Self::GetResult => ".GetAwaiter().GetResult()",
            Self::WaitAll => "Task.WaitAll(...)",
            Self::WaitAny => "Task.WaitAny(...)",
        }
    }
}

/// A per-symbol suppression of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    rule: String,
    reason: Option<String>,
}

impl Suppression {
    /// Creates a suppression. Blank reasons are stored as `None`.
    #[must_use]
    pub fn new(rule: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            rule: rule.into(),
            reason: reason.filter(|r| !r.trim().is_empty()),
        }
    }

    /// Suppressed rule id.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Stated reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

// ────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────

/// A type, method or property of the analyzed codebase.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: SymbolId,
    module: ModuleId,
    kind: SymbolKind,
    name: String,
    references: Vec<Reference>,
    metrics: Metrics,
    parameters: Vec<String>,
    locals: Vec<String>,
    blocking_waits: Vec<BlockingWait>,
    suppressions: Vec<Suppression>,
}

impl Symbol {
    /// Creates a symbol. The owning module is assigned by [`Module::with_symbol`].
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            id: SymbolId::new(id),
            module: ModuleId::new(String::new()),
            kind,
            name: name.into(),
            references: Vec::new(),
            metrics: Metrics::default(),
            parameters: Vec::new(),
            locals: Vec::new(),
            blocking_waits: Vec::new(),
            suppressions: Vec::new(),
        }
    }

    /// Adds an outgoing reference.
    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Sets the structural metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Sets parameter names.
    #[must_use]
    pub fn with_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets local variable names.
    #[must_use]
    pub fn with_locals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locals = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a blocking wait flagged by the front end.
    #[must_use]
    pub fn with_blocking_wait(mut self, wait: BlockingWait) -> Self {
        self.blocking_waits.push(wait);
        self
    }

    /// Adds a suppression.
    #[must_use]
    pub fn with_suppression(mut self, suppression: Suppression) -> Self {
        self.suppressions.push(suppression);
        self
    }

    /// Symbol id.
    #[must_use]
    pub fn id(&self) -> &SymbolId {
        &self.id
    }

    /// Owning module.
    #[must_use]
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    /// Declaration kind.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Textual name as written in source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing references in declared order.
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Structural metrics.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Parameter names.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Local variable names.
    #[must_use]
    pub fn locals(&self) -> &[String] {
        &self.locals
    }

    /// Blocking waits flagged by the front end.
    #[must_use]
    pub fn blocking_waits(&self) -> &[BlockingWait] {
        &self.blocking_waits
    }

    /// Returns the suppression for `rule`, if any.
    #[must_use]
    pub fn suppression_for(&self, rule: &str) -> Option<&Suppression> {
        self.suppressions.iter().find(|s| s.rule == rule)
    }
}

/// A unit of code tagged with exactly one layer.
#[derive(Debug, Clone)]
pub struct Module {
    id: ModuleId,
    layer: Layer,
    is_test: bool,
    symbols: Vec<Symbol>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(id: impl Into<String>, layer: Layer) -> Self {
        Self {
            id: ModuleId::new(id),
            layer,
            is_test: false,
            symbols: Vec::new(),
        }
    }

    /// Marks this module as containing tests.
    #[must_use]
    pub fn with_test(mut self, is_test: bool) -> Self {
        self.is_test = is_test;
        self
    }

    /// Adds a symbol, assigning this module as its owner.
    #[must_use]
    pub fn with_symbol(mut self, mut symbol: Symbol) -> Self {
        symbol.module = self.id.clone();
        self.symbols.push(symbol);
        self
    }

    /// Module id.
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Declared layer.
    #[must_use]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Whether the front end flagged this module as a test module.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.is_test
    }

    /// Symbols sorted by id.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated, immutable snapshot of a codebase.
///
/// All cross-references are verified at construction time: every reference
/// resolves, symbol ids are unique, and modules iterate in id order with
/// their symbols sorted by id.
#[derive(Debug, Clone, Default)]
pub struct SymbolModel {
    modules: BTreeMap<ModuleId, Module>,
    /// symbol id -> (owning module, index into its symbol list)
    index: BTreeMap<SymbolId, (ModuleId, usize)>,
}

impl SymbolModel {
    /// Creates a model with full validation.
    ///
    /// # Errors
    ///
    /// Returns every problem found: duplicate modules or symbols and
    /// references to symbols or modules that do not exist.
    pub fn new(modules: Vec<Module>) -> Result<Self, Vec<ModelError>> {
        let mut errors = Vec::new();
        let mut by_id: BTreeMap<ModuleId, Module> = BTreeMap::new();

        for mut module in modules {
            if by_id.contains_key(&module.id) {
                errors.push(ModelError::DuplicateModule {
                    module: module.id.to_string(),
                });
                continue;
            }
            module.symbols.sort_by(|a, b| a.id.cmp(&b.id));
            by_id.insert(module.id.clone(), module);
        }

        let mut index: BTreeMap<SymbolId, (ModuleId, usize)> = BTreeMap::new();
        for module in by_id.values() {
            for (i, symbol) in module.symbols.iter().enumerate() {
                if let Some((first, _)) = index.get(&symbol.id) {
                    errors.push(ModelError::DuplicateSymbol {
                        symbol: symbol.id.to_string(),
                        first: first.to_string(),
                        second: module.id.to_string(),
                    });
                    continue;
                }
                index.insert(symbol.id.clone(), (module.id.clone(), i));
            }
        }

        for module in by_id.values() {
            for symbol in &module.symbols {
                for reference in &symbol.references {
                    match reference {
                        Reference::Symbol(target) if !index.contains_key(target) => {
                            errors.push(ModelError::DanglingSymbolReference {
                                symbol: symbol.id.to_string(),
                                target: target.to_string(),
                            });
                        }
                        Reference::Module(target) if !by_id.contains_key(target) => {
                            errors.push(ModelError::DanglingModuleReference {
                                symbol: symbol.id.to_string(),
                                target: target.to_string(),
                            });
                        }
                        _ => {}
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(Self {
                modules: by_id,
                index,
            })
        } else {
            Err(errors)
        }
    }

    /// Modules in id order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Looks up a module.
    #[must_use]
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Looks up a symbol.
    #[must_use]
    pub fn symbol(&self, id: &str) -> Option<&Symbol> {
        let (module, i) = self.index.get(id)?;
        self.modules.get(module)?.symbols.get(*i)
    }

    /// Resolves the module a reference points into.
    #[must_use]
    pub fn target_module(&self, reference: &Reference) -> Option<&Module> {
        match reference {
            Reference::Symbol(id) => {
                let (module, _) = self.index.get(id)?;
                self.modules.get(module)
            }
            Reference::Module(id) => self.modules.get(id),
        }
    }

    /// Number of modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of symbols.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the model has no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_model() -> Vec<Module> {
        vec![
            Module::new("Shop.Domain", Layer::Domain)
                .with_symbol(Symbol::new("Shop.Domain.Order", "Order", SymbolKind::Type))
                .with_symbol(Symbol::new(
                    "Shop.Domain.Customer",
                    "Customer",
                    SymbolKind::Type,
                )),
            Module::new("Shop.Application", Layer::Application).with_symbol(
                Symbol::new(
                    "Shop.Application.PlaceOrder",
                    "PlaceOrder",
                    SymbolKind::Type,
                )
                .with_reference(Reference::Symbol(SymbolId::new("Shop.Domain.Order"))),
            ),
        ]
    }

    #[test]
    fn layer_parse_is_case_insensitive() {
        assert_eq!(Layer::parse("domain"), Some(Layer::Domain));
        assert_eq!(Layer::parse("API"), Some(Layer::Api));
        assert_eq!(Layer::parse("Api"), Some(Layer::Api));
        assert_eq!(Layer::parse("presentation"), None);
    }

    #[test]
    fn blocking_wait_tags() {
        assert_eq!(BlockingWait::parse("get-result"), Some(BlockingWait::GetResult));
        assert_eq!(BlockingWait::parse("sleep"), None);
        assert_eq!(BlockingWait::Wait.call_shape(), ".Wait()");
    }

    #[test]
    fn blank_suppression_reason_is_none() {
        let s = Suppression::new("naming", Some("   ".to_string()));
        assert!(s.reason().is_none());
    }

    #[test]
    fn model_sorts_modules_and_symbols() {
        let model = SymbolModel::new(order_model()).unwrap();
        let ids: Vec<&str> = model.modules().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["Shop.Application", "Shop.Domain"]);

        let domain = model.module("Shop.Domain").unwrap();
        let names: Vec<&str> = domain.symbols().iter().map(Symbol::name).collect();
        assert_eq!(names, vec!["Customer", "Order"]);
    }

    #[test]
    fn symbols_are_indexed_with_owner() {
        let model = SymbolModel::new(order_model()).unwrap();
        let order = model.symbol("Shop.Domain.Order").unwrap();
        assert_eq!(order.module().as_str(), "Shop.Domain");
        assert_eq!(model.symbol_count(), 3);
    }

    #[test]
    fn target_module_resolves_symbol_and_module_refs() {
        let model = SymbolModel::new(order_model()).unwrap();
        let by_symbol = Reference::Symbol(SymbolId::new("Shop.Domain.Order"));
        let by_module = Reference::Module(ModuleId::new("Shop.Application"));
        assert_eq!(
            model.target_module(&by_symbol).unwrap().layer(),
            Layer::Domain
        );
        assert_eq!(
            model.target_module(&by_module).unwrap().layer(),
            Layer::Application
        );
    }

    #[test]
    fn rejects_dangling_references() {
        let modules = vec![Module::new("A", Layer::Domain).with_symbol(
            Symbol::new("A.X", "X", SymbolKind::Type)
                .with_reference(Reference::Symbol(SymbolId::new("B.Y")))
                .with_reference(Reference::Module(ModuleId::new("C"))),
        )];
        let errors = SymbolModel::new(modules).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ModelError::DanglingSymbolReference { .. }
        ));
        assert!(matches!(
            errors[1],
            ModelError::DanglingModuleReference { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_symbols_across_modules() {
        let modules = vec![
            Module::new("A", Layer::Domain).with_symbol(Symbol::new("X", "X", SymbolKind::Type)),
            Module::new("B", Layer::Domain).with_symbol(Symbol::new("X", "X", SymbolKind::Type)),
        ];
        let errors = SymbolModel::new(modules).unwrap_err();
        assert!(matches!(errors[0], ModelError::DuplicateSymbol { .. }));
    }
}
