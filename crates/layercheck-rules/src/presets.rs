//! Rule presets for common configurations.
//!
//! A preset only fills in settings the user left unset: explicit values in
//! `layercheck.toml` always win.

use layercheck_core::{Config, Severity};

use crate::{complexity, naming, RULE_IDS};

/// Preset configurations for layercheck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in rule with catalog defaults.
    #[default]
    Recommended,
    /// Tighter complexity limits and naming promoted to critical.
    Strict,
    /// Dependency-graph rules only.
    Architecture,
}

impl Preset {
    /// All presets, for help text.
    pub const ALL: [Self; 3] = [Self::Recommended, Self::Strict, Self::Architecture];

    /// Parses a preset name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "architecture" => Some(Self::Architecture),
            _ => None,
        }
    }

    /// Preset name as written in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Architecture => "architecture",
        }
    }

    /// Applies the preset to a configuration.
    #[must_use]
    pub fn apply(self, mut config: Config) -> Config {
        match self {
            Self::Recommended => {}
            Self::Strict => {
                config
                    .rule_mut(complexity::LENGTH)
                    .default_int("max_lines", 30);
                config
                    .rule_mut(complexity::NESTING)
                    .default_int("max_depth", 2);
                config
                    .rule_mut(naming::ID)
                    .severity
                    .get_or_insert(Severity::Critical);
            }
            Self::Architecture => {
                for id in RULE_IDS {
                    config.rule_mut(id).enabled.get_or_insert(false);
                }
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for preset in Preset::ALL {
            assert_eq!(Preset::parse(preset.name()), Some(preset));
        }
        assert_eq!(Preset::parse("minimal"), None);
    }

    #[test]
    fn test_strict_fills_unset_values() {
        let config = Preset::Strict.apply(Config::default());
        assert_eq!(config.rule_int(complexity::LENGTH, "max_lines", 50), 30);
        assert_eq!(config.rule_int(complexity::NESTING, "max_depth", 3), 2);
        assert_eq!(config.rule_severity(naming::ID), Some(Severity::Critical));
    }

    #[test]
    fn test_strict_keeps_user_values() {
        let config = Config::parse(
            r#"
[rules.complexity-length]
max_lines = 80

[rules.naming]
severity = "suggestion"
"#,
        )
        .unwrap();
        let config = Preset::Strict.apply(config);
        assert_eq!(config.rule_int(complexity::LENGTH, "max_lines", 50), 80);
        assert_eq!(config.rule_severity(naming::ID), Some(Severity::Suggestion));
    }

    #[test]
    fn test_architecture_disables_symbol_rules() {
        let config = Preset::Architecture.apply(Config::default());
        for id in RULE_IDS {
            assert!(!config.is_rule_enabled(id));
        }
        assert!(config.is_rule_enabled("architecture"));
    }
}
