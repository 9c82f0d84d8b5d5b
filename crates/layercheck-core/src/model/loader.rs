//! DTO → domain model conversion with validation.
//!
//! Loading is all-or-nothing: every problem in the input is collected and
//! returned together, and no partial model is ever produced.

use std::path::{Path, PathBuf};

use miette::Diagnostic;

use super::dto::{ModuleDto, ReferenceDto, SymbolDto, SymbolModelDto};
use super::{
    BlockingWait, Layer, Metrics, Module, ModuleId, Reference, Suppression, Symbol, SymbolId,
    SymbolKind, SymbolModel,
};

/// A single validation problem in a symbol model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum ModelError {
    /// Layer tag is not one of the four known layers.
    #[error("module `{module}`: unknown layer `{value}`, expected: domain, application, infrastructure, api")]
    #[diagnostic(code(layercheck::model::unknown_layer))]
    UnknownLayer {
        /// Offending module.
        module: String,
        /// The invalid tag.
        value: String,
    },

    /// Symbol kind tag is unknown.
    #[error("symbol `{symbol}`: unknown kind `{value}`, expected: type, interface, method, property")]
    #[diagnostic(code(layercheck::model::unknown_kind))]
    UnknownSymbolKind {
        /// Offending symbol.
        symbol: String,
        /// The invalid tag.
        value: String,
    },

    /// Blocking-wait tag is outside the supported call shapes.
    #[error("symbol `{symbol}`: unknown blocking wait `{value}`, expected: result, wait, get-result, wait-all, wait-any")]
    #[diagnostic(code(layercheck::model::unknown_blocking_wait))]
    UnknownBlockingWait {
        /// Offending symbol.
        symbol: String,
        /// The invalid tag.
        value: String,
    },

    /// An identifier is empty.
    #[error("{context}: identifier must not be empty")]
    #[diagnostic(code(layercheck::model::empty_identifier))]
    EmptyIdentifier {
        /// Where the empty id was found.
        context: String,
    },

    /// The same module id was declared twice (e.g., in two shards).
    #[error("module `{module}` is declared more than once")]
    #[diagnostic(code(layercheck::model::duplicate_module))]
    DuplicateModule {
        /// Duplicated module id.
        module: String,
    },

    /// The same symbol id was declared twice.
    #[error("symbol `{symbol}` is declared in both `{first}` and `{second}`")]
    #[diagnostic(code(layercheck::model::duplicate_symbol))]
    DuplicateSymbol {
        /// Duplicated symbol id.
        symbol: String,
        /// Module of the first declaration.
        first: String,
        /// Module of the second declaration.
        second: String,
    },

    /// A reference names a symbol that does not exist.
    #[error("symbol `{symbol}` references unknown symbol `{target}`")]
    #[diagnostic(
        code(layercheck::model::dangling_reference),
        help("the front end must emit every referenced symbol, or drop references to external code")
    )]
    DanglingSymbolReference {
        /// Referencing symbol.
        symbol: String,
        /// Missing target.
        target: String,
    },

    /// A reference names a module that does not exist.
    #[error("symbol `{symbol}` references unknown module `{target}`")]
    #[diagnostic(code(layercheck::model::dangling_reference))]
    DanglingModuleReference {
        /// Referencing symbol.
        symbol: String,
        /// Missing target.
        target: String,
    },
}

/// Fatal errors while loading a symbol model.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadModelError {
    /// Model file could not be read.
    #[error("failed to read symbol model {path}: {source}")]
    #[diagnostic(code(layercheck::model::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A model directory holds no `*.json` shard.
    #[error("no symbol model shards found under {path}")]
    #[diagnostic(
        code(layercheck::model::no_shards),
        help("point the check at the front end's output file or shard directory")
    )]
    NoShards {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// Model JSON is malformed.
    #[error("failed to parse symbol model: {0}")]
    #[diagnostic(code(layercheck::model::json))]
    Json(#[from] serde_json::Error),

    /// Model content failed validation.
    #[error("symbol model validation errors:\n{}", format_errors(.errors))]
    #[diagnostic(
        code(layercheck::model::invalid),
        help("fix the front end output; the engine never analyzes a partially valid model")
    )]
    Invalid {
        /// Every problem found.
        #[related]
        errors: Vec<ModelError>,
    },
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `SymbolModelDto` into a validated [`SymbolModel`].
///
/// # Errors
///
/// Returns [`LoadModelError::Invalid`] listing every problem found.
pub fn load(dto: SymbolModelDto) -> Result<SymbolModel, LoadModelError> {
    let mut errors = Vec::new();
    let mut modules = Vec::with_capacity(dto.modules.len());

    for (id, module) in dto.modules {
        match convert_module(id, module) {
            Ok(m) => modules.push(m),
            Err(mut e) => errors.append(&mut e),
        }
    }

    if !errors.is_empty() {
        return Err(LoadModelError::Invalid { errors });
    }

    SymbolModel::new(modules).map_err(|errors| LoadModelError::Invalid { errors })
}

/// Merges several model shards and loads the result.
///
/// # Errors
///
/// Returns [`LoadModelError::Invalid`] if a module id appears in more than
/// one shard, or if the merged model fails validation.
pub fn load_shards(shards: Vec<SymbolModelDto>) -> Result<SymbolModel, LoadModelError> {
    let mut merged = SymbolModelDto::default();
    let mut errors = Vec::new();

    for shard in shards {
        for (id, module) in shard.modules {
            if merged.modules.contains_key(&id) {
                errors.push(ModelError::DuplicateModule { module: id });
                continue;
            }
            merged.modules.insert(id, module);
        }
    }

    if !errors.is_empty() {
        return Err(LoadModelError::Invalid { errors });
    }
    load(merged)
}

/// Parses and loads a model from JSON text.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the model is invalid.
pub fn from_json(content: &str) -> Result<SymbolModel, LoadModelError> {
    load(SymbolModelDto::from_json(content)?)
}

/// Reads, parses and loads a model file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is invalid.
pub fn from_file(path: &Path) -> Result<SymbolModel, LoadModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&content)
}

fn convert_module(id: String, dto: ModuleDto) -> Result<Module, Vec<ModelError>> {
    let mut errors = Vec::new();

    if id.is_empty() {
        errors.push(ModelError::EmptyIdentifier {
            context: "modules".to_string(),
        });
    }

    let layer = Layer::parse(&dto.layer);
    if layer.is_none() {
        errors.push(ModelError::UnknownLayer {
            module: id.clone(),
            value: dto.layer.clone(),
        });
    }

    let mut symbols = Vec::with_capacity(dto.symbols.len());
    for (i, symbol) in dto.symbols.into_iter().enumerate() {
        match convert_symbol(&id, i, symbol) {
            Ok(s) => symbols.push(s),
            Err(mut e) => errors.append(&mut e),
        }
    }

    match layer {
        Some(layer) if errors.is_empty() => Ok(symbols
            .into_iter()
            .fold(Module::new(id, layer).with_test(dto.test), Module::with_symbol)),
        _ => Err(errors),
    }
}

fn convert_symbol(module: &str, index: usize, dto: SymbolDto) -> Result<Symbol, Vec<ModelError>> {
    let mut errors = Vec::new();

    if dto.id.is_empty() {
        errors.push(ModelError::EmptyIdentifier {
            context: format!("modules.{module}.symbols[{index}].id"),
        });
    }

    let kind = SymbolKind::parse(&dto.kind);
    if kind.is_none() {
        errors.push(ModelError::UnknownSymbolKind {
            symbol: dto.id.clone(),
            value: dto.kind.clone(),
        });
    }

    let mut waits = Vec::with_capacity(dto.blocking_waits.len());
    for tag in &dto.blocking_waits {
        match BlockingWait::parse(tag) {
            Some(wait) => waits.push(wait),
            None => errors.push(ModelError::UnknownBlockingWait {
                symbol: dto.id.clone(),
                value: tag.clone(),
            }),
        }
    }

    let Some(kind) = kind.filter(|_| errors.is_empty()) else {
        return Err(errors);
    };

    let mut symbol = Symbol::new(dto.id, dto.name, kind)
        .with_metrics(Metrics {
            nesting_depth: dto.metrics.nesting_depth,
            line_count: dto.metrics.line_count,
            parameter_count: dto.metrics.parameter_count,
        })
        .with_parameters(dto.parameters)
        .with_locals(dto.locals);

    for reference in dto.references {
        symbol = symbol.with_reference(match reference {
            ReferenceDto::Symbol(id) => Reference::Symbol(SymbolId::new(id)),
            ReferenceDto::Module(id) => Reference::Module(ModuleId::new(id)),
        });
    }
    for wait in waits {
        symbol = symbol.with_blocking_wait(wait);
    }
    for suppression in dto.suppressions {
        symbol = symbol.with_suppression(Suppression::new(suppression.rule, suppression.reason));
    }

    Ok(symbol)
}
