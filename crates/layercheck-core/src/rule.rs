//! Rule traits for defining conformance rules.

use crate::context::{Cancelled, ModelContext, SymbolContext};
use crate::model::Symbol;
use crate::types::Finding;

/// A per-symbol predicate over the symbol model.
///
/// Implementations are pure and stateless: they see one symbol at a time and
/// return at most one finding for it. The engine shards symbol evaluation
/// across worker threads, so rules must be `Send + Sync`.
///
/// # Example
///
/// ```ignore
/// use layercheck_core::{Finding, RuleDef, Symbol, SymbolContext, SymbolRule};
///
/// pub struct NoUnderscoreTypes { def: RuleDef }
///
/// impl SymbolRule for NoUnderscoreTypes {
///     fn id(&self) -> &str { self.def.id() }
///
///     fn evaluate(&self, ctx: &SymbolContext, symbol: &Symbol) -> Option<Finding> {
///         symbol.name().contains('_').then(|| {
///             self.def.finding(symbol.id().as_str(), ctx.module.id().as_str(), &[])
///         })
///     }
/// }
/// ```
pub trait SymbolRule: Send + Sync {
    /// Returns the catalog rule id this predicate implements.
    fn id(&self) -> &str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &str {
        ""
    }

    /// Evaluates one symbol.
    fn evaluate(&self, ctx: &SymbolContext<'_>, symbol: &Symbol) -> Option<Finding>;
}

/// Type alias for boxed `SymbolRule` trait objects.
pub type SymbolRuleBox = Box<dyn SymbolRule>;

/// A model-wide rule, such as dependency-graph analysis.
///
/// Model rules see the whole snapshot at once and may emit findings for
/// several catalog rule ids. Long-running implementations call
/// [`ModelContext::checkpoint`] between module-level work units.
pub trait ModelRule: Send + Sync {
    /// Returns the kebab-case name of this analyzer.
    fn name(&self) -> &str;

    /// Checks the whole model.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the run was cancelled mid-way.
    fn check_model(&self, ctx: &ModelContext<'_>) -> Result<Vec<Finding>, Cancelled>;
}

/// Type alias for boxed `ModelRule` trait objects.
pub type ModelRuleBox = Box<dyn ModelRule>;
