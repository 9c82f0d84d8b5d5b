//! Context types for rule execution.

use tokio_util::sync::CancellationToken;

use crate::model::{Module, SymbolModel};

/// Returned when a run observes its cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("analysis cancelled")]
pub struct Cancelled;

/// Context provided to per-symbol rules.
///
/// Carries the module being analyzed so rules can make context-aware
/// decisions (e.g., apply test naming only inside test modules).
#[derive(Debug, Clone, Copy)]
pub struct SymbolContext<'a> {
    /// The whole snapshot, for rules that need to resolve references.
    pub model: &'a SymbolModel,
    /// Module owning the symbol.
    pub module: &'a Module,
    /// Whether the module is a test module (input flag or configured pattern).
    pub is_test: bool,
}

impl<'a> SymbolContext<'a> {
    /// Creates a new symbol context.
    #[must_use]
    pub fn new(model: &'a SymbolModel, module: &'a Module, is_test: bool) -> Self {
        Self {
            model,
            module,
            is_test,
        }
    }
}

/// Context provided to model-wide rules.
#[derive(Debug, Clone, Copy)]
pub struct ModelContext<'a> {
    /// The whole snapshot.
    pub model: &'a SymbolModel,
    cancel: &'a CancellationToken,
}

impl<'a> ModelContext<'a> {
    /// Creates a new model context.
    #[must_use]
    pub fn new(model: &'a SymbolModel, cancel: &'a CancellationToken) -> Self {
        Self { model, cancel }
    }

    /// Cancellation point between module-level work units.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] once the caller has cancelled the run.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_observes_cancellation() {
        let model = SymbolModel::default();
        let token = CancellationToken::new();
        let ctx = ModelContext::new(&model, &token);
        assert!(ctx.checkpoint().is_ok());

        token.cancel();
        assert_eq!(ctx.checkpoint(), Err(Cancelled));
    }
}
