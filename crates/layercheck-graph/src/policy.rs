//! Layer policy: which layers a layer may depend on.

use std::collections::{BTreeMap, BTreeSet};

use layercheck_core::Layer;

/// Permitted dependency directions between layers.
///
/// Only the listed directions are permitted, so two distinct modules of the
/// same layer may depend on each other only when that layer lists itself.
/// The table is static data: it is built once and never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPolicy {
    allowed: BTreeMap<Layer, BTreeSet<Layer>>,
}

impl LayerPolicy {
    /// The standard four-layer order.
    ///
    /// | From           | Allowed To                  |
    /// |----------------|-----------------------------|
    /// | Domain         | (none)                      |
    /// | Application    | Domain                      |
    /// | Infrastructure | Application, Domain         |
    /// | API            | Application, Infrastructure |
    #[must_use]
    pub fn standard() -> Self {
        let rows: [(Layer, &[Layer]); 4] = [
            (Layer::Domain, &[]),
            (Layer::Application, &[Layer::Domain]),
            (Layer::Infrastructure, &[Layer::Application, Layer::Domain]),
            (Layer::Api, &[Layer::Application, Layer::Infrastructure]),
        ];
        Self::from_table(&rows)
    }

    /// Builds a policy from `(from, allowed targets)` rows.
    ///
    /// Layers without a row may depend on nothing. A row that names its own
    /// layer opts that layer into intra-layer dependencies.
    #[must_use]
    pub fn from_table(rows: &[(Layer, &[Layer])]) -> Self {
        let allowed = rows
            .iter()
            .map(|(from, to)| (*from, to.iter().copied().collect()))
            .collect();
        Self { allowed }
    }

    /// Whether a module of layer `from` may depend on one of layer `to`.
    #[must_use]
    pub fn permits(&self, from: Layer, to: Layer) -> bool {
        self.allowed
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    /// Layers `from` may depend on, innermost first.
    pub fn allowed_targets(&self, from: Layer) -> impl Iterator<Item = Layer> + '_ {
        self.allowed.get(&from).into_iter().flatten().copied()
    }
}

impl Default for LayerPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
