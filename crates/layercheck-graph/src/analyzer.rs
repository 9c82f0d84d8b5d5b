//! Dependency rule analyzer.
//!
//! Evaluates the layer policy and cycle detection against the module graph,
//! producing findings for the `architecture`, `architecture-cycle` and
//! `clean-dependencies` catalog rules.

use layercheck_core::{Cancelled, Finding, ModelContext, ModelRule, RuleCatalog, RuleDef};
use tracing::debug;

use crate::graph::{DependencyEdge, ModuleGraph};
use crate::policy::LayerPolicy;

/// Rule id for layer-direction violations.
pub const ARCHITECTURE: &str = "architecture";
/// Rule id for module dependency cycles.
pub const CYCLE: &str = "architecture-cycle";
/// Rule id for modules whose dependencies all follow the layer order.
pub const CLEAN: &str = "clean-dependencies";

/// All rule ids served by [`DependencyAnalyzer`].
pub const RULE_IDS: [&str; 3] = [ARCHITECTURE, CYCLE, CLEAN];

/// Evaluates layer direction and cycles over the whole model.
///
/// Each of the three rules is active only when its definition has been
/// supplied; a rule disabled in the catalog produces nothing.
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalyzer {
    policy: LayerPolicy,
    architecture: Option<RuleDef>,
    cycle: Option<RuleDef>,
    clean: Option<RuleDef>,
}

impl DependencyAnalyzer {
    /// Creates an analyzer with no active rules.
    #[must_use]
    pub fn new(policy: LayerPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Creates an analyzer with every enabled graph rule of `catalog`.
    #[must_use]
    pub fn from_catalog(policy: LayerPolicy, catalog: &RuleCatalog) -> Self {
        RULE_IDS
            .iter()
            .filter_map(|id| catalog.get_enabled(id))
            .fold(Self::new(policy), |analyzer, def| {
                analyzer.with_rule(def.clone())
            })
    }

    /// Activates one graph rule. Definitions for other ids are ignored.
    #[must_use]
    pub fn with_rule(mut self, def: RuleDef) -> Self {
        match def.id() {
            ARCHITECTURE => self.architecture = Some(def),
            CYCLE => self.cycle = Some(def),
            CLEAN => self.clean = Some(def),
            other => debug!("Ignoring non-graph rule: {}", other),
        }
        self
    }

    /// Whether any graph rule is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.architecture.is_some() || self.cycle.is_some() || self.clean.is_some()
    }

    fn permits(&self, ctx: &ModelContext<'_>, edge: &DependencyEdge) -> bool {
        match (
            ctx.model.module(edge.from.as_str()),
            ctx.model.module(edge.to.as_str()),
        ) {
            (Some(from), Some(to)) => self.policy.permits(from.layer(), to.layer()),
            _ => true,
        }
    }

    fn check_direction(
        &self,
        def: &RuleDef,
        ctx: &ModelContext<'_>,
        graph: &ModuleGraph,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        for edge in graph.edges() {
            let (Some(from), Some(to)) = (
                ctx.model.module(edge.from.as_str()),
                ctx.model.module(edge.to.as_str()),
            ) else {
                continue;
            };
            if self.policy.permits(from.layer(), to.layer()) {
                continue;
            }

            let target = edge.target.to_string();
            findings.push(
                def.finding(
                    edge.via.as_str(),
                    edge.from.as_str(),
                    &[
                        ("from", edge.from.as_str()),
                        ("from_layer", from.layer().as_str()),
                        ("to", edge.to.as_str()),
                        ("to_layer", to.layer().as_str()),
                        ("symbol", edge.via.as_str()),
                        ("target", &target),
                    ],
                )
                .with_edge(edge.from.as_str(), edge.to.as_str()),
            );
        }

        findings
    }

    fn check_cycles(
        def: &RuleDef,
        ctx: &ModelContext<'_>,
        graph: &ModuleGraph,
    ) -> Result<Vec<Finding>, Cancelled> {
        let mut findings = Vec::new();

        for cycle in graph.cycles(ctx)? {
            let (from, to) = &cycle.closing;
            let Some(edge) = graph.edge(from.as_str(), to.as_str()) else {
                continue;
            };
            let path = cycle.to_string();
            let target = edge.target.to_string();
            findings.push(
                def.finding(
                    edge.via.as_str(),
                    from.as_str(),
                    &[
                        ("cycle", &path),
                        ("symbol", edge.via.as_str()),
                        ("target", &target),
                    ],
                )
                .with_edge(from.as_str(), to.as_str()),
            );
        }

        Ok(findings)
    }

    fn check_clean(
        &self,
        def: &RuleDef,
        ctx: &ModelContext<'_>,
        graph: &ModuleGraph,
    ) -> Result<Vec<Finding>, Cancelled> {
        let mut findings = Vec::new();

        for module in ctx.model.modules() {
            ctx.checkpoint()?;
            let id = module.id().as_str();
            let edges: Vec<&DependencyEdge> = graph.edges_from(id).collect();
            if edges.is_empty() {
                continue;
            }

            let clean = edges.iter().all(|edge| {
                self.permits(ctx, edge) && !graph.reaches(edge.to.as_str(), edge.from.as_str())
            });
            if !clean {
                continue;
            }

            let targets = edges
                .iter()
                .map(|e| e.to.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            findings.push(def.finding(
                id,
                id,
                &[
                    ("module", id),
                    ("layer", module.layer().as_str()),
                    ("targets", &targets),
                ],
            ));
        }

        Ok(findings)
    }
}

impl ModelRule for DependencyAnalyzer {
    fn name(&self) -> &str {
        "dependency-graph"
    }

    fn check_model(&self, ctx: &ModelContext<'_>) -> Result<Vec<Finding>, Cancelled> {
        if !self.is_active() {
            return Ok(Vec::new());
        }

        let graph = ModuleGraph::build(ctx)?;
        let mut findings = Vec::new();

        if let Some(def) = &self.architecture {
            findings.extend(self.check_direction(def, ctx, &graph));
        }
        if let Some(def) = &self.cycle {
            findings.extend(Self::check_cycles(def, ctx, &graph)?);
        }
        if let Some(def) = &self.clean {
            findings.extend(self.check_clean(def, ctx, &graph)?);
        }

        debug!("Dependency analysis produced {} findings", findings.len());
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layercheck_core::{
        Layer, Module, ModuleId, Reference, Severity, Symbol, SymbolId, SymbolKind, SymbolModel,
    };
    use tokio_util::sync::CancellationToken;

    fn sym(id: &str, refs: &[&str]) -> Symbol {
        let name = id.rsplit('.').next().unwrap_or(id);
        refs.iter().fold(Symbol::new(id, name, SymbolKind::Type), |s, r| {
            s.with_reference(Reference::Symbol(SymbolId::new(*r)))
        })
    }

    fn analyzer() -> DependencyAnalyzer {
        DependencyAnalyzer::from_catalog(LayerPolicy::standard(), &RuleCatalog::builtin().unwrap())
    }

    fn check(model: &SymbolModel) -> Vec<Finding> {
        let token = CancellationToken::new();
        analyzer()
            .check_model(&ModelContext::new(model, &token))
            .unwrap()
    }

    fn of_rule<'a>(findings: &'a [Finding], rule: &str) -> Vec<&'a Finding> {
        findings.iter().filter(|f| f.rule == rule).collect()
    }

    #[test]
    fn permitted_edges_produce_no_architecture_findings() {
        let model = SymbolModel::new(vec![
            Module::new("Shop.Api", Layer::Api).with_symbol(sym(
                "Shop.Api.OrdersController",
                &["Shop.Application.PlaceOrder", "Shop.Infrastructure.Db"],
            )),
            Module::new("Shop.Application", Layer::Application)
                .with_symbol(sym("Shop.Application.PlaceOrder", &["Shop.Domain.Order"])),
            Module::new("Shop.Infrastructure", Layer::Infrastructure).with_symbol(sym(
                "Shop.Infrastructure.Db",
                &["Shop.Application.PlaceOrder", "Shop.Domain.Order"],
            )),
            Module::new("Shop.Domain", Layer::Domain).with_symbol(sym("Shop.Domain.Order", &[])),
        ])
        .unwrap();

        let findings = check(&model);
        assert!(of_rule(&findings, ARCHITECTURE).is_empty());
        assert!(of_rule(&findings, CYCLE).is_empty());
        assert_eq!(of_rule(&findings, CLEAN).len(), 3);
    }

    #[test]
    fn infrastructure_to_api_is_one_critical_finding() {
        let model = SymbolModel::new(vec![
            Module::new("Shop.Infrastructure", Layer::Infrastructure).with_symbol(sym(
                "Shop.Infrastructure.Gateway",
                &["Shop.Api.OrdersController", "Shop.Api.Health"],
            )),
            Module::new("Shop.Api", Layer::Api)
                .with_symbol(sym("Shop.Api.OrdersController", &[]))
                .with_symbol(sym("Shop.Api.Health", &[])),
        ])
        .unwrap();

        let findings = check(&model);
        let violations = of_rule(&findings, ARCHITECTURE);
        assert_eq!(violations.len(), 1);
        let f = violations[0];
        assert_eq!(f.severity, Severity::Critical);
        assert_eq!(f.subject, "Shop.Infrastructure.Gateway");
        let edge = f.edge.as_ref().unwrap();
        assert_eq!(
            (edge.from.as_str(), edge.to.as_str()),
            ("Shop.Infrastructure", "Shop.Api")
        );
        assert_eq!(
            f.message,
            "Shop.Infrastructure (Infrastructure) must not depend on Shop.Api (API): \
             `Shop.Infrastructure.Gateway` references `Shop.Api.OrdersController`"
        );
        assert!(of_rule(&findings, CLEAN).is_empty());
    }

    #[test]
    fn application_infrastructure_cycle_is_one_cycle_finding() {
        let model = SymbolModel::new(vec![
            Module::new("Shop.Application", Layer::Application).with_symbol(sym(
                "Shop.Application.PlaceOrder",
                &["Shop.Infrastructure.Repo"],
            )),
            Module::new("Shop.Infrastructure", Layer::Infrastructure)
                .with_symbol(sym("Shop.Infrastructure.Repo", &["Shop.Application.PlaceOrder"])),
        ])
        .unwrap();

        let findings = check(&model);
        let cycles = of_rule(&findings, CYCLE);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].severity, Severity::Critical);
        assert!(cycles[0]
            .message
            .contains("Shop.Application -> Shop.Infrastructure -> Shop.Application"));
        // The upward Application -> Infrastructure edge is also a direction violation.
        assert_eq!(of_rule(&findings, ARCHITECTURE).len(), 1);
        assert!(of_rule(&findings, CLEAN).is_empty());
    }

    #[test]
    fn same_layer_edge_between_modules_is_a_violation() {
        let model = SymbolModel::new(vec![
            Module::new("Shop.Domain.Orders", Layer::Domain)
                .with_symbol(sym("Shop.Domain.Orders.Order", &["Shop.Domain.Shared.Money"])),
            Module::new("Shop.Domain.Shared", Layer::Domain)
                .with_symbol(sym("Shop.Domain.Shared.Money", &[])),
        ])
        .unwrap();

        let findings = check(&model);
        let violations = of_rule(&findings, ARCHITECTURE);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);
        assert_eq!(violations[0].subject, "Shop.Domain.Orders.Order");
        assert!(of_rule(&findings, CLEAN).is_empty());
    }

    #[test]
    fn same_layer_cycle_reports_both_edges_and_the_cycle() {
        let model = SymbolModel::new(vec![
            Module::new("A", Layer::Application).with_symbol(sym("A.X", &["B.X"])),
            Module::new("B", Layer::Application).with_symbol(sym("B.X", &["A.X"])),
        ])
        .unwrap();

        let findings = check(&model);
        assert_eq!(of_rule(&findings, ARCHITECTURE).len(), 2);
        assert_eq!(of_rule(&findings, CYCLE).len(), 1);
    }

    #[test]
    fn opted_in_same_layer_edge_is_clean() {
        let rows: [(Layer, &[Layer]); 1] = [(Layer::Domain, &[Layer::Domain])];
        let analyzer = DependencyAnalyzer::from_catalog(
            LayerPolicy::from_table(&rows),
            &RuleCatalog::builtin().unwrap(),
        );
        let model = SymbolModel::new(vec![
            Module::new("Shop.Domain.Orders", Layer::Domain)
                .with_symbol(sym("Shop.Domain.Orders.Order", &["Shop.Domain.Shared.Money"])),
            Module::new("Shop.Domain.Shared", Layer::Domain)
                .with_symbol(sym("Shop.Domain.Shared.Money", &[])),
        ])
        .unwrap();
        let token = CancellationToken::new();
        let findings = analyzer
            .check_model(&ModelContext::new(&model, &token))
            .unwrap();
        assert!(of_rule(&findings, ARCHITECTURE).is_empty());
        assert_eq!(of_rule(&findings, CLEAN).len(), 1);
    }

    #[test]
    fn module_reference_counts_as_dependency() {
        let model = SymbolModel::new(vec![
            Module::new("Shop.Domain", Layer::Domain).with_symbol(
                Symbol::new("Shop.Domain.Order", "Order", SymbolKind::Type)
                    .with_reference(Reference::Module(ModuleId::new("Shop.Application"))),
            ),
            Module::new("Shop.Application", Layer::Application),
        ])
        .unwrap();

        let findings = check(&model);
        let violations = of_rule(&findings, ARCHITECTURE);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with("`module Shop.Application`"));
    }

    #[test]
    fn disabled_rules_are_silent() {
        let catalog = RuleCatalog::builtin().unwrap().only(&[CLEAN]);
        let analyzer = DependencyAnalyzer::from_catalog(LayerPolicy::standard(), &catalog);
        let model = SymbolModel::new(vec![
            Module::new("A", Layer::Application).with_symbol(sym("A.X", &["B.X"])),
            Module::new("B", Layer::Application).with_symbol(sym("B.X", &["A.X"])),
        ])
        .unwrap();
        let token = CancellationToken::new();
        let findings = analyzer
            .check_model(&ModelContext::new(&model, &token))
            .unwrap();
        assert!(findings.is_empty());

        assert!(!DependencyAnalyzer::new(LayerPolicy::standard()).is_active());
    }

    #[test]
    fn cancellation_is_observed() {
        let model = SymbolModel::new(vec![Module::new("A", Layer::Domain)]).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = analyzer().check_model(&ModelContext::new(&model, &token));
        assert_eq!(result, Err(Cancelled));
    }
}
