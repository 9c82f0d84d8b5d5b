//! Integration tests: full pipeline runs over JSON model fixtures.

use layercheck::{
    model, Config, EngineError, Pipeline, PipelineError, Report, RuleCatalog, Severity,
    SymbolModel, EXIT_CRITICAL, EXIT_OK,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

fn fixture(name: &str) -> SymbolModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    model::from_file(&path).unwrap()
}

fn run(name: &str, config: Config) -> Report {
    let pipeline = Pipeline::from_config(config).unwrap();
    pipeline
        .run(fixture(name), &CancellationToken::new())
        .unwrap()
}

fn subjects<'a>(report: &'a Report, rule: &str) -> Vec<&'a str> {
    report
        .by_rule(rule)
        .into_iter()
        .map(|f| f.subject.as_str())
        .collect()
}

// ── Dependency graph ──

#[test]
fn infrastructure_to_api_is_the_only_finding() {
    let report = run("orders_layering.json", Config::default());

    assert_eq!(report.findings().len(), 1);
    let finding = &report.findings()[0];
    assert_eq!(finding.rule, "architecture");
    assert_eq!(finding.severity, Severity::Critical);
    assert_eq!(finding.subject, "Shop.Infrastructure.Gateway");
    let edge = finding.edge.as_ref().unwrap();
    assert_eq!(edge.from, "Shop.Infrastructure");
    assert_eq!(edge.to, "Shop.Api");
    assert_eq!(
        finding.message,
        "Shop.Infrastructure (Infrastructure) must not depend on Shop.Api (API): \
         `Shop.Infrastructure.Gateway` references `Shop.Api.OrdersController`"
    );
    assert_eq!(report.exit_status(), EXIT_CRITICAL);
}

#[test]
fn permitted_model_has_no_architecture_findings() {
    let report = run("permitted.json", Config::default());

    assert!(report.by_rule("architecture").is_empty());
    assert!(report.by_rule("architecture-cycle").is_empty());
    assert_eq!(
        subjects(&report, "clean-dependencies"),
        vec!["Shop.Api", "Shop.Application", "Shop.Infrastructure"]
    );
    assert!(report
        .findings()
        .iter()
        .all(|f| f.severity == Severity::WellDone));
    assert_eq!(report.exit_status(), EXIT_OK);
}

#[test]
fn application_infrastructure_cycle_is_reported_once() {
    let report = run("cycle.json", Config::default());

    let cycles = report.by_rule("architecture-cycle");
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].message.contains("Shop.Application -> Shop.Infrastructure -> Shop.Application"));
    // Application -> Infrastructure also breaks the layer order
    assert_eq!(subjects(&report, "architecture"), vec!["Shop.Application.Checkout"]);
    assert!(report.by_rule("clean-dependencies").is_empty());
}

#[test]
fn edge_between_two_domain_modules_is_critical() {
    let report = run("domain_split.json", Config::default());

    assert_eq!(subjects(&report, "architecture"), vec!["Shop.Domain.Orders.Order"]);
    assert!(report.by_rule("clean-dependencies").is_empty());
    assert_eq!(report.exit_status(), EXIT_CRITICAL);
}

// ── Symbol rules ──

#[test]
fn quality_findings_per_rule() {
    let report = run("quality.json", Config::default());

    assert_eq!(
        subjects(&report, "naming"),
        vec!["Shop.Application.OrderService.getOrder"]
    );
    assert_eq!(
        subjects(&report, "complexity-nesting"),
        vec!["Shop.Application.OrderService.Reconcile"]
    );
    assert!(report.by_rule("complexity-length").is_empty());
    assert_eq!(
        subjects(&report, "test-naming"),
        vec!["Shop.Application.Tests.OrderServiceTests.GetOrderWorks"]
    );
}

#[test]
fn suppressions_need_a_reason_for_critical_findings() {
    let report = run("quality.json", Config::default());

    // Warmup is suppressed with a reason; Refresh's reasonless suppression is ignored.
    assert_eq!(
        subjects(&report, "async-blocking"),
        vec![
            "Shop.Application.OrderService.Refresh",
            "Shop.Application.OrderService.Sync",
        ]
    );
    assert_eq!(report.exit_status(), EXIT_CRITICAL);
}

#[test]
fn report_is_ordered_by_severity_then_priority() {
    let report = run("quality.json", Config::default());
    let severities: Vec<Severity> = report.findings().iter().map(|f| f.severity).collect();

    let mut sorted = severities.clone();
    sorted.sort_by_key(|s| s.rank());
    assert_eq!(severities, sorted);
    assert_eq!(report.findings()[0].rule, "async-blocking");
}

#[test]
fn runs_are_deterministic() {
    let pipeline = Pipeline::from_config(Config::default()).unwrap();
    let token = CancellationToken::new();

    let first = pipeline.run(fixture("quality.json"), &token).unwrap();
    let second = pipeline.run(fixture("quality.json"), &token).unwrap();
    assert!(!first.findings().is_empty());
    assert_eq!(first, second);
}

// ── Configuration ──

#[test]
fn excluded_modules_skip_symbol_rules_but_keep_graph_edges() {
    let config = Config::parse("[analyzer]\nexclude = [\"Shop.Application.Tests\"]\n").unwrap();
    let report = run("quality.json", config);
    assert!(report.by_rule("test-naming").is_empty());

    let config = Config::parse("[analyzer]\nexclude = [\"Shop.Infrastructure\"]\n").unwrap();
    let report = run("orders_layering.json", config);
    assert_eq!(subjects(&report, "architecture"), vec!["Shop.Infrastructure.Gateway"]);
}

#[test]
fn severity_override_changes_exit_status() {
    let config = Config::parse("[rules.architecture]\nseverity = \"suggestion\"\n").unwrap();
    let report = run("orders_layering.json", config);

    assert_eq!(report.findings()[0].severity, Severity::Suggestion);
    assert_eq!(report.exit_status(), EXIT_OK);
}

#[test]
fn strict_preset_promotes_naming() {
    let config = Config::parse("preset = \"strict\"\n").unwrap();
    let report = run("quality.json", config);

    let naming = report.by_rule("naming");
    assert_eq!(naming.len(), 1);
    assert_eq!(naming[0].severity, Severity::Critical);
}

#[test]
fn rule_filter_limits_findings() {
    let pipeline = Pipeline::builder().only(["test-naming"]).build().unwrap();
    let report = pipeline
        .run(fixture("quality.json"), &CancellationToken::new())
        .unwrap();

    assert!(report.findings().iter().all(|f| f.rule == "test-naming"));
    assert_eq!(report.findings().len(), 1);
}

#[test]
fn custom_catalog_rewords_and_reclassifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    std::fs::write(
        &path,
        r#"
version = 1

[[rules]]
id = "architecture"
category = "architecture"
severity = "suggestion"
priority = "correctness"
message = "{from} reaches into {to}"
"#,
    )
    .unwrap();

    let config = Config::parse(&format!("catalog = {:?}\n", path.display().to_string())).unwrap();
    let pipeline = Pipeline::from_config(config).unwrap();
    assert_eq!(pipeline.catalog().len(), 1);

    let report = pipeline
        .run(fixture("orders_layering.json"), &CancellationToken::new())
        .unwrap();
    assert_eq!(report.findings().len(), 1);
    assert_eq!(report.findings()[0].message, "Shop.Infrastructure reaches into Shop.Api");
    assert_eq!(report.exit_status(), EXIT_OK);
}

#[test]
fn explicit_catalog_wins_over_config() {
    let mut config = Config::default();
    config.catalog = Some(PathBuf::from("does/not/exist.toml"));
    let pipeline = Pipeline::builder()
        .config(config)
        .catalog(RuleCatalog::builtin().unwrap())
        .build()
        .unwrap();
    assert_eq!(pipeline.catalog().len(), 8);
}

// ── Cancellation and output ──

#[test]
fn cancelled_run_has_no_report() {
    let pipeline = Pipeline::from_config(Config::default()).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let result = pipeline.run(fixture("quality.json"), &token);
    assert!(matches!(
        result,
        Err(PipelineError::Engine(EngineError::Cancelled))
    ));
}

#[test]
fn report_serializes_to_json() {
    let report = run("orders_layering.json", Config::default());
    let json = serde_json::to_value(&report).unwrap();

    let finding = &json["findings"][0];
    assert_eq!(finding["rule"], "architecture");
    assert_eq!(finding["severity"], "critical");
    assert_eq!(finding["edge"]["to"], "Shop.Api");
    assert_eq!(json["modules_checked"], 3);
    assert_eq!(json["exit_status"], 1);
}
