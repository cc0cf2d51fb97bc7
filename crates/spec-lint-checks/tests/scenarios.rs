//! End-to-end scenarios over throw-away repositories.

use std::fs;
use std::path::Path;

use spec_lint_checks::{all_checks, ChangePackages, ChangeRequest, ContextImports, NakedTerms};
use spec_lint_core::{Category, Check, CheckContext, ChangedFileSet, Config, LintResult};

struct Repo {
    dir: tempfile::TempDir,
}

impl Repo {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, rel: &str, content: &str) -> &Self {
        let p = self.root().join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
        self
    }

    fn run(&self, check: &dyn Check, changes: &[&str]) -> LintResult {
        let ctx =
            CheckContext::new(self.root(), Config::default(), ChangedFileSet::new(changes)).unwrap();
        check.execute(&ctx).unwrap()
    }
}

fn change_request(process: bool, bpmn: &[&str]) -> String {
    format!(
        "change_candidates:
  process_change: {{ value: {process}, confidence: 0.95 }}
  decision_change: {{ value: false, confidence: 0.5 }}
  glossary_change: {{ value: false, confidence: 0.5 }}
  contextmap_change: {{ value: false, confidence: 0.5 }}
targets:
  bpmn: [{}]
  dmn: []
  glossary: []
  contextmap: []
",
        bpmn.join(", ")
    )
}

#[test]
fn irrelevant_change_sets_pass_every_check_vacuously() {
    let repo = Repo::new();
    repo.write("spec/glossary.yml", "terms: []\n")
        .write("spec/context-map.yml", "contexts: []\n");
    for check in all_checks() {
        let result = repo.run(check.as_ref(), &["README.md", "docs/adr/0001.md"]);
        assert_eq!(
            result.skipped.as_deref(),
            Some("no relevant changes"),
            "{}",
            check.name()
        );
        assert!(result.violations.is_empty(), "{}", check.name());
    }
}

#[test]
fn confidence_bounds_are_inclusive() {
    let cr = |confidence: &str| {
        change_request(false, &[]).replace("confidence: 0.95", &format!("confidence: {confidence}"))
    };
    for ok in ["0", "1", "0.0", "1.0", "0.5"] {
        assert!(ChangeRequest::parse("changes/CR-001.yml", &cr(ok), |_| true).is_ok(), "{ok}");
    }
    for bad in ["-0.01", "1.01", ".nan", "high"] {
        let err = ChangeRequest::parse("changes/CR-001.yml", &cr(bad), |_| true).unwrap_err();
        assert_eq!(err.field, "change_candidates.process_change.confidence", "{bad}");
    }
}

#[test]
fn concrete_scenario_passes() {
    let repo = Repo::new();
    repo.write("spec/process/order.bpmn", "<definitions/>")
        .write("changes/CR-001.yml", &change_request(true, &["spec/process/order.bpmn"]));
    let result = repo.run(
        &ChangePackages::new(),
        &["changes/CR-001.yml", "spec/process/order.bpmn"],
    );
    assert!(!result.has_errors(), "{:#?}", result.violations);
}

#[test]
fn concrete_scenario_with_empty_bpmn_targets_fails() {
    let repo = Repo::new();
    repo.write("spec/process/order.bpmn", "<definitions/>")
        .write("changes/CR-001.yml", &change_request(true, &[]));
    let result = repo.run(
        &ChangePackages::new(),
        &["changes/CR-001.yml", "spec/process/order.bpmn"],
    );
    assert!(result.has_errors());
    let rendered = result.violations[0].to_string();
    assert!(rendered.contains("CR-001.yml"), "{rendered}");
    assert!(rendered.contains("process_change"), "{rendered}");
    assert!(rendered.contains("targets.bpmn"), "{rendered}");
}

#[test]
fn undeclared_bpmn_change_and_missing_coverage_are_distinct() {
    let repo = Repo::new();
    repo.write("spec/process/order.bpmn", "<definitions/>")
        .write("spec/process/refund.bpmn", "<definitions/>");

    repo.write("changes/CR-001.yml", &change_request(false, &[]));
    let undeclared = repo.run(
        &ChangePackages::new(),
        &["changes/CR-001.yml", "spec/process/refund.bpmn"],
    );

    repo.write("changes/CR-001.yml", &change_request(true, &["spec/process/order.bpmn"]));
    let uncovered = repo.run(
        &ChangePackages::new(),
        &[
            "changes/CR-001.yml",
            "spec/process/order.bpmn",
            "spec/process/refund.bpmn",
        ],
    );

    assert_eq!(undeclared.violations[0].code, "CR006");
    assert!(undeclared.violations[0].message.contains(Category::Process.flag_key()));
    assert_eq!(uncovered.violations[0].code, "CR007");
    assert!(uncovered.violations[0].message.contains("spec/process/refund.bpmn"));
}

#[test]
fn glossary_markdown_twin_is_co_declared() {
    let repo = Repo::new();
    repo.write("spec/glossary.yml", "terms:\n  - term: «Invoice»\n")
        .write("spec/glossary.md", "# Glossary\n");
    let declaring = change_request(false, &[])
        .replace(
            "glossary_change: { value: false",
            "glossary_change: { value: true",
        )
        .replace("glossary: []", "glossary: [spec/glossary.yml]");
    let changes = ["changes/CR-001.yml", "spec/glossary.md"];

    repo.write("changes/CR-001.yml", &change_request(false, &[]));
    let undeclared = repo.run(&ChangePackages::new(), &changes);
    assert_eq!(undeclared.violations[0].code, "CR006");
    assert!(undeclared.violations[0].message.contains(Category::Glossary.flag_key()));

    repo.write("changes/CR-001.yml", &declaring);
    let uncovered = repo.run(
        &ChangePackages::new(),
        &["changes/CR-001.yml", "spec/glossary.yml", "spec/glossary.md"],
    );
    assert_eq!(uncovered.violations[0].code, "CR007");
    assert!(uncovered.violations[0].message.ends_with("spec/glossary.md"));
}

#[test]
fn wrapped_term_round_trip() {
    let repo = Repo::new();
    repo.write("spec/glossary.yml", "terms:\n  - term: «Invoice»\n    definition: a bill\n");
    let changes = ["spec/process/billing.bpmn"];

    repo.write("spec/process/billing.bpmn", r#"<task name="Issue «Invoice»"/>"#);
    for check in all_checks().iter().filter(|c| c.code() == "GL" || c.code() == "NT") {
        let result = repo.run(check.as_ref(), &changes);
        assert!(result.violations.is_empty(), "{}: {:#?}", check.name(), result.violations);
    }

    repo.write("spec/process/billing.bpmn", r#"<task name="Issue Invoice"/>"#);
    let result = repo.run(&NakedTerms::new(), &changes);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].code, "NT001");
}

#[test]
fn context_imports_follow_allow_list_and_api_surface() {
    let repo = Repo::new();
    repo.write(
        "spec/context-map.yml",
        "contexts:
  - { key: A, root: src/contexts/A }
  - { key: B, root: src/contexts/B }
allow:
  A: [B]
",
    );
    let changes = ["src/contexts/A/main.ts"];

    repo.write("src/contexts/A/main.ts", "import { x } from '@/contexts/B/api/x';\n");
    assert!(repo.run(&ContextImports::new(), &changes).violations.is_empty());

    repo.write("src/contexts/A/main.ts", "import { x } from '@/contexts/B/internal/x';\n");
    let bypass = repo.run(&ContextImports::new(), &changes);
    assert_eq!(bypass.violations[0].code, "CTX002");

    repo.write(
        "spec/context-map.yml",
        "contexts:
  - { key: A, root: src/contexts/A }
  - { key: B, root: src/contexts/B }
",
    );
    repo.write("src/contexts/A/main.ts", "import { x } from '@/contexts/B/api/x';\n");
    let disallowed = repo.run(&ContextImports::new(), &changes);
    assert_eq!(disallowed.violations[0].code, "CTX001");
}
