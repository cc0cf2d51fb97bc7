//! Runs the `spec-lint` binary against throw-away repositories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn write(root: &Path, rel: &str, content: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, content).unwrap();
}

fn spec_lint(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spec-lint"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("GITHUB_EVENT_PATH")
        .env_remove("RUST_LOG")
        .env("SPEC_LINT_CONFIG_DIR", root.join(".no-global-config"))
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const CR: &str = "change_candidates:
  process_change: { value: true, confidence: 0.9 }
  decision_change: { value: false, confidence: 0.9 }
  glossary_change: { value: false, confidence: 0.9 }
  contextmap_change: { value: false, confidence: 0.9 }
targets:
  bpmn: [spec/process/order.bpmn]
  dmn: []
  glossary: []
  contextmap: []
";

#[test]
fn concrete_scenario_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "changes/CR-001.yml", CR);
    write(tmp.path(), "spec/process/order.bpmn", "<definitions/>");

    let output = spec_lint(
        tmp.path(),
        &["changes", "--changed", "changes/CR-001.yml,spec/process/order.bpmn"],
    );
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("change-packages ok"));
}

#[test]
fn empty_targets_exit_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "changes/CR-001.yml",
        &CR.replace("bpmn: [spec/process/order.bpmn]", "bpmn: []"),
    );
    write(tmp.path(), "spec/process/order.bpmn", "<definitions/>");

    let output = spec_lint(
        tmp.path(),
        &["changes", "--changed", "changes/CR-001.yml,spec/process/order.bpmn"],
    );
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("✗"), "{out}");
    assert!(out.contains("CR-001.yml"), "{out}");
    assert!(out.contains("process_change"), "{out}");
    assert!(out.contains("targets.bpmn"), "{out}");
}

#[test]
fn irrelevant_changes_skip_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let output = spec_lint(tmp.path(), &["all", "--changed", "README.md"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).matches("skip (no relevant changes)").count(), 4);
}

#[test]
fn json_output_lists_every_check() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "spec/glossary.yml", "terms:\n  - term: «Invoice»\n");
    write(tmp.path(), "spec/process/billing.bpmn", r#"<task name="Send Invoice"/>"#);

    let output = spec_lint(
        tmp.path(),
        &["all", "--format", "json", "--changed", "spec/process/billing.bpmn"],
    );
    assert_eq!(output.status.code(), Some(1));
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[2]["check"], "naked-terms");
    assert_eq!(results[2]["violations"][0]["code"], "NT001");
    assert_eq!(results[3]["skipped"], "spec/context-map.yml not found");
}

#[test]
fn list_checks_names_all_checks() {
    let tmp = tempfile::tempdir().unwrap();
    let out = stdout(&spec_lint(tmp.path(), &["list-checks"]));
    for name in ["change-packages", "glossary-refs", "naked-terms", "context-imports"] {
        assert!(out.contains(name), "{out}");
    }
}

#[test]
fn project_config_overrides_conventions() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "spec-lint.toml",
        "[context_map]\nimport_alias = \"~/ctx/\"\n",
    );
    write(
        tmp.path(),
        "spec/context-map.yml",
        "contexts:\n  - { key: a, root: src/a }\n  - { key: b, root: src/b }\n",
    );
    write(tmp.path(), "src/a/main.ts", "import { x } from '~/ctx/b/api/x';\n");

    let output = spec_lint(tmp.path(), &["context-imports", "--changed", "src/a/main.ts"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("[CTX001]"));
}
