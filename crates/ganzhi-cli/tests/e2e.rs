//! E2E tests for the `gz` binary against a small fixture catalog.
//!
//! Covers: JSON schemas of every read command, graph filtering, selection
//! validation, coded errors on stderr, and config/env precedence for the
//! dataset path and graph colors.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.json")
}

fn gz_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gz"));
    cmd.current_dir(dir);
    cmd.env("GANZHI_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd.env_remove("GANZHI_DATA");
    cmd.env_remove("FORMAT");
    cmd
}

fn gz_json(dir: &Path, args: &[&str]) -> Value {
    let output = gz_cmd(dir)
        .arg("--data")
        .arg(fixture())
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("gz should not crash");
    assert!(
        output.status.success(),
        "gz {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn gz_json_error(dir: &Path, args: &[&str]) -> Value {
    let output = gz_cmd(dir)
        .arg("--data")
        .arg(fixture())
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("gz should not crash");
    assert!(!output.status.success(), "gz {args:?} unexpectedly succeeded");
    // Log lines may precede the envelope; it is the pretty-printed object.
    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr.find("{\n").expect("JSON error envelope on stderr");
    let end = start + stderr[start..].find("\n}").expect("envelope end") + 2;
    serde_json::from_str(&stderr[start..end]).expect("valid JSON error envelope")
}

fn names(values: &Value, key: &str) -> Vec<String> {
    values
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v[key].as_str().expect("string field").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// gz list
// ---------------------------------------------------------------------------

#[test]
fn list_works_without_dataset() {
    let dir = TempDir::new().expect("tempdir");
    let output = gz_cmd(dir.path())
        .args(["list", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json");
    let rows = json.as_array().expect("array");
    assert_eq!(rows.len(), 60);
    assert_eq!(rows[0]["name"], "甲子");
    assert_eq!(rows[59]["name"], "癸亥");
    assert!(rows[0].get("nayin").is_none());
}

#[test]
fn list_search_and_nayin_column() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["list", "--search", "甲"]);
    assert_eq!(
        names(&json, "name"),
        vec!["甲子", "甲戌", "甲申", "甲午", "甲辰", "甲寅"]
    );
    assert_eq!(json[0]["nayin"], "海中金");
    assert_eq!(json[0]["stem_element"], "木");
}

#[test]
fn list_text_output_has_header() {
    let dir = TempDir::new().expect("tempdir");
    gz_cmd(dir.path())
        .args(["list", "--element", "metal", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("name\tstem_element"))
        .stdout(predicate::str::contains("庚午\t金\t火"));
}

// ---------------------------------------------------------------------------
// gz show
// ---------------------------------------------------------------------------

#[test]
fn show_merges_every_collection() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["show", "甲子"]);

    assert_eq!(json["entity"]["name"], "甲子");
    assert_eq!(json["nayin"]["name"], "海中金");
    assert_eq!(json["symbolism"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["symbolism"][1]["provenance"], "推理");
    assert_eq!(json["auspicious"][0]["name"], "天乙贵人");
    assert_eq!(json["preferences"].as_array().map(Vec::len), Some(2));

    let others = names(&json["relations"], "other");
    assert_eq!(others, vec!["庚午", "乙丑", "丁卯"]);
    assert_eq!(json["relations"][2]["relation_type"], "三刑");
}

#[test]
fn show_self_relation_lists_itself() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["show", "戊辰"]);
    assert_eq!(json["nayin"]["name"], "大林木");
    assert_eq!(names(&json["relations"], "other"), vec!["戊辰"]);
}

#[test]
fn show_unknown_name_is_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let err = gz_json_error(dir.path(), &["show", "无效"]);
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn show_missing_nayin_is_inconsistent() {
    let dir = TempDir::new().expect("tempdir");
    let err = gz_json_error(dir.path(), &["show", "辛未"]);
    assert_eq!(err["error"]["error_code"], "E3001");
}

#[test]
fn show_without_dataset_fails_with_hint() {
    let dir = TempDir::new().expect("tempdir");
    gz_cmd(dir.path())
        .args(["show", "甲子", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dataset configured"))
        .stderr(predicate::str::contains("GANZHI_DATA"));
}

#[test]
fn show_pretty_has_sections() {
    let dir = TempDir::new().expect("tempdir");
    gz_cmd(dir.path())
        .arg("--data")
        .arg(fixture())
        .args(["show", "甲子", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("纳音"))
        .stdout(predicate::str::contains("海中金"))
        .stdout(predicate::str::contains("关系"));
}

// ---------------------------------------------------------------------------
// gz compare
// ---------------------------------------------------------------------------

#[test]
fn compare_columns_follow_argument_order() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["compare", "乙丑", "甲子"]);

    assert_eq!(json["columns"], serde_json::json!(["乙丑", "甲子"]));
    let rows = json["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 11);

    let stem_element = &rows[2];
    assert_eq!(stem_element["label"], "天干五行");
    assert_eq!(stem_element["cells"][0]["value"], "木");
    assert_eq!(stem_element["cells"][1]["value"], "木");
    assert_eq!(rows[10]["cells"][0]["kind"], "action");
}

#[test]
fn compare_unknown_name_gets_unavailable_column() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["compare", "甲子", "无效"]);
    assert_eq!(json["rows"][0]["cells"][0]["value"], "甲");
    assert_eq!(json["rows"][0]["cells"][1]["kind"], "unavailable");
}

#[test]
fn compare_missing_nayin_keeps_base_attributes() {
    let dir = TempDir::new().expect("tempdir");
    // 辛未 is registered but the fixture has no nayin record for it.
    let json = gz_json(dir.path(), &["compare", "甲子", "辛未"]);
    let rows = json["rows"].as_array().expect("rows");
    assert_eq!(rows[0]["cells"][1]["value"], "辛");
    assert_eq!(rows[1]["cells"][1]["value"], "未");
    assert_eq!(rows[2]["cells"][1]["value"], "金");
    for row in &rows[7..10] {
        assert_eq!(row["cells"][0]["kind"], "value");
        assert_eq!(row["cells"][1]["kind"], "unavailable");
    }
}

#[test]
fn compare_rejects_bad_selection() {
    let dir = TempDir::new().expect("tempdir");
    let err = gz_json_error(dir.path(), &["compare", "甲子"]);
    assert_eq!(err["error"]["error_code"], "E2002");

    let err = gz_json_error(dir.path(), &["compare", "甲子", "甲子"]);
    assert_eq!(err["error"]["error_code"], "E2002");
}

#[test]
fn compare_limits_come_from_project_config() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".ganzhi")).expect("mkdir");
    std::fs::write(
        dir.path().join(".ganzhi/config.toml"),
        "[compare]\nmax_selection = 2\n",
    )
    .expect("write config");

    let err = gz_json_error(dir.path(), &["compare", "甲子", "乙丑", "丙寅"]);
    assert_eq!(err["error"]["error_code"], "E2002");
}

#[test]
fn compare_text_skips_action_row() {
    let dir = TempDir::new().expect("tempdir");
    gz_cmd(dir.path())
        .arg("--data")
        .arg(fixture())
        .args(["compare", "甲子", "丙寅", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("field\t甲子\t丙寅\n"))
        .stdout(predicate::str::contains("纳音\t海中金\t炉中火"))
        .stdout(predicate::str::contains("操作").not());
}

// ---------------------------------------------------------------------------
// gz graph / gz types
// ---------------------------------------------------------------------------

#[test]
fn graph_filter_keeps_only_endpoints() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["graph", "--type", "六冲"]);

    assert_eq!(json["filter"], "六冲");
    assert_eq!(names(&json["nodes"], "name"), vec!["甲子", "庚午"]);
    let links = json["links"].as_array().expect("links");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["source"], "甲子");
    assert_eq!(links[0]["target"], "庚午");
    assert_eq!(links[0]["color"], "#f5222d");
    assert!(json["content_hash"].as_str().is_some_and(|h| h.starts_with("blake3:")));
}

#[test]
fn graph_unmatched_filter_is_empty_success() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["graph", "--type", "six_harm"]);
    assert_eq!(json["nodes"], serde_json::json!([]));
    assert_eq!(json["links"], serde_json::json!([]));

    gz_cmd(dir.path())
        .arg("--data")
        .arg(fixture())
        .args(["graph", "--type", "六害", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no relations match"));
}

#[test]
fn graph_unfiltered_with_stats() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["graph", "--stats"]);

    assert!(json["filter"].is_null());
    assert_eq!(json["nodes"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["links"].as_array().map(Vec::len), Some(6));
    assert_eq!(json["stats"]["self_loop_count"], 1);
    assert_eq!(json["stats"]["component_count"], 2);
    assert_eq!(json["stats"]["hub"], "甲子");

    let custom = json["links"]
        .as_array()
        .expect("links")
        .iter()
        .find(|l| l["relation_type"] == "暗合")
        .expect("custom relation kept");
    assert_eq!(custom["color"], "#999999");
}

#[test]
fn graph_colors_and_dataset_from_project_config() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".ganzhi")).expect("mkdir");
    std::fs::copy(fixture(), dir.path().join("catalog.json")).expect("copy fixture");
    std::fs::write(
        dir.path().join(".ganzhi/config.toml"),
        "[data]\npath = \"catalog.json\"\n\n[graph.colors]\n\"六冲\" = \"#000000\"\n",
    )
    .expect("write config");

    let output = gz_cmd(dir.path())
        .args(["graph", "--type", "六冲", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["links"][0]["color"], "#000000");
}

#[test]
fn dataset_from_env() {
    let dir = TempDir::new().expect("tempdir");
    gz_cmd(dir.path())
        .env("GANZHI_DATA", fixture())
        .args(["types", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("六冲\t1\t#f5222d\ttrue"))
        .stdout(predicate::str::contains("暗合\t1\t#999999\tfalse"));
}

#[test]
fn types_lists_distinct_types_in_order() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["types"]);
    assert_eq!(
        names(&json, "relation_type"),
        vec!["六合", "半合", "六冲", "三刑", "自刑", "暗合"]
    );
}

#[test]
fn invalid_project_config_is_coded() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".ganzhi")).expect("mkdir");
    std::fs::write(dir.path().join(".ganzhi/config.toml"), "[compare\n").expect("write");
    gz_cmd(dir.path())
        .args(["list", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));

    let err = gz_json_error(dir.path(), &["list"]);
    assert_eq!(err["error"]["error_code"], "E1001");
    assert!(
        err["error"]["message"]
            .as_str()
            .expect("message")
            .contains("Failed to parse")
    );
}

// ---------------------------------------------------------------------------
// gz nayin / gz shensha
// ---------------------------------------------------------------------------

#[test]
fn nayin_groups_in_cycle_order() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["nayin"]);
    assert_eq!(
        names(&json, "name"),
        vec!["海中金", "炉中火", "大林木", "路旁土"]
    );
    assert_eq!(json[2]["element"], "木");
    assert_eq!(json[2]["members"].as_array().map(Vec::len), Some(2));
}

#[test]
fn nayin_filters() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["nayin", "--status", "帝旺"]);
    assert_eq!(names(&json, "ganzhi"), vec!["庚午"]);

    let json = gz_json(dir.path(), &["nayin", "--magnitude", "grand", "--name", "木"]);
    assert_eq!(names(&json, "ganzhi"), vec!["戊辰", "己巳"]);

    let err = gz_json_error(dir.path(), &["nayin", "--status", "bogus"]);
    assert_eq!(err["error"]["error_code"], "E2003");
}

#[test]
fn nayin_statuses_in_stage_order() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["nayin", "--statuses"]);
    assert_eq!(
        names(&json, "status"),
        vec!["长生", "沐浴", "帝旺", "衰", "病", "死", "墓"]
    );
}

#[test]
fn shensha_names_and_carriers() {
    let dir = TempDir::new().expect("tempdir");
    let json = gz_json(dir.path(), &["shensha"]);
    assert_eq!(names(&json, "name"), vec!["咸池", "天乙贵人"]);

    let json = gz_json(dir.path(), &["shensha", "天乙贵人"]);
    assert_eq!(names(&json, "ganzhi"), vec!["甲子", "乙丑"]);
    assert_eq!(json[1]["self_seated"], true);

    gz_cmd(dir.path())
        .arg("--data")
        .arg(fixture())
        .args(["shensha", "驿马", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no ganzhi carries"))
        .stderr(predicate::str::contains("suggestion: run `gz shensha`"));

    let err = gz_json_error(dir.path(), &["shensha", "驿马"]);
    assert_eq!(err["error"]["error_code"], "E2001");
}

// ---------------------------------------------------------------------------
// gz completions
// ---------------------------------------------------------------------------

#[test]
fn completions_need_no_dataset() {
    let dir = TempDir::new().expect("tempdir");
    gz_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gz"));
}
