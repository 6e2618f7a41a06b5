#![allow(deprecated)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bookworm_cmd() -> Command {
    Command::cargo_bin("bookworm-cli").expect("binary should be built")
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
    fs::write(path, text).expect("write fixture");
}

/// Cookbook tree plus a configuration file pointing at it.
fn fixture() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "cookbooks/mycookbook/recipes/default.rb",
        "include_recipe 'other::thing'\n",
    );
    write(root, "cookbooks/mycookbook/metadata.rb", "name 'mycookbook'\ndepends 'other'\n");
    write(root, "cookbooks/other/metadata.rb", "name 'other'\n");
    write(root, "roles/base.rb", "name 'base'\nrun_list 'recipe[mycookbook]'\n");
    write(
        root,
        "config.yml",
        &format!(
            "source_dirs:\n  cookbook_dirs:\n    - {}\n  role_dirs:\n    - {}\n",
            root.join("cookbooks").display(),
            root.join("roles").display()
        ),
    );
    dir
}

#[test]
fn recipe_includes_plain() {
    let dir = fixture();
    bookworm_cmd()
        .arg("--config")
        .arg(dir.path().join("config.yml"))
        .args(["--report", "RecipeIncludes"])
        .assert()
        .success()
        .stdout("mycookbook::default -> other::thing\n");
}

#[test]
fn missing_recipes_as_json() {
    let dir = fixture();
    let output = bookworm_cmd()
        .arg("--config")
        .arg(dir.path().join("config.yml"))
        .args(["--report", "MissingReferencedRecipes", "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(
        json,
        serde_json::json!({
            "roles": {},
            "recipes": {"mycookbook::default": ["other::thing"]},
        })
    );
}

#[test]
fn dependency_graph_to_file() {
    let dir = fixture();
    let out = dir.path().join("deps.dot");
    bookworm_cmd()
        .arg("--config")
        .arg(dir.path().join("config.yml"))
        .args(["--report", "CookbookDependencyDot", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(out).expect("output file");
    assert_eq!(written, "digraph deps {\n  mycookbook->other\n}");
}

#[test]
fn list_reports_and_rules() {
    bookworm_cmd()
        .arg("--list-reports")
        .assert()
        .success()
        .stdout(predicate::str::contains("CookbookDepShaker\t"))
        .stdout(predicate::str::contains("NoParsedRuby\t"));

    bookworm_cmd()
        .arg("--list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("IncludeRecipeLiterals\t"));
}

#[test]
fn no_report_fails() {
    bookworm_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no report given"));
}

#[test]
fn unknown_report_fails() {
    let dir = fixture();
    bookworm_cmd()
        .arg("--config")
        .arg(dir.path().join("config.yml"))
        .args(["--report", "NoSuchReport"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown report 'NoSuchReport'"));
}

#[test]
fn empty_source_dirs_fail() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("config.yml");
    fs::write(&config, "debug: false\n").expect("write config");
    bookworm_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--report", "LeafCookbooks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source_dirs cannot be empty"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.yml");
    bookworm_cmd()
        .arg("--config")
        .arg(&missing)
        .args(["--report", "LeafCookbooks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"))
        .stderr(predicate::str::contains("absent.yml"))
        .stderr(predicate::str::contains("source_dirs cannot be empty").not());
}

#[test]
fn verbose_logs_configuration_loading() {
    let dir = fixture();
    bookworm_cmd()
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(dir.path().join("config.yml"))
        .args(["--report", "LeafCookbooks", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loading configuration"));
}

#[test]
fn config_debug_raises_log_level() {
    let dir = fixture();
    let config = dir.path().join("config.yml");
    let mut text = fs::read_to_string(&config).expect("read config");
    text.push_str("debug: true\n");
    fs::write(&config, text).expect("write config");

    bookworm_cmd()
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(["--report", "LeafCookbooks"])
        .assert()
        .success()
        .stdout("mycookbook\n")
        .stderr(predicate::str::contains("crawled"));
}

#[test]
fn logs_stay_off_stdout() {
    let dir = fixture();
    bookworm_cmd()
        .arg("--config")
        .arg(dir.path().join("config.yml"))
        .args(["--report", "LeafCookbooks", "--verbose"])
        .assert()
        .success()
        .stdout("mycookbook\n");
}
