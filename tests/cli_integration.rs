//! CLI integration tests
//!
//! Run the `mojodesc` binary against generated class directories and check
//! exit codes, stdout and the written descriptor.

mod support;

use std::fs;
use std::process::Command;
use support::{mojodesc_binary, ClassBuilder, FieldBuilder, Value};
use tempfile::TempDir;

fn classes_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    ClassBuilder::new("com/acme/BuildMojo")
        .mojo("build", vec![("defaultPhase", Value::phase("PACKAGE"))])
        .field(
            FieldBuilder::new("skip", "Z").parameter(vec![("property", Value::str("acme.skip"))]),
        )
        .write_to(dir.path());
    dir
}

#[test]
fn test_cli_help() {
    let output = Command::new(mojodesc_binary())
        .arg("--help")
        .output()
        .expect("Failed to execute mojodesc");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("inspect"));
}

#[test]
fn test_cli_version() {
    let output = Command::new(mojodesc_binary())
        .arg("--version")
        .output()
        .expect("Failed to execute mojodesc");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_with_config_file() {
    let classes = classes_dir();
    let work = TempDir::new().unwrap();
    let config = work.path().join("mojodesc.toml");
    fs::write(
        &config,
        r#"
        groupId = "com.acme"
        artifactId = "acme-maven-plugin"
        version = "1.0.0"
        description = "Builds acme things"
        "#,
    )
    .unwrap();
    let output_path = work.path().join("out/plugin.xml");

    let output = Command::new(mojodesc_binary())
        .arg("generate")
        .arg("--classes")
        .arg(classes.path())
        .arg("--output")
        .arg(&output_path)
        .arg("--config")
        .arg(&config)
        .arg("--plugin-version")
        .arg("1.1.0")
        .output()
        .expect("Failed to execute mojodesc");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let xml = fs::read_to_string(&output_path).unwrap();
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let version = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("version"))
        .and_then(|n| n.text());
    assert_eq!(version, Some("1.1.0"));
    assert!(xml.contains("<description>Builds acme things</description>"));
    assert!(xml.contains("<goal>build</goal>"));
    assert!(xml.contains("<skip implementation=\"boolean\">${acme.skip}</skip>"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Descriptor written to"));
}

#[test]
fn test_generate_twice_reports_up_to_date() {
    let classes = classes_dir();
    let work = TempDir::new().unwrap();
    let output_path = work.path().join("plugin.xml");

    let run = || {
        Command::new(mojodesc_binary())
            .args(["generate", "--group-id", "com.acme", "--artifact-id", "acme-maven-plugin"])
            .args(["--plugin-version", "1.0.0", "--classes"])
            .arg(classes.path())
            .arg("--output")
            .arg(&output_path)
            .current_dir(work.path())
            .output()
            .expect("Failed to execute mojodesc")
    };

    assert!(run().status.success());
    let second = run();
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("up to date"));
}

#[test]
fn test_generate_without_metadata_fails() {
    let classes = classes_dir();
    let work = TempDir::new().unwrap();

    let output = Command::new(mojodesc_binary())
        .arg("generate")
        .arg("--classes")
        .arg(classes.path())
        .arg("--output")
        .arg(work.path().join("plugin.xml"))
        .current_dir(work.path())
        .output()
        .expect("Failed to execute mojodesc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("groupId"), "stderr: {}", stderr);
    assert!(!work.path().join("plugin.xml").exists());
}

#[test]
fn test_inspect_json() {
    let classes = classes_dir();

    let output = Command::new(mojodesc_binary())
        .args(["inspect", "--format", "json", "--classes"])
        .arg(classes.path())
        .output()
        .expect("Failed to execute mojodesc");

    assert!(output.status.success());
    let goals: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(goals[0]["goal"], "build");
    assert_eq!(goals[0]["phase"], "package");
    assert_eq!(goals[0]["parameters"][0]["expression"], "${acme.skip}");
}

#[test]
fn test_inspect_human() {
    let classes = classes_dir();

    let output = Command::new(mojodesc_binary())
        .args(["inspect", "-c"])
        .arg(classes.path())
        .output()
        .expect("Failed to execute mojodesc");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("build (com.acme.BuildMojo)"));
    assert!(stdout.contains("Phase: package"));
}

#[test]
fn test_inspect_missing_directory() {
    let work = TempDir::new().unwrap();

    let output = Command::new(mojodesc_binary())
        .args(["inspect", "--classes"])
        .arg(work.path().join("does-not-exist"))
        .output()
        .expect("Failed to execute mojodesc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {}", stderr);
}
