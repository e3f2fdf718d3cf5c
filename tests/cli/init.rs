use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created .tagmetarc.json"));

    let content = test.read_file(".tagmetarc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["semantic"], Value::Bool(true));
    assert_eq!(parsed["outFile"], "custom-elements.json");
    assert!(parsed["registerFunctions"].is_array());
    assert!(content.contains("  "), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".tagmetarc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".tagmetarc.json already exists"));
    assert_eq!(test.read_file(".tagmetarc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "src/x-card.ts",
        r#"customElements.define("x-card", class XCard extends HTMLElement {});"#,
    )?;

    let output = test.analyze_command().output()?;
    assert!(
        output.status.success(),
        "Analyze should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(test.root().join("custom-elements.json").exists());

    Ok(())
}
