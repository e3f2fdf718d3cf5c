use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, stderr, stdout};

fn toggle_project() -> Result<CliTest> {
    let test = CliTest::with_file(
        "src/x-toggle.ts",
        r#"
export class XToggle extends HTMLElement {}
customElements.define("x-toggle", XToggle);
"#,
    )?;
    test.write_file(
        "src/x-toggle.types.d.ts",
        r#"
import { Labelled } from "./shared";

export type XToggleConfigType = Labelled & {
  /** Whether the toggle starts open. */
  isOpen?: boolean;
  items: string[];
};
"#,
    )?;
    test.write_file(
        "src/shared.ts",
        "export interface Labelled { label: string }\n",
    )?;
    Ok(test)
}

fn attribute<'a>(manifest: &'a Value, name: &str) -> Option<&'a Value> {
    manifest["modules"][0]["declarations"][0]["attributes"]
        .as_array()?
        .iter()
        .find(|attr| attr["name"] == name)
}

#[test]
fn test_analyze_writes_manifest() -> Result<()> {
    let test = toggle_project()?;

    let output = test.analyze_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Analyzed 2 source files - 1 declaration, 3 attributes"));

    let manifest = test.read_json("custom-elements.json")?;
    assert_eq!(manifest["schemaVersion"], "1.0.0");
    assert_eq!(manifest["modules"].as_array().map(Vec::len), Some(1));
    assert_eq!(manifest["modules"][0]["path"], "src/x-toggle.ts");

    let decl = &manifest["modules"][0]["declarations"][0];
    assert_eq!(decl["kind"], "class");
    assert_eq!(decl["name"], "XToggle");
    assert_eq!(decl["tagName"], "x-toggle");

    assert_eq!(
        attribute(&manifest, "is-open"),
        Some(&json!({
            "name": "is-open",
            "type": { "text": "boolean", "summary": "boolean" },
            "serializedAs": "boolean-attr",
            "description": "Whether the toggle starts open.",
            "optional": true
        }))
    );
    assert_eq!(attribute(&manifest, "items").map(|a| &a["serializedAs"]), Some(&json!("json")));
    assert_eq!(attribute(&manifest, "label").map(|a| &a["optional"]), Some(&json!(false)));

    Ok(())
}

#[test]
fn test_analyze_no_semantic_keeps_inline_properties() -> Result<()> {
    let test = toggle_project()?;

    let output = test.analyze_command().arg("--no-semantic").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let manifest = test.read_json("custom-elements.json")?;
    assert!(attribute(&manifest, "is-open").is_some());
    assert!(attribute(&manifest, "items").is_some());
    assert!(attribute(&manifest, "label").is_none());

    Ok(())
}

#[test]
fn test_analyze_to_stdout() -> Result<()> {
    let test = toggle_project()?;

    let output = test.analyze_command().arg("--stdout").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let manifest: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(manifest["modules"][0]["declarations"][0]["tagName"], "x-toggle");
    assert!(stderr(&output).contains("Analyzed"));
    assert!(!test.root().join("custom-elements.json").exists());

    Ok(())
}

#[test]
fn test_analyze_out_file_and_config() -> Result<()> {
    let test = toggle_project()?;
    test.write_file(".tagmetarc.json", r#"{ "outFile": "dist/elements.json" }"#)?;

    let output = test.analyze_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("dist/elements.json").exists());

    let output = test
        .analyze_command()
        .args(["--out-file", "manifest.json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("manifest.json").exists());

    Ok(())
}

#[test]
fn test_analyze_source_root() -> Result<()> {
    let test = CliTest::with_file(
        "web/src/x-badge.js",
        r#"defineElement("x-badge", XBadge);"#,
    )?;

    let output = test
        .analyze_command()
        .args(["--source-root", "web", "--stdout"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let manifest: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(manifest["modules"][0]["path"], "src/x-badge.js");
    assert_eq!(manifest["modules"][0]["declarations"][0]["attributes"], json!([]));

    Ok(())
}

#[test]
fn test_analyze_reports_parse_failures() -> Result<()> {
    let test = toggle_project()?;
    test.write_file("src/broken.ts", "export class {")?;

    let output = test.analyze_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("1 file(s) could not be parsed"));
    assert!(test.root().join("custom-elements.json").exists());

    let strict = test.analyze_command().arg("--strict").output()?;
    assert_eq!(strict.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_analyze_verbose_shows_provenance() -> Result<()> {
    let test = toggle_project()?;

    let output = test.analyze_command().arg("-v").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("<x-toggle> src/x-toggle.ts semantic (XToggleConfigType)"));

    Ok(())
}

#[test]
fn test_analyze_invalid_config() -> Result<()> {
    let test = toggle_project()?;
    test.write_file(".tagmetarc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.analyze_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid glob pattern in 'ignores'"));

    Ok(())
}
