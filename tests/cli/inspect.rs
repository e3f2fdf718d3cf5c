use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_inspect_prints_attributes() -> Result<()> {
    let test = CliTest::with_file(
        "src/date-picker.types.ts",
        r#"
type Day = "mon" | "tue";

export interface DatePickerConfigType {
  /** First day of the week. */
  firstDay?: Day;
  disabledDates: string[];
}
"#,
    )?;

    let output = test.inspect_command("src/date-picker.types.ts").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("semantic (DatePickerConfigType)"));
    assert!(out.contains("first-day?: \"mon\" | \"tue\"  [string]"));
    assert!(out.contains("First day of the week."));
    assert!(out.contains("disabled-dates: string[]  [json]"));

    Ok(())
}

#[test]
fn test_inspect_no_semantic() -> Result<()> {
    let test = CliTest::with_file(
        "src/date-picker.types.ts",
        r#"
type Day = "mon" | "tue";
export interface DatePickerConfigType { firstDay?: Day }
"#,
    )?;

    let output = test
        .inspect_command("src/date-picker.types.ts")
        .arg("--no-semantic")
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("syntactic (DatePickerConfigType)"));
    assert!(out.contains("first-day?: Day  [property-only]"));

    Ok(())
}

#[test]
fn test_inspect_explicit_type() -> Result<()> {
    let test = CliTest::with_file(
        "src/x-card.types.d.ts",
        "export declare type CardOptions = { elevated: boolean };",
    )?;

    let output = test
        .inspect_command("src/x-card.types.d.ts")
        .args(["--type", "CardOptions"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("elevated: boolean  [boolean-attr]"));

    Ok(())
}

#[test]
fn test_inspect_without_match() -> Result<()> {
    let test = CliTest::with_file("src/x-card.types.ts", "export type Unrelated = string;")?;

    let output = test.inspect_command("src/x-card.types.ts").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("No attributes found (tried XCardConfigType)"));

    Ok(())
}

#[test]
fn test_inspect_missing_file() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.inspect_command("src/missing.types.ts").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Types file not found"));

    Ok(())
}
