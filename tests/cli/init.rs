use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let output = run(cmd)?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "\u{2713} Created .xi18nrc.json\n");
    assert!(test.root().join(".xi18nrc.json").exists());

    let content = test.read_file(".xi18nrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["i18nFormat"], "xlf");
    assert_eq!(parsed["ignoreTestFiles"], true);

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".xi18nrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let output = run(cmd)?;

    assert_eq!(output.code, Some(1));
    assert_eq!(output.stdout, "\u{2718} .xi18nrc.json already exists\n");
    assert_eq!(test.read_file(".xi18nrc.json")?, "{}");

    Ok(())
}
