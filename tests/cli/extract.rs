use anyhow::Result;

use crate::{CliTest, run};

const APP_MODULE: &str = r#"{
    "symbols": {
        "AppModule": {
            "kind": "module",
            "declarations": ["./app.component#AppComponent", "./header/header.component#HeaderComponent"]
        }
    }
}"#;

const HEADER_COMPONENT: &str = r#"{
    "symbols": {
        "HeaderComponent": {
            "kind": "component",
            "selector": "app-header",
            "templateUrl": "./header.component.html"
        }
    }
}"#;

fn app_component(template: &str) -> String {
    serde_json::json!({
        "symbols": {
            "AppComponent": {
                "kind": "component",
                "selector": "app-root",
                "template": template,
            }
        }
    })
    .to_string()
}

fn project(app_template: &str, header_template: Option<&str>) -> Result<CliTest> {
    let test = CliTest::new()?;
    test.write_file("src/app.module.ts", "export class AppModule {}")?;
    test.write_file("src/app.module.metadata.json", APP_MODULE)?;
    test.write_file("src/app.component.ts", "export class AppComponent {}")?;
    test.write_file("src/app.component.metadata.json", &app_component(app_template))?;
    test.write_file("src/header/header.component.ts", "export class HeaderComponent {}")?;
    test.write_file("src/header/header.component.metadata.json", HEADER_COMPONENT)?;
    if let Some(template) = header_template {
        test.write_file("src/header/header.component.html", template)?;
    }
    Ok(test)
}

#[test]
fn test_extract_reports_messages() -> Result<()> {
    let test = project(
        "<h1 i18n=\"site title\">My App</h1>",
        Some("<nav><a i18n>Home</a><a i18n>About</a></nav>"),
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        "\u{2713} Extracted 3 messages from 3 source files (xlf)\n"
    );

    Ok(())
}

#[test]
fn test_extract_verbose_lists_messages() -> Result<()> {
    let test = project("<h1 i18n=\"site title\">My App</h1>", Some("<p>nothing</p>"))?;

    let mut cmd = test.extract_command();
    cmd.args(["-v", "--i18n-format", "xmb"]);
    let output = run(cmd)?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("]: \"My App\"\n"));
    assert!(output.stdout.contains("  --> src/app.component.ts:1:1\n"));
    assert!(output.stdout.contains("   = description: site title\n"));
    assert!(
        output
            .stdout
            .ends_with("\u{2713} Extracted 1 message from 3 source files (xmb)\n")
    );

    Ok(())
}

#[test]
fn test_extract_reports_all_template_errors() -> Result<()> {
    let test = project(
        "<h1 i18n>Title</h2>",
        Some("<p i18n>Hi {{ }}</p>"),
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(1));
    assert_eq!(
        output.stdout,
        "error: Unexpected closing tag \"h2\"\n  --> src/app.component.ts:1:15\n\n\
         error: Blank expressions are not allowed in interpolated strings\n  --> src/header/header.component.ts:1:12\n\n\
         \u{2718} 2 template errors found, no messages extracted\n"
    );

    Ok(())
}

#[test]
fn test_extract_fails_on_missing_template() -> Result<()> {
    let test = project("<h1 i18n>Title</h1>", None)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.starts_with("Error: "));
    assert!(output.stderr.contains("src/header/header.component.html"));

    Ok(())
}

#[test]
fn test_extract_rejects_unknown_format() -> Result<()> {
    let test = project("<h1 i18n>Title</h1>", Some(""))?;

    let mut cmd = test.extract_command();
    cmd.args(["--i18n-format", "po"]);
    let output = run(cmd)?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Unsupported translations format 'po'"));

    Ok(())
}

#[test]
fn test_extract_uses_config_file() -> Result<()> {
    let test = project("<h1 i18n>Title</h1>", Some("<p i18n>Welcome</p>"))?;
    test.write_file(".xi18nrc.json", r#"{ "includes": ["src"], "i18nFormat": "xmb" }"#)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        "\u{2713} Extracted 2 messages from 3 source files (xmb)\n"
    );

    Ok(())
}

#[test]
fn test_extract_rejects_invalid_config() -> Result<()> {
    let test = project("<h1 i18n>Title</h1>", Some(""))?;
    test.write_file(".xi18nrc.json", r#"{ "i18nFormat": "po" }"#)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.starts_with("Error: "));

    Ok(())
}
