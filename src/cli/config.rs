//! Config check command handler.

use anyhow::{Context, Result};

use skillrelay::config::validate::{check_unknown_fields, Diagnostic, DiagnosticLevel};
use skillrelay::config::Config;

use super::ConfigAction;

/// Validate configuration file and effective values.
pub(crate) async fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Check => {
            let config_path = Config::path();
            println!("Config file: {}", config_path.display());

            let mut diagnostics = Vec::new();
            if config_path.exists() {
                let content = std::fs::read_to_string(&config_path)
                    .context("Failed to read config file")?;
                let raw: serde_json::Value = match serde_json::from_str(&content) {
                    Ok(v) => v,
                    Err(e) => {
                        println!("[ERROR] Invalid JSON: {}", e);
                        return Ok(());
                    }
                };
                diagnostics.extend(check_unknown_fields(&raw));
            } else {
                println!("[OK] No config file found (using defaults)");
            }

            let config = match Config::load() {
                Ok(config) => config,
                Err(e) => {
                    println!("[ERROR] {}", e);
                    return Ok(());
                }
            };
            diagnostics.extend(config.validate());
            report(&diagnostics);
        }
    }
    Ok(())
}

fn report(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        println!("{}", diag);
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if errors == 0 && warnings == 0 {
        println!("\nConfiguration looks good!");
    } else {
        println!("\nFound {} error(s), {} warning(s)", errors, warnings);
    }
}
