use anyhow::Result;
use serde::Serialize;

use super::output::CommandOutput;
use crate::config::StorageConfig;
use crate::error::CliError;

const VISIBLE_TAIL: usize = 4;
const MASK_CHAR: char = '*';

#[derive(Debug, PartialEq, Eq, Serialize)]
struct ConfigReport {
    present: Vec<PresentKey>,
    missing: Vec<&'static str>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct PresentKey {
    name: &'static str,
    masked: String,
}

pub fn run(global: &crate::GlobalOpts, storage: &StorageConfig) -> Result<()> {
    if !global.json {
        println!("🔍 Checking configuration...");
    }

    let report = inspect(storage);

    if global.json {
        if report.missing.is_empty() {
            CommandOutput::success(&report)?.print()?;
        } else {
            CommandOutput::error("missing variables".to_string(), &report)?.print()?;
        }
    } else {
        for key in &report.present {
            println!("✅ {}: {}", key.name, key.masked);
        }
        for name in &report.missing {
            println!("❌ {name}: not set");
        }
    }

    if !report.missing.is_empty() {
        if !global.json {
            println!();
        }
        return Err(CliError::IncompleteConfig(report.missing).into());
    }

    if !global.json {
        println!("\n✅ Configuration OK");
    }
    Ok(())
}

fn inspect(storage: &StorageConfig) -> ConfigReport {
    let mut present = Vec::new();
    let mut missing = Vec::new();

    for (name, value) in storage.required_keys() {
        match value {
            Some(value) => present.push(PresentKey {
                name,
                masked: mask_secret(value),
            }),
            None => missing.push(name),
        }
    }

    ConfigReport { present, missing }
}

/// Replace all but the last four characters with `*`.
///
/// Display-only; values of four characters or fewer are shown unchanged.
fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    let hidden = len.saturating_sub(VISIBLE_TAIL);

    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { MASK_CHAR } else { c })
        .collect()
}
