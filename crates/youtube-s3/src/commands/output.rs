use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Envelope for `--json` output
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "status")]
pub enum CommandOutput {
    #[serde(rename = "success")]
    Success { data: serde_json::Value },
    #[serde(rename = "error")]
    Error {
        error: String,
        data: serde_json::Value,
    },
}

impl CommandOutput {
    pub fn success(data: impl Serialize) -> Result<Self> {
        Ok(Self::Success {
            data: serde_json::to_value(data)?,
        })
    }

    pub fn error(error: String, data: impl Serialize) -> Result<Self> {
        Ok(Self::Error {
            error,
            data: serde_json::to_value(data)?,
        })
    }

    pub fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}
