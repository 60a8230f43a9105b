//! Command-line arguments for the replay tool
//!
//! Supports:
//! - Loading an item pool (JSON array) and a widget config (YAML)
//! - Writing an initial value as if from a bound form
//! - Replaying a whitespace separated key script

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::messages::{Key, SelectMsg};

/// Replay keyboard input against a select widget and print the outcome
#[derive(Parser, Debug)]
#[command(
    name = "picklist",
    version,
    about = "Replay input against a headless select widget"
)]
pub struct CliArgs {
    /// JSON file holding the item pool (an array of records or primitives)
    #[arg(value_name = "ITEMS")]
    pub items: PathBuf,

    /// YAML config file (defaults to ~/.config/picklist/config.yaml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial value as JSON, written in before the script runs
    #[arg(long, value_name = "JSON")]
    pub value: Option<String>,

    /// Key script, e.g. "Open a p wait:250 Down Enter"
    #[arg(short, long, value_name = "SCRIPT", default_value = "")]
    pub keys: String,

    /// Force multi-select regardless of the config file
    #[arg(short, long)]
    pub multiple: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// One step of a key script
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Send(SelectMsg),
    /// Let timers and background jobs deliver their results
    Wait(Duration),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("invalid wait duration '{0}'")]
    InvalidWait(String),
}

/// Parse a key script
///
/// Tokens: key names (`Down`, `Up`, `Enter`, `Tab`, `Esc`, `Backspace`,
/// `Space`), commands (`Open`, `Close`, `Clear`), `wait:<ms>`, or single
/// characters.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    script.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<ScriptStep, ScriptError> {
    if let Some(ms) = token.strip_prefix("wait:") {
        let ms: u64 = ms
            .parse()
            .map_err(|_| ScriptError::InvalidWait(token.to_string()))?;
        return Ok(ScriptStep::Wait(Duration::from_millis(ms)));
    }
    let msg = match token.to_ascii_lowercase().as_str() {
        "open" => SelectMsg::Open,
        "close" => SelectMsg::Close,
        "clear" => SelectMsg::Clear,
        _ => Key::parse(token)
            .map(SelectMsg::Key)
            .ok_or_else(|| ScriptError::UnknownKey(token.to_string()))?,
    };
    Ok(ScriptStep::Send(msg))
}
