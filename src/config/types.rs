use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::locator::{DEFINITION_FILE, STREAM_FILE};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub takes: TakesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TakesConfig {
    /// Folder holding the `YYYY-MM-DD/NNNN` take tree (`~` is expanded)
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File name of the binary frame stream inside a take folder
    #[serde(default = "default_stream_file")]
    pub stream_file: String,

    /// File name of the JSON take definition inside a take folder
    #[serde(default = "default_definition_file")]
    pub definition_file: String,
}

fn default_root() -> PathBuf {
    PathBuf::from("~/Documents/Motion/take")
}

fn default_stream_file() -> String {
    STREAM_FILE.to_string()
}

fn default_definition_file() -> String {
    DEFINITION_FILE.to_string()
}

impl Default for TakesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            stream_file: default_stream_file(),
            definition_file: default_definition_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Decimal places when printing samples
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    6
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}
