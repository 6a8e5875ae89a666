use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
    Lua,
    Ycl,
}

impl OutputFormat {
    /// File extension of exported files.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Lua => "lua",
            OutputFormat::Ycl => "ycl",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            "lua" => Ok(OutputFormat::Lua),
            "ycl" => Ok(OutputFormat::Ycl),
            other => Err(ExportError::Config(format!(
                "unknown output format `{other}` (expected json, xml, lua or ycl)"
            ))),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ExportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.extension().to_string()
    }
}

/// Settings of one export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Workbooks to read, in order.
    pub inputs: Vec<PathBuf>,
    /// Output folder; created when missing.
    pub folder: PathBuf,
    pub format: OutputFormat,
    /// Selected sign tokens; `None` exports everything.
    pub sign: Option<String>,
    /// Appended to every root name.
    pub suffix: Option<String>,
    /// Schema manifest path; schemas are only built when set.
    pub manifest: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            folder: PathBuf::from("."),
            format: OutputFormat::Json,
            sign: None,
            suffix: None,
            manifest: None,
        }
    }
}

impl ExportConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ExportError> {
        serde_yaml::from_str(yaml).map_err(|e| ExportError::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Split an input list on `,` `;` `|` or whitespace.
    pub fn split_inputs(raw: &str) -> Vec<PathBuf> {
        raw.split(|c: char| matches!(c, ',' | ';' | '|') || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    pub fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or("")
    }

    /// `<folder>/<root>.<format>`
    pub fn export_file(&self, root: &str) -> PathBuf {
        self.folder
            .join(format!("{root}.{}", self.format.extension()))
    }
}
