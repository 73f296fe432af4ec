use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How an input is parsed by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Json,
    Yaml,
    Csv,
    /// Every `*.csv` file directly inside a directory, one table per file
    /// named `<input>/<file stem>`.
    CsvDir,
}

impl InputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            InputFormat::Json => "JSON",
            InputFormat::Yaml => "YAML",
            InputFormat::Csv => "CSV",
            InputFormat::CsvDir => "CSV directory",
        }
    }
}

/// Declaration of one input document a lab consumes.
///
/// `path` is relative to the lab directory. A missing `required` input makes
/// the whole run fail closed; a missing optional input is skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InputSpec {
    pub name: String,
    pub path: String,
    pub format: InputFormat,
    pub required: bool,
}

impl InputSpec {
    pub fn required(name: &str, path: &str, format: InputFormat) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            format,
            required: true,
        }
    }

    pub fn optional(name: &str, path: &str, format: InputFormat) -> Self {
        Self {
            required: false,
            ..Self::required(name, path, format)
        }
    }
}
