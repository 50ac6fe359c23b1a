//! Operation options and content formats.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Mode for `open`: read lookup or editable lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    #[default]
    Read,
    Write,
}

impl OpenMode {
    /// The fs-style flag string for this mode.
    pub fn as_flag(&self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::Write => "w",
        }
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            other => Err(Error::MissingArgument {
                message: format!("unknown open mode '{}'", other),
            }),
        }
    }
}

/// Format in which `read_file` materializes content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// UTF-8 text (lossy for invalid sequences).
    #[default]
    Text,
    /// Binary string: one char per byte, values 0-255.
    Binary,
    /// `data:<mime>;base64,<payload>` URL.
    #[serde(rename = "dataURL")]
    DataUrl,
    /// Raw byte buffer.
    Buffer,
}

/// Options for `read_file`.
///
/// Defaults match the fs surface: UTF-8 text, opened for reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Text encoding. Only the UTF-8 family is honored; anything else
    /// decodes lossily as UTF-8.
    pub encoding: String,
    pub format: ContentFormat,
    pub flag: OpenMode,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encoding: "utf8".to_string(),
            format: ContentFormat::Text,
            flag: OpenMode::Read,
        }
    }
}

impl ReadOptions {
    /// Options selecting the given format, everything else defaulted.
    pub fn format(format: ContentFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Options for `write_file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Text encoding for string payloads. Only the UTF-8 family is
    /// honored.
    pub encoding: String,
    /// MIME type recorded on newly inserted entries.
    pub mimetype: String,
    pub flag: OpenMode,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            encoding: "utf8".to_string(),
            mimetype: "text/plain".to_string(),
            flag: OpenMode::Write,
        }
    }
}

impl WriteOptions {
    /// Options tagging new entries with the given MIME type.
    pub fn mimetype(mimetype: impl Into<String>) -> Self {
        Self {
            mimetype: mimetype.into(),
            ..Self::default()
        }
    }
}
