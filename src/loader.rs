//! Load schemas from JSON or YAML text into the validated model.
//!
//! Both syntaxes funnel through the shared IR ([`crate::ir`]); this module
//! only detects the format, runs the concrete parser, and wraps errors with
//! a description of where the text came from.

use crate::error::Error;
use crate::ir::{self, IrSchema};
use crate::schema::Schema;
use std::path::Path;

/// Concrete schema text syntax, or `Auto` to detect from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Auto,
    Yaml,
    Json,
}

/// First non-whitespace byte `{` or `[` selects JSON; anything else,
/// including empty input, is treated as YAML.
pub fn detect_format(content: &str) -> SchemaFormat {
    match content.trim_start().bytes().next() {
        Some(b'{') | Some(b'[') => SchemaFormat::Json,
        _ => SchemaFormat::Yaml,
    }
}

/// Entry point for loading schemas from text or files.
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn from_string(content: &str, format: SchemaFormat) -> Result<Schema, Error> {
        Self::load(content, format, "string")
    }

    pub fn from_file(path: impl AsRef<Path>, format: SchemaFormat) -> Result<Schema, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        Self::load(&content, format, &format!("file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Schema, Error> {
        Self::from_string(content, SchemaFormat::Yaml)
    }

    pub fn from_json(content: &str) -> Result<Schema, Error> {
        Self::from_string(content, SchemaFormat::Json)
    }

    fn load(content: &str, format: SchemaFormat, source_desc: &str) -> Result<Schema, Error> {
        let format = match format {
            SchemaFormat::Auto => detect_format(content),
            chosen => chosen,
        };
        let ir: IrSchema = match format {
            SchemaFormat::Json => serde_json::from_str(content).map_err(|e| Error::Parse {
                source_desc: source_desc.to_string(),
                message: format!("JSON parse error: {}", e),
            })?,
            _ => serde_yaml::from_str(content).map_err(|e| Error::Parse {
                source_desc: source_desc.to_string(),
                message: format!("YAML parse error: {}", e),
            })?,
        };
        ir::lower(ir).map_err(|e| match e {
            Error::Schema(message) => Error::Schema(format!("{}: {}", source_desc, message)),
            other => other,
        })
    }
}
