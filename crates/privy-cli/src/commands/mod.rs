pub mod inspect;
pub mod pick;

use std::path::Path;

use privy_source::SourceIntrospection;

/// How a command prints its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, String> {
        match format {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("unsupported format: \"{format}\". Use: table, json")),
        }
    }
}

/// Parse the Rust sources at `path`.
fn load(path: &Path) -> Result<SourceIntrospection, String> {
    SourceIntrospection::from_path(path).map_err(|e| e.to_string())
}

fn to_json(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization error: {e}"))
}
