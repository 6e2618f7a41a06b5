use std::path::Path;

use crate::error::{BookwormError, Result};
use crate::parse::ParsedSource;

/// Parse a JSON cookbook file (JSON recipes, `metadata.json`).
///
/// Unlike Ruby input, malformed JSON is an error naming the file.
pub fn parse_json(path: &Path, text: &str) -> Result<ParsedSource> {
    serde_json::from_str(text)
        .map(ParsedSource::Json)
        .map_err(|source| BookwormError::Json {
            path: path.to_path_buf(),
            source,
        })
}
