use crate::ir::FamilyData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,
    #[error("invalid family document: {0}")]
    Syntax(String),
}

/// Reads a `{ "people": [...], "relationships": [...] }` document.
///
/// Strict JSON is tried first; JSON5 (comments, trailing commas, unquoted
/// keys) is accepted as a fallback so hand-edited files load too.
pub fn parse_family_data(input: &str) -> Result<FamilyData, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    match serde_json::from_str::<FamilyData>(trimmed) {
        Ok(data) => Ok(data),
        Err(json_err) => match json5::from_str::<FamilyData>(trimmed) {
            Ok(data) => Ok(data),
            Err(json5_err) => {
                // The JSON error carries line/column, prefer it when the
                // document is plain JSON that is merely invalid.
                if trimmed.starts_with('{') && !looks_like_json5(trimmed) {
                    Err(ParseError::Syntax(json_err.to_string()))
                } else {
                    Err(ParseError::Syntax(json5_err.to_string()))
                }
            }
        },
    }
}

fn looks_like_json5(input: &str) -> bool {
    input.contains("//") || input.contains("/*") || input.contains('\'')
}
