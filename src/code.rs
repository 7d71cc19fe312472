use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use crate::sheet::{ExamSheet, SheetError};

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("share code is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("share code does not contain an exam sheet")]
    Json(#[from] serde_json::Error),
    #[error("decoded sheet is invalid: {0}")]
    Sheet(#[from] SheetError),
}

/// Pack an exam sheet into a compact shareable string: standard-alphabet
/// base64 over the UTF-8 JSON serialization.
pub fn encode(sheet: &ExamSheet) -> String {
    let json = serde_json::to_vec(sheet).unwrap_or_default();
    general_purpose::STANDARD.encode(json)
}

/// Decode a share code back into a validated sheet. Accepts a bare code or
/// a full link carrying the code in a `d` query parameter; surrounding
/// whitespace is ignored.
pub fn decode(input: &str) -> Result<ExamSheet, CodeError> {
    let code = extract_code(input.trim());
    let bytes = general_purpose::STANDARD.decode(code)?;
    let sheet: ExamSheet = serde_json::from_slice(&bytes)?;
    sheet.validate()?;
    Ok(sheet)
}

/// Pull the `d` parameter out of a shared link. Only inputs with a query
/// string are treated as links; a bare code passes through untouched even
/// when it happens to contain `d=` padding.
fn extract_code(input: &str) -> &str {
    let Some((_, query)) = input.split_once('?') else {
        return input;
    };
    query
        .split('&')
        .find_map(|kv| kv.strip_prefix("d="))
        .unwrap_or(input)
}
