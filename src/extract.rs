//! Recovery of structured data from free-form model output.
//!
//! Models asked for JSON usually wrap it in a fenced block:
//!
//! ````text
//! Here is the data:
//! ```json
//! {"objects": ["cat"]}
//! ```
//! ````
//!
//! [`fenced_json`] finds that block and parses its body. Every way this can
//! go wrong is a distinct [`ExtractError`] variant.

use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no structured content found in model response")]
    NoFence,

    #[error("fenced block is not terminated")]
    Unterminated,

    #[error("fenced block is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Returns the trimmed body of the first fenced block in `text`.
///
/// A ```` ```json ```` marker is preferred over a bare fence and the body
/// starts right after it. After a bare fence, an info string such as `JSON`
/// or `js` filling the rest of the line is skipped. The body ends at the last
/// fence in the text, so fences inside string values survive.
pub fn fenced_body(text: &str) -> Result<&str, ExtractError> {
    let body_start = match text.find(JSON_FENCE) {
        Some(open) => open + JSON_FENCE.len(),
        None => {
            let open = text.find(FENCE).ok_or(ExtractError::NoFence)?;
            skip_info_string(text, open + FENCE.len())
        }
    };

    let close = text[body_start..]
        .rfind(FENCE)
        .map(|idx| body_start + idx)
        .ok_or(ExtractError::Unterminated)?;

    Ok(text[body_start..close].trim())
}

fn skip_info_string(text: &str, after_fence: usize) -> usize {
    let rest = &text[after_fence..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let info = rest[..line_end].trim();

    let is_identifier = !info.is_empty()
        && info
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'));

    if is_identifier {
        after_fence + line_end
    } else {
        after_fence
    }
}

/// Parses the first fenced block in `text` as JSON.
pub fn fenced_json(text: &str) -> Result<Value, ExtractError> {
    let body = fenced_body(text)?;
    Ok(serde_json::from_str(body)?)
}
