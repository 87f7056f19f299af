//! Input text sanitising applied by callers before a run starts

/// Default upper bound on input length, in characters
pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Input text cannot be empty")]
    Empty,

    #[error("Input text exceeds {max} characters")]
    TooLong { max: usize },
}

/// Strip control characters (keeping newlines and tabs), trim, and enforce
/// the length bound.
pub fn sanitize_input(text: &str, max_chars: usize) -> Result<String, InputError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(InputError::Empty);
    }
    if cleaned.chars().count() > max_chars {
        return Err(InputError::TooLong { max: max_chars });
    }

    Ok(cleaned.to_string())
}
