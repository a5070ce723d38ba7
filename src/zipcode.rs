use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of characters the zip code field accepts
pub const ZIP_CODE_MAX_LEN: usize = 9;

/// Length of a fully masked CEP (`NNNNN-NNN`)
pub const MASKED_LEN: usize = 9;

// ASCII digits only; `\d` would also match other Unicode digits.
static MASK_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([0-9]{5})([0-9]{3})").ok());

/// Insert the CEP hyphen into the first run of 8 digits
///
/// Text without 8 consecutive digits (shorter input, already masked input)
/// is returned unchanged. Anything around the digit run is kept as-is.
pub fn apply_mask(raw: &str) -> String {
    match MASK_PATTERN.as_ref() {
        Some(re) => re.replacen(raw, 1, "$1-$2").into_owned(),
        None => raw.to_string(),
    }
}

/// Strip the hyphen and surrounding whitespace from a masked CEP
pub fn normalize_code(code: &str) -> String {
    code.replacen('-', "", 1).trim().to_string()
}

/// Cut raw field input down to the field's maximum length
pub fn truncate_to_field(raw: &str) -> &str {
    match raw.char_indices().nth(ZIP_CODE_MAX_LEN) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Whether a masked value is long enough to be looked up
pub fn is_complete(masked: &str) -> bool {
    masked.chars().count() == MASKED_LEN
}

/// Whether a normalized code can be placed in the lookup URL path
pub fn is_url_safe(normalized: &str) -> bool {
    !normalized.is_empty() && normalized.chars().all(|c| c.is_ascii_alphanumeric())
}
