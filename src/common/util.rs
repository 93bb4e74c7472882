// ===============================================================================================
// Environment
// ===============================================================================================
#[doc(hidden)]
pub(crate) fn read_env(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) => value,
        Err(_) => default.to_string(),
    }
}

/// Reads a boolean flag from the environment. Unparseable values fall back to `default`.
pub(crate) fn read_bool_env(name: &str, default: bool) -> bool {
    let value = read_env(name, "");
    if value.trim().is_empty() {
        return default;
    }

    match parse_bool(&value) {
        Some(v) => v,
        None => {
            tracing::warn!(
                "Cannot parse environment variable {}={:?} as a boolean, using {}",
                name,
                value,
                default
            );
            default
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ===============================================================================================
// Headers
// ===============================================================================================
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// ===============================================================================================
// Text
// ===============================================================================================
pub(crate) fn quote_if_whitespace(s: &str) -> (String, bool) {
    if s.is_empty() || s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        (format!("\"{}\"", s), true)
    } else {
        (s.to_string(), false)
    }
}

#[inline]
pub(crate) fn get_plural<'a>(v: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if v == 1 {
        return singular;
    }

    plural
}
