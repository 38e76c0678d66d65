//! Small string helpers shared by the logging call sites.

/// Truncate a string for logging purposes.
///
/// Counts characters rather than bytes so translated (multi-byte) text never
/// gets cut inside a code point. Strings longer than `max` characters keep
/// their first `max` characters followed by `"…(+N chars)"`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(15), 10), "aaaaaaaaaa…(+5 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let rest = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], rest)
        }
    }
}
