//! Filter evaluation over captured entries.

use regex::RegexBuilder;

use logsieve_protocol::LogEntry;

/// Whether a preview matches the pattern.
///
/// Empty (or all-whitespace) patterns match everything. With `use_regex`
/// the pattern is compiled case-insensitively; a pattern that fails to
/// compile silently falls back to substring matching, never to an error.
pub fn matches_pattern(preview: &str, pattern: &str, use_regex: bool) -> bool {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return true;
    }
    if use_regex {
        if let Ok(re) = RegexBuilder::new(pattern).case_insensitive(true).build() {
            return re.is_match(preview);
        }
    }
    preview.to_lowercase().contains(&pattern.to_lowercase())
}

/// Indices of the entries whose previews pass the filter, in original
/// capture order. Pure: same inputs, same output.
pub fn filter_indices(entries: &[LogEntry], pattern: &str, use_regex: bool) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| matches_pattern(&e.preview, pattern, use_regex))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsieve_protocol::{LogKind, entry::ORIGIN_CONSOLE};

    fn entries(previews: &[&str]) -> Vec<LogEntry> {
        previews
            .iter()
            .map(|p| LogEntry {
                kind: LogKind::Log,
                captured_at: "2024-05-01T00:00:00.000Z".into(),
                preview: p.to_string(),
                arguments: vec![],
                origin: ORIGIN_CONSOLE.into(),
            })
            .collect()
    }

    #[test]
    fn empty_pattern_passes_everything() {
        let logs = entries(&["a", "b", "c"]);
        assert_eq!(filter_indices(&logs, "", false), vec![0, 1, 2]);
        assert_eq!(filter_indices(&logs, "   ", false), vec![0, 1, 2]);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let logs = entries(&["apple pie", "Banana", "APPLE sauce"]);
        assert_eq!(filter_indices(&logs, "apple", false), vec![0, 2]);
    }

    #[test]
    fn regex_match_is_case_insensitive() {
        let logs = entries(&["error 404", "error 500", "ok 200"]);
        assert_eq!(filter_indices(&logs, r"ERROR \d+", true), vec![0, 1]);
    }

    #[test]
    fn invalid_regex_falls_back_to_substring() {
        let logs = entries(&["array[0]", "plain"]);
        // "[" is not a valid regex; it must behave as a plain substring.
        assert_eq!(filter_indices(&logs, "[", true), vec![0]);
    }

    #[test]
    fn order_is_preserved() {
        let logs = entries(&["x 1", "y", "x 2", "x 3"]);
        assert_eq!(filter_indices(&logs, "x", false), vec![0, 2, 3]);
    }

    #[test]
    fn same_inputs_same_output() {
        let logs = entries(&["alpha", "beta"]);
        assert_eq!(
            filter_indices(&logs, "a", false),
            filter_indices(&logs, "a", false)
        );
    }
}
