use regex::Regex;
use std::sync::OnceLock;

fn open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A whole line: fence plus an info string with no further backticks.
    RE.get_or_init(|| Regex::new(r"^[ \t]*```[^`]*$").expect("static fence regex"))
}

fn close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*```[ \t]*$").expect("static fence regex"))
}

/// Lines of the first fenced block, or `None` when the text has no opening
/// fence. A block cut off before its closing fence runs to the end of text.
fn first_block(text: &str) -> Option<Vec<&str>> {
    let mut lines = text.lines();
    lines.by_ref().find(|l| open_re().is_match(l.trim_end_matches('\r')))?;
    Some(
        lines
            .take_while(|l| !close_re().is_match(l.trim_end_matches('\r')))
            .collect(),
    )
}

/// Pull an ordered list of shell commands out of free-form model output.
///
/// The first fenced block is used when there is one, otherwise the whole
/// text. Blank lines, `#` comment lines and stray fence markers are dropped,
/// survivors are trimmed and keep their relative order. Never fails;
/// "nothing to run" is an empty vector.
pub fn extract_commands(text: &str) -> Vec<String> {
    let region = first_block(text).unwrap_or_else(|| text.lines().collect());

    region
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("```"))
        .map(str::to_string)
        .collect()
}
