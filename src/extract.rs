//! finding font urls in stylesheet lines
//!
//! Google Fonts stylesheets put each `@font-face` property on its own line,
//! so we look at lines rather than parsing css.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Error;

static FONT_SOURCE_PREFIX: &str = "src: url(";

static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn url_regex() -> &'static Regex {
    // unwrap is fine, the pattern is a constant
    URL_REGEX.get_or_init(|| Regex::new(r"url\((.*?)\)").unwrap())
}

/// `true` if this line declares a font source, e.g. `  src: url(...) format('woff2');`
pub fn is_font_source(line: &str) -> bool {
    line.trim().starts_with(FONT_SOURCE_PREFIX)
}

/// Return the url between `url(` and the next `)`.
///
/// Lines with more than one url, or where the url itself contains a `(`, are
/// rejected rather than guessed at.
pub fn extract_url(line: &str) -> Result<&str, Error> {
    let mut captures = url_regex().captures_iter(line);
    let url = captures
        .next()
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::NoUrlFound { line: line.into() })?;

    if captures.next().is_some() {
        return Err(Error::UnsupportedLine {
            line: line.into(),
            reason: "multiple urls",
        });
    }
    if url.contains('(') {
        return Err(Error::UnsupportedLine {
            line: line.into(),
            reason: "nested parentheses",
        });
    }
    Ok(url)
}
