//! Line-oriented `KEY=VALUE` env file parsing.

/// Parse the contents of a dotenv file into ordered `(key, value)` pairs.
///
/// Blank lines and `#` comments are skipped, as are lines without `=` and
/// lines whose key is empty. Keys and values are trimmed; a value wrapped in
/// matching single or double quotes has the quotes removed.
pub fn parse(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        pairs.push((key.to_string(), unquote(value.trim()).to_string()));
    }

    pairs
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
