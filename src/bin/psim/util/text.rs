/// Greedy word wrap; words longer than `width` (long SMILES, paths) are
/// split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut rest = word;
        while rest.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let cut = rest.char_indices().nth(width).map_or(rest.len(), |(i, _)| i);
            lines.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        if rest.is_empty() {
            continue;
        }

        let len = current.chars().count();
        if current.is_empty() {
            current = rest.to_string();
        } else if len + 1 + rest.chars().count() <= width {
            current.push(' ');
            current.push_str(rest);
        } else {
            lines.push(std::mem::replace(&mut current, rest.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if max_len == 1 {
        return "…".to_string();
    }

    if s.char_indices().nth(max_len).is_none() {
        return s.to_string();
    }

    let take = max_len - 1;
    let cut = s.char_indices().nth(take).map(|(idx, _)| idx).unwrap_or(0);

    let mut out = String::with_capacity(cut + '…'.len_utf8());
    out.push_str(&s[..cut]);
    out.push('…');
    out
}

/// Splits `NAME=VALUE` into its trimmed name and numeric value.
pub fn parse_share(s: &str) -> Option<(&str, f64)> {
    let (name, value) = s.rsplit_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_end_matches('%').parse().ok()?;
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_short_text() {
        let result = wrap("hello world", 20);
        assert_eq!(result, vec!["hello world"]);
    }

    #[test]
    fn wrap_long_text() {
        let result = wrap("invalid SMILES at position 3", 12);
        assert_eq!(result, vec!["invalid", "SMILES at", "position 3"]);
    }

    #[test]
    fn wrap_breaks_long_smiles() {
        let result = wrap("bad SMILES CC(=O)Oc1ccccc1C(=O)O here", 10);
        assert_eq!(result, vec!["bad SMILES", "CC(=O)Oc1c", "cccc1C(=O)", "O here"]);
    }

    #[test]
    fn truncate_short() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_exact() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_long() {
        assert_eq!(truncate("Magnesium Stearate", 10), "Magnesium…");
    }

    #[test]
    fn parse_share_reads_percentages() {
        assert_eq!(parse_share("MCC=20"), Some(("MCC", 20.0)));
        assert_eq!(parse_share(" Lactose Monohydrate = 45.5% "), Some(("Lactose Monohydrate", 45.5)));
    }

    #[test]
    fn parse_share_rejects_malformed() {
        assert_eq!(parse_share("MCC"), None);
        assert_eq!(parse_share("=20"), None);
        assert_eq!(parse_share("MCC=lots"), None);
    }

    #[test]
    fn truncate_unicode() {
        assert_eq!(truncate("日本語テスト", 4), "日本語…");
    }
}
