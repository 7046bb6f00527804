/// Reduces a model reply to a bare expression: drops code fences, backticks,
/// an `XPath:` label and wrapping quotes, and keeps the first non-empty line.
pub fn clean_expression(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    let fence = "```";
    if let Some(start) = text.find(fence) {
        let after_fence = &text[start + fence.len()..];
        let after_lang =
            after_fence.trim_start_matches(|c: char| c.is_alphanumeric() || c == '_');
        text = match after_lang.find(fence) {
            Some(end) => &after_lang[..end],
            None => after_lang,
        };
    }

    let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = strip_label(line).trim().trim_matches('`').trim();
    let line = strip_wrapping_quotes(line).trim();

    (!line.is_empty()).then(|| line.to_string())
}

fn strip_label(line: &str) -> &str {
    let label = "xpath";
    match line.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => {
            let rest = line[label.len()..].trim_start();
            rest.strip_prefix(':')
                .or_else(|| rest.strip_prefix('='))
                .unwrap_or(line)
        }
        _ => line,
    }
}

fn strip_wrapping_quotes(line: &str) -> &str {
    for quote in ['"', '\''] {
        if line.len() >= 2 && line.starts_with(quote) && line.ends_with(quote) {
            return &line[1..line.len() - 1];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_language_tag() {
        let raw = "Sure!\n```xpath\n//*[@id='go']\n```\nHope it helps";
        assert_eq!(clean_expression(raw).as_deref(), Some("//*[@id='go']"));
    }

    #[test]
    fn strips_label_backticks_and_quotes() {
        assert_eq!(
            clean_expression("XPath: `//input[@name='q']`").as_deref(),
            Some("//input[@name='q']")
        );
        assert_eq!(
            clean_expression("\"//a[@href='#']\"").as_deref(),
            Some("//a[@href='#']")
        );
        assert_eq!(
            clean_expression("xpath = //button").as_deref(),
            Some("//button")
        );
    }

    #[test]
    fn keeps_first_line_only() {
        assert_eq!(
            clean_expression("\n  //div[@role='dialog']\nThis selects the dialog").as_deref(),
            Some("//div[@role='dialog']")
        );
    }

    #[test]
    fn empty_replies_yield_nothing() {
        assert_eq!(clean_expression("   "), None);
        assert_eq!(clean_expression("``````"), None);
        assert_eq!(clean_expression("XPath:"), None);
    }
}
