/// XPath `normalize-space`: trims and collapses runs of space, tab, CR and LF.
///
/// Other Unicode whitespace (e.g. NBSP) is kept, matching browser evaluators.
pub fn normalize_space(value: &str) -> String {
    value
        .split(is_xml_space)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs() {
        assert_eq!(normalize_space("  Sign \n\t in  "), "Sign in");
        assert_eq!(normalize_space(""), "");
        assert_eq!(normalize_space(" \n "), "");
    }

    #[test]
    fn keeps_non_breaking_space() {
        assert_eq!(normalize_space("a\u{a0}b"), "a\u{a0}b");
    }
}
