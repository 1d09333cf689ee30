//! Wiki-link insertion for keywords

use regex::RegexBuilder;

/// Wrap every case-insensitive occurrence of `keyword` as `[[<match>]]`,
/// keeping the casing found in the text.
///
/// The keyword is matched literally. Occurrences inside links inserted for
/// an earlier keyword are wrapped again.
pub fn link_keyword(text: &str, keyword: &str) -> String {
    if keyword.trim().is_empty() {
        return text.to_string();
    }

    let re = match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(keyword, error = %e, "Failed to build keyword pattern");
            return text.to_string();
        }
    };

    re.replace_all(text, "[[$0]]").into_owned()
}

/// Apply [`link_keyword`] once per keyword, in the given order
pub fn link_all(text: &str, keywords: &[String]) -> String {
    keywords
        .iter()
        .fold(text.to_string(), |acc, keyword| link_keyword(&acc, keyword))
}

/// Format keywords as the note's trailing `Keywords:` line
pub fn keywords_footer(keywords: &[String]) -> String {
    let links: Vec<String> = keywords.iter().map(|k| format!("[[{k}]]")).collect();
    format!("Keywords: {}", links.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_occurrence_keeps_casing() {
        let text = "Focus matters. Without focus, FOCUS fades.";
        assert_eq!(
            link_keyword(text, "focus"),
            "[[Focus]] matters. Without [[focus]], [[FOCUS]] fades."
        );
    }

    #[test]
    fn test_occurrence_count_matches() {
        let text = "ai and AI and Ai, but not a i";
        let linked = link_keyword(text, "AI");
        assert_eq!(linked.matches("[[").count(), 3);
        assert_eq!(linked.matches("]]").count(), 3);
    }

    #[test]
    fn test_no_occurrence_is_unchanged() {
        assert_eq!(link_keyword("nothing here", "sleep"), "nothing here");
    }

    #[test]
    fn test_metacharacters_match_literally() {
        assert_eq!(
            link_keyword("We use C++ and C.", "C++"),
            "We use [[C++]] and C."
        );
        assert_eq!(link_keyword("a.b and axb", "a.b"), "[[a.b]] and axb");
    }

    #[test]
    fn test_blank_keyword_is_ignored() {
        assert_eq!(link_keyword("text", ""), "text");
        assert_eq!(link_keyword("text", "  "), "text");
    }

    #[test]
    fn test_substring_matches_are_linked() {
        assert_eq!(link_keyword("Focused work", "focus"), "[[Focus]]ed work");
    }

    #[test]
    fn test_overlapping_keywords_apply_in_order() {
        let keywords = vec!["AI safety".to_string(), "AI".to_string()];
        assert_eq!(
            link_all("AI safety needs AI.", &keywords),
            "[[[[AI]] safety]] needs [[AI]]."
        );
    }

    #[test]
    fn test_footer() {
        let keywords = vec!["Focus".to_string(), "Deep Work".to_string()];
        assert_eq!(keywords_footer(&keywords), "Keywords: [[Focus]], [[Deep Work]]");
        assert_eq!(keywords_footer(&[]), "Keywords: ");
    }
}
