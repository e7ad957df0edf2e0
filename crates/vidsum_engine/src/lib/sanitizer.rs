//! Output sanitization for LLM-generated summaries.
//!
//! Backends routinely prepend throat-clearing ("Here's a summary of...",
//! "네, 요약입니다:") or restate the task as a leading label line. The
//! sanitizer runs an ordered rule table over the raw output; every rule is
//! a single leading-anchor substitution, applied once, in a fixed order.
//! It is a best-effort filter, not a parser; residual preamble can
//! survive and downstream consumers must tolerate it.

use std::sync::LazyLock;

use regex::Regex;

struct SanitizeRule {
    name: &'static str,
    pattern: Regex,
}

fn rule(name: &'static str, pattern: &str) -> SanitizeRule {
    SanitizeRule {
        name,
        // the table is static; a bad pattern is a programming error
        pattern: Regex::new(pattern).unwrap(),
    }
}

static RULES: LazyLock<Vec<SanitizeRule>> = LazyLock::new(|| {
    vec![
        // conversational lead-in ending in a domain keyword and a colon
        rule(
            "en-keyword-lead-in",
            r"(?i)^(?:here(?:'s| is)|this is|below is)[^:\n]{0,80}?\b(?:summary|translation|analysis)\s*:\s*",
        ),
        rule(
            "ko-keyword-lead-in",
            r"^(?:다음은|아래는|이것은)[^:\n]{0,80}?(?:요약|번역|분석)[^:\n]{0,30}?:\s*",
        ),
        // conversational lead-in ending at the first comma
        rule(
            "en-comma-lead-in",
            r"(?i)^(?:sure|certainly|of course|okay|here you go|happy to help)[^,\n]{0,60},\s*",
        ),
        rule(
            "ko-comma-lead-in",
            r"^(?:네|물론이죠|알겠습니다|좋습니다)[^,\n]{0,60},\s*",
        ),
        // meta-announcement prefixes
        rule(
            "meta-announcement",
            r"(?i)^(?:based on|i understand|i've reviewed|i have reviewed)[^,\n]{0,80},\s*",
        ),
        rule("discourse-opener", r"(?i)^(?:now|first),\s*"),
        // a leading `Word:` / `Word Word:` label; the word-character anchor
        // leaves headings, bullets and 🎯/📝 marker lines untouched
        rule("label-line", r"(?m)^\w+(?:[ \t]\w+)?:[ \t]+"),
        // stray list numbering the model added to an unstructured line
        rule("numeric-marker", r"(?m)^\d{1,3}[.)][ \t]+"),
    ]
});

/// Strips known provider preamble/meta-commentary, leaving only content.
/// Pure and deterministic; each rule fires at most once.
pub fn sanitize(text: &str) -> String {
    let mut out = text.to_string();
    for rule in RULES.iter() {
        if let std::borrow::Cow::Owned(replaced) = rule.pattern.replace(&out, "") {
            tracing::trace!(rule = rule.name, "sanitizer rule fired");
            out = replaced;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_english_keyword_lead_in() {
        assert_eq!(
            sanitize("Here's a summary: The video discusses X."),
            "The video discusses X."
        );
        assert_eq!(
            sanitize("Here is a concise analysis: Supply chains are fragile."),
            "Supply chains are fragile."
        );
    }

    #[test]
    fn test_strips_korean_keyword_lead_in() {
        assert_eq!(
            sanitize("다음은 영상 요약입니다: 이 영상은 러스트를 다룹니다."),
            "이 영상은 러스트를 다룹니다."
        );
    }

    #[test]
    fn test_strips_comma_lead_ins() {
        assert_eq!(
            sanitize("Sure, here you go. The talk covers memory safety."),
            "here you go. The talk covers memory safety."
        );
        assert_eq!(sanitize("네, 정리했습니다. 본문 내용."), "정리했습니다. 본문 내용.");
    }

    #[test]
    fn test_strips_meta_announcements() {
        assert_eq!(
            sanitize("Based on the transcript, the speaker argues for tests."),
            "the speaker argues for tests."
        );
        assert_eq!(sanitize("Now, the key points follow."), "the key points follow.");
    }

    #[test]
    fn test_marker_lines_survive() {
        let text = "🎯 TITLE: My Video\nBody text";
        assert_eq!(sanitize(text), text);

        let text = "📝 제목: 내 영상\n본문";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_structured_lines_survive() {
        let text = "# Overview\n- point one\n* point two";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_strips_bare_label_line() {
        assert_eq!(
            sanitize("Summary: The video explains lifetimes."),
            "The video explains lifetimes."
        );
    }

    #[test]
    fn test_strips_stray_numeric_marker() {
        assert_eq!(
            sanitize("1. The opening covers installation."),
            "The opening covers installation."
        );
    }

    #[test]
    fn test_rules_fire_once_each() {
        // only the first label line is stripped
        let out = sanitize("Note: first\nNote: second");
        assert_eq!(out, "first\nNote: second");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(sanitize("  \n content \n\n"), "content");
    }

    #[test]
    fn test_clean_content_passes_through() {
        let text = "The video walks through building a CLI in Rust.";
        assert_eq!(sanitize(text), text);
    }
}
