//! Ticket tag extraction
//!
//! Tags such as `[fixed #12, #13]` are lifted out of a message and rewritten
//! with a canonical verb (`Fixes #12, #13`).

use regex::Regex;
use std::sync::LazyLock;

static TICKET_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[\s*(?P<verb>bugs?|issues?|close[sd]?|fix(?:es|ed)?|resolve[sd]?|reference[sd]?|refs?)\s+(?P<refs>#?\d+(?:[\s,]+#?\d+)*)\s*\]",
    )
    .expect("Invalid regex")
});

static TICKET_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));

/// Canonical tickets block at the end of a rendered line
static RENDERED_TICKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s*\[(?P<tickets>(?:Bugs|Issues|Closes|Fixes|Resolves|References) #\d+[^\]]*)\]\s*$",
    )
    .expect("Invalid regex")
});

/// Canonical verb for a ticket tag verb
pub fn canonical_verb(verb: &str) -> &'static str {
    match verb.to_lowercase().as_str() {
        "bug" | "bugs" => "Bugs",
        "issue" | "issues" => "Issues",
        "close" | "closes" | "closed" => "Closes",
        "fix" | "fixes" | "fixed" => "Fixes",
        "resolve" | "resolves" | "resolved" => "Resolves",
        _ => "References",
    }
}

/// Remove ticket tags from a message.
///
/// Returns the cleaned message and the normalized tickets, several tags joined
/// with `"; "`. Lines left empty by the removal are dropped; other lines keep
/// their leading whitespace.
pub fn extract_tickets(message: &str) -> (String, Option<String>) {
    let mut tickets = Vec::new();
    let mut lines = Vec::new();

    for line in message.lines() {
        if !TICKET_TAG.is_match(line) {
            lines.push(line.to_string());
            continue;
        }

        for caps in TICKET_TAG.captures_iter(line) {
            let refs: Vec<String> = TICKET_NUMBER
                .find_iter(&caps["refs"])
                .map(|m| format!("#{}", m.as_str()))
                .collect();
            tickets.push(format!("{} {}", canonical_verb(&caps["verb"]), refs.join(", ")));
        }

        let stripped = TICKET_TAG.replace_all(line, "");
        let indent_len = stripped.len() - stripped.trim_start().len();
        let rest = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        if !rest.is_empty() {
            lines.push(format!("{}{}", &stripped[..indent_len], rest));
        }
    }

    let tickets = (!tickets.is_empty()).then(|| tickets.join("; "));
    (lines.join("\n"), tickets)
}

/// Split a canonical `[Verb #N]` block off the end of a rendered message
pub fn split_rendered_tickets(message: &str) -> (String, Option<String>) {
    match RENDERED_TICKETS.captures(message) {
        Some(caps) => {
            let start = caps.get(0).map_or(message.len(), |m| m.start());
            (
                message[..start].to_string(),
                Some(caps["tickets"].to_string()),
            )
        }
        None => (message.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_and_normalize() {
        let (message, tickets) = extract_tickets("crash on close [fixed #12, #13]");
        assert_eq!(message, "crash on close");
        assert_eq!(tickets.as_deref(), Some("Fixes #12, #13"));
    }

    #[test]
    fn test_verbs_are_canonical() {
        for (verb, expected) in [
            ("bug", "Bugs"),
            ("Issues", "Issues"),
            ("closed", "Closes"),
            ("RESOLVE", "Resolves"),
            ("ref", "References"),
            ("referenced", "References"),
        ] {
            let (_, tickets) = extract_tickets(&format!("x [{} 7]", verb));
            assert_eq!(tickets.unwrap(), format!("{} #7", expected));
        }
    }

    #[test]
    fn test_multiple_tags_and_dropped_lines() {
        let (message, tickets) =
            extract_tickets("rework cache [closes #4]\n  keep indent\n[refs 9 10]");
        assert_eq!(message, "rework cache\n  keep indent");
        assert_eq!(tickets.as_deref(), Some("Closes #4; References #9, #10"));
    }

    #[test]
    fn test_plain_brackets_are_kept() {
        let (message, tickets) = extract_tickets("handle [object Object] output");
        assert_eq!(message, "handle [object Object] output");
        assert!(tickets.is_none());
    }

    #[test]
    fn test_split_rendered_tickets() {
        let (message, tickets) = split_rendered_tickets("crash on close [Fixes #12, #13]");
        assert_eq!(message, "crash on close");
        assert_eq!(tickets.as_deref(), Some("Fixes #12, #13"));

        let (message, tickets) = split_rendered_tickets("see [docs]");
        assert_eq!(message, "see [docs]");
        assert!(tickets.is_none());
    }
}
