//! Markdown to HTML conversion
//!
//! Covers what the changelog renderer writes: `#`/`##`/`###` headings, `- `
//! bullets with tab continuations, `**bold**` runs and plain paragraphs.

use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(?P<text>[^*]+)\*\*").expect("Invalid regex"));

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn inline(text: &str) -> String {
    BOLD.replace_all(&escape_html(text.trim()), "<strong>$text</strong>")
        .into_owned()
}

#[derive(PartialEq)]
enum Block {
    None,
    List,
    Paragraph,
}

fn close(out: &mut Vec<String>, block: &mut Block) {
    match block {
        Block::List => out.push("</li>\n</ul>".to_string()),
        Block::Paragraph => out.push("</p>".to_string()),
        Block::None => {}
    }
    *block = Block::None;
}

/// Convert changelog Markdown to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut block = Block::None;

    for line in markdown.lines() {
        let heading = [("### ", "h3"), ("## ", "h2"), ("# ", "h1")]
            .into_iter()
            .find_map(|(marker, tag)| line.strip_prefix(marker).map(|text| (tag, text)));

        if let Some((tag, text)) = heading {
            close(&mut out, &mut block);
            out.push(format!("<{tag}>{}</{tag}>", inline(text)));
        } else if let Some(item) = line.strip_prefix("- ") {
            match block {
                Block::List => out.push("</li>".to_string()),
                _ => {
                    close(&mut out, &mut block);
                    out.push("<ul>".to_string());
                    block = Block::List;
                }
            }
            out.push(format!("<li>{}", inline(item)));
        } else if line.trim().is_empty() {
            close(&mut out, &mut block);
        } else if block == Block::List {
            out.push(format!("<br>{}", inline(line)));
        } else {
            if block == Block::None {
                out.push("<p>".to_string());
                block = Block::Paragraph;
            }
            out.push(inline(line));
        }
    }
    close(&mut out, &mut block);

    out.join("\n")
}

/// Wrap a fragment in a standalone HTML document
pub fn html_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_to_html() {
        let html = markdown_to_html("### Bug Fixes\n\n- **UI:** crash <on> close\n\tsecond line\n- other\n");
        assert_eq!(
            html,
            "<h3>Bug Fixes</h3>\n<ul>\n<li><strong>UI:</strong> crash &lt;on&gt; close\n<br>second line\n</li>\n<li>other\n</li>\n</ul>"
        );
    }

    #[test]
    fn test_paragraphs() {
        let html = markdown_to_html("# APP CHANGE LOG\n\nsome text\nmore & more\n");
        assert_eq!(html, "<h1>APP CHANGE LOG</h1>\n<p>\nsome text\nmore &amp; more\n</p>");
    }

    #[test]
    fn test_document_escapes_title() {
        let doc = html_document("a & b", "<p>x</p>");
        assert!(doc.contains("<title>a &amp; b</title>"));
        assert!(doc.contains("<body>\n<p>x</p>\n</body>"));
    }
}
