// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! URL normalization and HTML-to-text extraction for fetched pages.

use std::sync::OnceLock;

use regex::Regex;

/// Rewrite arXiv PDF URLs to their abstract pages.
///
/// PDF bodies cannot be extracted as text, but every arXiv PDF has an
/// HTML abstract page at the parallel `/abs/` path.
pub fn normalize_fetch_url(url: &str) -> String {
    if url.contains("arxiv.org/pdf/") {
        let rewritten = url.replacen("/pdf/", "/abs/", 1);
        return rewritten
            .strip_suffix(".pdf")
            .map(str::to_string)
            .unwrap_or(rewritten);
    }
    url.to_string()
}

/// Extract the `<title>` text from an HTML document, whitespace-collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid")
    });
    re.captures(html).map(|caps| {
        caps[1]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Convert an HTML document to readable plain text.
///
/// Runs of three or more newlines collapse to a single blank line.
pub fn html_to_text(html: &str) -> String {
    let text = html2text::from_read(html.as_bytes(), 100).unwrap_or_default();
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    let re = BLANK_RUNS
        .get_or_init(|| Regex::new(r"\n{3,}").expect("newline regex is valid"));
    re.replace_all(&text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arxiv_pdf_url_is_rewritten_to_abstract() {
        assert_eq!(
            normalize_fetch_url("https://arxiv.org/pdf/2103.00020.pdf"),
            "https://arxiv.org/abs/2103.00020"
        );
        assert_eq!(
            normalize_fetch_url("https://arxiv.org/pdf/2103.00020v2"),
            "https://arxiv.org/abs/2103.00020v2"
        );
    }

    #[test]
    fn non_arxiv_urls_pass_through() {
        assert_eq!(
            normalize_fetch_url("https://example.com/paper.pdf"),
            "https://example.com/paper.pdf"
        );
    }

    #[test]
    fn title_is_extracted_case_insensitively_across_lines() {
        let html = "<html><head><TITLE>\n  A Spaced\n  Title </TITLE></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("A Spaced Title"));
    }

    #[test]
    fn missing_title_yields_none() {
        assert!(extract_title("<html><body>no title</body></html>").is_none());
    }

    #[test]
    fn html_is_stripped_and_blank_runs_collapsed() {
        let html = "<html><body><h1>Heading</h1>\n\n\n\n<p>Body text.</p></body></html>";
        let text = html_to_text(html);
        assert!(text.contains("Heading"));
        assert!(text.contains("Body text."));
        assert!(!text.contains("<p>"));
        assert!(!text.contains("\n\n\n"));
    }
}
