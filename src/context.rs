//! Final context assembly: the ordered page candidates become one delimited
//! string handed to the external answer-synthesis collaborator.

use crate::models::PageHit;

const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Format up to `max_pages` page blocks as
/// `[source: X | page: N]\n<full page text>` joined by the separator.
/// Returns an empty string for an empty page list; the caller distinguishes
/// "empty corpus" from "no relevant pages" before this point.
pub fn assemble(pages: &[PageHit], max_pages: usize) -> String {
    pages
        .iter()
        .take(max_pages)
        .map(|p| {
            format!(
                "[source: {} | page: {}]\n{}",
                p.source, p.page_number, p.full_page_content
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(source: &str, n: usize, text: &str) -> PageHit {
        PageHit {
            source: source.to_string(),
            page_number: n,
            score: 0.5,
            full_page_content: text.to_string(),
        }
    }

    #[test]
    fn test_empty_pages() {
        assert_eq!(assemble(&[], 10), "");
    }

    #[test]
    fn test_single_block_format() {
        let out = assemble(&[page("spec.pdf", 7, "dam crest at 842 m")], 10);
        assert_eq!(out, "[source: spec.pdf | page: 7]\ndam crest at 842 m");
    }

    #[test]
    fn test_blocks_joined_with_separator() {
        let out = assemble(
            &[page("a.pdf", 1, "first"), page("b.pdf", 2, "second")],
            10,
        );
        assert_eq!(
            out,
            "[source: a.pdf | page: 1]\nfirst\n\n---\n\n[source: b.pdf | page: 2]\nsecond"
        );
    }

    #[test]
    fn test_bounded_by_max_pages() {
        let pages: Vec<PageHit> = (1..=5).map(|i| page("a.pdf", i, "text")).collect();
        let out = assemble(&pages, 2);
        assert_eq!(out.matches("[source:").count(), 2);
    }
}
