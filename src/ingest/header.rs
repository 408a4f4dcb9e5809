//! Section header extraction from page text.
//!
//! The exact heading heuristics are corpus-specific, so extraction sits
//! behind a trait and can be swapped per document family.

use regex::Regex;

pub trait HeaderExtractor: Send + Sync {
    /// Return the best section header found in `page_text`, if any.
    fn extract(&self, page_text: &str) -> Option<String>;
}

/// Extraction disabled.
pub struct NoHeader;

impl HeaderExtractor for NoHeader {
    fn extract(&self, _page_text: &str) -> Option<String> {
        None
    }
}

/// Prefers numbered headings, deepest numbering wins: `6.2.3 Spillway` beats
/// `6.2 Hydraulics`. A plain title-case line is a fallback only when no
/// numeric heading exists on the page.
pub struct NumericHeadingExtractor {
    numeric: Regex,
    fallback: Regex,
}

impl Default for NumericHeadingExtractor {
    fn default() -> Self {
        Self {
            numeric: Regex::new(r"^\s*(\d+(?:\.\d+)*)\.?\s+(\S.{2,79})\s*$").unwrap(),
            fallback: Regex::new(r"^\s*([A-Z][A-Za-z].{2,79}?)\s*$").unwrap(),
        }
    }
}

impl HeaderExtractor for NumericHeadingExtractor {
    fn extract(&self, page_text: &str) -> Option<String> {
        let mut best: Option<(usize, String)> = None;

        for line in page_text.lines().take(40) {
            if let Some(caps) = self.numeric.captures(line) {
                let numbering = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let title = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
                if title.is_empty() || title.chars().all(|c| c.is_numeric() || c == '.') {
                    continue;
                }
                let depth = numbering.matches('.').count() + 1;
                let header = format!("{numbering} {title}");
                match &best {
                    Some((best_depth, _)) if *best_depth >= depth => {}
                    _ => best = Some((depth, header)),
                }
            }
        }

        if let Some((_, header)) = best {
            return Some(header);
        }

        // No numeric heading on this page: first plausible title line
        page_text
            .lines()
            .take(5)
            .filter_map(|line| self.fallback.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
            .find(|title| !title.ends_with('.'))
    }
}
