//! Whole-line classification.
//!
//! Every line of page text is one of:
//! - **noise**: a page header/footer, a repeated column-header caption, or
//!   blank
//! - **owner name**: a heading with no digits anywhere (employee names never
//!   contain digits), cut short at the first column-header caption
//! - **data**: anything else, i.e. a line with at least one digit

use std::sync::LazyLock;

use regex::Regex;

/// Matches the page header/footer printed on every page, e.g.
/// `Wednesday, March 5, 2025    Page 2 of 7`.
static PAGE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday),?\s+(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},?\s+\d{4}\b.*\bpage\s+\d+\s+of\s+\d+\s*$",
    )
    .unwrap_or_else(|_| unreachable!())
});

/// Why a line was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// Weekday + date + `Page N of M` marker.
    PageMarker,
    /// A repeated column-header caption.
    ColumnHeader,
    /// Empty or whitespace-only.
    Blank,
}

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Structural noise; never updates the owner context.
    Noise(NoiseKind),
    /// An owner heading, trimmed, with any trailing captions removed.
    OwnerName(&'a str),
    /// A candidate data line.
    Data,
}

/// Classifies lines against a fixed set of column-header captions.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    /// Header captions with all whitespace removed.
    header_fragments: Vec<String>,
}

impl LineClassifier {
    /// Creates a classifier that treats `header_fragments` (ignoring
    /// whitespace) as column-header captions.
    #[must_use]
    pub fn new<S: AsRef<str>>(header_fragments: &[S]) -> Self {
        Self {
            header_fragments: header_fragments
                .iter()
                .map(|f| squash_whitespace(f.as_ref()))
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Classifies a single line.
    ///
    /// A digit-free line is an owner heading up to its first caption, e.g.
    /// `John Smith Pieces/Hr $/Hr Skus/Hr` names `John Smith`. A line that
    /// starts with a caption is noise.
    #[must_use]
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return LineClass::Noise(NoiseKind::Blank);
        }
        if PAGE_MARKER_RE.is_match(trimmed) {
            return LineClass::Noise(NoiseKind::PageMarker);
        }
        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            return LineClass::Data;
        }

        let name = match self.caption_start(trimmed) {
            Some(at) => trimmed[..at].trim_end(),
            None => trimmed,
        };
        if name.is_empty() {
            LineClass::Noise(NoiseKind::ColumnHeader)
        } else {
            LineClass::OwnerName(name)
        }
    }

    /// Byte offset in `line` where the earliest caption begins.
    fn caption_start(&self, line: &str) -> Option<usize> {
        if self.header_fragments.is_empty() {
            return None;
        }

        // Byte offset in `line` for every byte of the squashed text.
        let mut squashed = String::with_capacity(line.len());
        let mut offsets = Vec::with_capacity(line.len());
        for (i, c) in line.char_indices().filter(|(_, c)| !c.is_whitespace()) {
            squashed.push(c);
            offsets.resize(squashed.len(), i);
        }

        self.header_fragments
            .iter()
            .filter_map(|f| squashed.find(f.as_str()))
            .min()
            .map(|at| offsets[at])
    }
}

fn squash_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_HEADER_FRAGMENTS;

    fn classifier() -> LineClassifier {
        LineClassifier::new(DEFAULT_HEADER_FRAGMENTS)
    }

    #[test]
    fn alphabetic_lines_are_owner_names() {
        let c = classifier();
        for line in ["John Smith", "  Alice  ", "Mary Ann O'Neil", "STORE TEAM"] {
            assert_eq!(c.classify(line), LineClass::OwnerName(line.trim()));
        }
    }

    #[test]
    fn page_markers_are_noise() {
        let c = classifier();
        for line in [
            "Wednesday, March 5, 2025 Page 2 of 7",
            "Monday, January 13, 2025      Employee Production      Page 1 of 12",
            "friday march 7 2025 page 10 of 10",
        ] {
            assert_eq!(c.classify(line), LineClass::Noise(NoiseKind::PageMarker));
        }
    }

    #[test]
    fn column_headers_are_noise_regardless_of_spacing() {
        let c = classifier();
        assert_eq!(
            c.classify("Pieces/Hr$/HrSkus/Hr"),
            LineClass::Noise(NoiseKind::ColumnHeader)
        );
        assert_eq!(
            c.classify("  Pieces/Hr   $/Hr  Skus/Hr "),
            LineClass::Noise(NoiseKind::ColumnHeader)
        );
    }

    #[test]
    fn owner_heading_drops_trailing_captions() {
        let c = classifier();
        assert_eq!(
            c.classify("John Smith Pieces/Hr $/Hr Skus/Hr"),
            LineClass::OwnerName("John Smith")
        );
        assert_eq!(
            c.classify("  Mary Ann O'Neil   Pieces/Hr$/HrSkus/Hr"),
            LineClass::OwnerName("Mary Ann O'Neil")
        );
    }

    #[test]
    fn owner_heading_is_cut_at_the_earliest_caption() {
        let c = classifier();
        assert_eq!(
            c.classify("Jane Doe Date Store Pieces/Hr $/Hr Skus/Hr"),
            LineClass::OwnerName("Jane Doe")
        );
    }

    #[test]
    fn caption_at_line_start_is_noise() {
        let c = classifier();
        assert_eq!(
            c.classify("Date Store Pieces/Hr $/Hr Skus/Hr Totals"),
            LineClass::Noise(NoiseKind::ColumnHeader)
        );
    }

    #[test]
    fn no_captions_configured_keeps_whole_heading() {
        let c = LineClassifier::new::<&str>(&[]);
        assert_eq!(
            c.classify("John Smith Pieces/Hr $/Hr Skus/Hr"),
            LineClass::OwnerName("John Smith Pieces/Hr $/Hr Skus/Hr")
        );
    }

    #[test]
    fn blank_lines_are_noise() {
        let c = classifier();
        assert_eq!(c.classify(""), LineClass::Noise(NoiseKind::Blank));
        assert_eq!(c.classify(" \t "), LineClass::Noise(NoiseKind::Blank));
    }

    #[test]
    fn lines_with_digits_are_data() {
        let c = classifier();
        assert_eq!(c.classify("01/05/2025 Main St 100 $4.00 40"), LineClass::Data);
        assert_eq!(c.classify("42"), LineClass::Data);
    }

    #[test]
    fn page_marker_without_page_count_is_data() {
        let c = classifier();
        assert_eq!(c.classify("Wednesday, March 5, 2025"), LineClass::Data);
    }
}
