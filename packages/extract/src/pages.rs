//! Loading an ordered page sequence from disk.
//!
//! PDF inputs are handed to [`pdf_extract`], which returns one text blob per
//! page. Any other file is treated as already-extracted text where pages
//! are separated by form feeds (`\x0c`), the convention used by
//! `pdftotext` and most text exporters.

use std::path::Path;

use crate::ExtractError;

/// Page separator in pre-extracted text files.
pub const PAGE_BREAK: char = '\x0c';

/// Splits pre-extracted text into pages on form feeds.
///
/// A trailing form feed does not produce an extra empty page.
#[must_use]
pub fn split_pages(text: &str) -> Vec<String> {
    let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split(PAGE_BREAK).map(str::to_owned).collect()
}

/// Extracts per-page text from an in-memory PDF.
///
/// # Errors
///
/// Returns [`ExtractError::Pdf`] if the PDF cannot be parsed.
pub fn pdf_pages_from_mem(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Pdf(format!("failed to extract text from PDF: {e}")))?;

    log::debug!(
        "Extracted {} pages ({} characters) of text",
        pages.len(),
        pages.iter().map(String::len).sum::<usize>()
    );

    Ok(pages)
}

/// Returns `true` if the path has a `.pdf` extension (any case).
#[must_use]
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Loads the pages of a PDF or pre-extracted text file.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the file cannot be read, or
/// [`ExtractError::Pdf`] if PDF text extraction fails.
pub fn load_pages(path: &Path) -> Result<Vec<String>, ExtractError> {
    let pages = if is_pdf(path) {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        pdf_pages_from_mem(&bytes)?
    } else {
        split_pages(&std::fs::read_to_string(path)?)
    };

    log::info!("Loaded {} pages from {}", pages.len(), path.display());

    Ok(pages)
}
