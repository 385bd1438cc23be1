//! Export and preview boundary.

use std::path::{Path, PathBuf};

/// Sandbox flags for the live preview frame: scripts allowed, origin kept.
pub const PREVIEW_SANDBOX: &str = "allow-scripts allow-modals allow-forms allow-same-origin";

/// Stem used when no business identifier is known.
const FALLBACK_STEM: &str = "website";

/// What a preview surface needs to render the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    /// Inline document source
    pub src_doc: String,
    /// Sandbox attribute value
    pub sandbox: &'static str,
}

impl PreviewDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self { src_doc: html.into(), sandbox: PREVIEW_SANDBOX }
    }
}

/// File stem for an exported document.
///
/// Lower-cases, trims, and collapses every whitespace run into one hyphen.
/// Path separators also become hyphens so the file stays in the target
/// directory. Everything else is kept as-is.
pub fn export_stem(business_name: &str) -> String {
    let stem = business_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .replace(['/', '\\'], "-");

    if stem.is_empty() || stem.chars().all(|c| c == '-' || c == '.') {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// File name (`<stem>.html`) for an exported document.
pub fn export_filename(business_name: &str) -> String {
    format!("{}.html", export_stem(business_name))
}

/// Write `html` into `dir` and return the written path.
pub fn write_export(dir: &Path, business_name: &str, html: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(business_name));
    std::fs::write(&path, html)?;
    tracing::info!(path = %path.display(), bytes = html.len(), "Exported website");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_stem_keeps_punctuation() {
        assert_eq!(export_stem("Joe's Café & Bar"), "joe's-café-&-bar");
    }

    #[test]
    fn test_export_stem_collapses_whitespace() {
        assert_eq!(export_stem("  Acme \t  Plumbing\nCo  "), "acme-plumbing-co");
    }

    #[test]
    fn test_export_stem_replaces_separators() {
        assert_eq!(export_stem("AC/DC Tribute"), "ac-dc-tribute");
        assert_eq!(export_stem("..\\..\\etc"), "..-..-etc");
    }

    #[test]
    fn test_export_stem_fallback() {
        assert_eq!(export_stem(""), "website");
        assert_eq!(export_stem("   "), "website");
        assert_eq!(export_stem(".."), "website");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("Bloom Florist"), "bloom-florist.html");
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), "Bloom Florist", "<html></html>").unwrap();
        assert_eq!(path, dir.path().join("bloom-florist.html"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
    }

    #[test]
    fn test_preview_document_sandbox() {
        let preview = PreviewDocument::new("<p>x</p>");
        assert!(preview.sandbox.contains("allow-scripts"));
        assert!(preview.sandbox.contains("allow-same-origin"));
    }
}
