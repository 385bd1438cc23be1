//! Legacy → structured analysis adapter.

use super::{
    new_scrape_id, AnalysisData, AnalysisResult, ContactInfo, DesignTokens, ScrapedImages,
    TextContent,
};

/// Call-to-action labels used when the structured shape is synthesized.
///
/// These are not derived from the source site. Callers must not treat them as
/// real content.
pub const DEFAULT_CTAS: [&str; 2] = ["Get Started", "Contact Us"];

/// Font recorded for synthesized design tokens.
pub const DEFAULT_FONT: &str = "Arial";

/// Synthesize an [`AnalysisData`] from a legacy [`AnalysisResult`].
///
/// Lossy and one-way. Everything except `scrape_id` is a pure function of the
/// inputs; image fields are always left unset.
pub fn normalize(result: &AnalysisResult, original_url: &str) -> AnalysisData {
    let content = &result.extracted_content;

    let mut paragraphs = Vec::with_capacity(content.services.len() + 1);
    paragraphs.push(content.description.clone());
    paragraphs.extend(content.services.iter().cloned());

    AnalysisData {
        scrape_id: new_scrape_id(),
        original_url: original_url.to_string(),
        text_content: TextContent {
            headings: vec![result.business_name.clone(), content.headline.clone()],
            paragraphs,
            ctas: DEFAULT_CTAS.iter().map(|cta| (*cta).to_string()).collect(),
            contact_info: ContactInfo {
                phone: Some(content.contact_info.clone()),
                email: None,
                address: None,
            },
        },
        design_tokens: DesignTokens {
            colors: vec![
                result.primary_color.clone(),
                result.secondary_color.clone(),
                result.accent_color.clone(),
            ],
            fonts: vec![DEFAULT_FONT.to_string()],
        },
        scraped_images: ScrapedImages::default(),
        screenshot_url: None,
    }
}
