//! Website analysis data model.
//!
//! An analysis comes in two shapes:
//!
//! - [`AnalysisResult`]: the flat "legacy" shape the backend extracts from
//!   screenshots or URL research.
//! - [`AnalysisData`]: the structured shape the design compiler consumes. It is
//!   either fetched directly (URL path) or synthesized from an
//!   [`AnalysisResult`] by [`normalize`] (image path).

mod normalize;

pub use normalize::{normalize, DEFAULT_CTAS, DEFAULT_FONT};

use serde::{Deserialize, Serialize};

/// Content pulled out of the original website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedContent {
    /// Main headline
    pub headline: String,
    /// Short business description
    pub description: String,
    /// Services offered, in the order they were found
    pub services: Vec<String>,
    /// Free-form contact line (phone, email or address)
    pub contact_info: String,
}

/// Legacy analysis shape.
///
/// Produced once per analysis and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub business_name: String,
    pub business_type: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    /// Things that make the current site look dated
    pub design_issues: Vec<String>,
    pub extracted_content: ExtractedContent,
    pub recommended_style: String,
}

impl AnalysisResult {
    /// Human-readable summary, one line per fact.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Business:    {} ({})", self.business_name, self.business_type),
            format!(
                "Palette:     {} / {} / {}",
                self.primary_color, self.secondary_color, self.accent_color
            ),
            format!("Style:       {}", self.recommended_style),
            format!("Headline:    {}", self.extracted_content.headline),
        ];

        if !self.extracted_content.services.is_empty() {
            lines.push(format!("Services:    {}", self.extracted_content.services.join(", ")));
        }
        if !self.extracted_content.contact_info.is_empty() {
            lines.push(format!("Contact:     {}", self.extracted_content.contact_info));
        }
        for issue in &self.design_issues {
            lines.push(format!("Issue:       {issue}"));
        }

        lines
    }
}

/// Contact details found on the original site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Text scraped from the original site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    /// Call-to-action labels
    pub ctas: Vec<String>,
    pub contact_info: ContactInfo,
}

/// Visual tokens of the original design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignTokens {
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
}

/// Image URLs found on the original site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapedImages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_url: Option<String>,
    pub gallery_urls: Vec<String>,
}

/// Structured analysis shape consumed by the design compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisData {
    /// Unique per analysis run
    pub scrape_id: String,
    pub original_url: String,
    pub text_content: TextContent,
    pub design_tokens: DesignTokens,
    pub scraped_images: ScrapedImages,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
}

impl AnalysisData {
    /// The business identifier: the first heading, if any.
    pub fn business_name(&self) -> Option<&str> {
        self.text_content.headings.first().map(String::as_str).filter(|name| !name.is_empty())
    }
}

/// An analysis persisted by `siteforge analyze --save` for later reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnalysis {
    pub analysis: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_data: Option<AnalysisData>,
}

/// Generate a fresh scrape identifier.
pub fn new_scrape_id() -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("scrape-{}-{}", chrono::Utc::now().timestamp_millis(), &token[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_deserializes_camel_case() {
        let json = r##"{
            "businessName": "Bloom Florist",
            "businessType": "Florist",
            "primaryColor": "#ff0066",
            "secondaryColor": "#222222",
            "accentColor": "#ffd700",
            "designIssues": ["Tiny fonts"],
            "extractedContent": {
                "headline": "Fresh flowers daily",
                "description": "Family florist",
                "services": ["Bouquets", "Weddings"],
                "contactInfo": "555-0100"
            },
            "recommendedStyle": "Soft and airy"
        }"##;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.business_name, "Bloom Florist");
        assert_eq!(result.extracted_content.services, vec!["Bouquets", "Weddings"]);
        assert_eq!(result.extracted_content.contact_info, "555-0100");
    }

    #[test]
    fn test_analysis_result_tolerates_missing_fields() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"businessName": "Solo"}"#).unwrap();
        assert_eq!(result.business_name, "Solo");
        assert!(result.accent_color.is_empty());
        assert!(result.extracted_content.services.is_empty());
    }

    #[test]
    fn test_analysis_data_business_name() {
        let mut data = AnalysisData::default();
        assert_eq!(data.business_name(), None);

        data.text_content.headings = vec![String::new(), "Second".to_string()];
        assert_eq!(data.business_name(), None);

        data.text_content.headings = vec!["Acme".to_string()];
        assert_eq!(data.business_name(), Some("Acme"));
    }

    #[test]
    fn test_analysis_data_skips_unset_optionals() {
        let json = serde_json::to_value(AnalysisData::default()).unwrap();
        assert!(json.get("screenshotUrl").is_none());
        assert!(json["scrapedImages"].get("logoUrl").is_none());
        assert!(json["scrapedImages"]["galleryUrls"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_scrape_ids_are_unique() {
        let a = new_scrape_id();
        let b = new_scrape_id();
        assert!(a.starts_with("scrape-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_saved_analysis_without_structured_data() {
        let saved: SavedAnalysis =
            serde_json::from_str(r#"{"analysis": {"businessName": "Acme"}}"#).unwrap();
        assert_eq!(saved.analysis.business_name, "Acme");
        assert!(saved.analysis_data.is_none());
    }

    #[test]
    fn test_summary_lines_include_issues() {
        let result = AnalysisResult {
            business_name: "Acme".to_string(),
            design_issues: vec!["Cluttered nav".to_string()],
            ..Default::default()
        };
        let lines = result.summary_lines();
        assert!(lines[0].contains("Acme"));
        assert!(lines.iter().any(|l| l.contains("Cluttered nav")));
    }
}
