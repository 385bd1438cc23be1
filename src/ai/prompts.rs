//! Prompt construction for the design backend.
//!
//! Kept free of I/O so the exact wording handed to the model can be tested.

use crate::analysis::{AnalysisData, AnalysisResult};
use crate::generation::{AssetKind, GeneratedAsset};
use crate::preferences::UserPreferences;

/// Screenshot analysis instruction.
pub const SCREENSHOT_ANALYSIS: &str = r"Analyze these website screenshots.
Extract the business details, colors, and content.
Identify design issues that make it look old or unprofessional.
Suggest a modern recommended style.";

/// First stage of URL analysis: grounded research.
pub fn url_research(url: &str) -> String {
    format!(
        r"Find information about the business at this URL: {url}.
I need to know:
1. Business Name and Type
2. What services they offer
3. Their likely branding colors (if found, otherwise infer from industry)
4. Typical design issues for this type of business's old websites"
    )
}

/// Second stage of URL analysis: structure the research into the legacy schema.
pub fn url_structure(url: &str, research: &str) -> String {
    format!(
        r#"Based on this research about {url}:
{research}

Create a structured website analysis.
Assume a "Before" state that needs improvement.
Fill in the JSON schema."#
    )
}

/// Structured extraction of a URL into the design-compiler shape.
pub fn structured_analysis(url: &str) -> String {
    format!(
        r"Extract the content and design tokens of the website at {url}.
Return JSON with:
- textContent: headings, paragraphs, ctas (button labels), contactInfo (phone, email, address)
- designTokens: colors (hex), fonts (family names)
- scrapedImages: logoUrl, heroUrl, galleryUrls (absolute URLs only, omit unknown)
Use only content that exists on the site; do not invent copy."
    )
}

/// Legacy HTML synthesis, embedding the generated asset URLs verbatim.
pub fn legacy_html(analysis: &AnalysisResult, assets: &[GeneratedAsset]) -> String {
    let hero = assets
        .iter()
        .find(|a| a.kind == AssetKind::Hero)
        .map_or("https://via.placeholder.com/1200", |a| a.url.as_str());

    let features = assets
        .iter()
        .filter(|a| a.kind == AssetKind::Feature)
        .enumerate()
        .map(|(i, a)| format!("Image {}: \"{}\"", i + 1, a.url))
        .collect::<Vec<_>>()
        .join("\n");

    let content = &analysis.extracted_content;

    format!(
        r#"You are an expert frontend engineer. Rebuild this website.

ANALYSIS:
Name: {name}
Type: {kind}
Style: {style}
Colors: Primary {primary}, Secondary {secondary}, Accent {accent}
Content:
  Headline: "{headline}"
  Desc: "{description}"
  Services: {services}
  Contact: "{contact}"

ASSETS TO USE (Use these EXACT URLs/Base64 strings in the <img> tags):
Hero Image: "{hero}"
Feature Images:
{features}

REQUIREMENTS:
1. Single HTML file.
2. Use Tailwind CSS via CDN.
3. Modern, clean, responsive design using the recommended style.
4. Sections: Navbar, Hero (full width), About, Services (Grid), Contact, Footer.
5. Use the specific colors provided in Tailwind config or arbitrary values (e.g. bg-[#...]).
6. Use Lucide icons (via unpkg) or SVG.
7. Font: 'Inter', sans-serif.
8. Return ONLY raw HTML."#,
        name = analysis.business_name,
        kind = analysis.business_type,
        style = analysis.recommended_style,
        primary = analysis.primary_color,
        secondary = analysis.secondary_color,
        accent = analysis.accent_color,
        headline = content.headline,
        description = content.description,
        services = content.services.join(", "),
        contact = content.contact_info,
    )
}

/// Legacy refinement: the whole current document plus the instruction.
pub fn legacy_refine(html: &str, instruction: &str) -> String {
    format!(
        r#"You are an expert web developer.

USER INSTRUCTION: "{instruction}"

CURRENT HTML:
{html}

TASK:
1. Modify the Current HTML to satisfy the User Instruction.
2. Keep the rest of the design intact.
3. If asking for new content and no text provided, generate professional placeholder text.
4. Return ONLY the full, valid, updated HTML string."#
    )
}

/// Hero image request used by the design compiler.
pub fn compile_hero_image(data: &AnalysisData, preferences: &UserPreferences) -> String {
    let business = data.business_name().unwrap_or("a local business");
    format!(
        "Hero banner photograph for {business}. {vibe} design vibe, {palette} color palette. \
         High quality, wide composition, room for headline text.",
        vibe = preferences.dominant_vibe().unwrap_or("modern"),
        palette = preferences.color_palette,
    )
}

/// Design compiler instruction: structured analysis + weighted preferences.
pub fn compile_site(data: &AnalysisData, preferences: &UserPreferences, hero_url: &str) -> String {
    let vibe_weights = preferences
        .vibe
        .iter()
        .map(|(name, weight)| format!("{name}={weight:.1}"))
        .collect::<Vec<_>>()
        .join(", ");

    let contact = &data.text_content.contact_info;
    let contact_line = [&contact.phone, &contact.email, &contact.address]
        .iter()
        .filter_map(|v| v.as_deref())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");

    let mood = preferences
        .mood_image_url
        .as_deref()
        .map(|url| format!("\nMood reference image (use as a subtle section background): \"{url}\""))
        .unwrap_or_default();

    format!(
        r#"You are a design compiler. Build a complete single-page website.

SOURCE CONTENT:
Headings: {headings}
Paragraphs: {paragraphs}
Calls to action: {ctas}
Contact: {contact_line}
Original colors: {colors}
Original fonts: {fonts}

DESIGN VECTOR:
Vibe weights: {vibe_weights}
Color palette: {palette}
Typography: {typography}
Layout focus: {layout}

ASSETS (use these EXACT URLs):
Hero Image: "{hero_url}"{mood}

REQUIREMENTS:
1. Single HTML file using Tailwind CSS via CDN.
2. Blend the vibes according to their weights, led by the strongest.
3. Keep all source content; improve hierarchy and readability.
4. Responsive, accessible markup.
5. Return ONLY raw HTML."#,
        headings = data.text_content.headings.join(" / "),
        paragraphs = data.text_content.paragraphs.join(" / "),
        ctas = data.text_content.ctas.join(", "),
        colors = data.design_tokens.colors.join(", "),
        fonts = data.design_tokens.fonts.join(", "),
        palette = preferences.color_palette,
        typography = preferences.typography,
        layout = preferences.layout_focus,
    )
}

/// Structured refinement: the whole current document, the instruction and the
/// original content for reference.
pub fn structured_refine(html: &str, instruction: &str, data: &AnalysisData) -> String {
    format!(
        r#"You are an expert web developer refining a compiled website.

USER INSTRUCTION: "{instruction}"

ORIGINAL CONTENT (for reference when adding or restoring copy):
Headings: {headings}
Paragraphs: {paragraphs}
Brand colors: {colors}

CURRENT HTML:
{html}

TASK:
1. Modify the Current HTML to satisfy the User Instruction.
2. Keep the rest of the design intact.
3. Prefer the original content over invented copy.
4. Return ONLY the full, valid, updated HTML string."#,
        headings = data.text_content.headings.join(" / "),
        paragraphs = data.text_content.paragraphs.join(" / "),
        colors = data.design_tokens.colors.join(", "),
    )
}
