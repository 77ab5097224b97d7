//! Executive summary extraction

use scraper::{Html, Selector};

/// Selector of the section the report prompt asks the model to emit
const SUMMARY_SELECTOR: &str = "section#executive-summary";

/// Re-serialize the first `<section id="executive-summary">` of a report.
///
/// Returns an empty string when the report has no such section.
pub fn extract_executive_summary(html: &str) -> String {
    let Ok(selector) = Selector::parse(SUMMARY_SELECTOR) else {
        return String::new();
    };

    Html::parse_document(html)
        .select(&selector)
        .next()
        .map(|section| section.html())
        .unwrap_or_default()
}
