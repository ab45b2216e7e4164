//! Formatting of provider responses into a single text block

use crate::types::SearchResponse;

/// Fallback when the provider returned nothing at all
pub const NO_RESULTS_MESSAGE: &str =
    "No results were found for your query. Please try a different search term.";

/// Fallback when the provider answered but with no usable content
pub const NO_CONTENT_MESSAGE: &str =
    "The search was completed but no relevant information was found. Please try refining your query.";

/// Build the user-facing text for a search response.
///
/// Layout is part of the tool contract: an optional "AI Answer:" section
/// first, then "Search Results:" with 1-indexed items in provider order,
/// missing item fields substituted with placeholder text.
pub fn format_results(response: &SearchResponse) -> String {
    if response.answer.is_none() && response.results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut sections = Vec::new();

    if let Some(answer) = response.answer.as_deref().filter(|a| !a.is_empty()) {
        sections.push(format!("AI Answer:\n{}", answer));
    }

    if !response.results.is_empty() {
        let mut lines = vec!["Search Results:".to_string()];
        for (i, item) in response.results.iter().enumerate() {
            lines.push(format!(
                "{}. {}\nURL: {}\nSummary: {}",
                i + 1,
                item.title.as_deref().unwrap_or("Title not found"),
                item.url.as_deref().unwrap_or("URL not found"),
                item.snippet.as_deref().unwrap_or("Summary not found"),
            ));
        }
        sections.push(lines.join("\n\n"));
    }

    if sections.is_empty() {
        return NO_CONTENT_MESSAGE.to_string();
    }

    sections.join("\n\n")
}
