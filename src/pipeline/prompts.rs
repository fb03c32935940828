//! System prompts for direct, intermediate and final summarization calls

use super::models::{Creativity, OutputFormat, SummaryLength};

/// Literal an intermediate call returns when a chunk has nothing to summarize
pub const NO_DATA_SENTINEL: &str = "NO_DATA";

/// Language every summary is written in
pub const RESPONSE_LANGUAGE: &str = "Russian";

/// Tags allowed in HTML output
const HTML_TAG_ALLOWLIST: &str = "<p>, <h2>, <h3>, <ul>, <ol>, <li>, <strong> and <em>";

/// Whether an intermediate result is the "no data" sentinel
pub fn is_no_data(result: &str) -> bool {
    result.trim() == NO_DATA_SENTINEL
}

/// Render the system instruction for a call.
///
/// Intermediate prompts ignore the caller's options: chunk summaries are always
/// compact plain-text key phrases.
pub fn build_system_prompt(
    length: SummaryLength,
    format: OutputFormat,
    creativity: Creativity,
    is_intermediate: bool,
) -> String {
    if is_intermediate {
        return intermediate_prompt();
    }

    [
        "You are an expert summarizer.",
        length_clause(length),
        format_clause(format).as_str(),
        style_clause(creativity).as_str(),
    ]
    .join(" ")
}

/// Wrap the text to summarize in the user message
pub fn build_user_prompt(text: &str) -> String {
    format!("Please summarize the following text:\n\n{}", text)
}

fn intermediate_prompt() -> String {
    format!(
        "You are an expert summarizer. You are given one fragment of a much larger document; \
        your output will be combined with the summaries of the other fragments. \
        Extract the key facts, names, figures and main ideas of this fragment as compact key phrases. \
        The output MUST be plain text without any markup. Write in {lang}. \
        If the fragment contains nothing worth summarizing (navigation, boilerplate, empty text), \
        respond with exactly {sentinel} and nothing else.",
        lang = RESPONSE_LANGUAGE,
        sentinel = NO_DATA_SENTINEL,
    )
}

fn length_clause(length: SummaryLength) -> &'static str {
    match length {
        SummaryLength::Short => {
            "Write a short summary of 2-3 sentences that captures only the key points of the text."
        }
        SummaryLength::Long => {
            "Write a detailed summary of 1-2 paragraphs that covers the major sections and arguments of the text."
        }
    }
}

fn format_clause(format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => "The output MUST be plain text without any markup.".to_string(),
        OutputFormat::Markdown => "The output MUST be in Markdown format. \
            Use headings, lists and emphasis where suitable."
            .to_string(),
        OutputFormat::Html => format!(
            "The output MUST be an HTML fragment. Use only the tags {} where suitable. \
            Do not include <!DOCTYPE html>, <html>, <head> or <body> tags, only the content itself.",
            HTML_TAG_ALLOWLIST
        ),
    }
}

fn style_clause(creativity: Creativity) -> String {
    let wording = match creativity {
        Creativity::Low => "Stay close to the wording of the source.",
        Creativity::Medium => "Rephrase in your own words where it improves readability.",
        Creativity::High => {
            "Feel free to restructure and rephrase for an engaging read, without adding facts that are not in the text."
        }
    };
    format!(
        "The summary must be coherent, accurate and objective, with no personal opinions. {} Respond in {}.",
        wording, RESPONSE_LANGUAGE
    )
}
