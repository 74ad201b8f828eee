//! Narrative prompt construction.
//!
//! Turns already-scored posts into the single text request sent to the
//! summarizer. Pure string building: same input, same bytes.

use crate::error::AnalysisError;
use crate::models::PostAnalysis;

/// System-role instruction sent alongside every prompt.
pub const SUMMARY_SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant with expertise in psychology and AI analysis.";

pub const PROMPT_PREAMBLE: &str = "Below are tweets analysed for emotion and depression risk:\n\n";

/// Fixed format and language directives appended after the posts.
pub const PROMPT_INSTRUCTIONS: &str = concat!(
    "\n\nPlease analyse **each** tweet thoroughly, ensuring none are omitted. ",
    "The analysis must be written in **British English**, ",
    "using British spelling and phrasing consistently.\n\n",
    "For **each** tweet, provide:\n\n",
    "### **Depression Severity Classification**\n",
    "- **Classification**: Categorise as **Shows Signs of Severe Depression, ",
    "Shows Signs of Moderate Depression, or Does Not Show Signs of Depression**.\n",
    "- **Justification**: Explain why the tweet falls under this category.\n\n",
    "### **Final Summary**\n",
    "- **Overall Emotional State**: Summarise the user\u{2019}s general emotional tone based on all tweets.\n",
    "- **Depression Risk Assessment**: Identify patterns in depressive signs and provide an overall risk level.\n",
    "- **Key Observations**:\n",
    "  - Recurring emotions or themes across tweets\n",
    "  - Any noticeable trends in worsening or improving emotional state\n",
    "  - Any need for concern or urgent intervention\n\n",
    "Ensure that the structure remains **consistent** for each request, ",
    "following the format outlined above. ",
    "Do not omit any tweets, and maintain coherence and clarity throughout the analysis. ",
    "If the tweet is a retweet (RT), mention that it is a retweet and not something ",
    "posted by the user so analysing depression is difficult."
);

/// Build the summarization prompt, one labeled block per result in input order.
pub fn build_prompt(results: &[PostAnalysis]) -> Result<String, AnalysisError> {
    if results.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut prompt = String::from(PROMPT_PREAMBLE);
    for result in results {
        prompt.push_str(&format!(
            "Tweet: {}\nEmotion: {}\nDepression Analysis: {}\nConfidence Score: {}\n\n",
            result.text,
            result.emotion_label,
            result.severity_label,
            result.confidence_score()
        ));
    }
    prompt.push_str(PROMPT_INSTRUCTIONS);

    Ok(prompt)
}
