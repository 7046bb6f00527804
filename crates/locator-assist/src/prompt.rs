//! Prompt text sent to the providers.

use crate::element_info::ElementInfo;

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

/// Completion-style prompt; the model continues after the trailing `XPath:`.
pub fn completion_prompt(info: &ElementInfo) -> String {
    let attributes = serde_json::to_string(&info.attributes).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Generate a unique XPath for this HTML element:\n\
         Tag: {tag}\n\
         ID: {id}\n\
         Classes: {classes}\n\
         Attributes: {attributes}\n\
         Text: {text}\n\
         \n\
         Rules:\n\
         1. XPath must be unique on the page\n\
         2. Prefer IDs if unique\n\
         3. Use stable attributes like data-testid, name, aria-label\n\
         4. Avoid position-based selectors\n\
         5. Return ONLY the XPath, no explanations\n\
         \n\
         XPath:",
        tag = info.tag_name,
        id = or_none(info.id.as_deref()),
        classes = or_none(info.class_name.as_deref()),
        text = or_none(info.text_content.as_deref()),
    )
}

/// One-line chat prompt.
pub fn chat_prompt(info: &ElementInfo) -> String {
    format!(
        "Generate a unique XPath for: tag={}, id={}, classes={}. Return only XPath.",
        info.tag_name,
        or_none(info.id.as_deref()),
        or_none(info.class_name.as_deref()),
    )
}
