/// The extraction prompt template.
///
/// Loaded from `prompt.txt` at compile time. It carries three placeholders:
/// `{{language}}`, `{{link_hint}}` and `{{text}}`.
pub const EXTRACTION_PROMPT: &str = include_str!("prompt.txt");

/// Build the extraction prompt for one page.
///
/// `source_url` is shown to the model as an example of what suggestion links
/// look like on this site; raw pasted text has none.
pub fn build_extraction_prompt(text: &str, source_url: Option<&str>, language: &str) -> String {
    let language = match language.trim() {
        "" => "english",
        lang => lang,
    };
    let link_hint = match source_url {
        Some(url) => format!(" The links will look similar to {url}."),
        None => String::new(),
    };

    // Page text goes in last so placeholders inside it stay untouched.
    EXTRACTION_PROMPT
        .replace("{{language}}", language)
        .replace("{{link_hint}}", &link_hint)
        .replace("{{text}}", text)
}
