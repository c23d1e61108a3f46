//! HTML to plain text for the extraction prompt.
//!
//! The model only ever sees text, so link targets and image sources are kept
//! as inline `[Link: ...]` and `[Image: ...]` markers right after the element
//! they belong to.

use scraper::{ElementRef, Html, Node};

/// Flattens an HTML document into plain text with link and image markers.
///
/// `<script>` and `<style>` subtrees contribute nothing.
pub fn flatten_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    flatten_element(&document.root_element(), &mut text);
    text
}

fn flatten_element(element: &ElementRef, out: &mut String) {
    let tag_name = element.value().name();
    if should_skip_element(tag_name) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    flatten_element(&child_ref, out);
                }
            }
            _ => {}
        }
    }

    match tag_name {
        "a" => {
            if let Some(href) = element.value().attr("href") {
                out.push_str(&format!(" [Link: {href}]"));
            }
        }
        "img" => {
            if let Some(src) = element.value().attr("src") {
                out.push_str(&format!(" [Image: {src}]"));
            }
        }
        _ => {}
    }
}

fn should_skip_element(tag_name: &str) -> bool {
    matches!(tag_name, "script" | "style")
}
