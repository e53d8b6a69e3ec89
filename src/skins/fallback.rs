//! Fixed-structure article rendering, used when no skin template is usable.

use crate::skins::template::escape_html;
use crate::skins::types::Article;

/// Render an article without a skin.
pub fn render_fallback(article: &Article) -> String {
    render_document(article, None)
}

/// Render without a skin, preceded by a visible diagnostic banner.
///
/// `diagnostic` is plain text and gets escaped.
pub fn render_with_banner(article: &Article, diagnostic: &str) -> String {
    render_document(article, Some(diagnostic))
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn render_document(article: &Article, diagnostic: Option<&str>) -> String {
    let title = escape_html(&article.title);
    let mut html = String::with_capacity(512 + article.content_html.len());

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n"
    ));

    if let Some(message) = diagnostic {
        html.push_str(&format!(
            "<h1 class=\"skin-error\">{}</h1>\n",
            escape_html(message)
        ));
    }

    html.push_str(&format!("<article>\n<h1>{title}</h1>\n"));
    if let Some(subtitle) = present(&article.subtitle) {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(subtitle)));
    }
    if let Some(published) = present(&article.publication_datetime) {
        html.push_str(&format!(
            "<div><strong>Published:</strong> {}</div>\n",
            escape_html(published)
        ));
    }
    if let Some(author) = present(&article.author) {
        html.push_str(&format!(
            "<div><strong>Author:</strong> {}</div>\n",
            escape_html(author)
        ));
    }
    if let Some(description) = present(&article.author_description) {
        html.push_str(&format!("<div><em>{}</em></div>\n", escape_html(description)));
    }
    if let Some(primary) = article.primary_tag() {
        html.push_str(&format!(
            "<div><strong>Primary Tag:</strong> <span class=\"primary-tag\" style=\"font-weight:bold;\">{}</span></div>\n",
            escape_html(primary)
        ));
    }
    let others = article.secondary_tags();
    if !others.is_empty() {
        html.push_str(&format!(
            "<div><strong>Other Tags:</strong> {}</div>\n",
            escape_html(&others.join(", "))
        ));
    }
    html.push_str(&format!("<div class=\"content\">{}</div>\n", article.content_html));

    html.push_str("</article>\n</body>\n</html>\n");
    html
}
