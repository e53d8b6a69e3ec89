//! Placeholder substitution for skin templates.
//!
//! Templates are plain text with a closed set of `{{name}}` placeholders.
//! This is find/replace over known names, not a template language: unknown
//! `{{...}}` sequences are left exactly as written.
//!
//! `content` is the only field inserted without HTML escaping.

use crate::skins::types::Article;

/// Every placeholder a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Title,
    Subtitle,
    Content,
    PublicationDatetime,
    Author,
    AuthorDescription,
    PrimaryTag,
    Tags,
}

/// How a value is inserted into the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escaping {
    Html,
    Raw,
}

impl Placeholder {
    pub const ALL: [Placeholder; 8] = [
        Placeholder::Title,
        Placeholder::Subtitle,
        Placeholder::Content,
        Placeholder::PublicationDatetime,
        Placeholder::Author,
        Placeholder::AuthorDescription,
        Placeholder::PrimaryTag,
        Placeholder::Tags,
    ];

    /// Name between the braces.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Title => "title",
            Placeholder::Subtitle => "subtitle",
            Placeholder::Content => "content",
            Placeholder::PublicationDatetime => "publication_datetime",
            Placeholder::Author => "author",
            Placeholder::AuthorDescription => "author_description",
            Placeholder::PrimaryTag => "primary_tag",
            Placeholder::Tags => "tags",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn escaping(self) -> Escaping {
        match self {
            Placeholder::Content => Escaping::Raw,
            _ => Escaping::Html,
        }
    }

    /// Unescaped value for this placeholder.
    fn raw_value(self, article: &Article) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        match self {
            Placeholder::Title => article.title.clone(),
            Placeholder::Subtitle => text(&article.subtitle),
            Placeholder::Content => article.content_html.clone(),
            Placeholder::PublicationDatetime => text(&article.publication_datetime),
            Placeholder::Author => text(&article.author),
            Placeholder::AuthorDescription => text(&article.author_description),
            Placeholder::PrimaryTag => article.primary_tag().unwrap_or_default().to_string(),
            Placeholder::Tags => article.secondary_tags().join(", "),
        }
    }

    /// Value ready for insertion, escaped according to `escaping()`.
    pub fn value(self, article: &Article) -> String {
        let raw = self.raw_value(article);
        match self.escaping() {
            Escaping::Html => escape_html(&raw),
            Escaping::Raw => raw,
        }
    }
}

/// Escape text for HTML body and attribute contexts.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Substitute article fields into a template in a single left-to-right pass.
///
/// Inserted values are never rescanned, so a title containing `{{content}}`
/// stays literal text.
pub fn substitute(template: &str, article: &Article) -> String {
    let values: Vec<(Placeholder, String)> = Placeholder::ALL
        .into_iter()
        .map(|p| (p, p.value(article)))
        .collect();

    let mut out = String::with_capacity(template.len() + article.content_html.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let replacement = after_open.find("}}").and_then(|close| {
            let placeholder = Placeholder::from_name(&after_open[..close])?;
            let value = values
                .iter()
                .find(|(p, _)| *p == placeholder)
                .map(|(_, v)| v.as_str())?;
            Some((value, close + 2))
        });

        match replacement {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &after_open[consumed..];
            }
            None => {
                // Step past one brace only: `{{{title}}}` still holds `{{title}}`.
                out.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}
