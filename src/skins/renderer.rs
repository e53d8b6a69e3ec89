//! Skin template rendering.
//!
//! # Responsibilities
//! - Locate and read the resolved skin's template
//! - Substitute article fields into it
//! - Fall back to the fixed layout (with a diagnostic banner) when the skin or
//!   its template is unavailable
//!
//! # Design Decisions
//! - `render` never fails: every path ends in HTML
//! - Missing skin and unreadable template render identically but are logged
//!   and counted separately

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::TemplateConfig;
use crate::observability::metrics;
use crate::skins::fallback;
use crate::skins::template::substitute;
use crate::skins::types::{Article, Skin};

/// Why a skin template could not be used.
#[derive(Debug, Error)]
pub enum TemplateUnavailable {
    #[error("no skin found for id {}", .skin_id.as_deref().unwrap_or("<none>"))]
    MissingSkin { skin_id: Option<String> },

    #[error("cannot read template '{path}': {source}")]
    UnreadableTemplate {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateUnavailable {
    /// Metric label for this cause.
    pub fn outcome(&self) -> &'static str {
        match self {
            TemplateUnavailable::MissingSkin { .. } => metrics::RENDER_MISSING_SKIN,
            TemplateUnavailable::UnreadableTemplate { .. } => metrics::RENDER_UNREADABLE_TEMPLATE,
        }
    }

    /// Text of the visible banner; names the template path that failed.
    pub fn banner(&self) -> String {
        match self {
            TemplateUnavailable::MissingSkin { skin_id } => format!(
                "ERROR FINDING SKIN FOR ARTICLE (skin id: {})",
                skin_id.as_deref().unwrap_or("none")
            ),
            TemplateUnavailable::UnreadableTemplate { path, .. } => {
                format!("ERROR FINDING SKIN FOR ARTICLE {path}")
            }
        }
    }
}

/// Renders articles through skin templates on disk.
#[derive(Debug, Clone)]
pub struct SkinRenderer {
    template_root: PathBuf,
}

impl SkinRenderer {
    pub fn new(config: &TemplateConfig) -> Self {
        Self {
            template_root: config.root.clone(),
        }
    }

    /// Filesystem location of a skin's template.
    pub fn template_location(&self, skin: &Skin) -> PathBuf {
        let path = Path::new(&skin.template_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.template_root.join(path)
        }
    }

    async fn load_template(&self, skin: &Skin) -> Result<String, TemplateUnavailable> {
        if skin.template_path.is_empty() {
            return Err(TemplateUnavailable::UnreadableTemplate {
                path: String::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "skin has no template path",
                ),
            });
        }
        tokio::fs::read_to_string(self.template_location(skin))
            .await
            .map_err(|source| TemplateUnavailable::UnreadableTemplate {
                path: skin.template_path.clone(),
                source,
            })
    }

    /// Render `article` with its resolved skin, or the fallback layout.
    pub async fn render(&self, article: &Article, skin: Option<&Skin>) -> String {
        let template = match skin {
            Some(skin) => self.load_template(skin).await,
            None => Err(TemplateUnavailable::MissingSkin {
                skin_id: article.skin_id.clone(),
            }),
        };

        match template {
            Ok(template) => {
                metrics::record_render(metrics::RENDER_SKIN);
                substitute(&template, article)
            }
            Err(cause) => {
                tracing::warn!(
                    article_id = %article.id,
                    outcome = cause.outcome(),
                    error = %cause,
                    "Rendering article without skin"
                );
                metrics::record_render(cause.outcome());
                fallback::render_with_banner(article, &cause.banner())
            }
        }
    }
}
