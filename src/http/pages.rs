//! Article page assembly.
//!
//! Fetches an article and the skin list from the backend, resolves the
//! article's skin and hands both to the renderer. Skin problems never fail
//! the page; only a missing article does.

use axum::http::StatusCode;
use axum::response::Html;
use std::time::Duration;

use crate::config::BenderConfig;
use crate::skins::template::escape_html;
use crate::skins::{Article, SkinRegistry, SkinRenderer};
use crate::upstream::UpstreamClient;

/// Everything needed to turn an article id into a page.
#[derive(Clone)]
pub struct ArticlePages {
    upstream: UpstreamClient,
    registry: SkinRegistry,
    renderer: SkinRenderer,
    list_timeout: Duration,
}

impl ArticlePages {
    pub fn new(upstream: UpstreamClient, renderer: SkinRenderer, list_timeout: Duration) -> Self {
        Self {
            registry: SkinRegistry::new(upstream.clone(), list_timeout),
            upstream,
            renderer,
            list_timeout,
        }
    }

    pub fn from_config(upstream: UpstreamClient, config: &BenderConfig) -> Self {
        Self::new(
            upstream,
            SkinRenderer::new(&config.templates),
            config.timeouts.list(),
        )
    }

    /// Render the page for `article_id`.
    pub async fn article_page(&self, article_id: &str) -> (StatusCode, Html<String>) {
        if !is_valid_id(article_id) {
            return not_found();
        }

        let response = match self
            .upstream
            .get(&format!("articles/{article_id}"), self.list_timeout)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(article_id, error = %e, code = e.code(), "Article fetch failed");
                return (
                    StatusCode::BAD_GATEWAY,
                    message_page("Article could not be loaded."),
                );
            }
        };

        if !response.status.is_success() {
            tracing::debug!(article_id, status = response.status.as_u16(), "Backend has no article");
            return not_found();
        }

        let article: Article = match serde_json::from_slice(&response.body) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(article_id, error = %e, "Backend article payload unusable");
                return not_found();
            }
        };

        let skin = match article.skin_id.as_deref() {
            Some(skin_id) => match self.registry.resolve(skin_id).await {
                Ok(skin) => skin,
                Err(e) => {
                    tracing::warn!(article_id, skin_id, error = %e, "Skin list unavailable");
                    None
                }
            },
            None => None,
        };

        let html = self.renderer.render(&article, skin.as_ref()).await;
        (StatusCode::OK, Html(html))
    }
}

/// Ids are backend row ids; anything else could reshape the upstream URL.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, message_page("Article not found."))
}

fn message_page(message: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{m}</title></head>\n<body><p>{m}</p></body>\n</html>\n",
        m = escape_html(message)
    ))
}
