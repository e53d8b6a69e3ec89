//! Skin registry backed by the backend's skin list.
//!
//! # Responsibilities
//! - Fetch the current skin list (`GET /api/skins`)
//! - Resolve a skin id to its metadata
//!
//! # Design Decisions
//! - No cross-request cache: each render sees a freshly fetched list
//! - Resolution is a total function; duplicates resolve to the first listed skin

use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::skins::types::Skin;
use crate::upstream::{TransportError, UpstreamClient};

/// Backend path of the skin list.
pub const SKINS_ENDPOINT: &str = "skins";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("skin list request returned {status}")]
    Status { status: StatusCode },

    #[error("skin list is not a JSON array of skins: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Looks up skins through the backend API.
#[derive(Clone)]
pub struct SkinRegistry {
    upstream: UpstreamClient,
    timeout: Duration,
}

impl SkinRegistry {
    /// `timeout` is the listing budget, shorter than the gateway's.
    pub fn new(upstream: UpstreamClient, timeout: Duration) -> Self {
        Self { upstream, timeout }
    }

    pub async fn list_skins(&self) -> Result<Vec<Skin>, RegistryError> {
        let response = self.upstream.get(SKINS_ENDPOINT, self.timeout).await?;
        if !response.status.is_success() {
            return Err(RegistryError::Status {
                status: response.status,
            });
        }
        let skins: Vec<Skin> = serde_json::from_slice(&response.body)?;
        tracing::debug!(count = skins.len(), "Fetched skin list");
        Ok(skins)
    }

    /// Fetch the list and resolve `skin_id` in it.
    pub async fn resolve(&self, skin_id: &str) -> Result<Option<Skin>, RegistryError> {
        let skins = self.list_skins().await?;
        Ok(resolve(&skins, skin_id).cloned())
    }
}

/// First skin whose id equals `skin_id`, if any.
pub fn resolve<'a>(skins: &'a [Skin], skin_id: &str) -> Option<&'a Skin> {
    skins.iter().find(|s| s.id == skin_id)
}
