//! Thumbnail existence checks against the external media service.
//!
//! A probe answers one question: does a thumbnail exist for this object?
//! Any failure (timeout, transport error, non-success status) counts as
//! "no image" and is never surfaced to the caller.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::MediaConfig;
use crate::error::{CatalogError, Result};

#[async_trait]
pub trait ImageProbe: Send + Sync {
    /// Deterministic thumbnail URL for `object_id`.
    fn thumbnail_url(&self, object_id: i64) -> String;

    /// Whether the thumbnail resolves. Never fails.
    async fn has_image(&self, object_id: i64) -> bool;
}

/// Probes `{base_url}/thumbnail/{collection}/obj/{id}` over HTTP.
pub struct HttpImageProbe {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

impl HttpImageProbe {
    pub fn new(config: &MediaConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<()> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::ImageStatus(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    fn thumbnail_url(&self, object_id: i64) -> String {
        thumbnail_url(&self.base_url, &self.collection, object_id)
    }

    async fn has_image(&self, object_id: i64) -> bool {
        let url = self.thumbnail_url(object_id);
        match self.fetch(&url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(object_id, %url, error = %e, "no thumbnail");
                false
            }
        }
    }
}

fn thumbnail_url(base_url: &str, collection: &str, object_id: i64) -> String {
    format!(
        "{}/thumbnail/{}/obj/{}",
        base_url.trim_end_matches('/'),
        collection,
        object_id
    )
}

/// Probe used when `[media].enabled = false`: never touches the network.
///
/// Its URL follows the configured pattern, but since every object reports no
/// image, detail records never carry it.
pub struct DisabledImageProbe {
    base_url: String,
    collection: String,
}

impl DisabledImageProbe {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            collection: config.collection.clone(),
        }
    }
}

#[async_trait]
impl ImageProbe for DisabledImageProbe {
    fn thumbnail_url(&self, object_id: i64) -> String {
        thumbnail_url(&self.base_url, &self.collection, object_id)
    }

    async fn has_image(&self, _object_id: i64) -> bool {
        false
    }
}
