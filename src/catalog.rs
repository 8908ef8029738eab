//! The catalog facade consumed by the CLI and HTTP layers.
//!
//! A [`Catalog`] owns the read-only pool and the image probe. Open it once
//! at startup and share it (it is cheap to wrap in an `Arc`).

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::{Config, MAX_RESULT_LIMIT};
use crate::db;
use crate::details;
use crate::error::Result;
use crate::media::{DisabledImageProbe, HttpImageProbe, ImageProbe};
use crate::models::{CatalogObject, ObjectDetail, SearchParams};
use crate::search;

pub struct Catalog {
    pool: SqlitePool,
    probe: Arc<dyn ImageProbe>,
    result_limit: u32,
}

impl Catalog {
    /// Opens the database named in `config` and builds the configured probe.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        let probe: Arc<dyn ImageProbe> = if config.media.enabled {
            Arc::new(HttpImageProbe::new(&config.media)?)
        } else {
            Arc::new(DisabledImageProbe::new(&config.media))
        };
        Ok(Self::new(pool, probe, config.search.result_limit))
    }

    /// `result_limit` is clamped to `1..=1000`.
    pub fn new(pool: SqlitePool, probe: Arc<dyn ImageProbe>, result_limit: u32) -> Self {
        Self {
            pool,
            probe,
            result_limit: result_limit.clamp(1, MAX_RESULT_LIMIT),
        }
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<CatalogObject>> {
        search::search_objects(&self.pool, params, self.result_limit).await
    }

    /// `Ok(None)` means no such object.
    pub async fn object_detail(&self, object_id: i64) -> Result<Option<ObjectDetail>> {
        details::get_object_detail(&self.pool, self.probe.as_ref(), object_id).await
    }

    /// Confirms the store answers queries.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
