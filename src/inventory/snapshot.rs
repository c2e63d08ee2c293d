//! Inventory snapshot loading
//!
//! The aggregated inventory lives in a single JSON document: a `veiculos`
//! list plus bookkeeping metadata written by the ingestion run. Loading is
//! per-request; the engine never holds a snapshot across calls.

use super::Vehicle;
use crate::error::AppError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

const UPDATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One aggregated inventory file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub veiculos: Vec<Vehicle>,
    /// ISO timestamp of the ingestion run; kept as text so a malformed
    /// value never fails the whole load.
    #[serde(rename = "_updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "_total_count", default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(
        rename = "_sources_processed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sources_processed: Option<usize>,
}

impl InventorySnapshot {
    /// Read a snapshot file from disk. A missing file is NotFound (no data
    /// has been ingested yet), anything else a load failure.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let data = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("no inventory data at {}", path.display()))
            } else {
                AppError::InventoryLoadFailed(format!("{}: {}", path.display(), e))
            }
        })?;
        serde_json::from_str(&data).map_err(|e| {
            AppError::InventoryParseFailed(format!("{}: {}", path.display(), e))
        })
    }

    /// Build a snapshot around freshly ingested vehicles, stamped now.
    pub fn from_vehicles(veiculos: Vec<Vehicle>, sources_processed: usize) -> Self {
        let total_count = Some(veiculos.len());
        InventorySnapshot {
            veiculos,
            updated_at: Some(
                chrono::Local::now()
                    .naive_local()
                    .format(UPDATED_AT_FORMAT)
                    .to_string(),
            ),
            total_count,
            sources_processed: Some(sources_processed),
        }
    }

    /// Parsed form of the ingestion timestamp, when present and well-formed.
    pub fn updated_at_parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.updated_at.as_deref()?;
        NaiveDateTime::parse_from_str(raw, UPDATED_AT_FORMAT).ok()
    }
}
