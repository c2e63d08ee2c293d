//! Ingest tool implementation
//!
//! Runs the adapter registry over one raw feed payload and prints the
//! resulting snapshot document. Fetching and scheduling live upstream; this
//! tool starts from a payload already on disk.

use crate::cli::IngestArgs;
use crate::error::AppError;
use crate::inventory::{AdapterRegistry, InventorySnapshot};
use tracing::info;

/// Execute the ingest command.
pub async fn execute_ingest(args: IngestArgs) -> Result<String, AppError> {
    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|e| AppError::InventoryLoadFailed(format!("{}: {}", args.input.display(), e)))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::IngestFailed(format!("payload is not JSON: {e}")))?;

    let source = args
        .source
        .clone()
        .unwrap_or_else(|| args.input.display().to_string());

    let registry = AdapterRegistry::with_defaults();
    let (adapter_name, vehicles) = registry.ingest(&payload, &source)?;
    info!(
        "{}: {} vehicle(s) normalized via {}",
        source,
        vehicles.len(),
        adapter_name
    );

    let snapshot = InventorySnapshot::from_vehicles(vehicles, 1);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}
