//! List tool implementation
//!
//! Category-grouped inventory listing. Vehicles without a category land in
//! a final "NÃO MAPEADOS" bucket; each row is the compact comma-separated
//! form consumed by the storefront layer (motorcycles carry displacement
//! where cars carry the engine code).

use crate::cli::ListArgs;
use crate::error::AppError;
use crate::inventory::{InventorySnapshot, Vehicle};
use std::collections::BTreeMap;
use tracing::info;

const UNMAPPED_BUCKET: &str = "NÃO MAPEADOS";

/// Execute the list command.
pub async fn execute_list(args: ListArgs) -> Result<String, AppError> {
    let snapshot = InventorySnapshot::load(&args.inventory).await?;

    let mut vehicles: Vec<&Vehicle> = snapshot.veiculos.iter().collect();
    if let Some(categoria) = &args.categoria {
        let needle = categoria.to_lowercase();
        vehicles.retain(|v| {
            v.categoria
                .as_deref()
                .map(|c| c.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
    }
    if let Some(tipo) = &args.tipo {
        let needle = tipo.to_lowercase();
        vehicles.retain(|v| {
            v.tipo
                .as_deref()
                .map(|t| t.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
    }
    info!("listing {} vehicle(s)", vehicles.len());

    let (grouped, unmapped) = group_by_categoria(&vehicles);

    if args.json {
        let mut object = serde_json::Map::new();
        for (categoria, rows) in &grouped {
            object.insert(categoria.clone(), serde_json::json!(rows));
        }
        if !unmapped.is_empty() {
            object.insert(UNMAPPED_BUCKET.to_string(), serde_json::json!(unmapped));
        }
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
            object,
        ))?)
    } else {
        let mut out = String::new();
        for (categoria, rows) in &grouped {
            out.push_str(&format!("{categoria}:\n"));
            for row in rows {
                out.push_str(&format!("  {row}\n"));
            }
        }
        if !unmapped.is_empty() {
            out.push_str(&format!("{UNMAPPED_BUCKET}:\n"));
            for row in &unmapped {
                out.push_str(&format!("  {row}\n"));
            }
        }
        if out.is_empty() {
            out.push_str("No vehicles to list.");
        }
        Ok(out)
    }
}

/// Alphabetical category buckets plus the uncategorized leftovers.
fn group_by_categoria(vehicles: &[&Vehicle]) -> (BTreeMap<String, Vec<String>>, Vec<String>) {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut unmapped: Vec<String> = Vec::new();

    for vehicle in vehicles {
        let row = format_vehicle_row(vehicle);
        match vehicle.categoria.as_deref() {
            Some(categoria) if !categoria.trim().is_empty() && categoria != "None" => {
                grouped.entry(categoria.to_string()).or_default().push(row);
            }
            _ => unmapped.push(row),
        }
    }

    (grouped, unmapped)
}

/// Compact row: id,tipo,marca,modelo,versao,cor,ano,km,combustivel,cambio,
/// then cilindrada for motorcycles or motor for everything else, portas,
/// preco. Absent values render empty.
pub fn format_vehicle_row(vehicle: &Vehicle) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let num = |value: &Option<crate::inventory::FieldValue>| {
        value.as_ref().map(|v| v.as_text()).unwrap_or_default()
    };

    let engine_column = if vehicle.is_moto() {
        num(&vehicle.cilindrada)
    } else {
        text(&vehicle.motor)
    };

    [
        text(&vehicle.id),
        text(&vehicle.tipo),
        text(&vehicle.marca),
        text(&vehicle.modelo),
        text(&vehicle.versao),
        text(&vehicle.cor),
        num(&vehicle.ano),
        num(&vehicle.km),
        text(&vehicle.combustivel),
        text(&vehicle.cambio),
        engine_column,
        num(&vehicle.portas),
        num(&vehicle.preco),
    ]
    .join(",")
}
