//! Search tool implementation
//!
//! Loads an inventory snapshot, runs the search-with-fallback engine and
//! renders the ranked results.

use super::util::vehicle_label;
use crate::cli::SearchArgs;
use crate::error::{validate_filter_value, AppError};
use crate::inventory::InventorySnapshot;
use crate::search::{FilterKey, SearchEngine, SearchRequest, SearchResult};
use tracing::{debug, info};

/// Execute the search command.
pub async fn execute_search(args: SearchArgs) -> Result<String, AppError> {
    validate_args(&args)?;
    let snapshot = InventorySnapshot::load(&args.inventory).await?;
    info!(
        "inventory loaded: {} vehicles from {}",
        snapshot.veiculos.len(),
        args.inventory.display()
    );

    let request = build_request(&args);
    debug!("active filters: {:?}", request.active_filters());

    let engine = SearchEngine::new();
    let mut result = engine.search(&snapshot.veiculos, &request);

    if args.single_photo {
        // shape the owned result records, never the snapshot
        for vehicle in &mut result.vehicles {
            vehicle.keep_first_photo();
        }
    }

    if args.json {
        Ok(serde_json::to_string_pretty(&result)?)
    } else {
        Ok(format_search_results(&result))
    }
}

fn validate_args(args: &SearchArgs) -> Result<(), AppError> {
    for (name, value) in filter_entries(args) {
        if let Some(value) = value {
            validate_filter_value(name.as_str(), value)?;
        }
    }
    Ok(())
}

/// Map CLI arguments onto a search request.
pub fn build_request(args: &SearchArgs) -> SearchRequest {
    let mut request = SearchRequest {
        valormax: args.valormax.clone(),
        anomax: args.anomax.clone(),
        kmmax: args.kmmax.clone(),
        ccmax: args.ccmax.clone(),
        excluded_ids: args.exclude.iter().cloned().collect(),
        ..Default::default()
    };

    for (key, value) in filter_entries(args) {
        if let Some(value) = value {
            request.filters.insert(key, value.clone());
        }
    }
    request
}

fn filter_entries(args: &SearchArgs) -> [(FilterKey, &Option<String>); 10] {
    [
        (FilterKey::Tipo, &args.tipo),
        (FilterKey::Modelo, &args.modelo),
        (FilterKey::Categoria, &args.categoria),
        (FilterKey::Marca, &args.marca),
        (FilterKey::Cor, &args.cor),
        (FilterKey::Combustivel, &args.combustivel),
        (FilterKey::Cambio, &args.cambio),
        (FilterKey::Motor, &args.motor),
        (FilterKey::Portas, &args.portas),
        (FilterKey::Opcionais, &args.opcionais),
    ]
}

/// Render a result set for the terminal.
pub fn format_search_results(result: &SearchResult) -> String {
    if result.vehicles.is_empty() {
        let mut out = String::from("No vehicles matched.");
        if let Some(info) = &result.fallback_info {
            out.push_str(&format!(
                "\nRelaxed filters: {}",
                info.removed_filters().join(", ")
            ));
        }
        return out;
    }

    let mut out = format!(
        "{} vehicle(s) matched, showing {}\n",
        result.total_found,
        result.vehicles.len()
    );
    if let Some(info) = &result.fallback_info {
        out.push_str(&format!(
            "Relaxed filters: {}\n",
            info.removed_filters().join(", ")
        ));
    }
    out.push('\n');
    for (i, vehicle) in result.vehicles.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, vehicle_label(vehicle)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_inventory(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    fn args(inventory: PathBuf) -> SearchArgs {
        SearchArgs {
            inventory,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_end_to_end() {
        let file = write_inventory(
            r#"{"veiculos":[
                {"id":"1","tipo":"carro","modelo":"Onix","categoria":"Hatch","preco":50000,"ano":2020},
                {"id":"2","tipo":"carro","modelo":"Onix","categoria":"Sedan","preco":80000,"ano":2022}
            ]}"#,
        );

        let mut a = args(file.path().to_path_buf());
        a.categoria = Some("Hatch".to_string());
        let output = execute_search(a).await.unwrap();

        assert!(output.contains("1 vehicle(s) matched"));
        assert!(output.contains("Onix"));
        assert!(!output.contains("Relaxed"));
    }

    #[tokio::test]
    async fn test_search_json_output() {
        let file = write_inventory(
            r#"{"veiculos":[{"id":"1","tipo":"carro","modelo":"Onix","categoria":"Hatch"}]}"#,
        );

        let mut a = args(file.path().to_path_buf());
        a.modelo = Some("onix".to_string());
        a.json = true;
        let output = execute_search(a).await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total_found"], 1);
        assert_eq!(parsed["vehicles"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_search_reports_relaxations() {
        let file = write_inventory(
            r#"{"veiculos":[{"id":"1","tipo":"carro","modelo":"Onix","categoria":"Hatch","cor":"prata"}]}"#,
        );

        let mut a = args(file.path().to_path_buf());
        a.modelo = Some("onix".to_string());
        a.cor = Some("roxo".to_string());
        let output = execute_search(a).await.unwrap();

        assert!(output.contains("Relaxed filters: cor"));
    }

    #[tokio::test]
    async fn test_single_photo_shaping() {
        let file = write_inventory(
            r#"{"veiculos":[{"id":"1","modelo":"Onix","fotos":["a.jpg","b.jpg","c.jpg"]}]}"#,
        );

        let mut a = args(file.path().to_path_buf());
        a.modelo = Some("onix".to_string());
        a.single_photo = true;
        a.json = true;
        let output = execute_search(a).await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["vehicles"][0]["fotos"], serde_json::json!(["a.jpg"]));
    }

    #[tokio::test]
    async fn test_oversized_filter_rejected() {
        let mut a = args(PathBuf::from("unused.json"));
        a.modelo = Some("x".repeat(600));
        let err = execute_search(a).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_inventory_file() {
        let a = args(PathBuf::from("/no/such/inventory.json"));
        let err = execute_search(a).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
