//! Stats tool implementation
//!
//! Distribution report over an inventory snapshot: kinds, categories split
//! by motorcycles vs cars, top brands and displacement buckets.

use crate::cli::StatsArgs;
use crate::error::AppError;
use crate::inventory::InventorySnapshot;
use crate::search::convert;
use serde::Serialize;
use std::collections::BTreeMap;

const UNKNOWN: &str = "indefinido";
const TOP_MARCAS: usize = 5;

#[derive(Debug, Default, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub por_tipo: BTreeMap<String, usize>,
    pub motos_por_categoria: BTreeMap<String, usize>,
    pub carros_por_categoria: BTreeMap<String, usize>,
    pub top_marcas: Vec<(String, usize)>,
    pub cilindradas_motos: BTreeMap<String, usize>,
}

/// Execute the stats command.
pub async fn execute_stats(args: StatsArgs) -> Result<String, AppError> {
    let snapshot = InventorySnapshot::load(&args.inventory).await?;
    let stats = compute_stats(&snapshot);

    if args.json {
        Ok(serde_json::to_string_pretty(&stats)?)
    } else {
        let mut out = String::new();
        if let Some(updated_at) = snapshot.updated_at_parsed() {
            out.push_str(&format!(
                "Snapshot from {}\n",
                updated_at.format("%Y-%m-%d %H:%M")
            ));
        }
        out.push_str(&format_stats(&stats));
        Ok(out)
    }
}

pub fn compute_stats(snapshot: &InventorySnapshot) -> InventoryStats {
    let mut stats = InventoryStats {
        total: snapshot.veiculos.len(),
        ..Default::default()
    };
    let mut marcas: BTreeMap<String, usize> = BTreeMap::new();

    for vehicle in &snapshot.veiculos {
        let tipo = vehicle
            .tipo
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());
        *stats.por_tipo.entry(tipo).or_default() += 1;

        let categoria = vehicle
            .categoria
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());
        if vehicle.is_moto() {
            *stats.motos_por_categoria.entry(categoria).or_default() += 1;
            if let Some(cc) = convert::to_displacement(vehicle.cilindrada.as_ref()) {
                *stats
                    .cilindradas_motos
                    .entry(displacement_bucket(cc).to_string())
                    .or_default() += 1;
            }
        } else {
            *stats.carros_por_categoria.entry(categoria).or_default() += 1;
        }

        let marca = vehicle
            .marca
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());
        *marcas.entry(marca).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = marcas.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_MARCAS);
    stats.top_marcas = ranked;

    stats
}

fn displacement_bucket(cc: f64) -> &'static str {
    if cc <= 125.0 {
        "até 125cc"
    } else if cc <= 250.0 {
        "126cc - 250cc"
    } else if cc <= 500.0 {
        "251cc - 500cc"
    } else if cc <= 1000.0 {
        "501cc - 1000cc"
    } else {
        "acima de 1000cc"
    }
}

fn format_stats(stats: &InventoryStats) -> String {
    let mut out = format!("Inventory: {} vehicle(s)\n", stats.total);

    out.push_str("\nBy kind:\n");
    for (tipo, count) in &stats.por_tipo {
        out.push_str(&format!("  • {tipo}: {count}\n"));
    }

    if !stats.motos_por_categoria.is_empty() {
        out.push_str("\nMotorcycles by category:\n");
        for (categoria, count) in &stats.motos_por_categoria {
            out.push_str(&format!("  • {categoria}: {count}\n"));
        }
    }

    if !stats.carros_por_categoria.is_empty() {
        out.push_str("\nCars by category:\n");
        for (categoria, count) in &stats.carros_por_categoria {
            out.push_str(&format!("  • {categoria}: {count}\n"));
        }
    }

    if !stats.cilindradas_motos.is_empty() {
        out.push_str("\nMotorcycle displacement:\n");
        for (faixa, count) in &stats.cilindradas_motos {
            out.push_str(&format!("  • {faixa}: {count}\n"));
        }
    }

    if !stats.top_marcas.is_empty() {
        out.push_str(&format!("\nTop {} brands:\n", stats.top_marcas.len()));
        for (marca, count) in &stats.top_marcas {
            out.push_str(&format!("  • {marca}: {count}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{FieldValue, Vehicle};
    use std::io::Write;

    fn moto(marca: &str, categoria: &str, cc: i64) -> Vehicle {
        Vehicle {
            tipo: Some("moto".to_string()),
            marca: Some(marca.to_string()),
            categoria: Some(categoria.to_string()),
            cilindrada: Some(FieldValue::Int(cc)),
            ..Default::default()
        }
    }

    #[test]
    fn test_displacement_buckets() {
        assert_eq!(displacement_bucket(110.0), "até 125cc");
        assert_eq!(displacement_bucket(125.0), "até 125cc");
        assert_eq!(displacement_bucket(160.0), "126cc - 250cc");
        assert_eq!(displacement_bucket(500.0), "251cc - 500cc");
        assert_eq!(displacement_bucket(650.0), "501cc - 1000cc");
        assert_eq!(displacement_bucket(1250.0), "acima de 1000cc");
    }

    #[test]
    fn test_compute_stats_splits_kinds() {
        let snapshot = InventorySnapshot {
            veiculos: vec![
                moto("Honda", "street", 160),
                moto("Honda", "trail", 300),
                Vehicle {
                    tipo: Some("carro".to_string()),
                    marca: Some("Fiat".to_string()),
                    categoria: Some("Hatch".to_string()),
                    ..Default::default()
                },
                Vehicle::default(),
            ],
            ..Default::default()
        };

        let stats = compute_stats(&snapshot);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.por_tipo.get("moto"), Some(&2));
        assert_eq!(stats.por_tipo.get("carro"), Some(&1));
        assert_eq!(stats.por_tipo.get(UNKNOWN), Some(&1));
        assert_eq!(stats.motos_por_categoria.get("street"), Some(&1));
        assert_eq!(stats.carros_por_categoria.get("Hatch"), Some(&1));
        assert_eq!(stats.cilindradas_motos.get("126cc - 250cc"), Some(&1));
        assert_eq!(stats.top_marcas[0], ("Honda".to_string(), 2));
    }

    #[test]
    fn test_top_marcas_capped() {
        let veiculos: Vec<Vehicle> = (0..8)
            .map(|i| Vehicle {
                marca: Some(format!("Marca{i}")),
                ..Default::default()
            })
            .collect();
        let stats = compute_stats(&InventorySnapshot {
            veiculos,
            ..Default::default()
        });
        assert_eq!(stats.top_marcas.len(), TOP_MARCAS);
    }

    #[tokio::test]
    async fn test_stats_end_to_end_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"veiculos":[{{"tipo":"moto","marca":"Honda","categoria":"street","cilindrada":160}}]}}"#
        )
        .unwrap();

        let output = execute_stats(StatsArgs {
            inventory: file.path().to_path_buf(),
            json: true,
        })
        .await
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total"], 1);
        assert_eq!(parsed["motos_por_categoria"]["street"], 1);
    }
}
