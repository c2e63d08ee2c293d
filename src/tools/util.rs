//! Utility functions for tools

use crate::inventory::Vehicle;
use crate::search::convert;

/// Format an amount the way Brazilian listings print it: dot thousands
/// separators, comma decimals ("59.990,00").
pub fn format_brl(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac:02}")
}

/// One-line description of a listing for terminal output.
pub fn vehicle_label(vehicle: &Vehicle) -> String {
    let mut parts: Vec<String> = Vec::new();

    let name: Vec<&str> = [
        vehicle.marca.as_deref(),
        vehicle.modelo.as_deref(),
        vehicle.versao.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if name.is_empty() {
        parts.push(
            vehicle
                .titulo
                .clone()
                .unwrap_or_else(|| "(sem descrição)".to_string()),
        );
    } else {
        parts.push(name.join(" "));
    }

    if let Some(categoria) = &vehicle.categoria {
        parts.push(format!("({categoria})"));
    }
    if let Some(ano) = convert::to_year(vehicle.ano.as_ref()) {
        parts.push(ano.to_string());
    }
    if let Some(km) = convert::to_odometer(vehicle.km.as_ref()) {
        parts.push(format!("{} km", format_brl(km as f64).trim_end_matches(",00")));
    }
    if let Some(preco) = convert::to_price(vehicle.preco.as_ref()) {
        parts.push(format!("R$ {}", format_brl(preco)));
    }
    if let Some(id) = &vehicle.id {
        parts.push(format!("[{id}]"));
    }

    parts.join(" · ")
}
