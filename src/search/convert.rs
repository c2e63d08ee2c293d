//! Field converters for heterogeneous feed values
//!
//! Every converter is total: unparseable input yields `None`, never an
//! error. `None` is distinct from zero — zero is a valid price or year and
//! must not be confused with "unknown". Range filtering and ranking treat
//! `None` as "fails any ceiling" / "infinitely far from any target".

use crate::inventory::FieldValue;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_PRICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d,.]").unwrap());
static UNIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(cc|cm3|cilindradas?|litros?|l)\s*$").unwrap());

/// Sale price in currency units.
///
/// Numbers pass through; text is stripped of currency symbols, commas become
/// dots and every dot except the last is treated as a thousands separator
/// (`"R$ 59.990,00"` → 59990.0). The same rule applies whether the digits
/// arrived as `150` or `"150"`.
pub fn to_price(value: Option<&FieldValue>) -> Option<f64> {
    let value = value?;
    match value.as_f64() {
        Some(n) => Some(n),
        None => parse_decimal_text(&value.as_text()),
    }
}

/// Model year.
pub fn to_year(value: Option<&FieldValue>) -> Option<i32> {
    match value? {
        FieldValue::Int(n) => i32::try_from(*n).ok(),
        FieldValue::Float(n) if n.fract() == 0.0 => Some(*n as i32),
        FieldValue::Float(_) => None,
        // feeds pad years with newlines and control characters
        FieldValue::Text(s) => s
            .trim_matches(|c: char| c.is_whitespace() || c.is_control())
            .parse()
            .ok(),
    }
}

/// Odometer reading in km. Text may carry dot or comma thousands separators.
pub fn to_odometer(value: Option<&FieldValue>) -> Option<i64> {
    match value? {
        FieldValue::Int(n) => Some(*n),
        FieldValue::Float(n) => Some(*n as i64),
        FieldValue::Text(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '.' && *c != ',')
                .collect();
            cleaned.parse().ok()
        }
    }
}

/// Engine displacement in cc.
///
/// Values below 10 are read as liters and scaled to cc — no production
/// motorcycle has a sub-10 cc engine and no car a sub-10 L one. A domain
/// heuristic, not unit inference.
pub fn to_displacement(value: Option<&FieldValue>) -> Option<f64> {
    let value = value?;
    let raw = match value.as_f64() {
        Some(n) => n,
        None => {
            let text = value.as_text();
            let stripped = UNIT_SUFFIX.replace(text.trim(), "");
            parse_decimal_text(&stripped)?
        }
    };
    Some(liters_to_cc(raw))
}

/// The liters-to-cc scaling shared by field and range-parameter conversion.
pub fn liters_to_cc(value: f64) -> f64 {
    if value < 10.0 {
        value * 1000.0
    } else {
        value
    }
}

/// Locale-tolerant decimal parse: keeps digits, commas and dots, converts
/// commas to dots, then joins all dots but the last (thousands separators).
fn parse_decimal_text(text: &str) -> Option<f64> {
    let cleaned = NON_PRICE.replace_all(text, "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    let parts: Vec<&str> = cleaned.split('.').collect();
    if parts.len() > 2 {
        let joined = format!(
            "{}.{}",
            parts[..parts.len() - 1].concat(),
            parts[parts.len() - 1]
        );
        return joined.parse().ok();
    }
    cleaned.parse().ok()
}
