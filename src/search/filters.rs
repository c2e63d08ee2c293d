//! Named filter engine and range ceilings
//!
//! Filters narrow the candidate set as a sequential AND; each filter value
//! is a comma-separated list of alternatives combined as OR. Three behavior
//! classes exist: matcher-driven multi-field text (`modelo`), matcher-driven
//! single-field text, and tight-normalized identity.
//!
//! Of the four range parameters only `anomax` and `kmmax` exclude records;
//! `valormax` and `ccmax` never filter — they pick the ranking order. A
//! buyer with a price ceiling still wants the closest listings over an empty
//! page.

use super::convert;
use super::matcher::{self, MatchPolicy};
use super::normalize;
use crate::inventory::Vehicle;
use std::collections::BTreeMap;

/// The named filters a query may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Tipo,
    Modelo,
    Categoria,
    Cambio,
    Opcionais,
    Marca,
    Cor,
    Combustivel,
    Motor,
    Portas,
}

impl FilterKey {
    #[allow(dead_code)]
    pub const ALL: [FilterKey; 10] = [
        FilterKey::Tipo,
        FilterKey::Modelo,
        FilterKey::Categoria,
        FilterKey::Cambio,
        FilterKey::Opcionais,
        FilterKey::Marca,
        FilterKey::Cor,
        FilterKey::Combustivel,
        FilterKey::Motor,
        FilterKey::Portas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Tipo => "tipo",
            FilterKey::Modelo => "modelo",
            FilterKey::Categoria => "categoria",
            FilterKey::Cambio => "cambio",
            FilterKey::Opcionais => "opcionais",
            FilterKey::Marca => "marca",
            FilterKey::Cor => "cor",
            FilterKey::Combustivel => "combustivel",
            FilterKey::Motor => "motor",
            FilterKey::Portas => "portas",
        }
    }

    #[allow(dead_code)]
    pub fn parse(name: &str) -> Option<FilterKey> {
        FilterKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == name.to_lowercase())
    }
}

impl std::fmt::Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The currently-active named filters. BTreeMap keeps application order
/// deterministic; the intersection result does not depend on it.
pub type ActiveFilters = BTreeMap<FilterKey, String>;

/// Split a filter value into its OR alternatives.
pub fn split_alternatives(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .collect()
}

/// Apply every active filter in turn.
pub fn apply<'a, I>(vehicles: I, filters: &ActiveFilters) -> Vec<&'a Vehicle>
where
    I: IntoIterator<Item = &'a Vehicle>,
{
    let mut current: Vec<&Vehicle> = vehicles.into_iter().collect();
    for (key, value) in filters {
        current.retain(|v| vehicle_passes(v, *key, value));
    }
    current
}

/// Whether one vehicle satisfies one filter. An empty value is a no-op.
pub fn vehicle_passes(vehicle: &Vehicle, key: FilterKey, value: &str) -> bool {
    let alternatives = split_alternatives(value);
    if alternatives.is_empty() {
        return true;
    }
    match key {
        FilterKey::Modelo => {
            let fields = [
                vehicle.modelo.as_deref(),
                vehicle.titulo.as_deref(),
                vehicle.versao.as_deref(),
            ];
            let policy = MatchPolicy::for_kind(vehicle.tipo.as_deref());
            alternatives.iter().any(|alt| {
                let words = normalize::loose_words(alt);
                fields
                    .iter()
                    .flatten()
                    .any(|field| matcher::match_query(&words, field, policy).matched)
            })
        }
        FilterKey::Cor | FilterKey::Categoria | FilterKey::Opcionais | FilterKey::Combustivel => {
            let field = match text_field(vehicle, key) {
                Some(f) => f,
                None => return false,
            };
            let policy = MatchPolicy::for_kind(vehicle.tipo.as_deref());
            alternatives.iter().any(|alt| {
                let words = normalize::loose_words(alt);
                matcher::match_query(&words, &field, policy).matched
            })
        }
        _ => {
            let field = match text_field(vehicle, key) {
                Some(f) => normalize::tight(&f),
                None => return false,
            };
            if field.is_empty() {
                return false;
            }
            alternatives
                .iter()
                .any(|alt| normalize::tight(alt) == field)
        }
    }
}

/// Single-field textual view of a vehicle attribute.
fn text_field(vehicle: &Vehicle, key: FilterKey) -> Option<String> {
    match key {
        FilterKey::Tipo => vehicle.tipo.clone(),
        FilterKey::Modelo => vehicle.modelo.clone(),
        FilterKey::Categoria => vehicle.categoria.clone(),
        FilterKey::Cambio => vehicle.cambio.clone(),
        FilterKey::Opcionais => vehicle.opcionais.clone(),
        FilterKey::Marca => vehicle.marca.clone(),
        FilterKey::Cor => vehicle.cor.clone(),
        FilterKey::Combustivel => vehicle.combustivel.clone(),
        FilterKey::Motor => vehicle.motor.clone(),
        FilterKey::Portas => vehicle.portas.as_ref().map(|p| p.as_text()),
    }
}

/// Parsed range parameters. Each raw value may list several candidates; the
/// most permissive (maximum) wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeParams {
    pub valormax: Option<f64>,
    pub anomax: Option<i32>,
    pub kmmax: Option<i64>,
    pub ccmax: Option<f64>,
}

impl RangeParams {
    /// Parse the raw comma-separated parameter strings. Malformed pieces are
    /// skipped; a parameter with no parseable piece is treated as absent.
    pub fn parse(
        valormax: Option<&str>,
        anomax: Option<&str>,
        kmmax: Option<&str>,
        ccmax: Option<&str>,
    ) -> Self {
        RangeParams {
            valormax: max_piece(valormax, |s| convert::to_price(Some(&s.into()))),
            anomax: max_piece(anomax, |s| convert::to_year(Some(&s.into()))),
            kmmax: max_piece(kmmax, |s| convert::to_odometer(Some(&s.into()))),
            // max of the raw values first, liters→cc scaling after
            ccmax: max_piece(ccmax, |s| {
                s.trim().replace(',', ".").parse::<f64>().ok()
            })
            .map(convert::liters_to_cc),
        }
    }

    pub fn clear_anomax(&mut self) {
        self.anomax = None;
    }

    pub fn clear_kmmax(&mut self) {
        self.kmmax = None;
    }
}

fn max_piece<T, F>(raw: Option<&str>, parse: F) -> Option<T>
where
    T: PartialOrd + Copy,
    F: Fn(&str) -> Option<T>,
{
    let raw = raw?;
    split_alternatives(raw)
        .into_iter()
        .filter_map(|piece| parse(piece))
        .fold(None, |best: Option<T>, candidate| match best {
            Some(b) if b >= candidate => Some(b),
            _ => Some(candidate),
        })
}

/// The two hard ceilings. Missing or unparseable values fail an active
/// ceiling — they cannot prove they are under it.
pub fn passes_ceilings(vehicle: &Vehicle, ranges: &RangeParams) -> bool {
    if let Some(anomax) = ranges.anomax {
        match convert::to_year(vehicle.ano.as_ref()) {
            Some(year) if year <= anomax => {}
            _ => return false,
        }
    }
    if let Some(kmmax) = ranges.kmmax {
        match convert::to_odometer(vehicle.km.as_ref()) {
            Some(km) if km <= kmmax => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::FieldValue;

    fn car(modelo: &str, categoria: &str) -> Vehicle {
        Vehicle {
            tipo: Some("carro".to_string()),
            modelo: Some(modelo.to_string()),
            categoria: Some(categoria.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_filter_tight_comparison() {
        let mut v = car("Onix", "Hatch");
        v.cambio = Some("Automático".to_string());
        assert!(vehicle_passes(&v, FilterKey::Cambio, "automatico"));
        assert!(!vehicle_passes(&v, FilterKey::Cambio, "manual"));
        // OR across alternatives
        assert!(vehicle_passes(&v, FilterKey::Cambio, "manual,automatico"));
    }

    #[test]
    fn test_identity_filter_portas_numeric_or_text() {
        let mut v = car("Onix", "Hatch");
        v.portas = Some(FieldValue::Int(4));
        assert!(vehicle_passes(&v, FilterKey::Portas, "4"));
        v.portas = Some(FieldValue::from("4"));
        assert!(vehicle_passes(&v, FilterKey::Portas, "4"));
        assert!(!vehicle_passes(&v, FilterKey::Portas, "2"));
    }

    #[test]
    fn test_missing_field_never_satisfies_filter() {
        let v = Vehicle::default();
        assert!(!vehicle_passes(&v, FilterKey::Marca, "fiat"));
        assert!(!vehicle_passes(&v, FilterKey::Categoria, "Hatch"));
    }

    #[test]
    fn test_empty_value_is_noop() {
        let v = Vehicle::default();
        assert!(vehicle_passes(&v, FilterKey::Marca, ""));
        assert!(vehicle_passes(&v, FilterKey::Marca, " , ,"));
    }

    #[test]
    fn test_modelo_matches_across_three_fields() {
        let mut v = car("HB20", "Hatch");
        v.titulo = Some("Hyundai HB20 Comfort".to_string());
        v.versao = Some("1.0 Comfort Plus".to_string());
        assert!(vehicle_passes(&v, FilterKey::Modelo, "hb20"));
        assert!(vehicle_passes(&v, FilterKey::Modelo, "comfort plus"));
        assert!(!vehicle_passes(&v, FilterKey::Modelo, "fusca"));
    }

    #[test]
    fn test_apply_is_sequential_and() {
        let vehicles = vec![car("Onix", "Hatch"), car("Onix", "Sedan"), car("Gol", "Hatch")];
        let mut filters = ActiveFilters::new();
        filters.insert(FilterKey::Modelo, "onix".to_string());
        filters.insert(FilterKey::Categoria, "Hatch".to_string());
        let result = apply(vehicles.iter(), &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].categoria.as_deref(), Some("Hatch"));
    }

    #[test]
    fn test_additional_filter_never_grows_result() {
        let vehicles = vec![car("Onix", "Hatch"), car("Gol", "Hatch")];
        let mut filters = ActiveFilters::new();
        filters.insert(FilterKey::Categoria, "Hatch".to_string());
        let base = apply(vehicles.iter(), &filters).len();
        filters.insert(FilterKey::Marca, "chevrolet".to_string());
        let narrowed = apply(vehicles.iter(), &filters).len();
        assert!(narrowed <= base);
    }

    #[test]
    fn test_range_parse_picks_max() {
        let ranges = RangeParams::parse(Some("30000,50000"), Some("2018, 2020"), None, None);
        assert_eq!(ranges.valormax, Some(50000.0));
        assert_eq!(ranges.anomax, Some(2020));
        assert_eq!(ranges.kmmax, None);
    }

    #[test]
    fn test_ccmax_max_before_liters_scaling() {
        // max(1.0, 2000) = 2000, already cc — no scaling
        let ranges = RangeParams::parse(None, None, None, Some("1.0,2000"));
        assert_eq!(ranges.ccmax, Some(2000.0));
        // a lone liters value is scaled
        let ranges = RangeParams::parse(None, None, None, Some("1.0"));
        assert_eq!(ranges.ccmax, Some(1000.0));
    }

    #[test]
    fn test_malformed_range_piece_ignored() {
        let ranges = RangeParams::parse(Some("abc,50000"), Some("dois mil"), None, None);
        assert_eq!(ranges.valormax, Some(50000.0));
        assert_eq!(ranges.anomax, None);
    }

    #[test]
    fn test_ceilings_exclude_unparseable() {
        let mut v = car("Onix", "Hatch");
        v.ano = Some(FieldValue::from("2019"));
        v.km = Some(FieldValue::from("não informado"));

        let ranges = RangeParams {
            anomax: Some(2020),
            ..Default::default()
        };
        assert!(passes_ceilings(&v, &ranges));

        let ranges = RangeParams {
            anomax: Some(2018),
            ..Default::default()
        };
        assert!(!passes_ceilings(&v, &ranges));

        // unparseable km fails an active km ceiling
        let ranges = RangeParams {
            kmmax: Some(100_000),
            ..Default::default()
        };
        assert!(!passes_ceilings(&v, &ranges));

        // but no ceiling, no exclusion
        assert!(passes_ceilings(&v, &RangeParams::default()));
    }

    #[test]
    fn test_filter_key_roundtrip() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(FilterKey::parse("cores"), None);
    }
}
