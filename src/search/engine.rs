//! Search engine entry point
//!
//! Ties filtering, ranking and fallback relaxation together behind one
//! call. The engine is synchronous and stateless across calls: it receives
//! a read-only inventory view, scans it a bounded number of times and
//! returns owned result records the caller may shape freely.

use super::fallback::{self, FallbackInfo};
use super::filters::{ActiveFilters, FilterKey, RangeParams};
use crate::inventory::Vehicle;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Results per page; matches cannot exceed this after truncation.
pub const RESULT_LIMIT: usize = 6;

/// One search invocation: named filters, raw range parameters, exclusions.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub filters: BTreeMap<FilterKey, String>,
    pub valormax: Option<String>,
    pub anomax: Option<String>,
    pub kmmax: Option<String>,
    pub ccmax: Option<String>,
    pub excluded_ids: HashSet<String>,
}

impl SearchRequest {
    /// Builder-style filter insertion.
    #[allow(dead_code)]
    pub fn with_filter(mut self, key: FilterKey, value: &str) -> Self {
        self.filters.insert(key, value.to_string());
        self
    }

    /// Active named filters: entries with a non-blank value.
    pub fn active_filters(&self) -> ActiveFilters {
        self.filters
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }

    /// Parsed range parameters; malformed ones are treated as absent.
    pub fn range_params(&self) -> RangeParams {
        RangeParams::parse(
            self.valormax.as_deref(),
            self.anomax.as_deref(),
            self.kmmax.as_deref(),
            self.ccmax.as_deref(),
        )
    }
}

/// Ranked search outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub vehicles: Vec<Vehicle>,
    /// Matches under the final (possibly relaxed) constraint set, before
    /// truncation.
    pub total_found: usize,
    /// Present only when the orchestrator had to relax something.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_info: Option<FallbackInfo>,
}

/// The search-with-fallback engine.
pub struct SearchEngine {
    limit: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine {
            limit: RESULT_LIMIT,
        }
    }

    /// Custom truncation limit, for callers embedding the engine.
    #[allow(dead_code)]
    pub fn with_limit(limit: usize) -> Self {
        SearchEngine { limit }
    }

    /// Execute a search over an inventory view.
    pub fn search(&self, vehicles: &[Vehicle], request: &SearchRequest) -> SearchResult {
        fallback::run(vehicles, request, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::FieldValue;

    fn vehicle(id: &str, modelo: &str, tipo: &str) -> Vehicle {
        Vehicle {
            id: Some(id.to_string()),
            tipo: Some(tipo.to_string()),
            modelo: Some(modelo.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_active_filters_skips_blank_values() {
        let request = SearchRequest::default()
            .with_filter(FilterKey::Marca, "fiat")
            .with_filter(FilterKey::Cor, "  ");
        let active = request.active_filters();
        assert!(active.contains_key(&FilterKey::Marca));
        assert!(!active.contains_key(&FilterKey::Cor));
    }

    #[test]
    fn test_search_truncates_to_engine_limit() {
        let inventory: Vec<Vehicle> = (0..8)
            .map(|i| vehicle(&i.to_string(), "Onix", "carro"))
            .collect();
        let request = SearchRequest::default().with_filter(FilterKey::Modelo, "onix");

        let result = SearchEngine::new().search(&inventory, &request);
        assert_eq!(result.vehicles.len(), RESULT_LIMIT);
        assert_eq!(result.total_found, 8);

        let result = SearchEngine::with_limit(2).search(&inventory, &request);
        assert_eq!(result.vehicles.len(), 2);
        assert_eq!(result.total_found, 8);
    }

    #[test]
    fn test_moto_exact_match_across_spacing() {
        // feed has the code glued together, query has the space
        let mut moto = vehicle("m1", "CG160", "moto");
        moto.cilindrada = Some(FieldValue::Int(160));
        let inventory = vec![moto, vehicle("c1", "Onix", "carro")];

        let request = SearchRequest::default()
            .with_filter(FilterKey::Modelo, "CG 160")
            .with_filter(FilterKey::Tipo, "moto");
        let result = SearchEngine::new().search(&inventory, &request);

        assert_eq!(result.total_found, 1);
        assert_eq!(result.vehicles[0].id.as_deref(), Some("m1"));
        assert!(result.fallback_info.is_none());
    }

    #[test]
    fn test_search_does_not_mutate_inventory() {
        let inventory = vec![vehicle("1", "Onix", "carro")];
        let before = inventory.clone();
        let request = SearchRequest::default().with_filter(FilterKey::Modelo, "onix");
        let _ = SearchEngine::new().search(&inventory, &request);
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_result_serialization_shape() {
        let inventory = vec![vehicle("1", "Onix", "carro")];
        let request = SearchRequest::default().with_filter(FilterKey::Modelo, "onix");
        let result = SearchEngine::new().search(&inventory, &request);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_found"], 1);
        // no relaxation → no fallback_info key at all
        assert!(json.get("fallback_info").is_none());
    }
}
