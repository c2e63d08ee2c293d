//! Fallback orchestration
//!
//! When the exact query yields nothing, constraints are relaxed one at a
//! time in a fixed priority order, least negotiable last, re-testing after
//! every relaxation. Relaxing a less important filter before checking
//! whether a more important one is actually blocking would discard user
//! intent, so ceilings are only dropped when no candidate under the named
//! filters could satisfy them.
//!
//! `categoria` closes the sequence and is never removed: a search that
//! reaches it without results simply returns empty.

use super::engine::{SearchRequest, SearchResult};
use super::filters::{self, ActiveFilters, FilterKey, RangeParams};
use super::ranking;
use crate::catalog;
use crate::inventory::Vehicle;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// The two relaxable range ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeilingKey {
    KmMax,
    AnoMax,
}

impl CeilingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CeilingKey::KmMax => "kmmax",
            CeilingKey::AnoMax => "anomax",
        }
    }
}

/// One step of the relaxation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStep {
    Filter(FilterKey),
    Ceiling(CeilingKey),
}

/// Relaxation order, least important first. `categoria` is terminal.
pub const FALLBACK_PRIORITY: [FallbackStep; 11] = [
    FallbackStep::Filter(FilterKey::Motor),
    FallbackStep::Filter(FilterKey::Portas),
    FallbackStep::Filter(FilterKey::Cor),
    FallbackStep::Filter(FilterKey::Combustivel),
    FallbackStep::Filter(FilterKey::Opcionais),
    FallbackStep::Filter(FilterKey::Cambio),
    FallbackStep::Ceiling(CeilingKey::KmMax),
    FallbackStep::Ceiling(CeilingKey::AnoMax),
    FallbackStep::Filter(FilterKey::Modelo),
    FallbackStep::Filter(FilterKey::Marca),
    FallbackStep::Filter(FilterKey::Categoria),
];

/// One recorded relaxation: a filter dropped outright, or transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Relaxation {
    Removed { filter: String },
    Substituted {
        from: String,
        to: String,
        value: String,
    },
}

/// Ordered log of everything the orchestrator relaxed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FallbackInfo {
    pub relaxations: Vec<Relaxation>,
}

impl FallbackInfo {
    /// Names of the relaxed filters, in relaxation order.
    pub fn removed_filters(&self) -> Vec<&str> {
        self.relaxations
            .iter()
            .map(|r| match r {
                Relaxation::Removed { filter } => filter.as_str(),
                Relaxation::Substituted { from, .. } => from.as_str(),
            })
            .collect()
    }
}

/// Run the search with progressive relaxation.
pub fn run(vehicles: &[Vehicle], request: &SearchRequest, limit: usize) -> SearchResult {
    let mut filters = request.active_filters();
    let mut ranges = request.range_params();
    let excluded = &request.excluded_ids;

    if let Some(result) = evaluate(vehicles, &filters, &ranges, excluded, limit, &[]) {
        return result;
    }

    let mut relaxations: Vec<Relaxation> = Vec::new();

    for step in FALLBACK_PRIORITY {
        match step {
            FallbackStep::Filter(FilterKey::Categoria) => break,
            FallbackStep::Ceiling(key) => {
                if !relax_ceiling(vehicles, &filters, &mut ranges, excluded, key) {
                    continue;
                }
                relaxations.push(Relaxation::Removed {
                    filter: key.as_str().to_string(),
                });
            }
            FallbackStep::Filter(FilterKey::Modelo) => {
                let value = match filters.remove(&FilterKey::Modelo) {
                    Some(value) => value,
                    None => continue,
                };
                match substitute_categoria(&filters, &value) {
                    Some(categorias) => {
                        debug!("substituting modelo '{value}' with categoria '{categorias}'");
                        filters.insert(FilterKey::Categoria, categorias.clone());
                        relaxations.push(Relaxation::Substituted {
                            from: "modelo".to_string(),
                            to: "categoria".to_string(),
                            value: categorias,
                        });
                    }
                    None => {
                        debug!("dropping filter modelo");
                        relaxations.push(Relaxation::Removed {
                            filter: "modelo".to_string(),
                        });
                    }
                }
            }
            FallbackStep::Filter(key) => {
                if filters.remove(&key).is_none() {
                    continue;
                }
                debug!("dropping filter {key}");
                relaxations.push(Relaxation::Removed {
                    filter: key.as_str().to_string(),
                });
            }
        }

        if let Some(result) = evaluate(vehicles, &filters, &ranges, excluded, limit, &relaxations)
        {
            return result;
        }
    }

    // exhaustion: every relaxable constraint visited, still nothing
    SearchResult {
        vehicles: Vec::new(),
        total_found: 0,
        fallback_info: if relaxations.is_empty() {
            None
        } else {
            Some(FallbackInfo { relaxations })
        },
    }
}

/// Filter, exclude, rank and truncate under the given constraint set.
/// `None` when the constraint set matches nothing.
fn evaluate(
    vehicles: &[Vehicle],
    filters: &ActiveFilters,
    ranges: &RangeParams,
    excluded: &HashSet<String>,
    limit: usize,
    relaxations: &[Relaxation],
) -> Option<SearchResult> {
    let mut candidates = filters::apply(vehicles.iter(), filters);
    candidates.retain(|v| filters::passes_ceilings(v, ranges));
    candidates.retain(|v| match v.id.as_deref() {
        Some(id) => !excluded.contains(id),
        None => true,
    });
    if candidates.is_empty() {
        return None;
    }

    let total_found = candidates.len();
    ranking::rank(&mut candidates, ranking::mode_for(ranges));
    let selected: Vec<Vehicle> = candidates.into_iter().take(limit).cloned().collect();

    Some(SearchResult {
        vehicles: selected,
        total_found,
        fallback_info: if relaxations.is_empty() {
            None
        } else {
            Some(FallbackInfo {
                relaxations: relaxations.to_vec(),
            })
        },
    })
}

/// Drop the ceiling only when it is the blocker: when no vehicle passing
/// the named filters (ceilings ignored) could satisfy it. Returns whether
/// the ceiling was dropped.
fn relax_ceiling(
    vehicles: &[Vehicle],
    filters: &ActiveFilters,
    ranges: &mut RangeParams,
    excluded: &HashSet<String>,
    key: CeilingKey,
) -> bool {
    let active = match key {
        CeilingKey::KmMax => ranges.kmmax.is_some(),
        CeilingKey::AnoMax => ranges.anomax.is_some(),
    };
    if !active {
        return false;
    }

    let this_ceiling_only = match key {
        CeilingKey::KmMax => RangeParams {
            kmmax: ranges.kmmax,
            ..Default::default()
        },
        CeilingKey::AnoMax => RangeParams {
            anomax: ranges.anomax,
            ..Default::default()
        },
    };

    let satisfiable = filters::apply(vehicles.iter(), filters)
        .into_iter()
        .filter(|v| match v.id.as_deref() {
            Some(id) => !excluded.contains(id),
            None => true,
        })
        .any(|v| filters::passes_ceilings(v, &this_ceiling_only));

    if satisfiable {
        debug!("ceiling {} is not blocking, kept", key.as_str());
        return false;
    }

    debug!("dropping ceiling {}", key.as_str());
    match key {
        CeilingKey::KmMax => ranges.clear_kmmax(),
        CeilingKey::AnoMax => ranges.clear_anomax(),
    }
    true
}

/// Model→category degradation: only when no `categoria` filter is active,
/// and only if at least one alternative resolves through the catalog.
fn substitute_categoria(filters: &ActiveFilters, modelo_value: &str) -> Option<String> {
    if filters.contains_key(&FilterKey::Categoria) {
        return None;
    }
    let mut categorias: Vec<String> = Vec::new();
    for alt in filters::split_alternatives(modelo_value) {
        if let Some(categoria) = catalog::category_for_model(alt) {
            if !categorias.contains(&categoria) {
                categorias.push(categoria);
            }
        }
    }
    if categorias.is_empty() {
        None
    } else {
        Some(categorias.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::FieldValue;

    fn vehicle(id: &str, modelo: &str, categoria: &str, preco: i64, ano: i64) -> Vehicle {
        Vehicle {
            id: Some(id.to_string()),
            tipo: Some("carro".to_string()),
            modelo: Some(modelo.to_string()),
            categoria: Some(categoria.to_string()),
            preco: Some(FieldValue::Int(preco)),
            ano: Some(FieldValue::Int(ano)),
            ..Default::default()
        }
    }

    fn request() -> SearchRequest {
        SearchRequest::default()
    }

    #[test]
    fn test_satisfiable_query_has_no_relaxations() {
        let inventory = vec![
            vehicle("1", "Onix", "Hatch", 50000, 2020),
            vehicle("2", "Onix", "Sedan", 80000, 2022),
        ];
        let req = request().with_filter(FilterKey::Categoria, "Hatch");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        assert_eq!(result.vehicles[0].id.as_deref(), Some("1"));
        assert!(result.fallback_info.is_none());
    }

    #[test]
    fn test_categoria_is_never_relaxed() {
        let inventory = vec![
            vehicle("1", "Onix", "Hatch", 50000, 2020),
            vehicle("2", "Onix", "Sedan", 80000, 2022),
        ];
        let req = request().with_filter(FilterKey::Categoria, "SUV");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 0);
        assert!(result.vehicles.is_empty());
        // only categoria was active, and categoria is not relaxable
        assert!(result.fallback_info.is_none());
    }

    #[test]
    fn test_least_important_filter_dropped_first() {
        let inventory = vec![vehicle("1", "Onix", "Hatch", 50000, 2020)];
        let req = request()
            .with_filter(FilterKey::Modelo, "onix")
            .with_filter(FilterKey::Cor, "roxo");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        let info = result.fallback_info.unwrap();
        assert_eq!(info.removed_filters(), vec!["cor"]);
    }

    #[test]
    fn test_modelo_substituted_by_categoria() {
        // no "celta" in stock, but celta maps to Hatch and a hatch exists
        let inventory = vec![vehicle("1", "Gol", "Hatch", 40000, 2018)];
        let req = request().with_filter(FilterKey::Modelo, "celta");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        let info = result.fallback_info.unwrap();
        assert_eq!(
            info.relaxations,
            vec![Relaxation::Substituted {
                from: "modelo".to_string(),
                to: "categoria".to_string(),
                value: "Hatch".to_string(),
            }]
        );
    }

    #[test]
    fn test_modelo_dropped_when_categoria_already_active() {
        let inventory = vec![vehicle("1", "Gol", "Hatch", 40000, 2018)];
        let req = request()
            .with_filter(FilterKey::Modelo, "celta")
            .with_filter(FilterKey::Categoria, "Hatch");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        let info = result.fallback_info.unwrap();
        assert_eq!(info.removed_filters(), vec!["modelo"]);
    }

    #[test]
    fn test_modelo_dropped_when_lookup_fails() {
        let inventory = vec![vehicle("1", "Gol", "Hatch", 40000, 2018)];
        let req = request().with_filter(FilterKey::Modelo, "zeppelin");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        let info = result.fallback_info.unwrap();
        assert_eq!(
            info.relaxations,
            vec![Relaxation::Removed {
                filter: "modelo".to_string()
            }]
        );
    }

    #[test]
    fn test_blocking_ceiling_dropped_other_kept() {
        let mut v = vehicle("1", "Onix", "Hatch", 50000, 2022);
        v.km = Some(FieldValue::Int(30000));
        let inventory = vec![v];

        // anomax blocks (everything is newer); kmmax is satisfiable
        let mut req = request();
        req.anomax = Some("2020".to_string());
        req.kmmax = Some("100000".to_string());
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        let info = result.fallback_info.unwrap();
        assert_eq!(info.removed_filters(), vec!["anomax"]);
    }

    #[test]
    fn test_valormax_never_excludes() {
        // every listing is above the ceiling, results still come back,
        // closest first
        let inventory = vec![
            vehicle("1", "Onix", "Hatch", 90000, 2020),
            vehicle("2", "Onix", "Hatch", 60000, 2020),
        ];
        let mut req = request();
        req.valormax = Some("30000".to_string());
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 2);
        assert_eq!(result.vehicles[0].id.as_deref(), Some("2"));
        assert!(result.fallback_info.is_none());
    }

    #[test]
    fn test_anomax_excludes_until_relaxed() {
        let inventory = vec![vehicle("1", "Onix", "Hatch", 50000, 2022)];
        let mut req = request();
        req.anomax = Some("2020".to_string());
        let result = run(&inventory, &req, 6);

        // orchestrator relaxed the blocking ceiling to produce results
        assert_eq!(result.total_found, 1);
        assert_eq!(
            result.fallback_info.unwrap().removed_filters(),
            vec!["anomax"]
        );
    }

    #[test]
    fn test_excluded_ids_stay_excluded_through_relaxation() {
        let inventory = vec![
            vehicle("1", "Onix", "Hatch", 50000, 2020),
            vehicle("2", "Onix", "Hatch", 60000, 2020),
        ];
        let mut req = request().with_filter(FilterKey::Cor, "roxo");
        req.excluded_ids.insert("1".to_string());
        let result = run(&inventory, &req, 6);

        assert_eq!(result.total_found, 1);
        assert_eq!(result.vehicles[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_truncation_and_total_found() {
        let inventory: Vec<Vehicle> = (0..10)
            .map(|i| vehicle(&i.to_string(), "Onix", "Hatch", 40000 + i, 2020))
            .collect();
        let req = request().with_filter(FilterKey::Categoria, "Hatch");
        let result = run(&inventory, &req, 6);

        assert_eq!(result.vehicles.len(), 6);
        assert_eq!(result.total_found, 10);
    }

    #[test]
    fn test_exhaustion_lists_every_relaxed_step_in_order() {
        // empty inventory: nothing can ever match, every active filter is
        // visited in priority order
        let req = request()
            .with_filter(FilterKey::Motor, "2.0")
            .with_filter(FilterKey::Cor, "prata")
            .with_filter(FilterKey::Marca, "fiat")
            .with_filter(FilterKey::Cambio, "manual");
        let result = run(&[], &req, 6);

        assert_eq!(result.total_found, 0);
        let info = result.fallback_info.unwrap();
        assert_eq!(
            info.removed_filters(),
            vec!["motor", "cor", "cambio", "marca"]
        );
    }

    #[test]
    fn test_terminates_on_pathological_query() {
        let req = request()
            .with_filter(FilterKey::Tipo, "nave")
            .with_filter(FilterKey::Categoria, "foguete");
        let result = run(&[], &req, 6);
        // tipo and categoria are both unrelaxable; clean empty result
        assert_eq!(result.total_found, 0);
        assert!(result.fallback_info.is_none());
    }
}
