//! Static model lookup tables
//!
//! Process-wide read-only state, built lazily on first use and shared
//! without synchronization from then on.

pub mod cars;
pub mod motos;

/// Translate a model-filter value into a category, for model→category
/// degradation during fallback. Exact table hits are preferred over
/// containment scans so short numeric fragments ("500") cannot shadow a
/// precise motorcycle code ("CB 500").
pub fn category_for_model(modelo: &str) -> Option<String> {
    if let Some(category) = cars::exact_category_for(modelo, "") {
        return Some(category);
    }
    if let Some(category) = motos::category_for(modelo) {
        return Some(category.to_string());
    }
    cars::category_for(modelo, "")
}
