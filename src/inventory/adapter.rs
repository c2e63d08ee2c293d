//! Ingestion seam: raw feed payloads → normalized vehicles
//!
//! Source feeds disagree about structure and key names. Adapters are
//! resolved by first match over a registry; specialised adapters can be
//! registered in front of the generic one, which locates the vehicle array
//! heuristically and maps the common key spellings onto the schema.

use super::{FieldValue, Vehicle};
use crate::catalog;
use crate::search::convert;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no adapter recognized the payload from {0}")]
    NoAdapter(String),
    #[error("payload is not structured as expected: {0}")]
    MalformedPayload(String),
}

/// One feed-shape handler.
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this adapter recognizes the payload (by structure or source).
    fn can_handle(&self, payload: &Value, source: &str) -> bool;

    fn parse(&self, payload: &Value, source: &str) -> Result<Vec<Vehicle>, AdapterError>;
}

/// First-match adapter registry. The generic adapter registers last and
/// doubles as the fallback for unrecognized feeds.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AdapterRegistry {
    pub fn with_defaults() -> Self {
        AdapterRegistry {
            adapters: vec![Box::new(GenericAdapter)],
        }
    }

    /// Register an adapter ahead of the existing ones.
    #[allow(dead_code)]
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(0, adapter);
    }

    pub fn resolve(&self, payload: &Value, source: &str) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .map(|a| a.as_ref())
            .find(|a| a.can_handle(payload, source))
    }

    /// Resolve and run the matching adapter.
    pub fn ingest(
        &self,
        payload: &Value,
        source: &str,
    ) -> Result<(&'static str, Vec<Vehicle>), AdapterError> {
        let adapter = self
            .resolve(payload, source)
            .ok_or_else(|| AdapterError::NoAdapter(source.to_string()))?;
        info!("adapter selected: {} for {}", adapter.name(), source);
        let vehicles = adapter.parse(payload, source)?;
        Ok((adapter.name(), vehicles))
    }
}

/// Fallback adapter: finds the vehicle list under the usual container keys
/// and maps the common key spellings, inferring categoria and cilindrada
/// through the catalog when the feed omits them.
pub struct GenericAdapter;

const ARRAY_KEYS: &[&str] = &["veiculos", "vehicles", "estoque", "anuncios"];

impl GenericAdapter {
    fn vehicle_array(payload: &Value) -> Option<&Vec<Value>> {
        if let Some(list) = payload.as_array() {
            return Some(list);
        }
        let obj = payload.as_object()?;
        for key in ARRAY_KEYS {
            if let Some(list) = obj.get(*key).and_then(Value::as_array) {
                return Some(list);
            }
        }
        // MotorLeads-style nesting: { "items": { "results": [...] } }
        obj.get("items")?.get("results")?.as_array()
    }
}

impl SourceAdapter for GenericAdapter {
    fn name(&self) -> &'static str {
        "GenericAdapter"
    }

    fn can_handle(&self, payload: &Value, _source: &str) -> bool {
        Self::vehicle_array(payload).is_some()
    }

    fn parse(&self, payload: &Value, source: &str) -> Result<Vec<Vehicle>, AdapterError> {
        let list = Self::vehicle_array(payload).ok_or_else(|| {
            AdapterError::MalformedPayload(format!("no vehicle array in payload from {source}"))
        })?;
        let vehicles: Vec<Vehicle> = list
            .iter()
            .filter_map(Value::as_object)
            .map(map_common_keys)
            .collect();
        debug!("generic adapter mapped {} records", vehicles.len());
        Ok(vehicles)
    }
}

fn map_common_keys(obj: &serde_json::Map<String, Value>) -> Vehicle {
    let raw_tipo = first_string(obj, &["tipo", "type", "category", "segment"]);
    let is_moto = raw_tipo
        .as_deref()
        .map(|t| t.to_lowercase().contains("moto"))
        .unwrap_or(false);
    let tipo = match (&raw_tipo, is_moto) {
        (_, true) => Some("moto".to_string()),
        (Some(_), false) => Some("carro".to_string()),
        (None, false) => None,
    };

    let modelo = first_string(obj, &["modelo", "model", "brand_model"]);
    let versao = first_string(obj, &["versao", "version", "brand_model_version"]);
    let opcionais = options_text(obj);

    let mut categoria = first_string(obj, &["categoria", "carroceria", "bodywork"]);
    let mut cilindrada = first_value(obj, &["cilindrada", "displacement"]);

    let modelo_ref = modelo.as_deref().unwrap_or("");
    let versao_ref = versao.as_deref().unwrap_or("");
    if is_moto {
        if let Some((cc, category)) = catalog::motos::displacement_and_category(modelo_ref, versao_ref)
        {
            categoria = categoria.or_else(|| Some(category.to_string()));
            cilindrada = cilindrada.or(Some(FieldValue::Int(i64::from(cc))));
        }
    } else if categoria.is_none() {
        categoria = catalog::cars::category_for(modelo_ref, opcionais.as_deref().unwrap_or(""));
    }

    let preco = first_value(obj, &["preco", "price", "valor", "venda"]).map(|raw| {
        // ingestion settles the locale-formatted text to a number when it can
        match convert::to_price(Some(&raw)) {
            Some(n) => FieldValue::Float(n),
            None => raw,
        }
    });

    Vehicle {
        id: first_string(obj, &["id", "reference", "codigo", "placa"]),
        tipo,
        titulo: first_string(obj, &["titulo", "title"]),
        versao,
        marca: first_string(obj, &["marca", "brand", "fabricante", "make"]),
        modelo,
        ano: first_value(obj, &["ano", "ano_modelo", "year_model", "year"]),
        ano_fabricacao: first_value(obj, &["ano_fabricacao", "year_build"]),
        km: first_value(obj, &["km", "quilometragem", "odometer", "mileage"]),
        cor: first_string(obj, &["cor", "color"]),
        combustivel: first_string(obj, &["combustivel", "fuel"]),
        cambio: first_string(obj, &["cambio", "transmission"]).map(normalize_cambio),
        motor: first_string(obj, &["motor", "engine"]),
        portas: first_value(obj, &["portas", "doors", "door"]),
        categoria,
        cilindrada,
        preco,
        opcionais,
        fotos: photo_urls(obj),
    }
}

fn first_string(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn first_value(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<FieldValue> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(FieldValue::Text(s.clone())),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Some(FieldValue::Int(i))
            } else {
                n.as_f64().map(FieldValue::Float)
            }
        }
        _ => None,
    })
}

/// Feeds carry options as a list or as pre-joined text.
fn options_text(obj: &serde_json::Map<String, Value>) -> Option<String> {
    for key in ["opcionais", "acessorios", "attr_list", "options"] {
        match obj.get(key) {
            Some(Value::Array(items)) => {
                let joined = items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            _ => {}
        }
    }
    None
}

/// Plain string URLs only — untangling nested photo objects is the vendor
/// layer's job, not the generic fallback's.
fn photo_urls(obj: &serde_json::Map<String, Value>) -> Vec<String> {
    for key in ["fotos", "photos", "gallery", "imagens"] {
        if let Some(Value::Array(items)) = obj.get(key) {
            let urls: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect();
            if !urls.is_empty() {
                return urls;
            }
        }
    }
    Vec::new()
}

fn normalize_cambio(raw: String) -> String {
    let lowered = raw.to_lowercase();
    if lowered.contains("manual") {
        "manual".to_string()
    } else if lowered.contains("automat") || lowered.contains("automát") {
        "automatico".to_string()
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generic_adapter_veiculos_key() {
        let payload = json!({
            "veiculos": [
                {"id": "a1", "tipo": "carro", "modelo": "Onix", "preco": "59.990,00"},
                {"id": "a2", "tipo": "Moto", "modelo": "CG 160"}
            ]
        });
        let registry = AdapterRegistry::with_defaults();
        let (name, vehicles) = registry.ingest(&payload, "feed-a").unwrap();

        assert_eq!(name, "GenericAdapter");
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].preco, Some(FieldValue::Float(59990.0)));
        assert_eq!(vehicles[1].tipo.as_deref(), Some("moto"));
        // displacement and category inferred from the catalog
        assert_eq!(vehicles[1].cilindrada, Some(FieldValue::Int(160)));
        assert_eq!(vehicles[1].categoria.as_deref(), Some("street"));
    }

    #[test]
    fn test_generic_adapter_items_results_nesting() {
        let payload = json!({
            "items": {"results": [
                {"reference": "x9", "brand": "Yamaha", "brand_model": "Fazer 250",
                 "category": "MOTO", "transmission": "Manual 6 marchas"}
            ]}
        });
        let registry = AdapterRegistry::with_defaults();
        let (_, vehicles) = registry.ingest(&payload, "motorleads").unwrap();

        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id.as_deref(), Some("x9"));
        assert_eq!(vehicles[0].marca.as_deref(), Some("Yamaha"));
        assert_eq!(vehicles[0].cambio.as_deref(), Some("manual"));
        assert_eq!(vehicles[0].cilindrada, Some(FieldValue::Int(250)));
    }

    #[test]
    fn test_generic_adapter_root_array() {
        let payload = json!([{"modelo": "Strada"}]);
        let registry = AdapterRegistry::with_defaults();
        let (_, vehicles) = registry.ingest(&payload, "bare").unwrap();
        assert_eq!(vehicles.len(), 1);
        // car category inferred when the feed omits it
        assert_eq!(vehicles[0].categoria.as_deref(), Some("Utilitário"));
    }

    #[test]
    fn test_no_adapter_for_unrecognized_payload() {
        let payload = json!({"pagina": 1});
        let registry = AdapterRegistry::with_defaults();
        let err = registry.ingest(&payload, "weird-feed").unwrap_err();
        assert!(matches!(err, AdapterError::NoAdapter(_)));
    }

    #[test]
    fn test_options_join_and_hatch_resolution() {
        let payload = json!({
            "veiculos": [
                {"modelo": "onix", "opcionais": ["ar condicionado", "limpador traseiro"]}
            ]
        });
        let registry = AdapterRegistry::with_defaults();
        let (_, vehicles) = registry.ingest(&payload, "feed-b").unwrap();
        assert_eq!(
            vehicles[0].opcionais.as_deref(),
            Some("ar condicionado, limpador traseiro")
        );
        assert_eq!(vehicles[0].categoria.as_deref(), Some("Hatch"));
    }

    #[test]
    fn test_registered_adapter_takes_precedence() {
        struct Rejecting;
        impl SourceAdapter for Rejecting {
            fn name(&self) -> &'static str {
                "Rejecting"
            }
            fn can_handle(&self, _payload: &Value, source: &str) -> bool {
                source.contains("special")
            }
            fn parse(&self, _payload: &Value, _source: &str) -> Result<Vec<Vehicle>, AdapterError> {
                Ok(Vec::new())
            }
        }

        let mut registry = AdapterRegistry::with_defaults();
        registry.register(Box::new(Rejecting));
        let payload = json!({"veiculos": []});
        let (name, _) = registry.ingest(&payload, "special-source").unwrap();
        assert_eq!(name, "Rejecting");
        let (name, _) = registry.ingest(&payload, "plain").unwrap();
        assert_eq!(name, "GenericAdapter");
    }
}
