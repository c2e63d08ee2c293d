//! Normalized vehicle record
//!
//! The schema every ingestion source is mapped onto. Every field may be
//! absent: feeds disagree wildly about which attributes they carry, and the
//! search engine treats missing values as "satisfies no constraint" rather
//! than an error.

use serde::{Deserialize, Serialize};

/// A JSON scalar that arrives either as a number or as text.
///
/// Feeds encode prices, years and odometer readings inconsistently
/// (`50000`, `"50.000"`, `"R$ 50.000,00"`); the converters in
/// `search::convert` own the interpretation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Textual form, as used by identity comparisons (`4` and `"4"` agree).
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(n) => format!("{n}"),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Numeric form, if the value is already a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

/// Normalized vehicle listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ano: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ano_fabricacao: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combustivel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cambio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portas: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cilindrada: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opcionais: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fotos: Vec<String>,
}

impl Vehicle {
    /// Whether this listing is a motorcycle. Feeds write `moto`,
    /// `motocicleta`, `Moto` and similar; any kind containing "moto" counts.
    pub fn is_moto(&self) -> bool {
        self.tipo
            .as_deref()
            .map(|t| t.to_lowercase().contains("moto"))
            .unwrap_or(false)
    }

    /// Reduce the photo list to its first entry. Response shaping only —
    /// callers apply this to their own clone, never to the shared snapshot.
    pub fn keep_first_photo(&mut self) {
        self.fotos.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_as_text() {
        assert_eq!(FieldValue::Int(4).as_text(), "4");
        assert_eq!(FieldValue::Float(4.0).as_text(), "4");
        assert_eq!(FieldValue::Float(1.6).as_text(), "1.6");
        assert_eq!(FieldValue::from("abc").as_text(), "abc");
    }

    #[test]
    fn test_field_value_deserializes_mixed() {
        let v: FieldValue = serde_json::from_str("50000").unwrap();
        assert_eq!(v, FieldValue::Int(50000));
        let v: FieldValue = serde_json::from_str("1.6").unwrap();
        assert_eq!(v, FieldValue::Float(1.6));
        let v: FieldValue = serde_json::from_str("\"50.000\"").unwrap();
        assert_eq!(v, FieldValue::Text("50.000".to_string()));
    }

    #[test]
    fn test_vehicle_all_fields_optional() {
        let v: Vehicle = serde_json::from_str("{}").unwrap();
        assert!(v.id.is_none());
        assert!(v.fotos.is_empty());
        assert!(!v.is_moto());
    }

    #[test]
    fn test_vehicle_ignores_unknown_keys() {
        let v: Vehicle =
            serde_json::from_str(r#"{"modelo":"Onix","alguma_chave_nova":true}"#).unwrap();
        assert_eq!(v.modelo.as_deref(), Some("Onix"));
    }

    #[test]
    fn test_is_moto_variants() {
        for tipo in ["moto", "Moto", "motocicleta", "MOTOCICLETA"] {
            let v = Vehicle {
                tipo: Some(tipo.to_string()),
                ..Default::default()
            };
            assert!(v.is_moto(), "{tipo} should be a motorcycle");
        }
        let v = Vehicle {
            tipo: Some("carro".to_string()),
            ..Default::default()
        };
        assert!(!v.is_moto());
    }

    #[test]
    fn test_keep_first_photo() {
        let mut v = Vehicle {
            fotos: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            ..Default::default()
        };
        v.keep_first_photo();
        assert_eq!(v.fotos, vec!["a.jpg".to_string()]);
    }
}
