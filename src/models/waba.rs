use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::{is_success, lenient_string};

/// Configuración de WhatsApp Business API.
/// El servidor usa `numero_id`/`waba_id`; el formulario antiguo `phoneNumberId`/`wabaId`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WabaConfig {
    #[serde(rename = "tokenMeta", default, deserialize_with = "lenient_string")]
    pub token_meta: String,
    #[serde(alias = "phoneNumberId", default, deserialize_with = "lenient_string")]
    pub numero_id: String,
    #[serde(alias = "wabaId", default, deserialize_with = "lenient_string")]
    pub waba_id: String,
}

impl WabaConfig {
    pub fn is_empty(&self) -> bool {
        self.token_meta.is_empty() && self.numero_id.is_empty() && self.waba_id.is_empty()
    }

    /// `config` de una respuesta con `success` verdadero
    pub fn from_response(response: &Value) -> Option<Self> {
        if !is_success(response) {
            return None;
        }
        let config = response.get("config").filter(|c| c.is_object())?;
        serde_json::from_value(config.clone()).ok()
    }

    /// Cuerpo que espera el endpoint de actualización
    pub fn update_body(&self) -> Value {
        serde_json::json!({
            "tokenMeta": self.token_meta,
            "phoneNumberId": self.numero_id,
            "wabaId": self.waba_id,
        })
    }
}

/// Copia local: respaldo utilizable pero nunca autoritativo
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedWabaConfig {
    pub config: WabaConfig,
    pub cached_at: DateTime<Utc>,
}

impl CachedWabaConfig {
    pub fn new(config: WabaConfig) -> Self {
        Self {
            config,
            cached_at: Utc::now(),
        }
    }

    pub fn age_hours(&self) -> i64 {
        Utc::now().signed_duration_since(self.cached_at).num_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_and_legacy_field_names_both_parse() {
        let server: WabaConfig =
            serde_json::from_value(json!({"tokenMeta": "EAAG", "numero_id": 1234, "waba_id": "99"})).unwrap();
        let legacy: WabaConfig =
            serde_json::from_value(json!({"tokenMeta": "EAAG", "token": "sessao", "phoneNumberId": "1234", "wabaId": "99"})).unwrap();
        assert_eq!(server, legacy);
        assert_eq!(server.numero_id, "1234");
    }

    #[test]
    fn from_response_needs_success_and_config_object() {
        assert!(WabaConfig::from_response(&json!({"success": true})).is_none());
        assert!(WabaConfig::from_response(&json!({"success": false, "config": {}})).is_none());
        let config = WabaConfig::from_response(&json!({"success": "true", "config": {"waba_id": "1"}})).unwrap();
        assert_eq!(config.waba_id, "1");
    }

    #[test]
    fn update_body_uses_form_field_names() {
        let config = WabaConfig { token_meta: "t".into(), numero_id: "n".into(), waba_id: "w".into() };
        assert_eq!(config.update_body(), json!({"tokenMeta": "t", "phoneNumberId": "n", "wabaId": "w"}));
    }

    #[test]
    fn fresh_cache_entry_has_zero_age() {
        assert_eq!(CachedWabaConfig::new(WabaConfig::default()).age_hours(), 0);
    }
}
