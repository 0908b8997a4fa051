// ============================================================================
// WABA VIEWMODEL - Número conectado (WhatsApp Business API)
// ============================================================================
// El servidor es la fuente de verdad; el cache local solo rellena el
// formulario cuando el servidor no responde o no tiene configuración.
// ============================================================================

use serde_json::{json, Value};

use crate::error::{ApiError, PageError};
use crate::models::response::message_of;
use crate::models::{CachedWabaConfig, WabaConfig};
use crate::services::Endpoint;
use crate::state::{AuthSession, CancellationToken, Loaded};
use crate::utils::{NamespacedStorage, STORAGE_KEY_WABA_CONFIG};

use super::page_error;

const SAVE_FAILED: &str = "Falha ao salvar configurações. Por favor, tente novamente.";

#[derive(Clone, Debug, PartialEq)]
pub enum WabaLoad {
    Fresh(WabaConfig),
    Cached(CachedWabaConfig),
    Empty,
}

impl WabaLoad {
    /// Valores para el formulario
    pub fn config(&self) -> WabaConfig {
        match self {
            WabaLoad::Fresh(config) => config.clone(),
            WabaLoad::Cached(cached) => cached.config.clone(),
            WabaLoad::Empty => WabaConfig::default(),
        }
    }
}

#[derive(Clone)]
pub struct WabaViewModel {
    session: AuthSession,
}

impl WabaViewModel {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    fn storage(&self) -> &NamespacedStorage {
        self.session.api().credential_store().storage()
    }

    /// Acepta el formato con `cached_at` y el objeto plano que guardaba la versión anterior
    fn cached(&self) -> Option<CachedWabaConfig> {
        let raw = self.storage().get(STORAGE_KEY_WABA_CONFIG)?;
        if let Ok(cached) = serde_json::from_str::<CachedWabaConfig>(&raw) {
            return Some(cached);
        }
        match serde_json::from_str::<WabaConfig>(&raw) {
            Ok(config) if !config.is_empty() => Some(CachedWabaConfig::new(config)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("⚠️ Cache de WABA corrupto: {}", e);
                None
            }
        }
    }

    fn cache(&self, config: &WabaConfig) {
        let entry = CachedWabaConfig::new(config.clone());
        if let Err(e) = self.storage().save_json(STORAGE_KEY_WABA_CONFIG, &entry) {
            log::warn!("⚠️ No se pudo cachear la configuración WABA: {}", e);
        }
    }

    fn fallback(&self) -> WabaLoad {
        match self.cached() {
            Some(cached) => {
                log::info!("💾 Usando configuración WABA en cache ({}h)", cached.age_hours());
                WabaLoad::Cached(cached)
            }
            None => WabaLoad::Empty,
        }
    }

    pub async fn load(&self, scope: &CancellationToken) -> Result<Loaded<WabaLoad>, PageError> {
        log::info!("📱 Cargando configuración WABA...");

        let load = match self.session.api().post_json(Endpoint::GetWabaConfig, json!({})).await {
            Ok(response) => match WabaConfig::from_response(&response) {
                Some(config) => {
                    self.cache(&config);
                    WabaLoad::Fresh(config)
                }
                None => self.fallback(),
            },
            Err(e) if e.is_unauthorized() => return Err(page_error(&self.session, e)),
            Err(e) => {
                log::error!("❌ Error cargando configuración WABA: {}", e);
                self.fallback()
            }
        };

        Ok(scope.settle(load))
    }

    /// Guarda primero en local; el servidor tiene que responder `success: true`
    pub async fn save(&self, config: &WabaConfig) -> Result<(), PageError> {
        self.cache(config);

        let response = self
            .session
            .api()
            .post_json(Endpoint::UpdateWabaConfig, config.update_body())
            .await
            .map_err(|e| page_error(&self.session, e))?;

        if response.get("success") != Some(&Value::Bool(true)) {
            let message = message_of(&response).unwrap_or_else(|| SAVE_FAILED.to_string());
            log::warn!("⚠️ Configuración WABA rechazada: {}", message);
            return Err(PageError::Api(ApiError::Rejected(message)));
        }

        log::info!("✅ Configuración WABA guardada");
        Ok(())
    }
}
