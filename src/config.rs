use serde::{Deserialize, Serialize};

pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://auto.fabricaneural.ia.br/webhook";
pub const DEFAULT_STORAGE_PREFIX: &str = "blastDashboard_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub webhook_base_url: String,
    pub storage_prefix: String,
    pub environment: String,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_base_url: DEFAULT_WEBHOOK_BASE_URL.to_string(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("WEBHOOK_BASE_URL"),
            option_env!("STORAGE_PREFIX"),
            option_env!("ENVIRONMENT"),
            option_env!("ENABLE_LOGGING"),
        )
    }

    fn from_values(
        base_url: Option<&str>,
        prefix: Option<&str>,
        environment: Option<&str>,
        enable_logging: Option<&str>,
    ) -> Self {
        Self {
            // El path de cada endpoint empieza con '/', evitamos el doble slash
            webhook_base_url: base_url
                .unwrap_or(DEFAULT_WEBHOOK_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            storage_prefix: prefix.unwrap_or(DEFAULT_STORAGE_PREFIX).to_string(),
            environment: environment.unwrap_or("development").to_string(),
            enable_logging: enable_logging
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
