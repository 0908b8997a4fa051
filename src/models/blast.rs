use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::response::{find_array, lenient_string, lenient_u64};

/// Estado de un disparo. Textos desconocidos se conservan tal cual.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlastStatus {
    Andamento,
    Finalizado,
    Interrompido,
    #[default]
    Unknown,
    Other(String),
}

impl From<String> for BlastStatus {
    fn from(text: String) -> Self {
        match text.as_str() {
            "Andamento" => BlastStatus::Andamento,
            "Finalizado" => BlastStatus::Finalizado,
            "Interrompido" => BlastStatus::Interrompido,
            "" => BlastStatus::Unknown,
            _ => BlastStatus::Other(text),
        }
    }
}

impl From<BlastStatus> for String {
    fn from(status: BlastStatus) -> Self {
        status.label().to_string()
    }
}

impl BlastStatus {
    pub fn label(&self) -> &str {
        match self {
            BlastStatus::Andamento => "Andamento",
            BlastStatus::Finalizado => "Finalizado",
            BlastStatus::Interrompido => "Interrompido",
            BlastStatus::Unknown => "",
            BlastStatus::Other(text) => text,
        }
    }
}

impl fmt::Display for BlastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registro de un disparo, solo lectura desde el cliente
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Blast {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nome_campanha: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hora_inicio: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub tamanho_lista: u64,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: BlastStatus,
}

fn lenient_status<'de, D>(deserializer: D) -> Result<BlastStatus, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(BlastStatus::from)
}

impl Blast {
    /// Texto del detalle que muestra el dashboard
    pub fn summary(&self) -> String {
        format!(
            "Detalhes do disparo:\n\nCampanha: {}\nData/Hora: {}\nContatos: {}\nStatus: {}",
            self.nome_campanha, self.hora_inicio, self.tamanho_lista, self.status
        )
    }
}

/// Estadísticas agregadas del dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub ongoing: usize,
    pub completed: usize,
    pub total_contacts: u64,
}

impl DashboardStats {
    pub fn from_blasts(blasts: &[Blast]) -> Self {
        Self {
            total: blasts.len(),
            ongoing: blasts
                .iter()
                .filter(|b| b.status == BlastStatus::Andamento)
                .count(),
            completed: blasts
                .iter()
                .filter(|b| b.status == BlastStatus::Finalizado)
                .count(),
            total_contacts: blasts
                .iter()
                .fold(0u64, |total, b| total.saturating_add(b.tamanho_lista)),
        }
    }
}

/// Acepta `[...]`, `{result: [...]}`, `{blasts: [...]}` o `{data: [...]}`.
/// Entradas que no son objetos se descartan.
pub fn blasts_from_response(response: &Value) -> Vec<Blast> {
    let Some(items) = find_array(response, &["result", "blasts", "data"]) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Blast>(item.clone()) {
            Ok(blast) => Some(blast),
            Err(e) => {
                log::warn!("⚠️ Disparo ignorado, formato inesperado: {}", e);
                None
            }
        })
        .collect()
}

/// Detalle de un disparo: el objeto directo o bajo `result`/`blast`/`data`
pub fn blast_from_response(response: &Value) -> Option<Blast> {
    let candidate = ["result", "blast", "data"]
        .iter()
        .find_map(|key| response.get(*key).filter(|v| v.is_object()))
        .unwrap_or(response);

    if !candidate.is_object() {
        return None;
    }
    serde_json::from_value(candidate.clone()).ok()
}
