// ============================================================================
// VIEWMODELS - Lógica de cada página
// ============================================================================
// Devuelven valores; la vista decide cómo pintarlos. Un 401 en cualquier
// página cierra la sesión y se reporta como PageError::SessionExpired.
// ============================================================================

pub mod dashboard_viewmodel;
pub mod login_viewmodel;
pub mod new_blast_viewmodel;
pub mod profile_viewmodel;
pub mod waba_viewmodel;

pub use dashboard_viewmodel::{DashboardData, DashboardViewModel};
pub use login_viewmodel::LoginViewModel;
pub use new_blast_viewmodel::{BlastDraft, ContactsFile, NewBlastViewModel};
pub use profile_viewmodel::{ProfileForm, ProfileViewModel};
pub use waba_viewmodel::{WabaLoad, WabaViewModel};

use serde_json::Value;

use crate::error::{ApiError, PageError};
use crate::models::response::{is_success, message_of};
use crate::state::AuthSession;

pub(crate) fn page_error(session: &AuthSession, error: ApiError) -> PageError {
    if session.expire_if_unauthorized(&error) {
        PageError::SessionExpired
    } else {
        PageError::Api(error)
    }
}

/// Falla solo si la respuesta trae `success` y no es verdadero
pub(crate) fn reject_if_flagged(response: Value, fallback: &str) -> Result<Value, ApiError> {
    if response.get("success").is_some() && !is_success(&response) {
        let message = message_of(&response).unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::Rejected(message));
    }
    Ok(response)
}
