// ============================================================================
// LOGIN VIEWMODEL
// ============================================================================

use crate::error::ValidationError;
use crate::models::LoginResult;
use crate::state::AuthSession;

#[derive(Clone)]
pub struct LoginViewModel {
    session: AuthSession,
}

impl LoginViewModel {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    pub fn validate(email: &str, password: &str) -> Result<(), ValidationError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::MissingLoginFields);
        }
        Ok(())
    }

    /// Un error de validación se devuelve como login fallido, sin llamar al servidor
    pub async fn submit(&self, email: &str, password: &str, remember_me: bool) -> LoginResult {
        if let Err(e) = Self::validate(email, password) {
            return LoginResult::failed(e.to_string());
        }
        self.session.login(email.trim(), password, remember_me).await
    }
}
