// ============================================================================
// PROFILE VIEWMODEL - Datos de la cuenta y cambio de contraseña
// ============================================================================

use serde_json::json;

use crate::error::{PageError, ValidationError};
use crate::models::response::is_success;
use crate::models::UserProfile;
use crate::services::Endpoint;
use crate::state::{AuthSession, CancellationToken, Loaded};
use crate::utils::{MIN_PASSWORD_LENGTH, STORAGE_KEY_PROFILE};

use super::{page_error, reject_if_flagged};

const UPDATE_FAILED: &str = "Erro ao atualizar perfil. Por favor, tente novamente.";
const PASSWORD_FAILED: &str = "Erro ao alterar senha. Por favor, tente novamente.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.nome.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn wants_password_change(&self) -> bool {
        !self.new_password.is_empty() || !self.confirm_password.is_empty()
    }

    /// Solo valida las contraseñas, y solo si se pidió cambiarla
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.wants_password_change() {
            return Ok(());
        }
        if self.current_password.is_empty() {
            return Err(ValidationError::CurrentPasswordRequired);
        }
        if self.new_password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }

    fn profile(&self) -> UserProfile {
        UserProfile {
            nome: Some(self.name.clone()),
            email: Some(self.email.clone()),
            ..UserProfile::default()
        }
    }

    /// Limpia los campos de contraseña tras guardar
    pub fn clear_passwords(&mut self) {
        self.current_password.clear();
        self.new_password.clear();
        self.confirm_password.clear();
    }
}

#[derive(Clone)]
pub struct ProfileViewModel {
    session: AuthSession,
}

impl ProfileViewModel {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    fn cached_profile(&self) -> Option<UserProfile> {
        self.session
            .api()
            .credential_store()
            .storage()
            .load_json(STORAGE_KEY_PROFILE)
    }

    fn cache_profile(&self, profile: &UserProfile) {
        let storage = self.session.api().credential_store().storage();
        if let Err(e) = storage.save_json(STORAGE_KEY_PROFILE, profile) {
            log::warn!("⚠️ No se pudo cachear el perfil: {}", e);
        }
    }

    /// Perfil del servidor; si falla o lo rechaza, el cache local
    pub async fn load(&self, scope: &CancellationToken) -> Result<Loaded<ProfileForm>, PageError> {
        log::info!("👤 Cargando perfil...");

        let profile = match self.session.api().post_json(Endpoint::Profile, json!({})).await {
            Ok(response) if is_success(&response) => {
                let profile = ["user", "profile"]
                    .iter()
                    .find_map(|key| response.get(*key).and_then(UserProfile::from_value));
                match profile {
                    Some(profile) => {
                        self.cache_profile(&profile);
                        Some(profile)
                    }
                    None => {
                        log::warn!("⚠️ Respuesta sin perfil, usando cache");
                        self.cached_profile()
                    }
                }
            }
            Ok(_) => {
                log::warn!("⚠️ Perfil rechazado por el servidor, usando cache");
                self.cached_profile()
            }
            Err(e) if e.is_unauthorized() => return Err(page_error(&self.session, e)),
            Err(e) => {
                log::error!("❌ Error cargando perfil: {}", e);
                self.cached_profile()
            }
        };

        let form = profile
            .as_ref()
            .map(ProfileForm::from_profile)
            .unwrap_or_default();
        Ok(scope.settle(form))
    }

    pub async fn save(&self, form: &ProfileForm) -> Result<(), PageError> {
        form.validate()?;

        let profile = form.profile();
        self.cache_profile(&profile);

        let api = self.session.api();
        let body = json!({ "name": form.name, "email": form.email });
        let response = api
            .post_json(Endpoint::UpdateProfile, body)
            .await
            .map_err(|e| page_error(&self.session, e))?;
        reject_if_flagged(response, UPDATE_FAILED)?;

        self.session.update_profile(profile);
        log::info!("✅ Perfil actualizado");

        if !form.new_password.is_empty() {
            let body = json!({
                "currentPassword": form.current_password,
                "newPassword": form.new_password,
            });
            let response = api
                .post_json(Endpoint::ChangePassword, body)
                .await
                .map_err(|e| page_error(&self.session, e))?;
            reject_if_flagged(response, PASSWORD_FAILED)?;
            log::info!("🔑 Contraseña actualizada");
        }

        Ok(())
    }
}
