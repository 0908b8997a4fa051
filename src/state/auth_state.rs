// ============================================================================
// AUTH STATE - Sesión de la página (una sola instancia por carga)
// ============================================================================
// Se construye una vez al arrancar y se inyecta (clonando el handle) en cada
// viewmodel. El estado es una unión etiquetada; no hay booleanos sueltos.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::{Credentials, LoginRequest, LoginResponse, LoginResult, UserProfile};
use crate::services::{ApiClient, CallOptions, CredentialStore, Endpoint};
use crate::utils::{
    NamespacedStorage, STORAGE_KEY_LOGGED_IN, STORAGE_KEY_PROFILE, STORAGE_KEY_REMEMBER_ME,
    STORAGE_KEY_USER_DATA, STORAGE_KEY_WABA_CONFIG,
};

const LOGIN_FAILED: &str = "Login falhou";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Loading,
    Anonymous,
    Authenticated {
        token: String,
        user: Option<UserProfile>,
    },
}

#[derive(Clone)]
pub struct AuthSession {
    state: Rc<RefCell<SessionState>>,
    api: ApiClient,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState::Uninitialized)),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn credentials(&self) -> &CredentialStore {
        self.api.credential_store()
    }

    fn storage(&self) -> &NamespacedStorage {
        self.api.credential_store().storage()
    }

    fn set_state(&self, state: SessionState) {
        *self.state.borrow_mut() = state;
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Loading)
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state.borrow() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        match &*self.state.borrow() {
            SessionState::Authenticated { user, .. } => user.clone(),
            _ => None,
        }
    }

    /// Restaura la sesión guardada. El token no se valida contra el servidor.
    pub fn initialize(&self) {
        self.set_state(SessionState::Loading);

        let stored = self.credentials().read();
        if stored.has_token() {
            let user = self.storage().load_json::<UserProfile>(STORAGE_KEY_USER_DATA);
            log::info!("✅ Sesión restaurada (usuario: {:?})", stored.user_id);
            self.set_state(SessionState::Authenticated {
                token: stored.token,
                user,
            });
        } else {
            log::info!("ℹ️ Sin sesión guardada");
            self.set_state(SessionState::Anonymous);
        }
    }

    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> LoginResult {
        log::info!("🔐 Iniciando login para: {}", email);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me,
        };
        let body = match serde_json::to_value(&request) {
            Ok(body) => body,
            Err(e) => return LoginResult::failed(e.to_string()),
        };

        let response = match self.api.call(Endpoint::Login, CallOptions::json(body)).await {
            Ok(response) => response.value,
            Err(e) => {
                log::error!("❌ Error en login: {}", e);
                return LoginResult::failed(e.to_string());
            }
        };

        let login = LoginResponse::from_value(&response);
        if !login.is_accepted() {
            log::warn!("⚠️ Login rechazado: {:?}", login.message);
            return LoginResult::failed(login.message.unwrap_or_else(|| LOGIN_FAILED.to_string()));
        }

        let token = login.token.clone().unwrap_or_default();
        let user = login
            .user
            .clone()
            .unwrap_or_else(|| UserProfile::with_email(email));
        let credentials = Credentials::new(token.clone(), login.resolved_user_id());

        self.persist_login(&credentials, &user, remember_me);
        self.set_state(SessionState::Authenticated {
            token,
            user: Some(user),
        });

        log::info!("✅ Login exitoso (userId: {:?})", credentials.user_id);
        LoginResult::ok()
    }

    // Un fallo de storage no invalida la sesión en memoria, solo se registra
    fn persist_login(&self, credentials: &Credentials, user: &UserProfile, remember_me: bool) {
        let storage = self.storage();
        let results = [
            self.credentials().write(credentials),
            storage.save_json(STORAGE_KEY_USER_DATA, user),
            storage.set(STORAGE_KEY_LOGGED_IN, "true"),
            storage.set(STORAGE_KEY_REMEMBER_ME, if remember_me { "true" } else { "false" }),
        ];
        for result in results {
            if let Err(e) = result {
                log::error!("❌ Error guardando sesión: {}", e);
            }
        }
    }

    /// Siempre termina en `Anonymous`
    pub fn logout(&self) {
        log::info!("👋 Logout");

        let storage = self.storage();
        let results = [
            self.credentials().clear(),
            storage.remove(STORAGE_KEY_USER_DATA),
            storage.remove(STORAGE_KEY_LOGGED_IN),
            storage.remove(STORAGE_KEY_PROFILE),
            storage.remove(STORAGE_KEY_WABA_CONFIG),
        ];
        for result in results {
            if let Err(e) = result {
                log::warn!("⚠️ Error limpiando storage: {}", e);
            }
        }

        self.set_state(SessionState::Anonymous);
    }

    /// Avisa al webhook (best effort) y cierra la sesión local
    pub async fn logout_remote(&self) {
        if let Err(e) = self.api.call(Endpoint::Logout, CallOptions::default()).await {
            log::warn!("⚠️ Logout remoto falló: {}", e);
        }
        self.logout();
    }

    /// Aplica cambios de perfil a la sesión y al cache `userData`
    pub fn update_profile(&self, patch: UserProfile) {
        let updated = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                SessionState::Authenticated { user, .. } => {
                    let profile = user.get_or_insert_with(UserProfile::default);
                    profile.merge(patch);
                    profile.clone()
                }
                _ => {
                    log::warn!("⚠️ update_profile sin sesión activa");
                    return;
                }
            }
        };

        if let Err(e) = self.storage().save_json(STORAGE_KEY_USER_DATA, &updated) {
            log::error!("❌ Error guardando perfil: {}", e);
        }
    }

    /// Un 401 termina la sesión. Devuelve true si la vista debe ir al login.
    pub fn expire_if_unauthorized(&self, error: &ApiError) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        log::warn!("⚠️ Unauthorized, cerrando sesión");
        if self.is_authenticated() {
            self.logout();
        }
        true
    }
}
