// ============================================================================
// APP - Cableado de la aplicación
// ============================================================================
// Construye UNA sesión por carga de página y la comparte (clonando el
// handle) con cada viewmodel. Las vistas solo hablan con los viewmodels.
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::services::{ApiClient, CredentialStore, HttpTransport};
use crate::state::AuthSession;
use crate::utils::{KeyValueStore, NamespacedStorage};
use crate::viewmodels::{
    DashboardViewModel, LoginViewModel, NewBlastViewModel, ProfileViewModel, WabaViewModel,
};

/// Páginas de la aplicación
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    NewBlast,
    Profile,
    ConnectedNumber,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::NewBlast => "/novo-disparo",
            Route::Profile => "/perfil",
            Route::ConnectedNumber => "/numero-conectado",
        }
    }

    /// Rutas desconocidas van al dashboard
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/novo-disparo" => Route::NewBlast,
            "/perfil" => Route::Profile,
            "/numero-conectado" => Route::ConnectedNumber,
            _ => Route::Dashboard,
        }
    }

    pub fn is_protected(self) -> bool {
        self != Route::Login
    }
}

/// Qué debe mostrar la vista para una ruta pedida
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Show(Route),
    Loading,
    Redirect(Route),
}

pub struct App {
    config: AppConfig,
    session: AuthSession,
    pub dashboard: DashboardViewModel,
    pub new_blast: NewBlastViewModel,
    pub profile: ProfileViewModel,
    pub waba: WabaViewModel,
    pub login: LoginViewModel,
}

impl App {
    pub fn with_backends(
        config: AppConfig,
        store: Rc<dyn KeyValueStore>,
        transport: Rc<dyn HttpTransport>,
    ) -> Self {
        let storage = NamespacedStorage::new(store, config.storage_prefix.clone());
        let api = ApiClient::new(
            config.webhook_base_url.clone(),
            CredentialStore::new(storage),
            transport,
        );
        let session = AuthSession::new(api);

        Self {
            dashboard: DashboardViewModel::new(session.clone()),
            new_blast: NewBlastViewModel::new(session.clone()),
            profile: ProfileViewModel::new(session.clone()),
            waba: WabaViewModel::new(session.clone()),
            login: LoginViewModel::new(session.clone()),
            session,
            config,
        }
    }

    /// localStorage + gloo-net
    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: AppConfig) -> Self {
        use crate::services::BrowserTransport;
        use crate::utils::LocalStore;

        Self::with_backends(config, Rc::new(LocalStore), Rc::new(BrowserTransport))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn start(&self) {
        log::info!("🚀 Blast Dashboard ({})", self.config.environment);
        self.session.initialize();
    }

    /// Guardia de rutas: sin sesión, las páginas protegidas van al login
    pub fn navigate(&self, route: Route) -> Navigation {
        if self.session.is_loading() {
            return Navigation::Loading;
        }
        let authenticated = self.session.is_authenticated();
        match route {
            Route::Login if authenticated => Navigation::Redirect(Route::Dashboard),
            route if route.is_protected() && !authenticated => Navigation::Redirect(Route::Login),
            route => Navigation::Show(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block_on, ScriptedTransport};
    use crate::utils::MemoryStore;
    use serde_json::json;

    fn app() -> (App, MemoryStore, ScriptedTransport) {
        let raw = MemoryStore::new();
        let transport = ScriptedTransport::new();
        let config = AppConfig {
            webhook_base_url: "https://hooks.test/webhook".into(),
            ..AppConfig::default()
        };
        let app = App::with_backends(config, Rc::new(raw.clone()), Rc::new(transport.clone()));
        (app, raw, transport)
    }

    #[test]
    fn paths_round_trip_and_unknown_goes_home() {
        for route in [Route::Login, Route::Dashboard, Route::NewBlast, Route::Profile, Route::ConnectedNumber] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/perfil/"), Route::Profile);
        assert_eq!(Route::from_path("/nada"), Route::Dashboard);
    }

    #[test]
    fn guard_follows_the_session() {
        let (app, _raw, transport) = app();
        app.start();

        assert_eq!(app.navigate(Route::Profile), Navigation::Redirect(Route::Login));
        assert_eq!(app.navigate(Route::Login), Navigation::Show(Route::Login));

        transport.reply_json(200, json!({"success": true, "token": "jwt"}));
        assert!(block_on(app.login.submit("ana@x.com", "segredo", false)).success);

        assert_eq!(app.navigate(Route::Profile), Navigation::Show(Route::Profile));
        assert_eq!(app.navigate(Route::Login), Navigation::Redirect(Route::Dashboard));
    }

    #[test]
    fn viewmodels_share_one_session_and_the_configured_prefix() {
        let (app, raw, transport) = app();
        app.start();
        transport.reply_json(200, json!({"success": true, "token": "jwt", "userId": 3}));
        block_on(app.login.submit("ana@x.com", "segredo", false));

        assert!(raw.keys().iter().all(|key| key.starts_with("blastDashboard_")));
        assert_eq!(transport.urls()[0], "https://hooks.test/webhook/auth-login");

        app.session().logout();
        assert_eq!(app.navigate(Route::Dashboard), Navigation::Redirect(Route::Login));
    }
}
