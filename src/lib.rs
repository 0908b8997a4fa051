// ============================================================================
// BLAST DASHBOARD - CLIENTE MVVM (RUST → WASM)
// ============================================================================
// Arquitectura MVVM:
// - ViewModels: lógica de cada página, devuelven valores
// - Services: SOLO comunicación con el webhook (+ vista previa de plantillas)
// - State: sesión compartida con Rc<RefCell>
// - Models: estructuras del webhook
// - Utils: almacenamiento con prefijo y constantes
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(test)]
mod test_support;

pub use app::{App, Navigation, Route};
pub use config::{AppConfig, CONFIG};
pub use error::{ApiError, PageError, StorageError, ValidationError};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;

    use crate::app::{App, Route};
    use crate::config::CONFIG;

    // Instancia única por carga de página
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    fn with_app<T>(f: impl FnOnce(&App) -> T) -> Option<T> {
        APP.with(|cell| cell.borrow().as_ref().map(f))
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        if CONFIG.is_logging_enabled() {
            wasm_logger::init(Config::default());
        }

        let app = App::browser(CONFIG.clone());
        app.start();

        APP.with(|cell| {
            *cell.borrow_mut() = Some(app);
        });
        Ok(())
    }

    /// Ruta que debe mostrar la vista para `path` (o "loading")
    #[wasm_bindgen]
    pub fn resolve_route(path: &str) -> String {
        use crate::app::Navigation;

        match with_app(|app| app.navigate(Route::from_path(path))) {
            Some(Navigation::Show(route)) | Some(Navigation::Redirect(route)) => route.path().to_string(),
            Some(Navigation::Loading) => "loading".to_string(),
            None => Route::Login.path().to_string(),
        }
    }

    #[wasm_bindgen]
    pub fn is_authenticated() -> bool {
        with_app(|app| app.session().is_authenticated()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn logout() {
        let Some(session) = with_app(|app| app.session().clone()) else {
            log::warn!("⚠️ App no está inicializada");
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            session.logout_remote().await;
        });
    }
}
