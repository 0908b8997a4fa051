// ============================================================================
// DASHBOARD VIEWMODEL - Lista de disparos y estadísticas
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::error::PageError;
use crate::models::blast::{blast_from_response, blasts_from_response};
use crate::models::{Blast, DashboardStats};
use crate::services::Endpoint;
use crate::state::{AuthSession, CancellationToken, Loaded};

use super::page_error;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardData {
    pub blasts: Vec<Blast>,
    pub stats: DashboardStats,
}

#[derive(Clone)]
pub struct DashboardViewModel {
    session: AuthSession,
    blasts: Rc<RefCell<Vec<Blast>>>,
}

impl DashboardViewModel {
    pub fn new(session: AuthSession) -> Self {
        Self {
            session,
            blasts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Carga la lista. Cualquier error que no sea 401 deja la lista vacía.
    pub async fn load(&self, scope: &CancellationToken) -> Result<Loaded<DashboardData>, PageError> {
        log::info!("📊 Cargando disparos...");

        let blasts = match self.session.api().post_json(Endpoint::ListBlasts, json!({})).await {
            Ok(response) => blasts_from_response(&response),
            Err(e) if e.is_unauthorized() => return Err(page_error(&self.session, e)),
            Err(e) => {
                log::error!("❌ Error cargando disparos: {}", e);
                Vec::new()
            }
        };

        Ok(scope.settle(blasts).map(|blasts| {
            log::info!("✅ {} disparos cargados", blasts.len());
            *self.blasts.borrow_mut() = blasts.clone();
            let stats = DashboardStats::from_blasts(&blasts);
            DashboardData { blasts, stats }
        }))
    }

    /// Última lista cargada
    pub fn blasts(&self) -> Vec<Blast> {
        self.blasts.borrow().clone()
    }

    fn cached_blast(&self, id: &str) -> Option<Blast> {
        self.blasts.borrow().iter().find(|b| b.id == id).cloned()
    }

    /// Detalle de un disparo; si el servidor no lo da, se usa la lista cargada
    pub async fn blast_details(&self, id: &str) -> Result<Option<Blast>, PageError> {
        match self.session.api().post_json(Endpoint::GetBlast, json!({ "id": id })).await {
            Ok(response) => Ok(blast_from_response(&response)
                .filter(|blast| !blast.id.is_empty() || !blast.nome_campanha.is_empty())
                .or_else(|| self.cached_blast(id))),
            Err(e) if e.is_unauthorized() => Err(page_error(&self.session, e)),
            Err(e) => {
                log::warn!("⚠️ Detalle no disponible, usando lista local: {}", e);
                Ok(self.cached_blast(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlastStatus;
    use crate::services::{ApiClient, CredentialStore};
    use crate::test_support::{block_on, memory_storage, ScriptedTransport};
    use crate::utils::STORAGE_KEY_AUTH_TOKEN;
    use serde_json::json;

    fn viewmodel() -> (DashboardViewModel, AuthSession, ScriptedTransport) {
        let (_raw, storage) = memory_storage();
        storage.set(STORAGE_KEY_AUTH_TOKEN, "tok").unwrap();
        let transport = ScriptedTransport::new();
        let api = ApiClient::new("https://hooks.test", CredentialStore::new(storage), Rc::new(transport.clone()));
        let session = AuthSession::new(api);
        session.initialize();
        (DashboardViewModel::new(session.clone()), session, transport)
    }

    fn blasts_json() -> serde_json::Value {
        json!([
            {"id": 1, "nome_campanha": "Black Friday", "hora_inicio": "2024-11-29 10:00", "tamanho_lista": 100, "status": "Andamento"},
            {"id": 2, "nome_campanha": "Natal", "hora_inicio": "2024-12-20 09:00", "tamanho_lista": "50", "status": "Finalizado"},
            {"id": 3, "nome_campanha": "Teste", "tamanho_lista": 5, "status": "Interrompido"}
        ])
    }

    #[test]
    fn load_builds_stats_from_the_list() {
        let (vm, _session, transport) = viewmodel();
        transport.reply_json(200, json!({ "result": blasts_json() }));
        let scope = CancellationToken::new();

        let data = block_on(vm.load(&scope)).unwrap().ready().unwrap();

        assert_eq!(
            data.stats,
            DashboardStats { total: 3, ongoing: 1, completed: 1, total_contacts: 155 }
        );
        assert_eq!(data.blasts[2].status, BlastStatus::Interrompido);
        assert_eq!(vm.blasts().len(), 3);

        let sent = transport.last_request().unwrap();
        assert!(sent.url.ends_with("/blasts"));
    }

    #[test]
    fn failures_other_than_401_show_an_empty_list() {
        let (vm, session, transport) = viewmodel();
        transport.reply_json(500, json!({"message": "boom"}));

        let data = block_on(vm.load(&CancellationToken::new())).unwrap().ready().unwrap();

        assert_eq!(data, DashboardData::default());
        assert!(session.is_authenticated());
    }

    #[test]
    fn unauthorized_load_expires_the_session() {
        let (vm, session, transport) = viewmodel();
        transport.reply_json(401, json!({}));

        assert_eq!(block_on(vm.load(&CancellationToken::new())), Err(PageError::SessionExpired));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn late_response_after_view_is_gone_is_discarded() {
        let (vm, _session, transport) = viewmodel();
        transport.reply_json(200, blasts_json());
        let scope = CancellationToken::new();
        scope.cancel();

        assert_eq!(block_on(vm.load(&scope)), Ok(Loaded::Discarded));
        assert!(vm.blasts().is_empty());
    }

    #[test]
    fn details_fall_back_to_the_loaded_list() {
        let (vm, _session, transport) = viewmodel();
        transport.reply_json(200, blasts_json());
        block_on(vm.load(&CancellationToken::new())).unwrap();

        transport.reply_json(200, json!({"result": {"id": "2", "nome_campanha": "Natal (servidor)"}}));
        let from_server = block_on(vm.blast_details("2")).unwrap().unwrap();
        assert_eq!(from_server.nome_campanha, "Natal (servidor)");

        transport.reply_json(404, json!({}));
        let local = block_on(vm.blast_details("1")).unwrap().unwrap();
        assert_eq!(local.nome_campanha, "Black Friday");
        assert!(local.summary().contains("Contatos: 100"));

        transport.reply_json(200, json!({"success": false}));
        assert_eq!(block_on(vm.blast_details("9")).unwrap(), None);
    }
}
