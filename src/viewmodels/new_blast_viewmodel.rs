// ============================================================================
// NEW BLAST VIEWMODEL - Plantillas, vista previa y creación de disparos
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::error::{ApiError, PageError, ValidationError};
use crate::models::response::message_of;
use crate::models::TemplateCatalog;
use crate::services::{render_selection, CallOptions, Endpoint, FilePart, MultipartForm, PreviewBlock};
use crate::state::{AuthSession, CancellationToken, Loaded};
use crate::utils::CONTACTS_FIELD;

use super::{page_error, reject_if_flagged};

const TEMPLATES_FAILED: &str = "Falha ao carregar templates";
const CREATE_FAILED: &str = "Erro ao criar disparo";

/// Archivo de contactos tal como lo eligió el usuario (se envía opaco)
pub type ContactsFile = FilePart;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlastDraft {
    pub campaign_name: String,
    pub template: String,
    pub contacts: Option<ContactsFile>,
}

impl BlastDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_file = self
            .contacts
            .as_ref()
            .is_some_and(|file| !file.file_name.is_empty());

        if self.campaign_name.trim().is_empty() || self.template.is_empty() || !has_file {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct NewBlastViewModel {
    session: AuthSession,
    catalog: Rc<RefCell<TemplateCatalog>>,
}

impl NewBlastViewModel {
    pub fn new(session: AuthSession) -> Self {
        Self {
            session,
            catalog: Rc::new(RefCell::new(TemplateCatalog::default())),
        }
    }

    pub async fn load_templates(&self, scope: &CancellationToken) -> Result<Loaded<TemplateCatalog>, PageError> {
        log::info!("📋 Cargando plantillas...");

        let credentials = self.session.api().current_credentials();
        let body = json!({ "authToken": credentials.token });

        let response = self
            .session
            .api()
            .post_json(Endpoint::GetTemplates, body)
            .await
            .map_err(|e| page_error(&self.session, e))?;

        let catalog = TemplateCatalog::from_response(&response).ok_or_else(|| {
            let message = message_of(&response).unwrap_or_else(|| TEMPLATES_FAILED.to_string());
            log::warn!("⚠️ Plantillas rechazadas: {}", message);
            PageError::Api(ApiError::Rejected(message))
        })?;

        Ok(scope.settle(catalog).map(|catalog| {
            log::info!("✅ {} plantillas disponibles", catalog.names.len());
            *self.catalog.borrow_mut() = catalog.clone();
            catalog
        }))
    }

    pub fn template_names(&self) -> Vec<String> {
        self.catalog.borrow().names.clone()
    }

    pub fn preview(&self, selected: Option<&str>, example_index: usize) -> Vec<PreviewBlock> {
        render_selection(selected, &self.catalog.borrow().meta, example_index)
    }

    /// Formulario multipart; las credenciales van como campos del form
    pub fn build_form(&self, draft: &BlastDraft) -> Result<MultipartForm, ValidationError> {
        draft.validate()?;
        let contacts = draft.contacts.clone().ok_or(ValidationError::MissingFields)?;
        let credentials = self.session.api().current_credentials();

        Ok(MultipartForm::new()
            .text("campaignName", draft.campaign_name.trim())
            .text("template", draft.template.as_str())
            .text("token", credentials.token)
            .text(
                "userId",
                credentials.user_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .file(CONTACTS_FIELD, contacts))
    }

    pub async fn submit(&self, draft: &BlastDraft) -> Result<Value, PageError> {
        let form = self.build_form(draft)?;
        log::info!("🚀 Creando disparo: {}", draft.campaign_name);

        let response = self
            .session
            .api()
            .call(Endpoint::CreateBlast, CallOptions::multipart(form))
            .await
            .map_err(|e| page_error(&self.session, e))?;

        let value = reject_if_flagged(response.value, CREATE_FAILED)?;
        log::info!("✅ Disparo creado");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;
    use crate::services::transport::OutgoingBody;
    use crate::services::{ApiClient, CredentialStore};
    use crate::test_support::{block_on, memory_storage, ScriptedTransport};

    fn viewmodel() -> (NewBlastViewModel, ScriptedTransport) {
        let (_raw, storage) = memory_storage();
        let store = CredentialStore::new(storage);
        store.write(&Credentials::new("tok", Some(42))).unwrap();
        let transport = ScriptedTransport::new();
        let api = ApiClient::new("https://hooks.test", store, Rc::new(transport.clone()));
        let session = AuthSession::new(api);
        session.initialize();
        (NewBlastViewModel::new(session), transport)
    }

    fn contacts() -> ContactsFile {
        FilePart {
            file_name: "contatos.csv".into(),
            mime_type: "text/csv".into(),
            bytes: b"nome,telefone\nAna,5511999999999\n".to_vec(),
        }
    }

    fn draft() -> BlastDraft {
        BlastDraft {
            campaign_name: "Black Friday".into(),
            template: "promo_bf".into(),
            contacts: Some(contacts()),
        }
    }

    fn catalog_json() -> Value {
        json!({
            "success": true,
            "templates": ["promo_bf"],
            "templateMeta": [{
                "name": "promo_bf",
                "components": [{"type": "BODY", "text": "Oi {{1}}", "example": {"body_text": [["Ana"]]}}]
            }]
        })
    }

    #[test]
    fn every_field_is_required() {
        assert_eq!(draft().validate(), Ok(()));
        for broken in [
            BlastDraft { campaign_name: "  ".into(), ..draft() },
            BlastDraft { template: String::new(), ..draft() },
            BlastDraft { contacts: None, ..draft() },
        ] {
            assert_eq!(broken.validate(), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn invalid_draft_never_reaches_the_network() {
        let (vm, transport) = viewmodel();
        let result = block_on(vm.submit(&BlastDraft::default()));

        assert_eq!(result, Err(PageError::Validation(ValidationError::MissingFields)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn submit_sends_multipart_with_credentials_and_file() {
        let (vm, transport) = viewmodel();
        transport.reply_json(200, json!({"success": true, "id": 10}));

        block_on(vm.submit(&draft())).unwrap();

        let sent = transport.last_request().unwrap();
        assert!(sent.url.ends_with("/blasts-create"));
        assert_eq!(sent.header("content-type"), None);
        let OutgoingBody::Multipart(form) = sent.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.get_text("campaignName"), Some("Black Friday"));
        assert_eq!(form.get_text("template"), Some("promo_bf"));
        assert_eq!(form.get_text("token"), Some("tok"));
        assert_eq!(form.get_text("userId"), Some("42"));
        assert_eq!(form.get_file(CONTACTS_FIELD), Some(&contacts()));
    }

    #[test]
    fn flagged_failure_is_reported() {
        let (vm, transport) = viewmodel();
        transport.reply_json(200, json!({"success": false, "message": "Lista vazia"}));

        assert_eq!(
            block_on(vm.submit(&draft())),
            Err(PageError::Api(ApiError::Rejected("Lista vazia".into())))
        );
    }

    #[test]
    fn templates_load_feeds_the_preview() {
        let (vm, transport) = viewmodel();
        transport.reply_json(200, catalog_json());

        let catalog = block_on(vm.load_templates(&CancellationToken::new())).unwrap().ready().unwrap();

        assert_eq!(catalog.names, vec!["promo_bf".to_string()]);
        assert_eq!(vm.template_names(), vec!["promo_bf".to_string()]);
        assert_eq!(vm.preview(Some("promo_bf"), 0), vec![PreviewBlock::Body("Oi Ana".into())]);

        let sent = transport.last_request().unwrap();
        assert!(sent.url.ends_with("/get-templates"));
        let OutgoingBody::Text(body) = sent.body else {
            panic!("expected json body");
        };
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["authToken"], "tok");
        assert_eq!(body["token"], "tok");
    }

    #[test]
    fn templates_arriving_after_the_view_is_gone_are_dropped() {
        let (vm, transport) = viewmodel();
        transport.reply_json(200, catalog_json());
        let scope = CancellationToken::new();
        scope.cancel();

        assert_eq!(block_on(vm.load_templates(&scope)), Ok(Loaded::Discarded));
        assert!(vm.template_names().is_empty());
        assert_eq!(vm.preview(Some("promo_bf"), 0), vec![PreviewBlock::Loading(crate::services::template_preview::LOADING_TEXT.into())]);
    }

    #[test]
    fn rejected_templates_use_the_default_message() {
        let (vm, transport) = viewmodel();
        transport.reply_json(200, json!({"success": false}));

        assert_eq!(
            block_on(vm.load_templates(&CancellationToken::new())),
            Err(PageError::Api(ApiError::Rejected(TEMPLATES_FAILED.into())))
        );
        assert!(vm.template_names().is_empty());
    }
}
