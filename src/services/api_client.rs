// ============================================================================
// API CLIENT - Llamadas al webhook con credenciales inyectadas
// ============================================================================
// El webhook solo lee el cuerpo del request (ni query params ni headers de
// auth), así que token y userId viajan dentro del JSON de cada llamada.
// NO tiene lógica de negocio.
// ============================================================================

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::Credentials;
use crate::services::credential_store::CredentialStore;
use crate::services::endpoints::Endpoint;
use crate::services::transport::{
    HttpTransport, Method, MultipartForm, OutgoingBody, OutgoingRequest, RawResponse,
};

/// Cuerpo tal como lo entrega quien llama
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Valor estructurado
    Json(Value),
    /// JSON ya serializado (o algo que pretende serlo)
    Text(String),
    /// Las credenciales las agrega quien arma el formulario
    Multipart(MultipartForm),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallOptions {
    pub method: Method,
    pub body: Option<RequestBody>,
    pub headers: Vec<(String, String)>,
}

impl CallOptions {
    pub fn json(body: Value) -> Self {
        Self {
            body: Some(RequestBody::Json(body)),
            ..Self::default()
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: Some(RequestBody::Text(body.into())),
            ..Self::default()
        }
    }

    pub fn multipart(form: MultipartForm) -> Self {
        Self {
            body: Some(RequestBody::Multipart(form)),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotAttachedReason {
    /// Texto que no es JSON válido: se envía tal cual
    InvalidJson,
    /// JSON válido pero no es un objeto (array, número...)
    NotAnObject,
    /// Multipart: las credenciales van en el formulario
    Multipart,
    /// GET: el request sale sin cuerpo, y sin credenciales
    BodylessMethod,
}

/// Si las credenciales llegaron o no al cuerpo enviado
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthInjection {
    Attached,
    NotAttached(NotAttachedReason),
}

impl AuthInjection {
    pub fn is_attached(self) -> bool {
        self == AuthInjection::Attached
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub value: Value,
    pub auth: AuthInjection,
}

/// Agrega exactamente `token` y `userId` (las credenciales ganan sobre claves iguales)
pub fn merge_credentials(mut body: Map<String, Value>, credentials: &Credentials) -> Map<String, Value> {
    body.insert("token".to_string(), Value::String(credentials.token.clone()));
    body.insert(
        "userId".to_string(),
        credentials.user_id.map(Value::from).unwrap_or(Value::Null),
    );
    body
}

fn credentials_only(credentials: &Credentials) -> String {
    Value::Object(merge_credentials(Map::new(), credentials)).to_string()
}

/// Prepara el cuerpo final y dice si lleva credenciales
fn prepare_body(body: Option<RequestBody>, credentials: &Credentials) -> (OutgoingBody, AuthInjection) {
    match body {
        None => (
            OutgoingBody::Text(credentials_only(credentials)),
            AuthInjection::Attached,
        ),
        Some(RequestBody::Json(Value::Object(map))) => (
            OutgoingBody::Text(Value::Object(merge_credentials(map, credentials)).to_string()),
            AuthInjection::Attached,
        ),
        Some(RequestBody::Json(other)) => {
            log::warn!("⚠️ Body no es un objeto JSON, auth no agregada");
            (
                OutgoingBody::Text(other.to_string()),
                AuthInjection::NotAttached(NotAttachedReason::NotAnObject),
            )
        }
        Some(RequestBody::Text(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => (
                OutgoingBody::Text(Value::Object(merge_credentials(map, credentials)).to_string()),
                AuthInjection::Attached,
            ),
            Ok(_) => {
                log::warn!("⚠️ Body no es un objeto JSON, auth no agregada");
                (
                    OutgoingBody::Text(text),
                    AuthInjection::NotAttached(NotAttachedReason::NotAnObject),
                )
            }
            Err(e) => {
                log::warn!("⚠️ Body no es JSON válido, auth no agregada: {}", e);
                (
                    OutgoingBody::Text(text),
                    AuthInjection::NotAttached(NotAttachedReason::InvalidJson),
                )
            }
        },
        Some(RequestBody::Multipart(form)) => (
            OutgoingBody::Multipart(form),
            AuthInjection::NotAttached(NotAttachedReason::Multipart),
        ),
    }
}

/// Headers por defecto + los de quien llama (estos ganan)
fn merge_headers(body: &OutgoingBody, custom: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    // El navegador pone el boundary del multipart
    if matches!(body, OutgoingBody::Text(_)) {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }
    for (name, value) in custom {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        headers.push((name, value));
    }
    headers
}

fn interpret(response: RawResponse) -> Result<Value, ApiError> {
    if !response.is_ok() {
        // El cuerpo de error es opcional y puede no ser JSON
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|value| crate::models::response::message_of(&value));
        return Err(ApiError::RequestFailed {
            status: Some(response.status),
            message,
        });
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Cliente API - SOLO comunicación HTTP
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    credentials: CredentialStore,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: CredentialStore,
        transport: Rc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Credenciales vigentes en este momento
    pub fn current_credentials(&self) -> Credentials {
        self.credentials.read()
    }

    /// Llama a un endpoint por nombre (`"list-blasts"`, `"profile"`, ...)
    pub async fn call_named(&self, endpoint: &str, options: CallOptions) -> Result<ApiResponse, ApiError> {
        let endpoint: Endpoint = endpoint.parse()?;
        self.call(endpoint, options).await
    }

    pub async fn call(&self, endpoint: Endpoint, options: CallOptions) -> Result<ApiResponse, ApiError> {
        let url = endpoint.url(&self.base_url);
        let credentials = self.credentials.read();
        let (body, auth) = if options.method.carries_body() {
            prepare_body(options.body, &credentials)
        } else {
            log::warn!("⚠️ {:?} no lleva cuerpo, auth no agregada ({})", options.method, endpoint);
            (
                OutgoingBody::Empty,
                AuthInjection::NotAttached(NotAttachedReason::BodylessMethod),
            )
        };
        let headers = merge_headers(&body, options.headers);

        log::debug!("📡 {} → {}", endpoint, url);

        let request = OutgoingRequest {
            method: options.method,
            url,
            headers,
            body,
        };

        let response = self.transport.send(request).await.map_err(|e| {
            log::error!("❌ API call failed ({}): {}", endpoint, e);
            ApiError::RequestFailed {
                status: None,
                message: Some(e.to_string()),
            }
        })?;

        let value = interpret(response).map_err(|e| {
            log::error!("❌ API call failed ({}): {}", endpoint, e);
            e
        })?;

        Ok(ApiResponse { value, auth })
    }

    /// POST con cuerpo JSON (el caso normal del webhook)
    pub async fn post_json(&self, endpoint: Endpoint, body: Value) -> Result<Value, ApiError> {
        self.call(endpoint, CallOptions::json(body))
            .await
            .map(|response| response.value)
    }
}
