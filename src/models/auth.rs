use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::response::{is_truthy, value_as_i64, value_as_text};

/// Credenciales que viajan en el cuerpo de cada request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, user_id: Option<i64>) -> Self {
        Self {
            token: token.into(),
            user_id,
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Perfil del usuario. El servidor usa `nome`; el cache antiguo guardaba `name`.
/// Se lee campo a campo desde el objeto: un campo con otro tipo no tumba el perfil.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for UserProfile {
    fn from(mut fields: Map<String, Value>) -> Self {
        let id = fields.remove("id").as_ref().and_then(value_as_i64);
        let nome = fields.remove("nome").as_ref().and_then(value_as_text);
        let name = fields.remove("name").as_ref().and_then(value_as_text);
        let email = fields.remove("email").as_ref().and_then(value_as_text);
        Self {
            id,
            nome: nome.or(name),
            email,
            extra: fields,
        }
    }
}

impl UserProfile {
    /// `None` si el valor no es un objeto
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self::from)
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Aplica los campos presentes en `patch` sobre este perfil
    pub fn merge(&mut self, patch: UserProfile) {
        if patch.id.is_some() {
            self.id = patch.id;
        }
        if patch.nome.is_some() {
            self.nome = patch.nome;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        self.extra.extend(patch.extra);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "rememberMe")]
    pub remember_me: bool,
}

/// Respuesta del login, leída campo a campo desde el JSON crudo
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginResponse {
    pub success: Value,
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub user_id: Option<i64>,
    pub message: Option<String>,
}

impl LoginResponse {
    /// Nunca falla: campos ausentes o con otro tipo quedan en `None`
    pub fn from_value(response: &Value) -> Self {
        let field = |key: &str| response.get(key).filter(|v| !v.is_null());
        Self {
            success: field("success").cloned().unwrap_or(Value::Null),
            token: field("token")
                .and_then(value_as_text)
                .filter(|token| !token.is_empty()),
            user: field("user").and_then(UserProfile::from_value),
            user_id: field("userId").and_then(value_as_i64),
            message: field("message").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// `success` truthy o presencia de token
    pub fn is_accepted(&self) -> bool {
        is_truthy(&self.success) || self.token.is_some()
    }

    /// `user.id`, si no `userId` de la respuesta
    pub fn resolved_user_id(&self) -> Option<i64> {
        self.user
            .as_ref()
            .and_then(|user| user.id)
            .or(self.user_id)
    }
}

/// Resultado estructurado de login para la vista
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginResult {
    pub success: bool,
    pub message: Option<String>,
}

impl LoginResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
