// ============================================================================
// ERRORES - Taxonomía de errores del cliente
// ============================================================================
// ApiError: todo lo que viene del webhook (o de no poder llegar a él)
// ValidationError: validación local, nunca se envía al servidor
// StorageError: fallos del almacenamiento clave-valor del navegador
// PageError: lo que ve una página (validación, API o sesión expirada)
// ============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Fallo de red (`status` = None) o respuesta HTTP fuera de 2xx.
    #[error("{}", request_failed_text(.status, .message))]
    RequestFailed {
        status: Option<u16>,
        message: Option<String>,
    },

    /// Respuesta 2xx cuyo cuerpo no es JSON.
    #[error("Respuesta inválida del servidor: {0}")]
    MalformedResponse(String),

    /// Nombre de endpoint que no está en la tabla.
    #[error("Endpoint desconocido: {0}")]
    UnknownEndpoint(String),

    /// Respuesta 2xx con `success` falso.
    #[error("{0}")]
    Rejected(String),
}

fn request_failed_text(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message) {
        (Some(code), Some(msg)) => format!("HTTP error {}: {}", code, msg),
        (Some(code), None) => format!("HTTP error! status: {}", code),
        (None, Some(msg)) => format!("Network error: {}", msg),
        (None, None) => "Network error".to_string(),
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Errores de validación de formularios. `Display` es el mensaje para el usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor, preencha todos os campos.")]
    MissingLoginFields,

    #[error("Por favor, preencha todos os campos obrigatórios.")]
    MissingFields,

    #[error("Por favor, informe sua senha atual.")]
    CurrentPasswordRequired,

    #[error("As senhas não coincidem.")]
    PasswordMismatch,

    #[error("A nova senha deve ter pelo menos 6 caracteres.")]
    PasswordTooShort,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("No se pudo acceder a localStorage")]
    Unavailable,

    #[error("Error guardando '{0}' en localStorage")]
    Write(String),

    #[error("Error serializando datos: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialize(err.to_string())
    }
}

/// Lo que una página puede devolver a su vista
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// El servidor respondió 401; la sesión ya fue cerrada
    #[error("Sessão expirada. Faça login novamente.")]
    SessionExpired,
}
