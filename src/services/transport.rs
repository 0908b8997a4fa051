// ============================================================================
// TRANSPORT - SOLO comunicación HTTP (stateless)
// ============================================================================
// El ApiClient prepara el request completo (URL, headers, cuerpo con
// credenciales); el transporte solo lo envía y devuelve status + texto.
// En el navegador se usa gloo-net; en tests un transporte guionizado.
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Post,
    Get,
    Put,
    Delete,
}

impl Method {
    /// `fetch` no envía cuerpo en GET
    pub fn carries_body(self) -> bool {
        self != Method::Get
    }
}

/// Archivo opaco (p.ej. la planilla de contactos), nunca se parsea
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartValue {
    Text(String),
    File(FilePart),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartField {
    pub name: String,
    pub value: MultipartValue,
}

/// Formulario multipart en el orden en que se agregan los campos
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<MultipartField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField {
            name: name.into(),
            value: MultipartValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.fields.push(MultipartField {
            name: name.into(),
            value: MultipartValue::File(file),
        });
        self
    }

    pub fn fields(&self) -> &[MultipartField] {
        &self.fields
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match &field.value {
            MultipartValue::Text(text) if field.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn get_file(&self, name: &str) -> Option<&FilePart> {
        self.fields.iter().find_map(|field| match &field.value {
            MultipartValue::File(file) if field.name == name => Some(file),
            _ => None,
        })
    }
}

/// Cuerpo ya listo para la red
#[derive(Clone, Debug, PartialEq)]
pub enum OutgoingBody {
    /// Métodos sin cuerpo
    Empty,
    Text(String),
    Multipart(MultipartForm),
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: OutgoingBody,
}

impl OutgoingRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fallo antes de tener respuesta HTTP (red caída, CORS, request inválido)
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use async_trait::async_trait;
    use gloo_net::http::Request;
    use wasm_bindgen::JsValue;

    use super::{
        HttpTransport, Method, MultipartForm, MultipartValue, OutgoingBody, OutgoingRequest,
        RawResponse, TransportError,
    };

    /// `fetch` del navegador vía gloo-net
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserTransport;

    fn js_error(err: JsValue) -> TransportError {
        TransportError(format!("{:?}", err))
    }

    fn to_form_data(form: &MultipartForm) -> Result<web_sys::FormData, TransportError> {
        let data = web_sys::FormData::new().map_err(js_error)?;
        for field in form.fields() {
            match &field.value {
                MultipartValue::Text(text) => {
                    data.append_with_str(&field.name, text).map_err(js_error)?;
                }
                MultipartValue::File(file) => {
                    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
                    let parts = js_sys::Array::of1(&bytes);
                    let options = web_sys::BlobPropertyBag::new();
                    options.set_type(&file.mime_type);
                    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                        .map_err(js_error)?;
                    data.append_with_blob_and_filename(&field.name, &blob, &file.file_name)
                        .map_err(js_error)?;
                }
            }
        }
        Ok(data)
    }

    #[async_trait(?Send)]
    impl HttpTransport for BrowserTransport {
        async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
            let mut builder = match request.method {
                Method::Post => Request::post(&request.url),
                Method::Get => Request::get(&request.url),
                Method::Put => Request::put(&request.url),
                Method::Delete => Request::delete(&request.url),
            };
            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }

            // fetch no admite cuerpo en GET
            let prepared = match (request.method, request.body) {
                (Method::Get, _) | (_, OutgoingBody::Empty) => builder.build(),
                (_, OutgoingBody::Text(text)) => builder.body(text),
                (_, OutgoingBody::Multipart(form)) => builder.body(to_form_data(&form)?),
            }
            .map_err(|e| TransportError(format!("Request build error: {}", e)))?;

            let response = prepared
                .send()
                .await
                .map_err(|e| TransportError(format!("Network error: {}", e)))?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(RawResponse { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_keeps_field_order_and_lookup() {
        let form = MultipartForm::new()
            .text("campaignName", "Natal")
            .file(
                "contacts",
                FilePart { file_name: "lista.csv".into(), mime_type: "text/csv".into(), bytes: b"a;b".to_vec() },
            )
            .text("token", "abc");

        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["campaignName", "contacts", "token"]);
        assert_eq!(form.get_text("token"), Some("abc"));
        assert_eq!(form.get_text("contacts"), None);
        assert_eq!(form.get_file("contacts").map(|f| f.bytes.len()), Some(3));
    }

    #[test]
    fn only_get_goes_without_body() {
        assert!(Method::Post.carries_body());
        assert!(Method::Delete.carries_body());
        assert!(!Method::Get.carries_body());
    }

    #[test]
    fn only_2xx_is_ok() {
        assert!(RawResponse { status: 204, body: String::new() }.is_ok());
        assert!(!RawResponse { status: 301, body: String::new() }.is_ok());
        assert!(!RawResponse { status: 401, body: String::new() }.is_ok());
    }
}
