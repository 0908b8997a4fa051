pub mod api_client;
pub mod credential_store;
pub mod endpoints;
pub mod template_preview;
pub mod transport;

pub use api_client::{ApiClient, ApiResponse, AuthInjection, CallOptions, NotAttachedReason, RequestBody};
pub use credential_store::CredentialStore;
pub use endpoints::Endpoint;
pub use template_preview::{render, render_selection, MediaKind, PreviewBlock};
pub use transport::{FilePart, HttpTransport, Method, MultipartForm, RawResponse, TransportError};

#[cfg(target_arch = "wasm32")]
pub use transport::BrowserTransport;
