pub mod auth;
pub mod blast;
pub mod response;
pub mod template;
pub mod waba;

pub use auth::{Credentials, LoginRequest, LoginResponse, LoginResult, UserProfile};
pub use blast::{Blast, BlastStatus, DashboardStats};
pub use template::{
    ComponentExample, HeaderFormat, Template, TemplateButton, TemplateCatalog, TemplateComponent,
};
pub use waba::{CachedWabaConfig, WabaConfig};
