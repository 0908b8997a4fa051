// ============================================================================
// ENDPOINTS - Tabla estática nombre → path bajo la URL base del webhook
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Logout,
    ListBlasts,
    CreateBlast,
    GetBlast,
    Profile,
    UpdateProfile,
    ChangePassword,
    GetWabaConfig,
    UpdateWabaConfig,
    ListTemplates,
    /// Alias antiguo de ListTemplates, es el que responde `templateMeta`
    GetTemplates,
}

impl Endpoint {
    pub const ALL: [Endpoint; 12] = [
        Endpoint::Login,
        Endpoint::Logout,
        Endpoint::ListBlasts,
        Endpoint::CreateBlast,
        Endpoint::GetBlast,
        Endpoint::Profile,
        Endpoint::UpdateProfile,
        Endpoint::ChangePassword,
        Endpoint::GetWabaConfig,
        Endpoint::UpdateWabaConfig,
        Endpoint::ListTemplates,
        Endpoint::GetTemplates,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/auth-login",
            Endpoint::Logout => "/auth-logout",
            Endpoint::ListBlasts => "/blasts",
            Endpoint::CreateBlast => "/blasts-create",
            Endpoint::GetBlast => "/blasts-get",
            Endpoint::Profile => "/profile",
            Endpoint::UpdateProfile => "/profile-update",
            Endpoint::ChangePassword => "/profile-change-password",
            Endpoint::GetWabaConfig => "/get-waba-config",
            Endpoint::UpdateWabaConfig => "/waba-config",
            Endpoint::ListTemplates => "/templates",
            Endpoint::GetTemplates => "/get-templates",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Login => "login",
            Endpoint::Logout => "logout",
            Endpoint::ListBlasts => "list-blasts",
            Endpoint::CreateBlast => "create-blast",
            Endpoint::GetBlast => "get-blast",
            Endpoint::Profile => "profile",
            Endpoint::UpdateProfile => "update-profile",
            Endpoint::ChangePassword => "change-password",
            Endpoint::GetWabaConfig => "get-waba-config",
            Endpoint::UpdateWabaConfig => "update-waba-config",
            Endpoint::ListTemplates => "list-templates",
            Endpoint::GetTemplates => "get-templates",
        }
    }

    pub fn url(self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path())
    }
}

impl FromStr for Endpoint {
    type Err = ApiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .iter()
            .copied()
            .find(|endpoint| endpoint.name() == name)
            .ok_or_else(|| ApiError::UnknownEndpoint(name.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
