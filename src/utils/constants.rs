// Claves de almacenamiento (siempre bajo el prefijo de NamespacedStorage)

pub const STORAGE_KEY_LOGGED_IN: &str = "isLoggedIn";
pub const STORAGE_KEY_AUTH_TOKEN: &str = "authToken";
pub const STORAGE_KEY_USER_ID: &str = "userId";
pub const STORAGE_KEY_USER_DATA: &str = "userData";
pub const STORAGE_KEY_WABA_CONFIG: &str = "wabaConfig";
pub const STORAGE_KEY_PROFILE: &str = "profile";
pub const STORAGE_KEY_REMEMBER_ME: &str = "rememberMe";

/// Campo multipart del archivo de contactos
pub const CONTACTS_FIELD: &str = "contacts";

pub const MIN_PASSWORD_LENGTH: usize = 6;
