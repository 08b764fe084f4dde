use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CuraMind";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed CORS allow-list for the office front-ends.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "https://app.curamind.example",
];

pub fn default_log_filter() -> String {
    "curamind=info,tower_http=warn".to_string()
}

/// Get the application data directory (~/CuraMind/ on all platforms)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("CuraMind")
}

/// Default database path inside the data directory.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("curamind.db")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Runtime settings, loaded once at startup and passed explicitly — no
/// module-level globals.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: "PORT",
                value: raw,
            })?,
            Err(_) => 4000,
        };

        let database_path = std::env::var("CURAMIND_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Self {
            port,
            database_path,
            jwt_secret,
            openai_api_key,
            openai_base_url,
            openai_model,
        })
    }

    /// Fixed settings for tests: in-memory-ish defaults, stable secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            database_path: PathBuf::from(":memory:"),
            jwt_secret: "test-jwt-secret".into(),
            openai_api_key: String::new(),
            openai_base_url: "http://127.0.0.1:1".into(),
            openai_model: "gpt-4o-mini".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("CuraMind"));
    }

    #[test]
    fn default_database_path_under_app_data() {
        let db = default_database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("curamind.db"));
    }

    #[test]
    fn app_name_is_curamind() {
        assert_eq!(APP_NAME, "CuraMind");
    }

    #[test]
    fn allow_list_is_fixed_and_nonempty() {
        assert!(!ALLOWED_ORIGINS.is_empty());
        assert!(ALLOWED_ORIGINS.iter().all(|o| o.starts_with("http")));
    }

    // Environment variables are process-global, so every from_env scenario
    // runs inside one test to keep the harness's parallel runs from racing.
    #[test]
    fn from_env_scenarios() {
        // Missing JWT_SECRET is the only hard failure.
        std::env::remove_var("JWT_SECRET");
        std::env::remove_var("PORT");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("JWT_SECRET")));

        // Defaults: port 4000, OpenAI endpoint/model, empty API key.
        std::env::set_var("JWT_SECRET", "env-test-secret");
        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("OPENAI_BASE_URL");
        std::env::remove_var("OPENAI_MODEL");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 4000);
        assert_eq!(settings.jwt_secret, "env-test-secret");
        assert!(settings.openai_api_key.is_empty());
        assert_eq!(settings.openai_base_url, "https://api.openai.com");
        assert_eq!(settings.openai_model, "gpt-4o-mini");

        // Explicit PORT wins; a non-numeric one is rejected with the value.
        std::env::set_var("PORT", "8123");
        assert_eq!(Settings::from_env().unwrap().port, 8123);

        std::env::set_var("PORT", "not-a-port");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar { var: "PORT", ref value } if value == "not-a-port"
        ));

        std::env::remove_var("PORT");
        std::env::remove_var("JWT_SECRET");
    }
}
