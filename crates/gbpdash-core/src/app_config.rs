#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub directory_access_token: Option<String>,
    pub directory_base_url: String,
    pub directory_reviews_base_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub directory_request_timeout_secs: u64,
    pub directory_user_agent: String,
    pub sync_max_concurrent_locations: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "directory_access_token",
                &self.directory_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("directory_base_url", &self.directory_base_url)
            .field(
                "directory_reviews_base_url",
                &self.directory_reviews_base_url,
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "directory_request_timeout_secs",
                &self.directory_request_timeout_secs,
            )
            .field("directory_user_agent", &self.directory_user_agent)
            .field(
                "sync_max_concurrent_locations",
                &self.sync_max_concurrent_locations,
            )
            .finish()
    }
}
