/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Workflow store backend: `memory`, `file:<path>`, or an `http(s)://`
    /// base URL for a remote catalogue (default: `memory`).
    pub workflow_store: String,
    /// Base URL that relative workflow endpoints resolve against, if any.
    pub workflow_base_url: Option<String>,
    /// Upstream sink for feedback records; log-only when unset.
    pub feedback_sink_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `WORKFLOW_STORE`       | `memory`                   |
    /// | `WORKFLOW_BASE_URL`    | (unset)                    |
    /// | `FEEDBACK_SINK_URL`    | (unset)                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let workflow_store =
            std::env::var("WORKFLOW_STORE").unwrap_or_else(|_| "memory".into());

        let workflow_base_url = std::env::var("WORKFLOW_BASE_URL").ok();
        let feedback_sink_url = std::env::var("FEEDBACK_SINK_URL").ok();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            workflow_store,
            workflow_base_url,
            feedback_sink_url,
        }
    }
}
