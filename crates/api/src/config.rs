use std::path::PathBuf;

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
    /// Timeout in seconds for `/health` and `/{bundle}/save` (default: `120`).
    pub request_timeout_secs: u64,
    /// JSON list of worker `host:port` addresses (default: `servers.json`).
    pub servers_file: PathBuf,
    /// JSON list of per-worker credential objects (default: `sessions.json`).
    pub sessions_file: PathBuf,
    /// Root directory for bundle results (default: `saved`).
    pub saved_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default         |
    /// |------------------------|-----------------|
    /// | `HOST`                 | `0.0.0.0`       |
    /// | `PORT`                 | `3000`          |
    /// | `REQUEST_TIMEOUT_SECS` | `120`           |
    /// | `SERVERS_FILE`         | `servers.json`  |
    /// | `SESSIONS_FILE`        | `sessions.json` |
    /// | `SAVED_DIR`            | `saved`         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let servers_file = env_path("SERVERS_FILE", "servers.json");
        let sessions_file = env_path("SESSIONS_FILE", "sessions.json");
        let saved_dir = env_path("SAVED_DIR", "saved");

        Self {
            host,
            port,
            request_timeout_secs,
            servers_file,
            sessions_file,
            saved_dir,
        }
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
