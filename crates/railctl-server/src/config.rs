//! Server configuration from flags, environment and `.env`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use railctl_planner::gemini::{DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT_SECS};
use railctl_planner::GeminiConfig;

pub const DEFAULT_PING_MESSAGE: &str = "ping";

/// Decision API for the section controller's desk.
///
/// Every flag can also be set from the environment (or a `.env` file).
#[derive(Debug, Parser)]
#[command(name = "railctl-server", version, about)]
pub struct ServerArgs {
    /// Interface to bind
    #[arg(long, env = "RAILCTL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "RAILCTL_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory holding the `.railctl/` decision store. Without it,
    /// decisions are kept in memory only.
    #[arg(long, env = "RAILCTL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Upper bound on one upstream planning call
    #[arg(long, env = "RAILCTL_AI_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub ai_timeout_secs: u64,

    /// Disable the permissive CORS layer
    #[arg(long)]
    pub no_cors: bool,

    #[arg(long, env = "PING_MESSAGE", default_value = DEFAULT_PING_MESSAGE)]
    pub ping_message: String,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub data_dir: Option<PathBuf>,
    pub gemini: Option<GeminiConfig>,
    pub ping_message: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            data_dir: None,
            gemini: None,
            ping_message: DEFAULT_PING_MESSAGE.to_string(),
        }
    }
}

impl From<ServerArgs> for ApiConfig {
    fn from(args: ServerArgs) -> Self {
        let gemini = args
            .gemini_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|key| {
                GeminiConfig::new(key)
                    .with_model(args.gemini_model)
                    .with_timeout(Duration::from_secs(args.ai_timeout_secs))
            });
        Self {
            host: args.host,
            port: args.port,
            enable_cors: !args.no_cors,
            data_dir: args.data_dir,
            gemini,
            ping_message: args.ping_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ApiConfig {
        let mut argv = vec!["railctl-server"];
        argv.extend_from_slice(args);
        ServerArgs::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--no-cors",
            "--gemini-api-key",
            "secret",
            "--gemini-model",
            "gemini-1.5-flash",
            "--ai-timeout-secs",
            "5",
            "--ping-message",
            "pong",
        ]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert!(!config.enable_cors);
        assert_eq!(config.ping_message, "pong");
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "secret");
        assert_eq!(gemini.model, "gemini-1.5-flash");
        assert_eq!(gemini.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_key_means_unconfigured() {
        let config = parse(&["--gemini-api-key", "  "]);
        assert!(config.gemini.is_none());
    }
}
