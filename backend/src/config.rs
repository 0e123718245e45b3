// Application configuration, loaded from environment variables and CLI flags.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 3000;

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Connection details for the external auth provider used by the landing
/// page to detect signed-in visitors.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Credential for the generative model provider.
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Upper bound on a single provider call.
    pub chat_timeout: Duration,
    /// Directory containing pre-built frontend files to serve.
    /// When set, unknown paths fall through to files under this path.
    pub static_dir: Option<PathBuf>,
    /// Session lookup is only performed when this is set.
    pub auth: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY` - provider credential (required)
    /// - `GEMINI_MODEL` - model identifier (default: `gemini-2.0-flash`)
    /// - `GEMINI_BASE_URL` - provider API base URL
    /// - `CHAT_TIMEOUT_SECS` - provider call timeout (default: 30)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `STATIC_DIR` - Path to frontend dist directory for static file serving
    /// - `SUPABASE_URL` / `SUPABASE_ANON_KEY` - auth provider used for the landing redirect
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_source(&args, |name| std::env::var(name).ok())
    }

    /// Build a configuration from CLI arguments and a variable lookup.
    pub fn from_source<F>(args: &[String], var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let gemini_api_key = var("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = match Self::parse_cli_value(args, "--port") {
            Some(v) => parse_number("--port", &v)?,
            None => match var("PORT") {
                Some(v) => parse_number("PORT", &v)?,
                None => DEFAULT_PORT,
            },
        };

        let chat_timeout = match var("CHAT_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("CHAT_TIMEOUT_SECS", &v)?),
            None => Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
        };

        let gemini_model = var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_base_url = var("GEMINI_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        let static_dir = var("STATIC_DIR").map(PathBuf::from);

        let auth = match (var("SUPABASE_URL"), var("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(AuthConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (Some(_), None) => return Err(ConfigError::Missing("SUPABASE_ANON_KEY")),
            (None, Some(_)) => return Err(ConfigError::Missing("SUPABASE_URL")),
            (None, None) => None,
        };

        Ok(Config {
            port,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            chat_timeout,
            static_dir,
            auth,
        })
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
