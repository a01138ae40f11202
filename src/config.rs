//! Configuration management for Pass Forge.
//!
//! This module provides a configuration system built on clap that supports:
//! - Command-line arguments
//! - Environment variables (store credentials use the `CLOUDINARY_` names,
//!   server settings use the `PASS_` prefix)
//! - Defaults for every optional setting
//!
//! Configuration is parsed once at startup and handed to the services that
//! need it; nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! - `CLOUDINARY_CLOUD_NAME` - Cloud namespace (required)
//! - `CLOUDINARY_API_KEY` - API key (required)
//! - `CLOUDINARY_API_SECRET` - API secret used for signing (required)
//! - `CLOUDINARY_UPLOAD_PRESET` - Upload preset, signed along with the upload
//! - `PASS_HOST` - Server bind address (default: 0.0.0.0)
//! - `PASS_PORT` - Server port (default: 3000)
//! - `PASS_URL_TTL_SECS` - Lifetime of issued retrieval URLs (default: 3600)
//! - `PASS_UPLOAD_TIMEOUT_SECS` - Upload request timeout (default: 30)
//! - `PASS_TITLE` - Title printed on every pass

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::pass::DEFAULT_PASS_TITLE;
use crate::store::UrlTtl;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Default delivery base URL for signed retrieval URLs.
pub const DEFAULT_DELIVERY_BASE_URL: &str = "https://res.cloudinary.com";

/// Default lifetime of a signed retrieval URL (1 hour).
pub const DEFAULT_URL_TTL_SECS: u64 = 3600;

/// Shortest accepted retrieval URL lifetime.
pub const MIN_URL_TTL_SECS: u64 = 60;

/// Longest accepted retrieval URL lifetime (7 days).
pub const MAX_URL_TTL_SECS: u64 = 7 * 24 * 3600;

/// Default upload timeout in seconds.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Longest accepted upload timeout in seconds.
pub const MAX_UPLOAD_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Pass Forge - barcode session passes with signed retrieval URLs.
#[derive(Parser, Debug, Clone)]
#[command(name = "pass-forge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the parsed arguments and return the selected command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server that issues passes.
    Serve(ServeConfig),

    /// Print a signed retrieval URL for an already uploaded asset.
    Sign(SignConfig),

    /// Compose a pass locally without uploading it.
    Render(RenderConfig),
}

// =============================================================================
// Content Store Configuration
// =============================================================================

/// Credentials and endpoints for the content store.
///
/// Read-only for the lifetime of the process and shared by every request.
#[derive(Args, Debug, Clone)]
pub struct StoreConfig {
    /// Cloud namespace that owns uploaded assets.
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    pub cloud_name: String,

    /// API key sent with uploads and embedded in retrieval URLs.
    #[arg(long, env = "CLOUDINARY_API_KEY")]
    pub api_key: String,

    /// API secret used to sign uploads and retrieval URLs.
    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    pub api_secret: String,

    /// Upload preset. When set it is sent with each upload and included in
    /// the upload signature.
    #[arg(long, env = "CLOUDINARY_UPLOAD_PRESET")]
    pub upload_preset: Option<String>,

    /// Base URL of the upload API.
    #[arg(long, default_value = DEFAULT_API_BASE_URL, env = "CLOUDINARY_API_BASE_URL")]
    pub api_base_url: String,

    /// Base URL used when building retrieval URLs.
    #[arg(long, default_value = DEFAULT_DELIVERY_BASE_URL, env = "CLOUDINARY_DELIVERY_BASE_URL")]
    pub delivery_base_url: String,
}

impl StoreConfig {
    /// Validate the store configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.cloud_name.trim().is_empty() {
            return Err(
                "Cloud name is required. Set --cloud-name or CLOUDINARY_CLOUD_NAME".to_string(),
            );
        }
        if self.cloud_name.contains('/') {
            return Err("Cloud name must not contain '/'".to_string());
        }
        if self.api_key.trim().is_empty() {
            return Err("API key is required. Set --api-key or CLOUDINARY_API_KEY".to_string());
        }
        if self.api_secret.is_empty() {
            return Err(
                "API secret is required. Set --api-secret or CLOUDINARY_API_SECRET".to_string(),
            );
        }
        if matches!(self.upload_preset.as_deref(), Some(p) if p.trim().is_empty()) {
            return Err("Upload preset must not be empty when provided".to_string());
        }

        validate_base_url("api_base_url", &self.api_base_url)?;
        validate_base_url("delivery_base_url", &self.delivery_base_url)?;

        Ok(())
    }

    /// Full upload endpoint for this cloud.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

fn validate_base_url(name: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!(
            "{} must use http or https (got '{}')",
            name, other
        )),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

/// Configuration for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PASS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PASS_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub store: StoreConfig,

    /// Lifetime of issued retrieval URLs in seconds.
    #[arg(long, default_value_t = DEFAULT_URL_TTL_SECS, env = "PASS_URL_TTL_SECS")]
    pub url_ttl_secs: u64,

    /// Timeout for the upload request in seconds. Uploads are attempted once.
    #[arg(long, default_value_t = DEFAULT_UPLOAD_TIMEOUT_SECS, env = "PASS_UPLOAD_TIMEOUT_SECS")]
    pub upload_timeout_secs: u64,

    /// Title printed at the top of every pass.
    #[arg(long, default_value = DEFAULT_PASS_TITLE, env = "PASS_TITLE")]
    pub pass_title: String,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PASS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()?;
        validate_url_ttl(self.url_ttl_secs)?;

        if self.upload_timeout_secs == 0 || self.upload_timeout_secs > MAX_UPLOAD_TIMEOUT_SECS {
            return Err(format!(
                "upload_timeout_secs must be between 1 and {}",
                MAX_UPLOAD_TIMEOUT_SECS
            ));
        }

        if self.pass_title.trim().is_empty() {
            return Err("pass_title must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_url_ttl(ttl: u64) -> Result<(), String> {
    UrlTtl::from_secs(ttl)
        .map(|_| ())
        .map_err(|e| format!("url_ttl_secs: {}", e))
}

// =============================================================================
// Sign Command
// =============================================================================

/// Output format for the `sign` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOutputFormat {
    /// The bare URL
    #[default]
    Url,
    /// JSON with the URL, signature and expiry
    Json,
}

/// Configuration for the `sign` command.
#[derive(Args, Debug, Clone)]
pub struct SignConfig {
    /// Public identifier of the uploaded asset.
    #[arg(long)]
    pub public_id: String,

    #[command(flatten)]
    pub store: StoreConfig,

    /// Lifetime of the URL in seconds.
    #[arg(long, default_value_t = DEFAULT_URL_TTL_SECS)]
    pub ttl: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = SignOutputFormat::Url)]
    pub format: SignOutputFormat,
}

impl SignConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.public_id.trim().is_empty() {
            return Err("public_id must not be empty".to_string());
        }
        self.store.validate()?;
        validate_url_ttl(self.ttl)
    }
}

// =============================================================================
// Render Command
// =============================================================================

/// Configuration for the `render` command.
#[derive(Args, Debug, Clone)]
pub struct RenderConfig {
    /// Member name printed on the pass.
    #[arg(long)]
    pub member_name: String,

    /// Session time printed on the pass.
    #[arg(long)]
    pub session_time: String,

    /// Session date printed on the pass.
    #[arg(long)]
    pub session_date: String,

    /// Value encoded in the barcode.
    #[arg(long)]
    pub barcode_value: String,

    /// Title printed at the top of the pass.
    #[arg(long, default_value = DEFAULT_PASS_TITLE, env = "PASS_TITLE")]
    pub pass_title: String,

    /// Write the SVG document here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================
