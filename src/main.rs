//! Pass Forge - issues barcode passes with signed retrieval URLs.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pass_forge::{
    config::{Cli, Command, RenderConfig, ServeConfig, SignConfig, SignOutputFormat},
    pass::{render_pass, Code128Encoder, PassComposer, PassRequest, PassService},
    server::{create_router, RouterConfig, PASS_ROUTE},
    store::{CloudinaryStore, RetrievalSigner, UrlTtl},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => {
            init_logging(config.verbose);
            run_serve(config).await
        }
        Command::Sign(config) => {
            init_logging(false);
            run_sign(config)
        }
        Command::Render(config) => {
            init_logging(false);
            run_render(config)
        }
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let url_ttl = match UrlTtl::from_secs(config.url_ttl_secs) {
        Ok(ttl) => ttl,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Pass Forge v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Cloud name: {}", config.store.cloud_name);
    info!("  Upload endpoint: {}", config.store.upload_url());
    info!("  Delivery base: {}", config.store.delivery_base_url);
    match config.store.upload_preset {
        Some(ref preset) => info!("  Upload preset: {} (signed)", preset),
        None => info!("  Upload preset: none"),
    }
    info!("  URL lifetime: {}s", config.url_ttl_secs);
    info!("  Upload timeout: {}s (single attempt)", config.upload_timeout_secs);
    if config.cors_origins.is_none() {
        warn!("  CORS: any origin allowed");
    }

    let store = match CloudinaryStore::new(
        &config.store,
        Duration::from_secs(config.upload_timeout_secs),
    ) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create content store client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pass_service = PassService::new(Code128Encoder::default(), store, &config.store)
        .with_composer(PassComposer::new(config.pass_title.clone()))
        .with_url_ttl(url_ttl);

    let router = create_router(pass_service, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  curl -X POST http://{}{} -H 'content-type: application/json' \\", addr, PASS_ROUTE);
    info!(
        "    -d '{{\"memberName\":\"Jane Doe\",\"sessionTime\":\"6:00 PM\",\"sessionDate\":\"2024-01-01\",\"barcodeValue\":\"A12345\"}}'"
    );

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so that `sign` and `render` output on stdout stays clean.
fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "pass_forge=debug,tower_http=debug"
    } else {
        "pass_forge=info,tower_http=info"
    }
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::default().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// Sign Command
// =============================================================================

fn run_sign(config: SignConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let signer = RetrievalSigner::new(
        config.store.delivery_base_url.clone(),
        config.store.cloud_name.clone(),
        config.store.api_key.clone(),
        config.store.api_secret.clone(),
    );
    let signed = match UrlTtl::from_secs(config.ttl)
        .and_then(|ttl| signer.signed_url(&config.public_id, ttl))
    {
        Ok(signed) => signed,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        SignOutputFormat::Url => println!("{}", signed.url),
        SignOutputFormat::Json => {
            let json = serde_json::json!({
                "public_id": config.public_id,
                "url": signed.url,
                "signature": signed.signature,
                "expires_at": signed.expires_at,
                "ttl": config.ttl,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Render Command
// =============================================================================

fn run_render(config: RenderConfig) -> ExitCode {
    let request = PassRequest::new(
        config.member_name,
        config.session_time,
        config.session_date,
        config.barcode_value,
    );
    let composer = PassComposer::new(config.pass_title);

    let image = match render_pass(&Code128Encoder::default(), &composer, &request) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, image.as_str()) {
                eprintln!("Error: failed to write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            info!(bytes = image.len(), path = %path.display(), "Pass written");
        }
        None => println!("{}", image.as_str()),
    }

    ExitCode::SUCCESS
}
