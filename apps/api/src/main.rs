mod config;
mod errors;
mod fonts;
mod layout;
mod models;
mod render;
mod routes;
mod state;
mod transliteration;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fonts::{FontRegistry, FontService};
use crate::routes::build_router;
use crate::state::AppState;
use crate::transliteration::Transliterator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Text to PNG API v{}", env!("CARGO_PKG_VERSION"));

    // Register fonts found on the local search path; missing ones degrade at request time
    let registry = Arc::new(FontRegistry::new());
    let fonts = FontService::new(Arc::clone(&registry), &config);
    if fonts.register_local_fonts() == 0 {
        warn!(
            "No fonts found in {:?}; text renders as placeholder boxes until one is available",
            config.font_dirs
        );
    } else {
        info!("Fonts registered: {}", registry.families().join(", "));
    }

    // Initialize transliteration chain
    let transliterator = Transliterator::from_config(&config)?;

    info!(
        "Canvas {}x{} (padding {}, min font size {}px)",
        config.layout.canvas_width,
        config.layout.canvas_height,
        config.layout.width_padding,
        config.layout.min_font_size
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        fonts: Arc::new(fonts),
        transliterator: Arc::new(transliterator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
