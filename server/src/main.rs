use std::sync::Arc;

use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;

// Error tracing
use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::AppState;
use server::database;
use server::handlers::http::routes;
use server::handlers::http::utils::internal_error_response;

#[derive(Parser, Debug)]
#[command(about = "Auth service for the dashboard starter")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = shared::config::load_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    // load_config has already rejected a missing or too-short secret, so this
    // resolves; it is read once here and passed explicitly through AppState.
    let jwt_secret = config
        .auth
        .resolved_jwt_secret()
        .context("No signing secret configured")?;

    let db = database::connect(&config.database.url, config.database.pool_size).await?;
    database::init_schema(&db)
        .await
        .context("Failed to initialize database schema")?;

    let addr = config.server.addr();
    let state = AppState {
        db,
        config: Arc::new(config),
        jwt_secret: Arc::new(jwt_secret),
    };
    let router: Arc<routes::Router> = Arc::new(routes::build_api_router());
    let limiter = server::connection_limiter(state.config.server.max_connections);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    loop {
        // Accept only while below the connection cap; the permit rides in the
        // connection task and is released when it finishes.
        let permit = limiter
            .clone()
            .acquire_owned()
            .await
            .context("Connection limiter closed")?;
        let (stream, peer) = listener.accept().await.context("Accept failed")?;
        let io = TokioIo::new(stream);
        let router = router.clone();
        let state = state.clone();

        tokio::task::spawn(async move {
            let _permit = permit;
            // Handle the connection using HTTP1 and pass any requests
            // received on it through the router.
            let service = service_fn(move |req| {
                let router = router.clone();
                let state = state.clone();
                async move {
                    // Outermost error boundary: anything a handler failed to
                    // turn into a response becomes a generic 500 with no
                    // internal detail in the body.
                    match router.route(req, state).await {
                        Ok(response) => Ok::<_, std::convert::Infallible>(response),
                        Err(err) => {
                            error!("Unhandled handler error: {:#}", err);
                            Ok(internal_error_response())
                        }
                    }
                }
            });

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}
