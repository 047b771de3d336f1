use anyhow::Context;
use dotenvy::dotenv;
use muse_service::{app_module::AppState, app_router::build_app, config::Config};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env().context("failed to read configuration")?;

    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    if config.is_dev() {
        tracing::subscriber::set_global_default(
            subscriber_builder
                .compact()
                .pretty()
                .with_ansi(true)
                .finish(),
        )
        .context("setting dev subscriber failed")?;
    } else {
        tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )
        .context("setting prod subscriber failed")?;
    }

    let state = AppState::from_config(&config);

    // A corrupt history file stops startup rather than being overwritten later.
    let existing = state
        .service
        .history_service
        .load()
        .await
        .with_context(|| format!("unable to load {}", config.history_file.display()))?;
    tracing::info!(
        "Loaded {} history records from {}",
        existing.len(),
        config.history_file.display()
    );

    let app = build_app(state, config.request_timeout());

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("unable to bind {}", config.bind_address))?;

    tracing::info!(
        "Server started, listening on {} using {:?}",
        config.bind_address,
        config.provider
    );
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
