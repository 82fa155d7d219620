use tracing_subscriber::EnvFilter;

use research_assistant::api;
use research_assistant::config::Config;
use research_assistant::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "LLM provider: {} ({}), chat model {}, embedding model {}",
        config.llm.provider,
        config.llm.base_url,
        config.llm.chat_model,
        config.llm.embedding_model
    );
    if config.llm.provider == "openai" && config.llm.api_key.is_none() {
        tracing::warn!("No LLM_API_KEY or GROQ_API_KEY set; requests will be unauthenticated");
    }

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
