use book_agent::llm::OllamaModel;
use book_agent::search::DuckDuckGo;
use book_agent::telegram::TelegramClient;
use book_agent::{BotConfig, Dispatcher, ReplyAgents, build_reply_workflow, init_tracing, run_polling};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };
    info!(
        model = %config.ollama_model,
        ollama_url = %config.ollama_base_url,
        download_dir = %config.download_dir.display(),
        "Configuration loaded"
    );

    let provider = Arc::new(DuckDuckGo::new()?);
    let model = Arc::new(OllamaModel::new(&config)?);
    let agents = ReplyAgents::from_config(&config, provider, model)?;

    let telegram = Arc::new(TelegramClient::new(&config)?);
    let graph = build_reply_workflow(
        agents.search,
        agents.summary,
        telegram.clone(),
        config.download_dir.clone(),
    );
    let dispatcher = Arc::new(Dispatcher::new(graph, telegram.clone()));

    info!("Bot is running...");
    run_polling(telegram, dispatcher, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await;

    info!("Bot stopped");
    Ok(())
}
