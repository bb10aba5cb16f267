pub mod agents;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod llm;
pub mod models;
pub mod resolve;
pub mod search;
pub mod tasks;
pub mod telegram;
pub mod tools;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use config::BotConfig;
pub use dispatcher::Dispatcher;
pub use error::{BotError, Result};
pub use listener::run_polling;
pub use models::*;
pub use workflow::{ReplyAgents, build_reply_workflow};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing from `RUST_LOG` and `LOG_FORMAT` (`pretty` or JSON)
pub fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "book_agent=debug,dispatch_flow=debug".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}
