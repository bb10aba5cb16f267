use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::telegram::UpdateSource;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Long-polls `source` until `shutdown` resolves, handing every text message
/// to the dispatcher on its own task.
pub async fn run_polling(
    source: Arc<dyn UpdateSource>,
    dispatcher: Arc<Dispatcher>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;

    loop {
        let batch = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping polling");
                break;
            }
            batch = source.updates(offset) => batch,
        };

        let updates = match batch {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Polling for updates failed");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let Some(request) = update.into_request() else {
                debug!("Ignoring non-text update");
                continue;
            };

            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.handle_message(request).await;
            });
        }
    }
}
