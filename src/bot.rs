use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error};

use crate::commands::CommandHandler;
use crate::platform::IncomingUpdate;
use crate::search::SearchPipeline;

/// Sink for handler failures that were swallowed at the dispatch boundary.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &anyhow::Error);
}

/// Logs swallowed failures through `tracing`
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, error: &anyhow::Error) {
        error!("Error handling {}: {:#}", context, error);
    }
}

/// Routes each update to exactly one handler and never fails.
pub struct UpdateRouter {
    commands: CommandHandler,
    search: SearchPipeline,
    errors: Arc<dyn ErrorReporter>,
}

impl UpdateRouter {
    pub fn new(
        commands: CommandHandler,
        search: SearchPipeline,
        errors: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            commands,
            search,
            errors,
        }
    }

    pub async fn dispatch(&self, update: IncomingUpdate) {
        debug!("Dispatching {} update", update.kind());

        match update {
            IncomingUpdate::TextMessage(message) => {
                let context = format!("message from user {}", message.sender_id);
                self.guarded(context, self.commands.handle(&message)).await;
            }
            IncomingUpdate::InlineQuery(query) => {
                let context = format!(
                    "inline query {} from user {} ({:?})",
                    query.id, query.sender_id, query.query
                );
                self.guarded(context, self.search.handle(&query)).await;
            }
            IncomingUpdate::Other => {}
        }
    }

    async fn guarded<F>(&self, context: String, handler: F)
    where
        F: Future<Output = Result<()>>,
    {
        if let Err(e) = handler.await {
            self.errors.report(&context, &e);
        }
    }
}
