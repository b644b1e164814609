use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cards::cards_from_results;
use crate::platform::{ChatApi, InlineQuery};
use crate::spotify::auth::AccessTokenSource;
use crate::spotify::CatalogSearch;

/// Answers inline queries with Spotify search results.
pub struct SearchPipeline {
    chat: Arc<dyn ChatApi>,
    catalog: Arc<dyn CatalogSearch>,
    auth: Arc<dyn AccessTokenSource>,
    limit: u32,
}

impl SearchPipeline {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        catalog: Arc<dyn CatalogSearch>,
        auth: Arc<dyn AccessTokenSource>,
        limit: u32,
    ) -> Self {
        Self {
            chat,
            catalog,
            auth,
            limit,
        }
    }

    pub async fn handle(&self, query: &InlineQuery) -> Result<()> {
        // Empty queries get neither a search nor an answer.
        if query.query.trim().is_empty() {
            debug!("Ignoring empty inline query {}", query.id);
            return Ok(());
        }

        let token = self
            .auth
            .access_token()
            .await
            .context("Failed to obtain Spotify access token")?;

        let results = self
            .catalog
            .search(&token, &query.query, self.limit)
            .await
            .with_context(|| format!("Spotify search for {:?} failed", query.query))?;

        let cards = cards_from_results(&results);

        info!(
            "Inline query {} ({:?}): {} results, {} cards",
            query.id,
            query.query,
            results.total(),
            cards.len()
        );

        self.chat.answer_inline_query(&query.id, cards).await
    }
}
