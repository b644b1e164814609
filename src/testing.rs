//! Recording fakes of the outbound seams, shared by the unit tests.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::bot::ErrorReporter;
use crate::platform::{ChatApi, Keyboard, ResultCard};
use crate::spotify::auth::AccessTokenSource;
use crate::spotify::{CatalogSearch, SearchResults};

pub type SentMessage = (i64, String, Option<Keyboard>);

#[derive(Default)]
pub struct RecordingChat {
    fail: bool,
    sent: Mutex<Vec<SentMessage>>,
    answers: Mutex<Vec<(String, Vec<ResultCard>)>>,
}

impl RecordingChat {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn answers(&self) -> Vec<(String, Vec<ResultCard>)> {
        self.answers.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for RecordingChat {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        if self.fail {
            anyhow::bail!("send_message failed");
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id, text.to_string(), keyboard));
        Ok(())
    }

    async fn answer_inline_query(&self, query_id: &str, cards: Vec<ResultCard>) -> Result<()> {
        if self.fail {
            anyhow::bail!("answer_inline_query failed");
        }
        self.answers
            .lock()
            .unwrap()
            .push((query_id.to_string(), cards));
        Ok(())
    }
}

/// Returns canned results, or fails like an unreachable network.
#[derive(Default)]
pub struct FakeCatalog {
    results: SearchResults,
    fail: bool,
    calls: Mutex<Vec<(String, String, u32)>>,
}

impl FakeCatalog {
    pub fn returning(results: SearchResults) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(access_token, query, limit)` per call
    pub fn calls(&self) -> Vec<(String, String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search(&self, access_token: &str, query: &str, limit: u32) -> Result<SearchResults> {
        self.calls
            .lock()
            .unwrap()
            .push((access_token.to_string(), query.to_string(), limit));
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.results.clone())
    }
}

#[derive(Default)]
pub struct StaticToken {
    fail: bool,
    requests: Mutex<usize>,
}

impl StaticToken {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        *self.requests.lock().unwrap() += 1;
        if self.fail {
            anyhow::bail!("token endpoint unavailable");
        }
        Ok("test-token".to_string())
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    /// `(context, error)` per report
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, context: &str, error: &anyhow::Error) {
        self.reports
            .lock()
            .unwrap()
            .push((context.to_string(), format!("{:#}", error)));
    }
}
