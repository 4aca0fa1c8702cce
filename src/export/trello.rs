//! Trello card export
//!
//! Creates one card per export on the configured list, then looks the list
//! up to record its name. Attachments are not uploaded.
//!
//! # Feature flag
//!
//! Enable with `--features trello`. Requires the `reqwest` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TrelloConfig;
use crate::core::error::ExportError;
use crate::core::order::{ExportKind, ExportRecord, Order, TrelloExportMetadata};
use crate::core::service::ExportSink;
use crate::export::card_description;

const TRELLO_API: &str = "https://api.trello.com";
const BOARD_NAME: &str = "Your Board";
const SINK: &str = "trello";

#[derive(Serialize)]
struct NewCard<'a> {
    name: &'a str,
    desc: String,
    #[serde(rename = "idList")]
    id_list: &'a str,
}

#[derive(Deserialize)]
struct Card {
    id: String,
    url: String,
}

#[derive(Deserialize)]
struct List {
    name: String,
}

fn request_error(err: reqwest::Error) -> ExportError {
    ExportError::Request {
        sink: SINK.to_string(),
        message: err.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct TrelloExportSink {
    client: reqwest::Client,
    config: TrelloConfig,
    base_url: String,
}

impl TrelloExportSink {
    pub fn new(config: TrelloConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: TRELLO_API.to_string(),
        }
    }

    /// Point the sink at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [("key", &self.config.api_key), ("token", &self.config.token)]
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ExportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ExportError::Rejected {
            sink: SINK.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn create_card(&self, order: &Order) -> Result<Card, ExportError> {
        let response = self
            .client
            .post(format!("{}/1/cards", self.base_url))
            .query(&self.auth())
            .json(&NewCard {
                name: &order.title,
                desc: card_description(order),
                id_list: &self.config.list_id,
            })
            .send()
            .await
            .map_err(request_error)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(request_error)
    }

    async fn fetch_list(&self) -> Result<List, ExportError> {
        let response = self
            .client
            .get(format!("{}/1/lists/{}", self.base_url, self.config.list_id))
            .query(&self.auth())
            .send()
            .await
            .map_err(request_error)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(request_error)
    }
}

#[async_trait]
impl ExportSink for TrelloExportSink {
    fn kind(&self) -> ExportKind {
        ExportKind::Trello
    }

    async fn export(&self, order: &Order) -> Result<ExportRecord, ExportError> {
        if !self.config.is_configured() {
            return Err(ExportError::NotConfigured {
                sink: SINK.to_string(),
            });
        }

        let card = self.create_card(order).await?;
        let list = self.fetch_list().await?;
        tracing::info!(order_id = %order.id, card_id = %card.id, "trello card created");

        Ok(TrelloExportMetadata {
            card_id: card.id,
            card_url: card.url,
            board_name: BOARD_NAME.to_string(),
            list_id: self.config.list_id.clone(),
            list_name: list.name,
        }
        .into_record())
    }
}
