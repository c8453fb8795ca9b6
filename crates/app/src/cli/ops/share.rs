use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use blobshare::client::{ApiError, ServerClient};
use blobshare::state::StateError;
use common::share::{ChannelNotifier, SelectedItem, ShareAction, ShareOutcome, Sharer};

#[derive(Args, Debug, Clone)]
pub struct Share {
    /// JSON file holding the selection: an array of
    ///  `{"blobRef": "...", "isDir": "true|false"}` objects
    #[arg(long, conflicts_with = "item")]
    pub selection: Option<PathBuf>,

    /// Item to share, as `<blobRef>` or `<blobRef>:dir` (repeatable)
    #[arg(long = "item")]
    pub item: Vec<String>,

    /// Address the web UI is viewed at; defaults to the server URL joined
    ///  with the configured UI root
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ShareOpError {
    #[error("config error: {0}")]
    State(#[from] StateError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("invalid UI location: {0}")]
    Location(#[from] url::ParseError),
    #[error("could not read selection: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse selection: {0}")]
    Selection(#[from] serde_json::Error),
    #[error("{0}")]
    Failed(String),
}

impl Share {
    fn selection(&self) -> Result<Vec<SelectedItem>, ShareOpError> {
        if let Some(path) = &self.selection {
            let raw = std::fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&raw)?);
        }

        Ok(self.item.iter().map(|item| parse_item(item)).collect())
    }
}

/// `<ref>` is a file, `<ref>:dir` a directory. Anything else after the colon
///  is passed on untouched and rejected during validation.
fn parse_item(item: &str) -> SelectedItem {
    match item.rsplit_once(':') {
        Some((blob_ref, "dir")) => SelectedItem::new(blob_ref, true),
        Some((blob_ref, "file")) => SelectedItem::new(blob_ref, false),
        Some((blob_ref, other)) => {
            let mut selected = SelectedItem::new(blob_ref, false);
            selected.insert(common::share::IS_DIR_KEY, other);
            selected
        }
        None => SelectedItem::new(item, false),
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Share {
    type Error = ShareOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = ctx.config()?;
        let selection = self.selection()?;
        let location = match &self.location {
            Some(location) => location.clone(),
            None => config.ui_location()?.to_string(),
        };

        let client = ServerClient::new(&config.server_url, config.auth_token.as_deref())?;
        let sharer = Sharer::new(client.clone(), client).with_max_set_members(config.max_set_members);

        let (notifier, outcomes) = ChannelNotifier::new();
        let source = move || selection.clone();
        let action = ShareAction::new(sharer, config.ui_root, Arc::new(source), Arc::new(notifier));

        action
            .trigger(location)
            .await
            .map_err(|e| ShareOpError::Failed(e.to_string()))?;

        match outcomes.recv_async().await {
            Ok(ShareOutcome::Shared { url, .. }) => Ok(url),
            Ok(ShareOutcome::Failed(message)) => Err(ShareOpError::Failed(message)),
            Err(e) => Err(ShareOpError::Failed(e.to_string())),
        }
    }
}
