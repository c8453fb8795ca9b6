use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::signing::SigningService;
use crate::storage::BlobStorage;

use super::error::ShareError;
use super::resolve::SelectedItem;
use super::sharer::Sharer;
use super::url::{absolute_share_url, anchor_text};

/// Supplies the items currently selected by the user
pub trait SelectionSource: Send + Sync + 'static {
    fn selection(&self) -> Vec<SelectedItem>;
}

impl<F> SelectionSource for F
where
    F: Fn() -> Vec<SelectedItem> + Send + Sync + 'static,
{
    fn selection(&self) -> Vec<SelectedItem> {
        self()
    }
}

/// Receives the outcome of a share
pub trait ShareNotifier: Send + Sync + 'static {
    /// Display `url`, labelled with `anchor_text`
    fn show_shared_url(&self, url: &str, anchor_text: &str);
    /// Report a failed share
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared { url: String, anchor_text: String },
    Failed(String),
}

/// Notifier that forwards outcomes over a channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: flume::Sender<ShareOutcome>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, flume::Receiver<ShareOutcome>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }
}

impl ShareNotifier for ChannelNotifier {
    fn show_shared_url(&self, url: &str, anchor_text: &str) {
        let outcome = ShareOutcome::Shared {
            url: url.to_string(),
            anchor_text: anchor_text.to_string(),
        };
        if let Err(e) = self.tx.send(outcome) {
            tracing::debug!("dropped share outcome, receiver is gone: {:?}", e.into_inner());
        }
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.tx.send(ShareOutcome::Failed(message.to_string())) {
            tracing::debug!("dropped share outcome, receiver is gone: {:?}", e.into_inner());
        }
    }
}

/// User-triggered share of the current selection.
///
/// Each trigger runs as its own task and reports through the notifier:
///  the absolute URL on success, the error message otherwise. A running
///  share is not cancelled; it ends in one of the two outcomes.
pub struct ShareAction<S, G> {
    sharer: Sharer<S, G>,
    ui_root: String,
    source: Arc<dyn SelectionSource>,
    notifier: Arc<dyn ShareNotifier>,
}

impl<S: Clone, G: Clone> Clone for ShareAction<S, G> {
    fn clone(&self) -> Self {
        Self {
            sharer: self.sharer.clone(),
            ui_root: self.ui_root.clone(),
            source: self.source.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<S: fmt::Debug, G: fmt::Debug> fmt::Debug for ShareAction<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareAction")
            .field("sharer", &self.sharer)
            .field("ui_root", &self.ui_root)
            .finish_non_exhaustive()
    }
}

impl<S: BlobStorage, G: SigningService> ShareAction<S, G> {
    pub fn new(
        sharer: Sharer<S, G>,
        ui_root: impl Into<String>,
        source: Arc<dyn SelectionSource>,
        notifier: Arc<dyn ShareNotifier>,
    ) -> Self {
        Self {
            sharer,
            ui_root: ui_root.into(),
            source,
            notifier,
        }
    }

    /// Share the current selection in the background.
    ///
    /// `location` is the address the UI is being served from; the server
    ///  prefix of the share URL is taken from it.
    pub fn trigger(&self, location: impl Into<String>) -> JoinHandle<()> {
        let action = self.clone();
        let location = location.into();
        tokio::spawn(async move {
            match action.execute(&location).await {
                Ok(url) => action.notifier.show_shared_url(&url, &anchor_text(&url)),
                Err(e) => {
                    tracing::warn!("share failed: {}", e);
                    action.notifier.alert(&e.to_string());
                }
            }
        })
    }

    async fn execute(&self, location: &str) -> Result<String, ShareError> {
        let selection = self.source.selection();
        let share = self.sharer.share(&selection).await?;
        Ok(absolute_share_url(location, &self.ui_root, &share.path)?)
    }
}
