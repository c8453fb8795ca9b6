use clap::Args;
use url::Url;

use blobshare::state::{AppConfig, AppState, StateError, DEFAULT_SERVER_URL, DEFAULT_UI_ROOT};
use common::share::DEFAULT_MAX_SET_MEMBERS;

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Base URL of the blob server
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server_url: Url,

    /// Token sent as `Authorization: Token <token>` on every request
    #[arg(long)]
    pub auth_token: Option<String>,

    /// Path the server's web UI is served from
    #[arg(long, default_value = DEFAULT_UI_ROOT)]
    pub ui_root: String,

    /// Most members per static set blob before a selection is split
    #[arg(long, default_value_t = DEFAULT_MAX_SET_MEMBERS)]
    pub max_set_members: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            server_url: self.server_url.clone(),
            auth_token: self.auth_token.clone(),
            ui_root: self.ui_root.clone(),
            max_set_members: self.max_set_members,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized blobshare directory at: {}\n\
             - Config: {}\n\
             - Server: {}\n\
             - UI root: {}\n\
             - Auth token: {}\n\
             - Max set members: {}",
            state.app_dir.display(),
            state.config_path.display(),
            state.config.server_url,
            state.config.ui_root,
            if state.config.auth_token.is_some() {
                "set"
            } else {
                "none"
            },
            state.config.max_set_members,
        );

        Ok(output)
    }
}
