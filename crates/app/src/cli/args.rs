pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "blobshare")]
#[command(about = "Share blobs on a content-addressed server through signed share claims")]
pub struct Args {
    /// Blob server to talk to (overrides the configured server_url)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the blobshare config directory (defaults to ~/.blobshare)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
