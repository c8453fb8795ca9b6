// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Init, Share, Version};

command_enum! {
    (Init, Init),
    (Share, Share),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = blobshare::logging::init_logging(args.log_level);

    let ctx = cli::op::OpContext::new(args.remote, args.config_path);

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // exit() skips destructors; flush buffered log lines first
    drop(log_guard);
    std::process::exit(code);
}
