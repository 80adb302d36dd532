use anyhow::Result;
use clap::Parser;

use placepin::cli::{Cli, Commands};
use placepin::config::{StaticConfig, init_config};
use placepin::runtime::modes;
use placepin::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => StaticConfig::load_from(path),
        None => StaticConfig::load(),
    };
    init_config(config);

    // guard 必须存活到进程退出，否则日志缓冲不会刷出
    let _guard = init_logging(placepin::config::get_config());

    match cli.command {
        None | Some(Commands::Serve) => modes::run_server().await,
        Some(command) => modes::run_cli(command).await,
    }
}
