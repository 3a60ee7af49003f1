use clap::Parser;
use mbtserve::ServeResult;
use mbtserve::config::args::Args;
use mbtserve::config::env::{Env as _, OsEnv};
use mbtserve::config::file::{Config, read_config};
use mbtserve::logging::{init_tracing, log_filter};
use mbtserve::srv::new_server;
use tracing::{Level, enabled, error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

async fn start(args: Args, env: &OsEnv) -> ServeResult<()> {
    info!("Starting mbtserve v{VERSION}");

    let save_config = args.meta.save_config.clone();
    let mut config = if let Some(ref cfg_filename) = args.meta.config {
        info!("Using {}", cfg_filename.display());
        read_config(cfg_filename, env)?
    } else {
        Config::default()
    };

    args.merge_into_config(&mut config)?;
    config.finalize()?;
    let resolver = config.resolve().await?;

    if let Some(file_name) = save_config {
        config.save_to_file(file_name.as_path())?;
    } else {
        info!("Use --save-config to save or print mbtserve configuration.");
    }

    let (server, listen_addresses) = new_server(config.srv, resolver)?;
    info!("mbtserve has been started on {listen_addresses}.");
    info!("Use http://{listen_addresses}/metadata to see the archive metadata.");

    server.await
}

#[tokio::main]
async fn main() {
    let env = OsEnv;
    init_tracing(
        &log_filter(env.get_env_str("RUST_LOG")),
        env.get_env_str("MBTSERVE_FORMAT"),
    );

    let args = Args::parse();
    if let Err(e) = start(args, &env).await {
        // Ensure the message is printed, even if the logging is disabled
        if enabled!(Level::ERROR) {
            error!("{e}");
        } else {
            eprintln!("{e}");
        }
        std::process::exit(e.exit_code());
    }
}
