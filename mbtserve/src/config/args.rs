use std::path::PathBuf;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

use crate::config::file::Config;
use crate::config::file::srv::{KEEP_ALIVE_DEFAULT, LISTEN_ADDRESSES_DEFAULT, SrvConfig};
use crate::{ServeError, ServeResult};

/// Defines the styles used for the CLI help output.
const HELP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Blue.on_default().bold())
    .usage(AnsiColor::Blue.on_default().bold())
    .literal(AnsiColor::White.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug, PartialEq, Default)]
#[command(
    about,
    version,
    after_help = "Use RUST_LOG environment variable to control logging level, e.g. RUST_LOG=debug or RUST_LOG=mbtserve=debug. Use MBTSERVE_FORMAT to pick the log format: full, compact, bare, pretty or json.",
    styles = HELP_STYLES
)]
pub struct Args {
    #[command(flatten)]
    pub meta: MetaArgs,
    #[command(flatten)]
    pub srv: SrvArgs,
}

// None of these params will be transferred to the config
#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct MetaArgs {
    /// Path to config file. If set, the MBTiles file must be set in the config file too.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Save resulting config to a file or use "-" to print to stdout.
    #[arg(long)]
    pub save_config: Option<PathBuf>,
    /// Path to the MBTiles file to serve.
    #[arg(value_name = "MBTILES_FILE")]
    pub mbtiles: Option<PathBuf>,
}

#[derive(clap::Args, Debug, PartialEq, Default)]
pub struct SrvArgs {
    #[arg(help = format!("Connection keep alive timeout. [DEFAULT: {KEEP_ALIVE_DEFAULT}]"), short, long)]
    pub keep_alive: Option<u64>,
    #[arg(help = format!("The socket address to bind. [DEFAULT: {LISTEN_ADDRESSES_DEFAULT}]"), short, long)]
    pub listen_addresses: Option<String>,
    /// Port to bind on 127.0.0.1, a shortcut for --listen-addresses 127.0.0.1:<PORT>.
    #[arg(short, long, conflicts_with = "listen_addresses")]
    pub port: Option<u16>,
    /// Number of web server workers
    #[arg(short = 'W', long)]
    pub workers: Option<usize>,
}

impl SrvArgs {
    pub(crate) fn merge_into_config(self, srv_config: &mut SrvConfig) {
        // Override config values with the ones from the command line
        if self.keep_alive.is_some() {
            srv_config.keep_alive = self.keep_alive;
        }
        if let Some(port) = self.port {
            srv_config.listen_addresses = Some(format!("127.0.0.1:{port}"));
        }
        if self.listen_addresses.is_some() {
            srv_config.listen_addresses = self.listen_addresses;
        }
        if self.workers.is_some() {
            srv_config.worker_processes = self.workers;
        }
    }
}

impl Args {
    pub fn merge_into_config(self, config: &mut Config) -> ServeResult<()> {
        if self.meta.config.is_some()
            && let Some(path) = self.meta.mbtiles
        {
            return Err(ServeError::ConfigAndArchiveError(path));
        }
        self.srv.merge_into_config(&mut config.srv);
        if self.meta.mbtiles.is_some() {
            config.mbtiles = self.meta.mbtiles;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn cli_no_args() {
        let args = parse(&["mbtserve"]);
        assert_eq!(args, Args::default());
        let mut config = Config::default();
        args.merge_into_config(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn cli_archive_and_server_args() {
        let args = parse(&[
            "mbtserve",
            "world.mbtiles",
            "--keep-alive",
            "5",
            "-l",
            "0.0.0.0:3000",
            "-W",
            "3",
        ]);
        assert_eq!(args.meta.mbtiles, Some(PathBuf::from("world.mbtiles")));

        let mut config = Config::default();
        args.merge_into_config(&mut config).unwrap();
        assert_eq!(
            config,
            Config {
                mbtiles: Some(PathBuf::from("world.mbtiles")),
                srv: SrvConfig {
                    keep_alive: Some(5),
                    listen_addresses: Some("0.0.0.0:3000".to_string()),
                    worker_processes: Some(3),
                },
                ..Config::default()
            }
        );
    }

    #[test]
    fn cli_port_binds_localhost() {
        let mut config = Config::default();
        parse(&["mbtserve", "-p", "9000", "world.mbtiles"])
            .merge_into_config(&mut config)
            .unwrap();
        assert_eq!(config.srv.listen_addresses.as_deref(), Some("127.0.0.1:9000"));
    }

    #[test]
    fn cli_port_conflicts_with_listen_addresses() {
        let err = Args::try_parse_from(["mbtserve", "-p", "9000", "-l", "0.0.0.0:80"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn cli_overrides_config_file() {
        let mut config = Config {
            mbtiles: Some(PathBuf::from("from-file.mbtiles")),
            srv: SrvConfig {
                keep_alive: Some(10),
                listen_addresses: Some("0.0.0.0:80".to_string()),
                worker_processes: None,
            },
            ..Config::default()
        };
        parse(&["mbtserve", "--config", "c.yaml", "-k", "20"])
            .merge_into_config(&mut config)
            .unwrap();
        assert_eq!(config.mbtiles, Some(PathBuf::from("from-file.mbtiles")));
        assert_eq!(config.srv.keep_alive, Some(20));
        assert_eq!(config.srv.listen_addresses.as_deref(), Some("0.0.0.0:80"));
    }

    #[test]
    fn cli_config_and_archive_conflict() {
        let args = parse(&["mbtserve", "--config", "c.yaml", "world.mbtiles"]);
        let err = args.merge_into_config(&mut Config::default()).unwrap_err();
        assert!(
            matches!(err, ServeError::ConfigAndArchiveError(p) if p == PathBuf::from("world.mbtiles"))
        );
    }

    #[test]
    fn cli_save_config() {
        let args = parse(&["mbtserve", "--save-config", "-", "world.mbtiles"]);
        assert_eq!(args.meta.save_config, Some(PathBuf::from("-")));
    }
}
