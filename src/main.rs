use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use package_tracker::commands::{DiffArgs, MetaArgs, UpdateArgs};
use package_tracker::config::{self, Config};
use package_tracker::logging::{self, LogFormat};

#[derive(Parser)]
#[command(name = "package-tracker")]
#[command(version, about = "Track package versions across release channels")]
struct Cli {
    /// Configuration file (defaults to ./tracker.yml when present)
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to FILE (defaults to the data directory); give a
    /// path as `--log-file=FILE`
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        require_equals = true
    )]
    log_file: Option<Option<PathBuf>>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print local assets and their metadata as JSON lines
    Meta(MetaArgs),
    /// Show versions that differ between local assets and the remote
    Diff(DiffArgs),
    /// Install versions published remotely but missing locally
    Update(UpdateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(config::log_path));
    let _guard = logging::init(cli.verbose, cli.log_format, log_file.as_deref())?;

    let config = Config::load_or_default(cli.config.as_deref())?;
    debug!("Loaded config: {:?}", config);

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Meta(args) => args.run(&config, &mut stdout),
        Command::Diff(args) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(args.run(&config, &mut stdout)),
        Command::Update(args) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(args.run(&config, &mut stdout)),
    }
}
