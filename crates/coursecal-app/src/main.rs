use clap::Parser;
use coursecal_app::cli::{Cli, Command};
use coursecal_app::{commands, logging};
use coursecal_core::config::load_config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter_handle = logging::init();

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let rust_log = std::env::var("RUST_LOG").ok();
    let directive =
        logging::effective_directive(&config.logging.level, cli.verbose, rust_log.as_deref());
    logging::apply(&filter_handle, &directive);

    match &cli.command {
        Command::Generate(args) => {
            let report = commands::generate(&config, args, chrono::Utc::now())?;
            println!("{}", report.summary());
        }
        Command::Preview(args) => {
            print!("{}", commands::preview(&config, args)?);
        }
        Command::Semester(args) => {
            let info = commands::semester(args)?;
            println!("{}", commands::describe_semester(&info));
        }
    }

    Ok(())
}
