use clap::Parser;
use log::*;

use release_scribe::{Args, Config, Result};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_scribe")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = Config::from_args(&cli_args)?;

    let outcome = release_scribe::run(config).await?;

    if outcome.written {
        info!(
            "released version {} ({} changes)",
            outcome.version, outcome.change_kind
        );
    } else {
        info!(
            "dry run complete for version {} ({} changes)",
            outcome.version, outcome.change_kind
        );
    }

    Ok(())
}
