use anyhow::Result;
use clap::Parser;
use jobscope::cli::Cli;
use jobscope::output;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting jobscope - CI Job Inspection Tool");
    cli.execute().await?;

    Ok(())
}
