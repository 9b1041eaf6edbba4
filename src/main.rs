use clap::Parser;
use env_logger::Env;

mod cli;
mod config;
mod table;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let args = cli::Args::parse();
    cli::run(args)
}
