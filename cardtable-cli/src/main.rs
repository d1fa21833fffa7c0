mod cli;
mod commands;
mod project;

use clap::Parser;

use cli::{Cli, Command};
use commands::plan_cmd::PlanArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Scripts { config } => commands::scripts_cmd::run(config),
        Command::Check { config } => commands::check_cmd::run(config),
        Command::Plan {
            config,
            preset,
            frames,
            resizes,
            no_surface,
            no_engine,
        } => commands::plan_cmd::run(PlanArgs {
            config,
            preset,
            frames,
            resizes,
            no_surface,
            no_engine,
        }),
        Command::Init { dir, preset, force } => commands::init_cmd::run(dir, preset, force),
        Command::Build { dev } => commands::build_cmd::run(dev).await,
    }
}
