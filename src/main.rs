use clap::Parser;
use console::style;

mod advisor;
mod app;
mod catalog;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod history;
mod input;
mod logging;
mod prompts;
mod providers;
mod selection;
mod topic;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::GlowError;

async fn run() -> Result<(), GlowError> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = Config::load()?;
    let command_dispatcher = create_command_registry();
    let mut app = Application::new(args, config, command_dispatcher)?;
    app.run().await
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "glowchat exited with an error");
        eprintln!("{} {}", style("Error:").bold().red(), e);
        std::process::exit(1);
    }
}
