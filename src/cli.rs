use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick beauty products and chat with an AI beauty advisor", long_about = None)]
pub struct Args {
    /// Product catalog JSON file (overrides catalog_path in the config)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// AI provider to use [possible values: openai, openrouter, deepseek]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
