use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the settings file
    #[arg(long, default_value = "kolbot.json")]
    pub config_file: PathBuf,

    /// Directory to store parsed records in
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// User agent for image requests, overrides the settings file
    #[clap(long, env = "KOLBOT_USER_AGENT")]
    pub user_agent: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse saved mail bodies
    Mail {
        /// Mail kind: normal or giftshop
        #[arg(long, default_value = "normal")]
        kind: String,

        /// Files holding one raw body each, `-` for stdin
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse a saved leaderboard page
    Leaderboard { file: PathBuf },
    /// List the item attachments in a saved fragment
    Attachments { file: PathBuf },
    /// Render the avatar of a saved profile page as SVG
    Avatar {
        file: PathBuf,

        /// Write the SVG here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
