//! CLI argument parsing for leetsearch-tui.

use clap::Parser;

#[derive(Parser)]
#[command(name = "leetsearch-tui")]
#[command(
    about = "LeetSearch terminal popup - typically invoked via 'leetsearch' command",
    version
)]
pub struct Cli {
    /// College name to search for right away
    pub query: Option<String>,

    /// Use this backend for this session only (not saved)
    #[arg(long, value_name = "URL")]
    pub backend: Option<String>,

    /// Enable debug logging (logs to the leetsearch cache directory)
    #[arg(short, long)]
    pub debug: bool,
}
