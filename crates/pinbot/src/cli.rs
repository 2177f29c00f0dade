use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pinbot")]
#[command(author, version, about = "Telegram bot that downloads Pinterest videos", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Extract a Pinterest link and print the available qualities
    Info {
        /// Pinterest link (pin or pin.it short link)
        url: String,

        /// Print the extracted metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a Pinterest video without going through Telegram
    Download {
        /// Pinterest link (pin or pin.it short link)
        url: String,

        /// Quality id as printed by `info`; defaults to the best one
        #[arg(short, long)]
        quality: Option<String>,

        /// yt-dlp format selector overriding DEFAULT_QUALITY
        #[arg(short, long)]
        format: Option<String>,

        /// Output file
        #[arg(short, long, default_value = "pinterest_video.mp4")]
        output: PathBuf,
    },

    /// Run one retention sweep over the working directory and exit
    Sweep,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_runs_bot() {
        let cli = Cli::try_parse_from(["pinbot"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_download_args() {
        let cli = Cli::try_parse_from(["pinbot", "download", "https://pin.it/abc", "-q", "V_720P"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Download {
                url: "https://pin.it/abc".to_string(),
                quality: Some("V_720P".to_string()),
                format: None,
                output: PathBuf::from("pinterest_video.mp4"),
            })
        );
    }
}
