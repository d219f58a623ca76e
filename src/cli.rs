use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal dashboard for a momentum screening service", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Screening service base URL (overrides config and MOMENTUM_API_BASE_URL)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Fetch one scan, print the scanner view and exit
    #[arg(long)]
    pub once: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["momentum-dashboard"]);
        assert!(cli.config.is_none());
        assert!(cli.base_url.is_none());
        assert!(!cli.debug);
        assert!(!cli.once);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "momentum-dashboard",
            "--config",
            "dash.toml",
            "--base-url",
            "http://scanner:8000",
            "-d",
            "--once",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("dash.toml")));
        assert_eq!(cli.base_url.as_deref(), Some("http://scanner:8000"));
        assert!(cli.debug);
        assert!(cli.once);
    }
}
