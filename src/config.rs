// Command-line configuration. Every option can also come from an
// environment variable, so the client can be pointed at another server
// without retyping flags.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::token_store::TokenStore;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_BOX_ART: &str = "placeholder_images/useful_formula.png";

#[derive(Parser, Debug, Clone)]
#[command(name = "fiordispino", version, about = "Browse, rate and curate the Fiordispino game catalog")]
pub struct Config {
    /// Base URL of the catalog service
    #[arg(long, env = "FIORDISPINO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where the session key is kept between runs [default: ~/.fiordispino_token]
    #[arg(long, env = "FIORDISPINO_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Image uploaded when a new game is added without one
    #[arg(long, env = "FIORDISPINO_BOX_ART", default_value = DEFAULT_BOX_ART)]
    pub box_art: PathBuf,

    /// Do not read or write the session key file
    #[arg(long)]
    pub no_remember: bool,

    /// Log more (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// The session key store, unless persistence is turned off.
    pub fn token_store(&self) -> Option<TokenStore> {
        if self.no_remember {
            return None;
        }
        let path = self
            .token_file
            .clone()
            .unwrap_or_else(TokenStore::default_path);
        Some(TokenStore::new(path))
    }

    /// Default log filter for the chosen verbosity. `RUST_LOG` wins over it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["fiordispino"]).unwrap();
        assert_eq!(config.verbose, 0);
        assert!(!config.no_remember);
        assert_eq!(config.box_art, PathBuf::from(DEFAULT_BOX_ART));
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn verbosity_is_counted() {
        let config = Config::try_parse_from(["fiordispino", "-vv"]).unwrap();
        assert_eq!(config.verbose, 2);
        assert_eq!(config.log_filter(), "debug");

        let config = Config::try_parse_from(["fiordispino", "-vvvv"]).unwrap();
        assert_eq!(config.log_filter(), "trace");
    }

    #[test]
    fn explicit_api_url() {
        let config =
            Config::try_parse_from(["fiordispino", "--api-url", "http://example.org/api"]).unwrap();
        assert_eq!(config.api_url, "http://example.org/api");
    }

    #[test]
    fn token_file_overrides_default_store() {
        let config =
            Config::try_parse_from(["fiordispino", "--token-file", "/tmp/session"]).unwrap();
        assert_eq!(
            config.token_store().unwrap().path(),
            std::path::Path::new("/tmp/session")
        );
    }

    #[test]
    fn no_remember_disables_the_store() {
        let config = Config::try_parse_from(["fiordispino", "--no-remember"]).unwrap();
        assert!(config.token_store().is_none());
    }

    #[test]
    fn unknown_flag_is_refused() {
        assert!(Config::try_parse_from(["fiordispino", "--frobnicate"]).is_err());
    }
}
