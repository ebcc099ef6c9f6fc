//! Command-line and environment configuration.

use std::path::PathBuf;

use crate::api::DEFAULT_API_BASE;
use crate::state::{Settings, DEFAULT_LANGUAGE, DEFAULT_ROSTER_LIMIT};

const LOG_FILE_NAME: &str = "pokedex.log";

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// PokeAPI base url
    #[arg(long, env = "POKEDEX_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Number of roster entries to fetch at startup (minimum 1)
    #[arg(
        long,
        env = "POKEDEX_LIMIT",
        default_value_t = DEFAULT_ROSTER_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// Preferred flavor-text language code
    #[arg(long, env = "POKEDEX_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Skip fetching and drawing sprites
    #[arg(long, env = "POKEDEX_NO_IMAGES")]
    pub no_images: bool,

    /// Log file path (defaults to the user data directory)
    #[arg(long, env = "POKEDEX_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level filter; RUST_LOG takes precedence
    #[arg(long, env = "POKEDEX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ConfigArgs {
    pub fn settings(&self) -> Settings {
        Settings {
            language: self.language.trim().to_lowercase(),
            roster_limit: self.limit,
            show_images: !self.no_images,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }
}

fn default_log_path() -> PathBuf {
    dirs_next::data_local_dir()
        .map(|dir| dir.join("pokedex").join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> Result<ConfigArgs, clap::Error> {
        let argv = std::iter::once("pokedex").chain(args.iter().copied());
        TestCli::try_parse_from(argv).map(|cli| cli.config)
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--api-base",
            "http://localhost:9000/api/v2",
            "--limit",
            "151",
            "--language",
            "EN",
            "--no-images",
            "--log-file",
            "/tmp/pokedex-test.log",
        ])
        .expect("parse");
        assert_eq!(config.api_base, "http://localhost:9000/api/v2");
        assert_eq!(
            config.settings(),
            Settings {
                language: "en".into(),
                roster_limit: 151,
                show_images: false,
            }
        );
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pokedex-test.log"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(parse(&["--limit", "0"]).is_err());
    }

    #[test]
    fn log_path_defaults_to_named_file() {
        let config = parse(&["--log-file", "x.log"]).expect("parse");
        let fallback = ConfigArgs {
            log_file: None,
            ..config
        };
        assert!(fallback.log_path().ends_with(LOG_FILE_NAME));
    }
}
