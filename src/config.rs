//! Process configuration from flags and environment.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

use crate::router::DEFAULT_MAX_BODY_BYTES;

/// quill: an in-memory blog API.
#[derive(Debug, Clone, Parser)]
#[command(name = "quill", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "QUILL_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Log line format. Verbosity follows `RUST_LOG` (default `info`).
    #[arg(long, env = "QUILL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Start with an empty store instead of the two sample posts.
    #[arg(long, env = "QUILL_NO_SEED")]
    pub no_seed: bool,

    /// Largest request body accepted; bigger ones get 413.
    #[arg(long, env = "QUILL_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["quill"]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(!config.no_seed);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "quill", "--addr", "127.0.0.1:8080", "--log-format", "json", "--no-seed",
            "--max-body-bytes", "4096",
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.no_seed);
        assert_eq!(config.max_body_bytes, 4096);
    }

    #[test]
    fn rejects_bad_address() {
        assert!(Config::try_parse_from(["quill", "--addr", "not-an-addr"]).is_err());
    }
}
