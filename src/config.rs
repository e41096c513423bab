// Application configuration, loaded from environment variables and CLI flags.

use crate::engine::config::{DEFAULT_MAX_TICKS, DEFAULT_TICK_MS};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Milliseconds between round ticks.
    pub tick_ms: u64,
    /// Tick limit for a round started without an explicit limit.
    pub max_ticks: u64,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `SNAKE_TICK_MS` - milliseconds per round tick (default: 33)
    /// - `SNAKE_MAX_TICKS` - default round tick limit (default: 18000)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    /// - `--tick-ms <MS>` - Override the tick interval
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    fn from_args(args: &[String]) -> Self {
        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(3000);

        let tick_ms = Self::parse_cli_value(args, "--tick-ms")
            .and_then(|v| v.parse().ok())
            .or_else(|| {
                std::env::var("SNAKE_TICK_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .unwrap_or(DEFAULT_TICK_MS);

        let max_ticks = std::env::var("SNAKE_MAX_TICKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TICKS);

        Config {
            port,
            tick_ms,
            max_ticks,
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}
