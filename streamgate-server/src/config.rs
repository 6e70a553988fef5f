//! Server configuration and CLI argument parsing
//!
//! Configuration comes from command-line arguments and environment
//! variables (with STREAMGATE_ prefix).
//!
//! # Configuration Priority
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Default values (lowest priority)
//!
//! # Example Usage
//!
//! ```bash
//! # Using CLI arguments
//! streamgate --port 9090 --max-requests 50
//!
//! # Using environment variables
//! export STREAMGATE_PORT=8080
//! export STREAMGATE_MAX_REQUESTS=50
//! streamgate
//!
//! # Mixed (CLI overrides env)
//! export STREAMGATE_PORT=8080
//! streamgate --port 9090  # Uses port 9090
//! ```

use anyhow::{Result, anyhow};
use clap::Parser;
use std::time::Duration;
use streamgate::RateLimitConfig;

/// Main configuration structure for the server
///
/// Built from CLI arguments and environment variables; contains all
/// settings needed to run the server.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener configuration
    pub http: HttpConfig,
    /// Rate-limit parameters applied to every identity
    pub limits: LimitConfig,
    /// Upstream provider configuration
    pub provider: ProviderConfig,
    /// Initial capacity of the rate-limit store
    pub store_capacity: usize,
    /// Channel buffer size for actor communication
    pub buffer_size: usize,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

/// Rate-limit parameters
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Requests admitted per identity per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
    /// Ban length in seconds after the threshold is crossed
    pub ban_secs: u64,
}

/// Upstream provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl LimitConfig {
    /// The library-level limiter configuration this maps to
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests_per_window: self.max_requests,
            window_duration: Duration::from_secs(self.window_secs),
            ban_duration: Duration::from_secs(self.ban_secs),
        }
    }
}

/// Command-line arguments for the server
///
/// All arguments can also be set via environment variables with the
/// STREAMGATE_ prefix. CLI arguments take precedence over environment
/// variables.
#[derive(Parser, Debug)]
#[command(
    name = "streamgate",
    about = "Rate-limited audio stream extraction gateway",
    long_about = "A rate-limited gateway for resolving audio stream URLs and searching karaoke videos.\n\nEnvironment variables with STREAMGATE_ prefix are supported. CLI arguments take precedence over environment variables."
)]
pub struct Args {
    // HTTP listener
    #[arg(
        long,
        value_name = "HOST",
        help = "HTTP host",
        default_value = "127.0.0.1",
        env = "STREAMGATE_HOST"
    )]
    pub host: String,
    #[arg(
        long,
        value_name = "PORT",
        help = "HTTP port",
        default_value_t = 8080,
        env = "STREAMGATE_PORT"
    )]
    pub port: u16,

    // Rate limiting
    #[arg(
        long,
        value_name = "N",
        help = "Requests admitted per identity per window",
        default_value_t = 20,
        env = "STREAMGATE_MAX_REQUESTS"
    )]
    pub max_requests: u32,
    #[arg(
        long,
        value_name = "SECS",
        help = "Rate-limit window length (seconds)",
        default_value_t = 60,
        env = "STREAMGATE_WINDOW_SECS"
    )]
    pub window_secs: u64,
    #[arg(
        long,
        value_name = "SECS",
        help = "Ban length after the threshold is crossed (seconds)",
        default_value_t = 600,
        env = "STREAMGATE_BAN_SECS"
    )]
    pub ban_secs: u64,
    #[arg(
        long,
        value_name = "SIZE",
        help = "Initial rate-limit store capacity",
        default_value_t = 10_000,
        env = "STREAMGATE_STORE_CAPACITY"
    )]
    pub store_capacity: usize,

    // Provider
    #[arg(
        long,
        value_name = "URL",
        help = "Provider API base URL",
        default_value = "https://www.youtube.com/youtubei/v1",
        env = "STREAMGATE_PROVIDER_BASE_URL"
    )]
    pub provider_base_url: String,
    #[arg(
        long,
        value_name = "SECS",
        help = "Provider request timeout (seconds)",
        default_value_t = 30,
        env = "STREAMGATE_PROVIDER_TIMEOUT_SECS"
    )]
    pub provider_timeout_secs: u64,

    // General options
    #[arg(
        long,
        value_name = "SIZE",
        help = "Channel buffer size",
        default_value_t = 10_000,
        env = "STREAMGATE_BUFFER_SIZE"
    )]
    pub buffer_size: usize,
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "STREAMGATE_LOG_LEVEL"
    )]
    pub log_level: String,

    // Utility options
    #[arg(
        long,
        help = "List all environment variables and exit",
        action = clap::ArgAction::SetTrue
    )]
    pub list_env_vars: bool,
}

impl Config {
    /// Build configuration from environment variables and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (zero window, zero quota, ...).
    pub fn from_env_and_args() -> Result<Self> {
        // Clap handles env vars with CLI args taking precedence
        let args = Args::parse();

        // Handle --list-env-vars
        if args.list_env_vars {
            Self::print_env_vars();
            std::process::exit(0);
        }

        let config = Self::from_args(args)?;
        Ok(config)
    }

    fn from_args(args: Args) -> Result<Self> {
        let config = Config {
            http: HttpConfig {
                host: args.host,
                port: args.port,
            },
            limits: LimitConfig {
                max_requests: args.max_requests,
                window_secs: args.window_secs,
                ban_secs: args.ban_secs,
            },
            provider: ProviderConfig {
                base_url: args.provider_base_url,
                timeout_secs: args.provider_timeout_secs,
            },
            store_capacity: args.store_capacity,
            buffer_size: args.buffer_size,
            log_level: args.log_level,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.limits.max_requests == 0 {
            return Err(anyhow!("--max-requests must be at least 1"));
        }
        if self.limits.window_secs == 0 {
            return Err(anyhow!("--window-secs must be at least 1"));
        }
        if self.limits.ban_secs == 0 {
            return Err(anyhow!("--ban-secs must be at least 1"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("--provider-timeout-secs must be at least 1"));
        }
        if self.buffer_size == 0 {
            return Err(anyhow!("--buffer-size must be at least 1"));
        }
        Ok(())
    }

    /// Print all available environment variables and their descriptions
    ///
    /// Called when the --list-env-vars flag is used.
    fn print_env_vars() {
        println!("Streamgate Environment Variables");
        println!("================================");
        println!();
        println!("All environment variables use the STREAMGATE_ prefix.");
        println!("CLI arguments take precedence over environment variables.");
        println!();

        println!("HTTP Listener:");
        println!("  STREAMGATE_HOST=<host>                  HTTP host [default: 127.0.0.1]");
        println!("  STREAMGATE_PORT=<port>                  HTTP port [default: 8080]");
        println!();

        println!("Rate Limiting:");
        println!("  STREAMGATE_MAX_REQUESTS=<n>             Requests per identity per window [default: 20]");
        println!("  STREAMGATE_WINDOW_SECS=<secs>           Window length [default: 60]");
        println!("  STREAMGATE_BAN_SECS=<secs>              Ban length [default: 600]");
        println!("  STREAMGATE_STORE_CAPACITY=<size>        Initial store capacity [default: 10000]");
        println!();

        println!("Provider:");
        println!("  STREAMGATE_PROVIDER_BASE_URL=<url>      Provider API base URL");
        println!("  STREAMGATE_PROVIDER_TIMEOUT_SECS=<secs> Request timeout [default: 30]");
        println!();

        println!("General Configuration:");
        println!("  STREAMGATE_BUFFER_SIZE=<size>           Channel buffer size [default: 10000]");
        println!("  STREAMGATE_LOG_LEVEL=<level>            Log level: error, warn, info, debug, trace [default: info]");
        println!();

        println!("Examples:");
        println!("  # Tighten the quota to 5 requests per minute");
        println!("  export STREAMGATE_MAX_REQUESTS=5");
        println!();
        println!("  # Run server (CLI args override env vars)");
        println!("  streamgate --port 9090  # Will use port 9090");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("streamgate").chain(argv.iter().copied()))
            .expect("argv should parse")
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(parse(&[])).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.limits.max_requests, 20);
        assert_eq!(config.limits.window_secs, 60);
        assert_eq!(config.limits.ban_secs, 600);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::from_args(parse(&[
            "--port",
            "9090",
            "--max-requests",
            "5",
            "--ban-secs",
            "120",
        ]))
        .unwrap();
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.limits.max_requests, 5);
        assert_eq!(config.limits.ban_secs, 120);
    }

    #[test]
    fn test_zero_quota_rejected() {
        assert!(Config::from_args(parse(&["--max-requests", "0"])).is_err());
        assert!(Config::from_args(parse(&["--window-secs", "0"])).is_err());
        assert!(Config::from_args(parse(&["--ban-secs", "0"])).is_err());
    }

    #[test]
    fn test_rate_limit_config_mapping() {
        let config = Config::from_args(parse(&["--max-requests", "7", "--window-secs", "30"]))
            .unwrap();
        let rl = config.limits.rate_limit_config();
        assert_eq!(rl.max_requests_per_window, 7);
        assert_eq!(rl.window_duration, Duration::from_secs(30));
        assert_eq!(rl.ban_duration, Duration::from_secs(600));
    }
}
