//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "study-timer")]
#[command(about = "A study timer that records completed sessions to a study-tracking backend")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Base URL of the study-tracking backend
    #[arg(short, long, default_value = "http://localhost:5000")]
    pub backend_url: String,

    /// Cookie header sent with every backend request (e.g. "session=...")
    #[arg(long)]
    pub backend_cookie: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::try_parse_from(["study-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.backend_cookie, None);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "study-timer",
            "-p",
            "8080",
            "--backend-url",
            "http://study.local",
            "--backend-cookie",
            "session=abc",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend_url, "http://study.local");
        assert_eq!(config.backend_cookie.as_deref(), Some("session=abc"));
        assert_eq!(config.log_level(), "debug");
    }
}
