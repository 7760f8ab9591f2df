use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hugchat-server",
    about = "OpenAI-compatible gateway for HuggingChat",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(long, env = "HUGCHAT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "HUGCHAT_PORT", default_value = "80")]
    pub port: u16,

    /// Origin of the remote chat application.
    #[arg(long, env = "HUGCHAT_DOMAIN", default_value = "https://huggingface.co")]
    pub domain: String,

    /// JSON file holding cached session cookies per identity.
    #[arg(long, env = "HUGCHAT_SESSION_FILE", default_value = "config/cookies.json")]
    pub session_file: PathBuf,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Debug logging for the gateway crates, whatever the log level says.
    #[arg(long, env = "HUGCHAT_DEBUG")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["hugchat-server"]).expect("parses");
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 80);
        assert_eq!(cli.domain, "https://huggingface.co");
        assert_eq!(cli.session_file, PathBuf::from("config/cookies.json"));
        assert!(!cli.debug);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "hugchat-server",
            "--port",
            "8080",
            "--domain",
            "http://localhost:3000",
            "--debug",
        ])
        .expect("parses");
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.domain, "http://localhost:3000");
        assert!(cli.debug);
    }
}
