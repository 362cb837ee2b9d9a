use anyhow::Result;
use copen_qa::{
    chat::ChatSession, config, gateway::QaGatewayClient, history::ConversationHistory, secrets,
};
use tokio::io::{BufReader, stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parses a level or filter directive such as `debug` or `copen_qa=debug,reqwest=warn`
fn parse_log_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        anyhow::anyhow!(
            "Invalid log filter: '{}' ({}). Use a level (error, warn, info, debug, trace) or target=level directives",
            directives,
            e
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level =
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.app.logs.level.clone());

    let filter = match parse_log_filter(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so they never interleave with the chat on stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Starting {} with log level: {}", config.app.title, log_level);

    let token_provider = secrets::create_token_provider(&config.secrets)?;
    let gateway = QaGatewayClient::from_config(&config.gateway, token_provider)?;
    info!("Serving endpoint: {}", gateway.endpoint_url());

    let mut session = ChatSession::new(gateway, config.app.clone(), ConversationHistory::new());
    session.run(BufReader::new(stdin()), stdout()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_levels_are_accepted() {
        for level in ["error", "warn", "info", "debug", "trace"] {
            assert!(parse_log_filter(level).is_ok(), "{level} should parse");
        }
    }

    #[test]
    fn test_target_directives_are_accepted() {
        assert!(parse_log_filter("copen_qa=debug").is_ok());
        assert!(parse_log_filter("info,copen_qa=trace,reqwest=warn").is_ok());
    }

    #[test]
    fn test_garbage_filter_is_rejected() {
        let err = parse_log_filter("copen_qa=loud").unwrap_err();
        assert!(err.to_string().contains("Invalid log filter"));
    }
}
