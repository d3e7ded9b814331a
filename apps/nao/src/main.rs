//! # Nao - Media Database Admin
//!
//! Command line access to a Nao entity database.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │           apps/nao (THE BINARY)           │
//! │                                           │
//! │   ┌─────────────┐     ┌──────────────┐    │
//! │   │    CLI      │────▶│   config     │    │
//! │   │   (clap)    │     │ (toml, env)  │    │
//! │   └──────┬──────┘     └──────────────┘    │
//! │          ▼                                │
//! │   ┌───────────────┐                       │
//! │   │   nao-core    │                       │
//! │   │ (THE ENGINE)  │                       │
//! │   └───────────────┘                       │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! nao init
//! nao status
//! nao create media -f cowboy-bebop.json
//! nao list media-producer --json-mode
//! nao update media -f cowboy-bebop.json --checked
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // NAO_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("NAO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nao=info,nao_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = nao::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = nao::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Nao startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ██╗ █████╗  ██████╗
  ████╗  ██║██╔══██╗██╔═══██╗
  ██╔██╗ ██║███████║██║   ██║
  ██║╚██╗██║██╔══██║██║   ██║
  ██║ ╚████║██║  ██║╚██████╔╝
  ╚═╝  ╚═══╝╚═╝  ╚═╝ ╚═════╝

  Media database admin v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
