//! # Prattle - Dialogue Authoring and Playback
//!
//! The main binary for the Prattle dialogue graph engine.
//!
//! This application provides:
//! - CLI authoring commands (add, link, set, remove, validate)
//! - Interactive playback in the terminal
//! - Import/export between the binary format and JSON
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/prattle (THE BINARY)              │
//! │                                                       │
//! │  ┌─────────────┐   ┌──────────────┐   ┌───────────┐  │
//! │  │  Authoring  │   │  Play Loop   │   │  File I/O │  │
//! │  │   (clap)    │   │ (ConsoleView)│   │  (.prtl)  │  │
//! │  └──────┬──────┘   └──────┬───────┘   └─────┬─────┘  │
//! │         │                 │                 │        │
//! │         └─────────────────┼─────────────────┘        │
//! │                           ▼                          │
//! │                  ┌────────────────┐                  │
//! │                  │  prattle-core  │                  │
//! │                  │  (THE LOGIC)   │                  │
//! │                  └────────────────┘                  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Create a dialogue and author a line
//! prattle init --title "Blacksmith"
//! prattle add "Welcome to my forge."
//!
//! # Wire and play
//! prattle link --from 0 --to 1
//! prattle play
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — PRATTLE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PRATTLE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "prattle=debug"
    } else {
        "prattle=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Prattle startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ██████╗  █████╗ ████████╗████████╗██╗     ███████╗
  ██╔══██╗██╔══██╗██╔══██╗╚══██╔══╝╚══██╔══╝██║     ██╔════╝
  ██████╔╝██████╔╝███████║   ██║      ██║   ██║     █████╗
  ██╔═══╝ ██╔══██╗██╔══██║   ██║      ██║   ██║     ██╔══╝
  ██║     ██║  ██║██║  ██║   ██║      ██║   ███████╗███████╗
  ╚═╝     ╚═╝  ╚═╝╚═╝  ╚═╝   ╚═╝      ╚═╝   ╚══════╝╚══════╝

  Dialogue Engine v{}

  Deterministic • Branching • Replayable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
