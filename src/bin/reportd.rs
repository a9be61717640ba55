//! # reportd
//!
//! Subscribes to the packetd event publisher, runs the event listener and the
//! event logger under supervision, and exits with status 0 once both are done.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin reportd --features zmq
//!
//! # Point at another publisher
//! REPORTD__SOURCE__ENDPOINT=tcp://10.0.0.2:5561 cargo run --bin reportd --features zmq
//! ```

use std::process::ExitCode;

use tracing::{error, info};

use reportd::{Config, Reportd, ZmqSource, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            logging::init_tracing("info");
            error!(label = e.as_label(), "unable to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_tracing(&cfg.log_filter);

    info!("starting up reportd {}", env!("CARGO_PKG_VERSION"));

    match Reportd::builder(cfg).build().run(ZmqSource::connect).await {
        Ok(decision) => {
            info!(signals = decision.signals, "shutting down reportd");
            std::process::exit(0);
        }
        Err(e) => {
            error!(label = e.as_label(), "reportd stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
