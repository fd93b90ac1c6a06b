use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use contact_relay::{AppState, HttpMailer, MailConfig, DEFAULT_ADDR, DEFAULT_MAX_BODY_BYTES};

#[derive(Parser, Debug)]
#[command(about = "Contact form mail relay")]
struct Args {
    /// Listen address
    #[arg(long, env = "CONTACT_RELAY_ADDR", default_value = DEFAULT_ADDR)]
    addr: SocketAddr,
    /// Largest accepted request body
    #[arg(long, env = "CONTACT_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = MailConfig::from_env();
    if !config.has_credentials() {
        log::warn!("[relay] mail credentials missing; submissions will fail with 500");
    }
    let state = AppState {
        mailer: Arc::new(HttpMailer::new(config)),
    };
    contact_relay::serve(args.addr, state, args.max_body_bytes).await
}
