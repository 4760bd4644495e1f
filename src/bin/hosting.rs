//! Hosting server binary.
//!
//! Runs the HTTP server for live backgammon sessions.
//! Supports WebSocket connections for real-time play.

use clap::Parser;
use robogammon::*;

#[derive(Parser)]
#[command(about = "Authoritative backgammon match server")]
struct Args {
    /// Address to listen on; BIND_ADDR overrides the default.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    log();
    kys();
    let args = Args::parse();
    let bind = args
        .bind
        .or_else(|| std::env::var("BIND_ADDR").ok())
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());
    hosting::Server::run(bind).await.unwrap();
}
