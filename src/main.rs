use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mybuddyd::api::HttpBackend;
use mybuddyd::app::App;
use mybuddyd::ipc;
use mybuddyd::session::SessionVault;

/// Sidecar for the MyBuddy admin console: one JSON request per line on
/// stdin, one JSON response per line on stdout. Logs go to stderr so the
/// protocol stream stays clean.
#[derive(Parser)]
#[command(name = "mybuddyd", version)]
struct Args {
    /// Backend origin, e.g. https://mybuddy-backend.onrender.com/api
    #[arg(long)]
    backend_url: String,

    /// Where the auth slice persists across launches. Omit to keep the
    /// session in memory only.
    #[arg(long)]
    session_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let backend = Arc::new(HttpBackend::new(&args.backend_url));
    let vault = args.session_file.map(SessionVault::new);
    // Rehydration happens inside App::open, before the first request.
    let app = App::open(backend, vault);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("read request line")? {
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::types::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with a matching id; answer with a bare error.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                stdout.write_all(format!("{resp}\n").as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
        };

        let resp = ipc::router::handle_request(&app, req).await;
        stdout.write_all(format!("{resp}\n").as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
