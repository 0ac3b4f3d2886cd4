#![warn(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use dotenvy::dotenv;
use hostwatch::{App, Config, LiveBackend, Registry, Stdout};
use logger::init_tracing;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    App::new(Arc::new(Registry::default()), Arc::new(Stdout))
        .run(Config::from_env(), &LiveBackend, shutdown)
        .await
}
