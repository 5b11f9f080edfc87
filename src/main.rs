use std::sync::Arc;

use clap::Parser;
use tracing::info;

use quill::config::Config;
use quill::{BlogStore, Server, app, telemetry};

#[tokio::main]
async fn main() -> Result<(), quill::Error> {
    let config = Config::parse();
    telemetry::init(config.log_format);

    let store = if config.no_seed { BlogStore::new() } else { BlogStore::seeded() };
    info!(blogs = store.len(), "store ready");

    let router = app::router(Arc::new(store)).max_body_bytes(config.max_body_bytes);
    Server::bind(config.addr)
        .serve(router)
        .await
}
