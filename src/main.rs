use std::sync::Arc;

use scribe::middleware::{Authenticator, StaticToken};
use scribe::{Config, MemoryStore, Server, app, telemetry};

#[tokio::main]
async fn main() -> Result<(), scribe::Error> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    telemetry::init(config.log_format);

    tracing::info!(?config, "starting scribe");

    let authenticator = config
        .auth_token
        .clone()
        .map(|token| Arc::new(StaticToken::new(token)) as Arc<dyn Authenticator>);
    if authenticator.is_none() {
        tracing::warn!("AUTH_TOKEN not set, posts routes are unauthenticated");
    }

    let router = app::build(Arc::new(MemoryStore::new()), authenticator);

    Server::bind(config.addr)
        .request_timeout(config.request_timeout)
        .header_read_timeout(config.header_read_timeout)
        .serve(router)
        .await
}
