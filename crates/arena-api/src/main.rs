use anyhow::Result;
use arena_api::setup::{initialize_app, server::start_server};
use arena_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let (state, app) = initialize_app(config).await?;
    start_server(&state.config, app).await
}
