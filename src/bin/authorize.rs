//! One-time interactive sign-in. Runs the device-authorization flow and
//! populates the token cache so the service only ever needs silent
//! acquisition afterwards.

use chairside::infrastructure::auth::DeviceCodeBroker;
use chairside::infrastructure::graph::GRAPH_SCOPES;
use chairside::presentation::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    let broker = DeviceCodeBroker::new(
        &settings.identity.tenant_id,
        &settings.identity.client_id,
        settings.identity.token_cache_path.clone(),
    );

    broker.acquire_interactive(GRAPH_SCOPES).await?;

    println!(
        "Sign-in complete. Token cache written to {}.",
        settings.identity.token_cache_path.display()
    );

    Ok(())
}
