// ABOUTME: Check command implementation.
// ABOUTME: Resolves every configured secret and pings the container engine.

use dockhand::config::Config;
use dockhand::error::Result;
use dockhand::runtime::BollardRuntime;

pub async fn check(config: Config) -> Result<()> {
    config.check()?;
    println!("Configuration OK (domain {})", config.domain);

    let engine = BollardRuntime::connect(&config.engine)?;
    engine.ping().await?;
    println!("Container engine reachable at {}", engine.endpoint());
    Ok(())
}
