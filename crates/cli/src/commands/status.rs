//! `lifeline status` — Show resolved configuration.

use lifeline_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("💓 Lifeline Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  State dir:    {}", AppConfig::state_dir().display());
    println!(
        "  Account:      {}",
        config.account_address.as_deref().unwrap_or("(none — balances will be 0)")
    );
    println!("  Token:        {} ({} decimals)", config.balance.token_contract, config.balance.decimals);
    println!("  Multiplier:   {}", config.low_compute_multiplier());
    println!(
        "  Tiers (¢):    high > {}, normal > {}, low_compute > {}",
        config.tiers.high, config.tiers.normal, config.tiers.low_compute
    );
    println!("  Heartbeat:    every {}s", config.heartbeat.interval_seconds);

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `lifeline init` first");
    }

    Ok(())
}
