//! `lifeline init` — Write the default configuration.

use lifeline_config::AppConfig;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let state_dir = AppConfig::state_dir();

    println!("💓 Lifeline — Setup");
    println!("===================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !state_dir.exists() {
        std::fs::create_dir_all(&state_dir)?;
        println!("✅ Created state directory: {}", state_dir.display());
    }

    if config_path.exists() && !force {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or re-run with --force.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set account_address in {}", config_path.display());
    println!("   2. Run: lifeline context");
    println!("   3. Run: lifeline watch\n");

    Ok(())
}
