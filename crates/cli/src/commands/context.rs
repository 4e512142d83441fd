//! `lifeline context` — Assemble one cycle context and print it.

use super::{CycleSetup, SourceArgs};

pub async fn run(source: SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let setup = CycleSetup::load(source)?;
    println!("{}", render(&setup).await?);
    Ok(())
}

/// One cycle's summary as pretty JSON.
async fn render(setup: &CycleSetup) -> serde_json::Result<String> {
    let ctx = setup.next_cycle().await;
    serde_json::to_string_pretty(&ctx.summary())
}
