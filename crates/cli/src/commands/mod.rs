pub mod context;
pub mod init;
pub mod status;
pub mod watch;

use lifeline_balance::{FixedBalanceSource, RpcBalanceSource};
use lifeline_config::AppConfig;
use lifeline_context::ContextBuilder;
use lifeline_core::BalanceSource;
use lifeline_core::error::BalanceError;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a cycle's balance comes from.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SourceArgs {
    /// Account address (overrides `account_address` in config)
    #[arg(short, long)]
    pub address: Option<String>,

    /// Use a fixed currency balance instead of querying the RPC node
    #[arg(short, long)]
    pub balance: Option<f64>,
}

/// Everything a command needs to assemble cycle contexts.
pub struct CycleSetup {
    pub builder: ContextBuilder,
    pub config: Arc<AppConfig>,
    pub storage: Arc<PathBuf>,
    pub account: Option<String>,
}

impl CycleSetup {
    pub fn load(args: SourceArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
        Ok(Self::resolve(args, config, AppConfig::state_dir())?)
    }

    fn resolve(args: SourceArgs, config: AppConfig, state_dir: PathBuf) -> Result<Self, BalanceError> {
        let balance: Arc<dyn BalanceSource> = match args.balance {
            Some(amount) => Arc::new(FixedBalanceSource::new(amount)),
            None => Arc::new(RpcBalanceSource::from_config(&config.balance)?),
        };

        let builder = ContextBuilder::from_config(balance, &config);
        let account = args.address.or_else(|| config.account_address.clone());

        Ok(Self {
            builder,
            config: Arc::new(config),
            storage: Arc::new(state_dir),
            account,
        })
    }

    pub async fn next_cycle(&self) -> lifeline_context::CycleContext<PathBuf> {
        self.builder
            .build(self.storage.clone(), self.config.clone(), self.account.as_deref())
            .await
    }
}
