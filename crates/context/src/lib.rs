//! Per-cycle context assembly.
//!
//! Every heartbeat cycle starts by building one [`CycleContext`]: a frozen
//! snapshot of the account's financial standing that all tasks in the cycle
//! read instead of querying the balance source themselves.
//!
//! | Step | Source | On failure |
//! |------|--------|------------|
//! | 1. Cycle id + start time | process generator, wall clock | cannot fail |
//! | 2. Currency balance | [`BalanceSource`](lifeline_core::BalanceSource), called once | logged, becomes 0 |
//! | 3. Credit balance | `floor(currency * 100)` of step 2 | cannot fail |
//! | 4. Survival tier | [`TierClassifier`](lifeline_core::TierClassifier) on step 3 | cannot fail |
//! | 5. Low-compute multiplier | config, default 4 | cannot fail |

pub mod builder;
pub mod context;

pub use builder::ContextBuilder;
pub use context::{CycleContext, CycleSummary};
