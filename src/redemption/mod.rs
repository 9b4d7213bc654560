pub mod batch;
pub mod engine;
pub mod ledger;
pub mod models;
pub mod shift;
pub mod strategy;
pub mod vip;

pub use batch::{redeem_all, AutoRedeemer};
pub use engine::RedemptionEngine;
pub use ledger::{BadCodes, CodeLedger, UsedCodes};
pub use models::{count_successes, CodeKind, CodeRecord, RedemptionOutcome, RedemptionState, RedemptionTarget};
pub use strategy::RedemptionStrategy;
