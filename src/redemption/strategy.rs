use async_trait::async_trait;
use crate::error::Result;
use crate::redemption::engine::RedemptionEngine;
use crate::redemption::models::{CodeKind, CodeRecord};

/// What differs between SHiFT and VIP redemption. The engine picks one
/// implementation per attempt and drives it through
/// fetch_info -> validate -> submit.
#[async_trait]
pub trait RedemptionStrategy: Send + Sync {
    type Info: Send;

    fn kind(&self) -> CodeKind;

    fn code(&self) -> &str;

    async fn fetch_info(&self, engine: &RedemptionEngine) -> Result<Self::Info>;

    /// Checks eligibility and builds the record that will be stored on success.
    async fn validate(&self, engine: &RedemptionEngine, info: Self::Info) -> Result<CodeRecord>;

    async fn submit(&self, engine: &RedemptionEngine, record: &mut CodeRecord) -> Result<()>;
}
