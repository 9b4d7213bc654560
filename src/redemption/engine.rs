use std::sync::Arc;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use crate::api::{Platform, VendorApi};
use crate::clock::Clock;
use crate::config::RedemptionConfig;
use crate::error::{Result, VaultKeyError};
use crate::redemption::ledger::CodeLedger;
use crate::redemption::models::{CodeRecord, RedemptionState, RedemptionTarget};
use crate::redemption::shift::ShiftRedemption;
use crate::redemption::strategy::RedemptionStrategy;
use crate::redemption::vip::VipRedemption;

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub struct RedemptionEngine {
    api: Arc<VendorApi>,
    ledger: Arc<CodeLedger>,
    clock: Arc<dyn Clock>,
    settings: RedemptionConfig,
}

impl RedemptionEngine {
    pub fn new(api: Arc<VendorApi>, ledger: Arc<CodeLedger>, clock: Arc<dyn Clock>, settings: RedemptionConfig) -> Self {
        Self { api, ledger, clock, settings }
    }

    pub fn api(&self) -> &VendorApi {
        &self.api
    }

    pub fn ledger(&self) -> &CodeLedger {
        &self.ledger
    }

    pub fn settings(&self) -> &RedemptionConfig {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn mark(&self, code: &str, state: RedemptionState) {
        transition(code, state);
    }

    /// Redeems one code. `platforms` is the user's registered platform list when the
    /// caller already has it; otherwise it is fetched.
    pub async fn redeem(&self, target: RedemptionTarget, platforms: Option<&[Platform]>) -> Result<CodeRecord> {
        let fetched;
        let platforms = match platforms {
            Some(platforms) => platforms,
            None => {
                fetched = self.api.platforms().await?;
                &fetched[..]
            }
        };

        match target {
            RedemptionTarget::Shift { code, platform } => {
                if !platforms.iter().any(|p| p.service == platform) {
                    return Err(VaultKeyError::PlatformNotFound(Some(platform)));
                }
                self.run(ShiftRedemption { code, platform }).await
            }
            RedemptionTarget::Vip { code, campaign_id } => self.run(VipRedemption { code, campaign_id }).await,
        }
    }

    async fn run<S: RedemptionStrategy>(&self, strategy: S) -> Result<CodeRecord> {
        let code = strategy.code().to_string();
        transition(&code, RedemptionState::Pending);

        match self.attempt(&strategy).await {
            Ok(record) => {
                transition(&code, RedemptionState::Succeeded);
                info!("{} code {} redeemed", strategy.kind(), code);
                Ok(record)
            }
            Err(e) => {
                let state = if is_rejection(&e) { RedemptionState::Rejected } else { RedemptionState::Failed };
                transition(&code, state);
                warn!("Could not redeem {} code {}: {}", strategy.kind(), code, e);
                Err(e)
            }
        }
    }

    async fn attempt<S: RedemptionStrategy>(&self, strategy: &S) -> Result<CodeRecord> {
        let code = strategy.code();
        let info = strategy.fetch_info(self).await?;
        transition(code, RedemptionState::InfoFetched);

        let mut record = strategy.validate(self, info).await?;
        transition(code, RedemptionState::Validated);

        strategy.submit(self, &mut record).await?;
        self.ledger.add_used(strategy.kind(), record.clone()).await?;
        Ok(record)
    }
}

fn transition(code: &str, state: RedemptionState) {
    debug!("{}: {:?}", code, state);
}

/// The vendor (or our own ledger) said no, as opposed to something going wrong.
fn is_rejection(error: &VaultKeyError) -> bool {
    matches!(
        error,
        VaultKeyError::PlatformMismatch { .. }
            | VaultKeyError::CodeInactive(_)
            | VaultKeyError::KnownBadCode(_)
            | VaultKeyError::AlreadyRedeemed { .. }
    )
}
