use async_trait::async_trait;
use log::{debug, info, warn};
use crate::api::{ShiftCodeInfo, CODE_ALREADY_REDEEMED};
use crate::error::{Result, VaultKeyError};
use crate::redemption::engine::{format_date, RedemptionEngine};
use crate::redemption::models::{CodeKind, CodeRecord, RedemptionState};
use crate::redemption::strategy::RedemptionStrategy;

pub struct ShiftRedemption {
    pub code: String,
    pub platform: String,
}

#[async_trait]
impl RedemptionStrategy for ShiftRedemption {
    type Info = ShiftCodeInfo;

    fn kind(&self) -> CodeKind {
        CodeKind::Shift
    }

    fn code(&self) -> &str {
        &self.code
    }

    async fn fetch_info(&self, engine: &RedemptionEngine) -> Result<ShiftCodeInfo> {
        engine.api().shift_code_info(&self.code).await
    }

    async fn validate(&self, engine: &RedemptionEngine, info: ShiftCodeInfo) -> Result<CodeRecord> {
        let offer = info
            .entitlement_offer_codes
            .into_iter()
            .find(|offer| offer.offer_service == self.platform)
            .ok_or_else(|| VaultKeyError::PlatformMismatch {
                code: self.code.clone(),
                platform: self.platform.clone(),
            })?;

        if !offer.is_active {
            return Err(VaultKeyError::CodeInactive(self.code.clone()));
        }

        let ledger = engine.ledger();
        if ledger.is_bad(CodeKind::Shift, &self.code).await? {
            return Err(VaultKeyError::KnownBadCode(self.code.clone()));
        }
        if let Some(used) = ledger.find_used(CodeKind::Shift, &self.code, Some(&self.platform)).await? {
            return Err(VaultKeyError::AlreadyRedeemed {
                code: self.code.clone(),
                date: Some(format_date(&used.date)),
            });
        }

        Ok(CodeRecord {
            code: self.code.clone(),
            platform: Some(self.platform.clone()),
            date: engine.now(),
            title: offer.offer_title_text,
            description: offer.offer_description_text,
        })
    }

    /// Starts the redemption job and polls it until it settles or we run out of polls.
    async fn submit(&self, engine: &RedemptionEngine, record: &mut CodeRecord) -> Result<()> {
        let job_id = engine.api().submit_shift(&self.code, &self.platform).await?;
        let settings = engine.settings();
        let interval = settings.poll_interval();
        engine.mark(&self.code, RedemptionState::Submitted);
        info!("SHiFT code {} submitted as job {}", self.code, job_id);

        for poll in 1..=settings.max_polls {
            tokio::time::sleep(interval).await;
            engine.mark(&self.code, RedemptionState::Polling(poll));

            let status = engine.api().shift_job_status(&self.code, &job_id).await?;
            if status.success {
                return Ok(());
            }

            let error = status.error_code();
            if error == CODE_ALREADY_REDEEMED {
                if let Err(e) = engine.ledger().add_used(CodeKind::Shift, record.clone()).await {
                    warn!("Could not record {} as redeemed: {}", self.code, e);
                }
                return Err(VaultKeyError::AlreadyRedeemed {
                    code: self.code.clone(),
                    date: None,
                });
            }
            debug!("Job {} not done after poll {}: {}", job_id, poll, error);
        }

        Err(VaultKeyError::RedemptionTimeout(settings.max_polls))
    }
}
