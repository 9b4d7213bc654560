use async_trait::async_trait;
use log::warn;
use crate::error::{Result, VaultKeyError};
use crate::redemption::engine::{format_date, RedemptionEngine};
use crate::redemption::models::{CodeKind, CodeRecord, RedemptionState};
use crate::redemption::strategy::RedemptionStrategy;

pub struct VipRedemption {
    pub code: String,
    pub campaign_id: String,
}

#[async_trait]
impl RedemptionStrategy for VipRedemption {
    // The vendor has no lookup endpoint for VIP codes.
    type Info = ();

    fn kind(&self) -> CodeKind {
        CodeKind::Vip
    }

    fn code(&self) -> &str {
        &self.code
    }

    async fn fetch_info(&self, _engine: &RedemptionEngine) -> Result<()> {
        Ok(())
    }

    async fn validate(&self, engine: &RedemptionEngine, _info: ()) -> Result<CodeRecord> {
        let ledger = engine.ledger();
        if ledger.is_bad(CodeKind::Vip, &self.code).await? {
            return Err(VaultKeyError::KnownBadCode(self.code.clone()));
        }
        if let Some(used) = ledger.find_used(CodeKind::Vip, &self.code, None).await? {
            return Err(VaultKeyError::AlreadyRedeemed {
                code: self.code.clone(),
                date: Some(format_date(&used.date)),
            });
        }

        Ok(CodeRecord {
            code: self.code.clone(),
            platform: None,
            date: engine.now(),
            title: None,
            description: None,
        })
    }

    async fn submit(&self, engine: &RedemptionEngine, record: &mut CodeRecord) -> Result<()> {
        let reply = engine.api().submit_vip(&self.code, &self.campaign_id).await;
        engine.mark(&self.code, RedemptionState::Submitted);
        match reply {
            Ok(message) => {
                record.description = message;
                Ok(())
            }
            // 400 covers both "already redeemed" and "no longer active"
            Err(VaultKeyError::HttpStatus { status: 400, .. }) => Err(VaultKeyError::AlreadyRedeemed {
                code: self.code.clone(),
                date: None,
            }),
            Err(VaultKeyError::HttpStatus { status, .. }) if status >= 500 => {
                if let Err(e) = engine.ledger().add_bad(CodeKind::Vip, &self.code).await {
                    warn!("Could not record VIP code {} as invalid: {}", self.code, e);
                }
                Err(VaultKeyError::KnownBadCode(self.code.clone()))
            }
            Err(VaultKeyError::HttpStatus { status, .. }) => Err(VaultKeyError::UnexpectedStatus(status)),
            Err(e) => Err(e),
        }
    }
}
