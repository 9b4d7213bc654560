use std::collections::HashMap;
use std::sync::Arc;
use futures::future::join_all;
use log::info;
use crate::api::{Platform, VendorApi, VipCodeType};
use crate::error::{Result, VaultKeyError};
use crate::redemption::engine::RedemptionEngine;
use crate::redemption::models::{RedemptionOutcome, RedemptionTarget};
use crate::sources::{fetch_shift_codes, fetch_vip_codes, ShiftSource, VipSource};
use crate::storage::{keys, Storage};

/// Redeems every target concurrently. One failure never aborts the others, and
/// outcomes line up with `targets`.
pub async fn redeem_all(
    engine: &RedemptionEngine,
    targets: Vec<(RedemptionTarget, Option<VipCodeType>)>,
    platforms: &[Platform],
) -> Vec<RedemptionOutcome> {
    join_all(targets.into_iter().map(|(target, vip_type)| async move {
        let code = target.code().to_string();
        let result = engine.redeem(target, Some(platforms)).await;
        RedemptionOutcome { code, vip_type, result }
    }))
    .await
}

/// Scrape-then-redeem runs driven by the stored auto-redemption preferences.
pub struct AutoRedeemer {
    engine: Arc<RedemptionEngine>,
    api: Arc<VendorApi>,
    storage: Arc<Storage>,
}

impl AutoRedeemer {
    pub fn new(engine: Arc<RedemptionEngine>, api: Arc<VendorApi>, storage: Arc<Storage>) -> Self {
        Self { engine, api, storage }
    }

    pub async fn execute_auto_shift(&self) -> Result<Vec<RedemptionOutcome>> {
        let source: String = self
            .storage
            .get_or(keys::AUTO_SHIFT_SOURCE, ShiftSource::default().to_string())
            .await?;
        let source: ShiftSource = source.parse()?;

        let codes = fetch_shift_codes(self.api.gateway(), source).await?;
        let platforms = self.api.platforms().await?;
        let default_platform = platforms
            .first()
            .map(|p| p.service.clone())
            .ok_or(VaultKeyError::PlatformNotFound(None))?;
        let platform: String = self.storage.get_or(keys::AUTO_SHIFT_PLATFORM, default_platform).await?;

        info!("Redeeming {} SHiFT codes for platform {}", codes.len(), platform);
        let targets = codes
            .into_iter()
            .map(|code| (RedemptionTarget::Shift { code, platform: platform.clone() }, None))
            .collect();
        Ok(redeem_all(&self.engine, targets, &platforms).await)
    }

    pub async fn execute_auto_vip(&self) -> Result<Vec<RedemptionOutcome>> {
        let source: String = self
            .storage
            .get_or(keys::AUTO_VIP_SOURCE, VipSource::default().to_string())
            .await?;
        let source: VipSource = source.parse()?;

        let codes = fetch_vip_codes(self.api.gateway(), source).await?;
        let campaigns = self.api.vip_configuration().await?;
        let platforms = self.api.platforms().await?;

        let campaign_ids: HashMap<VipCodeType, String> = campaigns
            .into_iter()
            .map(|campaign| (campaign.code_type, campaign.campaign_id))
            .collect();

        let scraped = codes.len();
        let targets: Vec<_> = codes
            .into_iter()
            .filter_map(|entry| {
                let code_type = entry.code_type.parse::<VipCodeType>().ok()?;
                let campaign_id = campaign_ids.get(&code_type)?.clone();
                Some((RedemptionTarget::Vip { code: entry.code, campaign_id }, Some(code_type)))
            })
            .collect();

        if targets.len() != scraped {
            info!("Ignoring {} VIP Codes due to invalid type.", scraped - targets.len());
        }
        info!("Redeeming {} VIP Codes.", targets.len());
        Ok(redeem_all(&self.engine, targets, &platforms).await)
    }
}
