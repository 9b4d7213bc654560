use std::sync::Arc;
use log::info;
use tokio::sync::broadcast;
use crate::api::{Platform, UserInfo, VendorApi, VipCampaign, VipCodeType};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Result, VaultKeyError};
use crate::events::{AppEvent, EventBus};
use crate::http::{ReqwestTransport, RequestGateway, SessionManager, Transport};
use crate::redemption::{
    AutoRedeemer, BadCodes, CodeLedger, CodeRecord, RedemptionEngine, RedemptionOutcome,
    RedemptionTarget, UsedCodes,
};
use crate::storage::{keys, KeyValueBackend, SqliteBackend, Storage};

/// Everything wired together. This is what the command line talks to.
pub struct VaultKey {
    storage: Arc<Storage>,
    session: Arc<SessionManager>,
    api: Arc<VendorApi>,
    ledger: Arc<CodeLedger>,
    engine: Arc<RedemptionEngine>,
    auto: AutoRedeemer,
    events: EventBus,
}

impl VaultKey {
    pub fn new(
        config: &Config,
        backend: Arc<dyn KeyValueBackend>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let storage = Arc::new(Storage::new(backend, Arc::clone(&clock)));
        let session = Arc::new(SessionManager::new(
            Arc::clone(&storage),
            Arc::clone(&transport),
            config.api.base_url.trim_end_matches('/'),
        ));
        let gateway = Arc::new(RequestGateway::new(transport, Arc::clone(&session)));
        let api = Arc::new(VendorApi::new(gateway, &config.api));
        let ledger = Arc::new(CodeLedger::new(Arc::clone(&storage)));
        let engine = Arc::new(RedemptionEngine::new(
            Arc::clone(&api),
            Arc::clone(&ledger),
            clock,
            config.redemption.clone(),
        ));
        let auto = AutoRedeemer::new(Arc::clone(&engine), Arc::clone(&api), Arc::clone(&storage));

        Self {
            storage,
            session,
            api,
            ledger,
            engine,
            auto,
            events: EventBus::new(),
        }
    }

    /// Production wiring: sqlite file from the config, real HTTP, wall clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = Arc::new(SqliteBackend::new(&config.database_path)?);
        let transport = Arc::new(ReqwestTransport::new(&config.api)?);
        Ok(Self::new(config, backend, transport, Arc::new(SystemClock)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Stores new credentials and logs in with them.
    pub async fn update_credentials(&self, username: &str, password: &str) -> Result<()> {
        self.storage.set(keys::USERNAME, username).await?;
        self.storage.set(keys::PASSWORD, password).await?;
        self.session.login().await?;
        self.events.publish(AppEvent::LoginUpdated);
        Ok(())
    }

    pub async fn login(&self) -> Result<()> {
        self.session.login().await.map(|_| ())
    }

    pub async fn user_info(&self) -> Result<UserInfo> {
        self.api.user_info().await
    }

    pub async fn platforms(&self) -> Result<Vec<Platform>> {
        self.api.platforms().await
    }

    pub async fn vip_configuration(&self) -> Result<Vec<VipCampaign>> {
        self.api.vip_configuration().await
    }

    /// Without an explicit platform, uses the auto-SHiFT preference, then the first registered platform.
    pub async fn redeem_shift(&self, code: &str, platform: Option<&str>) -> Result<CodeRecord> {
        let platforms = self.api.platforms().await?;
        let platform = match platform {
            Some(platform) => platform.to_string(),
            None => {
                let first = platforms
                    .first()
                    .map(|p| p.service.clone())
                    .ok_or(VaultKeyError::PlatformNotFound(None))?;
                self.storage.get_or(keys::AUTO_SHIFT_PLATFORM, first).await?
            }
        };
        let target = RedemptionTarget::Shift {
            code: code.trim().to_string(),
            platform,
        };
        self.engine.redeem(target, Some(&platforms)).await
    }

    pub async fn redeem_vip(&self, code: &str, code_type: VipCodeType) -> Result<CodeRecord> {
        let campaign = self
            .api
            .vip_configuration()
            .await?
            .into_iter()
            .find(|campaign| campaign.code_type == code_type)
            .ok_or_else(|| VaultKeyError::MalformedResponse(format!("no active campaign for {} codes", code_type)))?;
        let target = RedemptionTarget::Vip {
            code: code.trim().to_string(),
            campaign_id: campaign.campaign_id,
        };
        self.engine.redeem(target, None).await
    }

    pub async fn execute_auto_shift(&self) -> Result<Vec<RedemptionOutcome>> {
        self.auto.execute_auto_shift().await
    }

    pub async fn execute_auto_vip(&self) -> Result<Vec<RedemptionOutcome>> {
        self.auto.execute_auto_vip().await
    }

    pub async fn used_codes(&self) -> Result<UsedCodes> {
        self.ledger.used_codes().await
    }

    pub async fn bad_codes(&self) -> Result<BadCodes> {
        self.ledger.bad_codes().await
    }

    pub async fn reset_used_codes(&self) -> Result<()> {
        self.ledger.reset().await
    }

    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        check_preference_key(key)?;
        info!("Setting preference {} = {}", key, value);
        self.storage.set(key, value).await
    }

    pub async fn preference(&self, key: &str) -> Result<String> {
        check_preference_key(key)?;
        self.storage.get(key).await
    }
}

fn check_preference_key(key: &str) -> Result<()> {
    if keys::is_reserved(key) {
        Err(VaultKeyError::Config(format!("'{}' is not a preference", key)))
    } else {
        Ok(())
    }
}
