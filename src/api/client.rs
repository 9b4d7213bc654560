use std::sync::Arc;
use futures::future::try_join_all;
use log::{debug, info};
use serde_json::{json, Value};
use crate::api::models::{
    JobStatus, Platform, RedemptionJob, ShiftCodeInfo, UserInfo, VipCampaign, VipCodeType,
    VipRedemptionReply, GAME_TITLE,
};
use crate::api::widgets::{code_redemption_widget_ids, extract_widget_configuration, json_id};
use crate::config::ApiConfig;
use crate::error::{Result, VaultKeyError};
use crate::http::{parse_json, HttpRequest, RequestGateway};

/// Typed calls against the vendor's game API and its VIP campaign widgets.
pub struct VendorApi {
    gateway: Arc<RequestGateway>,
    base_url: String,
    widget_base_url: String,
    activity_widget_id: u32,
}

impl VendorApi {
    pub fn new(gateway: Arc<RequestGateway>, api: &ApiConfig) -> Self {
        Self {
            gateway,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            widget_base_url: api.widget_base_url.trim_end_matches('/').to_string(),
            activity_widget_id: api.activity_widget_id,
        }
    }

    pub fn gateway(&self) -> &Arc<RequestGateway> {
        &self.gateway
    }

    pub async fn user_info(&self) -> Result<UserInfo> {
        let response = self
            .gateway
            .gated_request(HttpRequest::post(format!("{}/users/me", self.base_url)))
            .await?;
        parse_json(&response.body)
    }

    pub async fn platforms(&self) -> Result<Vec<Platform>> {
        let user_info = self.user_info().await?;
        user_info
            .played_games
            .into_iter()
            .find(|game| game.title == GAME_TITLE)
            .map(|game| game.platforms)
            .ok_or_else(|| VaultKeyError::PlatformNotFound(None))
    }

    pub async fn shift_code_info(&self, code: &str) -> Result<ShiftCodeInfo> {
        let response = self
            .gateway
            .gated_request(HttpRequest::get(format!("{}/code/{}/info", self.base_url, code)))
            .await?;
        parse_json(&response.body)
    }

    /// Starts a SHiFT redemption and returns the job id to poll.
    pub async fn submit_shift(&self, code: &str, platform: &str) -> Result<String> {
        let response = self
            .gateway
            .gated_request(HttpRequest::post(format!(
                "{}/code/{}/redeem/{}",
                self.base_url, code, platform
            )))
            .await?;
        let job: RedemptionJob = parse_json(&response.body)?;
        job.job_id
            .ok_or_else(|| VaultKeyError::MalformedResponse("Could not parse response from 2K servers.".to_string()))
    }

    /// Error responses carry the same job schema, so they are parsed rather than raised.
    pub async fn shift_job_status(&self, code: &str, job_id: &str) -> Result<JobStatus> {
        let request = HttpRequest::get(format!("{}/code/{}/job/{}", self.base_url, code, job_id));
        match self.gateway.gated_request(request).await {
            Ok(response) => parse_json(&response.body),
            Err(VaultKeyError::HttpStatus { status, body }) => {
                debug!("Job {} answered with status {}", job_id, status);
                parse_json(&body)
            }
            Err(e) => Err(e),
        }
    }

    /// Submits a VIP code. Status handling is left to the caller.
    pub async fn submit_vip(&self, code: &str, campaign_id: &str) -> Result<Option<String>> {
        let request = HttpRequest::post(format!(
            "{}/code-redemption-campaign/redeem?cid={}",
            self.widget_base_url, campaign_id
        ))
        .json(&json!({ "code": code }));
        let response = self.gateway.gated_request(request).await?;
        let reply: VipRedemptionReply = parse_json(&response.body)?;
        Ok(reply.message)
    }

    pub async fn widget_configuration(&self, url: String) -> Result<Value> {
        let response = self.gateway.gated_request(HttpRequest::get(url)).await?;
        extract_widget_configuration(&response.body)
    }

    /// Discovers which campaign id redeems which kind of VIP code.
    pub async fn vip_configuration(&self) -> Result<Vec<VipCampaign>> {
        let activity_list = self
            .widget_configuration(format!(
                "{}/widgets/t/activity-list/{}/?__locale__=en",
                self.widget_base_url, self.activity_widget_id
            ))
            .await?;

        let widget_ids = code_redemption_widget_ids(&activity_list);
        let widgets = try_join_all(widget_ids.iter().map(|widget_id| {
            self.widget_configuration(format!(
                "{}/widgets/t/code-redemption/{}",
                self.widget_base_url, widget_id
            ))
        }))
        .await?;

        let campaigns: Vec<VipCampaign> = widgets
            .iter()
            .filter_map(|widget| {
                let code_type = widget["activityName"].as_str().and_then(VipCodeType::find_in)?;
                let campaign_id = json_id(&widget["campaignId"])?;
                Some(VipCampaign { code_type, campaign_id })
            })
            .collect();

        info!("Found {} VIP campaigns across {} redemption widgets", campaigns.len(), widget_ids.len());
        Ok(campaigns)
    }
}
