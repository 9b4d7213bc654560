use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Title the vendor uses for Borderlands 3 in `playedGames`.
pub const GAME_TITLE: &str = "oak";

/// Job error meaning the code was redeemed on this account before.
pub const CODE_ALREADY_REDEEMED: &str = "CODE_ALREADY_REDEEMED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub played_games: Vec<PlayedGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayedGame {
    pub title: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftCodeInfo {
    #[serde(default)]
    pub entitlement_offer_codes: Vec<OfferCode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCode {
    pub offer_service: String,
    #[serde(default)]
    pub is_active: bool,
    pub offer_title_text: Option<String>,
    pub offer_description_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedemptionJob {
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl JobStatus {
    pub fn error_code(&self) -> &str {
        self.error
            .as_deref()
            .or_else(|| self.errors.first().map(String::as_str))
            .unwrap_or("Unknown error.")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VipRedemptionReply {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VipCodeType {
    Diamond,
    Vault,
    Email,
    Creator,
    Boost,
}

impl VipCodeType {
    pub const ALL: [VipCodeType; 5] = [
        VipCodeType::Diamond,
        VipCodeType::Vault,
        VipCodeType::Email,
        VipCodeType::Creator,
        VipCodeType::Boost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VipCodeType::Diamond => "diamond",
            VipCodeType::Vault => "vault",
            VipCodeType::Email => "email",
            VipCodeType::Creator => "creator",
            VipCodeType::Boost => "boost",
        }
    }

    /// First known type mentioned anywhere in `name`, ignoring case.
    pub fn find_in(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|t| name.contains(t.as_str()))
    }
}

impl fmt::Display for VipCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VipCodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("unknown VIP code type '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipCampaign {
    pub code_type: VipCodeType,
    pub campaign_id: String,
}
