use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::api::VipCodeType;
use crate::error::VaultKeyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Shift,
    Vip,
}

impl CodeKind {
    pub fn used_key(&self) -> &'static str {
        match self {
            CodeKind::Shift => "shift",
            CodeKind::Vip => "vip",
        }
    }

    pub fn bad_key(&self) -> &'static str {
        match self {
            CodeKind::Shift => "bad_shift",
            CodeKind::Vip => "bad_vip",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Shift => write!(f, "SHiFT"),
            CodeKind::Vip => write!(f, "VIP"),
        }
    }
}

/// One successful redemption, as kept in the used-code ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub code: String,
    pub platform: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionTarget {
    Shift { code: String, platform: String },
    Vip { code: String, campaign_id: String },
}

impl RedemptionTarget {
    pub fn code(&self) -> &str {
        match self {
            RedemptionTarget::Shift { code, .. } | RedemptionTarget::Vip { code, .. } => code,
        }
    }

    pub fn kind(&self) -> CodeKind {
        match self {
            RedemptionTarget::Shift { .. } => CodeKind::Shift,
            RedemptionTarget::Vip { .. } => CodeKind::Vip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionState {
    Pending,
    InfoFetched,
    Validated,
    Submitted,
    Polling(u32),
    Succeeded,
    Rejected,
    Failed,
}

/// Per-code result of a batch run; input order is kept.
#[derive(Debug)]
pub struct RedemptionOutcome {
    pub code: String,
    pub vip_type: Option<VipCodeType>,
    pub result: Result<CodeRecord, VaultKeyError>,
}

impl RedemptionOutcome {
    pub fn success(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn count_successes(outcomes: &[RedemptionOutcome]) -> usize {
    outcomes.iter().filter(|o| o.success()).count()
}
