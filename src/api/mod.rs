pub mod client;
pub mod models;
pub mod widgets;

pub use client::VendorApi;
pub use models::{
    JobStatus, OfferCode, Platform, ShiftCodeInfo, UserInfo, VipCampaign, VipCodeType,
    CODE_ALREADY_REDEEMED,
};
