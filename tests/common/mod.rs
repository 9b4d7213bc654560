// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use vaultkey::clock::ManualClock;
use vaultkey::http::{HttpRequest, HttpResponse};
use vaultkey::storage::MemoryBackend;
use vaultkey::test_utils::MockTransport;
use vaultkey::{Config, Result, VaultKey};

pub const BASE: &str = "https://api.2k.com/borderlands";
pub const WIDGETS: &str = "https://2kgames.crowdtwist.com";
pub const SESSION: &str = "session-1";

pub struct Harness {
    pub app: VaultKey,
    pub transport: Arc<MockTransport>,
    pub backend: Arc<MemoryBackend>,
    pub clock: Arc<ManualClock>,
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.redemption.poll_interval_ms = 0;
    config
}

/// App with stored credentials, an in-memory store and `handler` standing in for the network.
pub async fn harness<F>(handler: F) -> Harness
where
    F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
{
    let transport = MockTransport::new(handler);
    let backend = Arc::new(MemoryBackend::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2019, 10, 3, 18, 0, 0).unwrap()));
    let app = VaultKey::new(&test_config(), backend.clone(), transport.clone(), clock.clone());
    app.storage().set("username", "vault.hunter@example.com").await.unwrap();
    app.storage().set("password", "hunter2").await.unwrap();
    Harness { app, transport, backend, clock }
}

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

pub fn login_ok(session: &str) -> HttpResponse {
    json_response(200, json!({})).with_header("X-Session-Set", session)
}

pub fn user_info(platforms: &[&str]) -> Value {
    json!({
        "playedGames": [
            { "title": "mayhem2", "platforms": [{ "service": "epic" }] },
            { "title": "oak", "platforms": platforms.iter().map(|p| json!({ "service": p })).collect::<Vec<_>>() }
        ]
    })
}

pub fn shift_info(offers: &[(&str, bool)]) -> Value {
    json!({
        "entitlement_offer_codes": offers.iter().map(|(service, active)| json!({
            "offer_service": service,
            "is_active": active,
            "offer_title_text": "Golden Key",
            "offer_description_text": "Unlocks a golden chest"
        })).collect::<Vec<_>>()
    })
}

/// Login and user info for an account with Borderlands 3 on psn and steam.
pub fn account_route(request: &HttpRequest) -> Option<HttpResponse> {
    if request.url == format!("{}/users/authenticate", BASE) {
        return Some(login_ok(SESSION));
    }
    if request.url == format!("{}/users/me", BASE) {
        return Some(json_response(200, user_info(&["psn", "steam"])));
    }
    None
}

/// The `{code}` segment of `.../code/{code}/...`.
pub fn code_in(url: &str) -> &str {
    url.split('/')
        .skip_while(|segment| *segment != "code")
        .nth(1)
        .unwrap_or("")
}

pub fn not_found(request: &HttpRequest) -> Result<HttpResponse> {
    Ok(HttpResponse::new(404, format!("no route for {}", request.url)))
}

pub fn widget_page(conf: Value) -> HttpResponse {
    HttpResponse::new(
        200,
        format!("<html><head><script>window.widgetConf = {};</script></head></html>", conf),
    )
}

/// Activity list with two redemption widgets: 11 takes vault codes, 12 takes diamond codes.
pub fn widget_route(request: &HttpRequest) -> Option<HttpResponse> {
    let url = request.url.as_str();
    if url.starts_with(&format!("{}/widgets/t/activity-list/", WIDGETS)) {
        return Some(widget_page(json!({
            "entries": [
                { "link": { "widgetType": "code-redemption", "widgetId": 11 } },
                { "link": { "widgetType": "sweepstakes", "widgetId": 13 } },
                { "link": { "widgetType": "code-redemption", "widgetId": 12 } }
            ]
        })));
    }
    if url == format!("{}/widgets/t/code-redemption/11", WIDGETS) {
        return Some(widget_page(json!({ "activityName": "Vault Insider Code", "campaignId": 4411 })));
    }
    if url == format!("{}/widgets/t/code-redemption/12", WIDGETS) {
        return Some(widget_page(json!({ "activityName": "DIAMOND Code Redemption", "campaignId": "4412" })));
    }
    None
}
