// tests/redemption_tests.rs

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use chrono::Utc;
use common::*;
use serde_json::json;
use vaultkey::api::VipCodeType;
use vaultkey::http::{HttpRequest, HttpResponse, SESSION_HEADER};
use vaultkey::redemption::{CodeKind, CodeRecord};
use vaultkey::VaultKeyError;

const CODE: &str = "WBKBB-XTHWH-3BKBW-3TJBJ-W6RBT";

/// Vendor where `CODE` is active on psn and the job succeeds on the given poll.
fn shift_vendor(succeed_on_poll: usize, polls: Arc<AtomicUsize>) -> impl Fn(&HttpRequest) -> vaultkey::Result<HttpResponse> {
    move |request: &HttpRequest| {
        if let Some(response) = account_route(request) {
            return Ok(response);
        }
        let url = request.url.as_str();
        if url.ends_with("/info") {
            return Ok(json_response(200, shift_info(&[("psn", true), ("xboxlive", false)])));
        }
        if url.contains("/redeem/") {
            return Ok(json_response(201, json!({ "job_id": "job-77" })));
        }
        if url.contains("/job/job-77") {
            let poll = polls.fetch_add(1, Ordering::SeqCst) + 1;
            return if poll >= succeed_on_poll {
                Ok(json_response(200, json!({ "success": true })))
            } else {
                Ok(json_response(200, json!({ "success": false, "errors": ["JOB_PENDING"] })))
            };
        }
        not_found(request)
    }
}

fn used_record(code: &str, platform: Option<&str>) -> CodeRecord {
    CodeRecord {
        code: code.to_string(),
        platform: platform.map(str::to_string),
        date: Utc::now(),
        title: None,
        description: None,
    }
}

#[tokio::test]
async fn shift_code_redeems_and_is_recorded() {
    let polls = Arc::new(AtomicUsize::new(0));
    let h = harness(shift_vendor(2, polls.clone())).await;

    let record = h.app.redeem_shift(CODE, Some("psn")).await.unwrap();

    assert_eq!(record.platform.as_deref(), Some("psn"));
    assert_eq!(record.title.as_deref(), Some("Golden Key"));
    assert_eq!(polls.load(Ordering::SeqCst), 2);

    let used = h.app.used_codes().await.unwrap();
    assert_eq!(used.shift, vec![record]);
    assert!(used.vip.is_empty());

    // every vendor call after login carried the session
    for request in h.transport.requests().iter().filter(|r| !r.url.ends_with("/authenticate")) {
        assert_eq!(request.header_value(SESSION_HEADER), Some(SESSION));
    }
    assert_eq!(h.transport.count_containing("/users/authenticate"), 1);
}

#[tokio::test]
async fn already_used_code_never_reaches_submission() {
    let polls = Arc::new(AtomicUsize::new(0));
    let h = harness(shift_vendor(1, polls)).await;
    h.app.storage().set("shift", &vec![used_record(CODE, Some("psn"))]).await.unwrap();

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();

    assert!(matches!(err, VaultKeyError::AlreadyRedeemed { ref code, date: Some(_) } if code == CODE));
    assert_eq!(h.transport.count_containing("/redeem/"), 0);
}

#[tokio::test]
async fn same_code_on_another_platform_is_allowed() {
    let polls = Arc::new(AtomicUsize::new(0));
    let h = harness(move |request: &HttpRequest| {
        if let Some(response) = account_route(request) {
            return Ok(response);
        }
        if request.url.ends_with("/info") {
            return Ok(json_response(200, shift_info(&[("psn", true), ("steam", true)])));
        }
        shift_vendor(1, polls.clone())(request)
    })
    .await;
    h.app.storage().set("shift", &vec![used_record(CODE, Some("psn"))]).await.unwrap();

    h.app.redeem_shift(CODE, Some("steam")).await.unwrap();

    assert_eq!(h.app.used_codes().await.unwrap().shift.len(), 2);
}

#[tokio::test]
async fn known_bad_code_is_not_submitted() {
    let polls = Arc::new(AtomicUsize::new(0));
    let h = harness(shift_vendor(1, polls)).await;
    h.app.storage().set("bad_shift", &vec![CODE.to_string()]).await.unwrap();

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();

    assert!(matches!(err, VaultKeyError::KnownBadCode(_)));
    assert_eq!(h.transport.count_containing("/redeem/"), 0);
}

#[tokio::test]
async fn shift_validation_failures() {
    let polls = Arc::new(AtomicUsize::new(0));
    let h = harness(shift_vendor(1, polls)).await;

    // registered, but the code has no offer for it
    let err = h.app.redeem_shift(CODE, Some("steam")).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::PlatformMismatch { ref platform, .. } if platform == "steam"));

    // not registered on the account at all
    let err = h.app.redeem_shift(CODE, Some("xboxlive")).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::PlatformNotFound(Some(ref p)) if p == "xboxlive"));

    assert_eq!(h.transport.count_containing("/redeem/"), 0);
}

#[tokio::test]
async fn inactive_offer_is_rejected() {
    let h = harness(|request: &HttpRequest| {
        if let Some(response) = account_route(request) {
            return Ok(response);
        }
        if request.url.ends_with("/info") {
            return Ok(json_response(200, shift_info(&[("psn", false)])));
        }
        not_found(request)
    })
    .await;

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::CodeInactive(_)));
}

#[tokio::test]
async fn job_that_never_settles_times_out_after_ten_polls() {
    let polls = Arc::new(AtomicUsize::new(0));
    let h = harness(shift_vendor(usize::MAX, polls.clone())).await;

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();

    assert!(matches!(err, VaultKeyError::RedemptionTimeout(10)));
    assert_eq!(polls.load(Ordering::SeqCst), 10);
    assert_eq!(h.transport.count_containing("/job/"), 10);
    assert!(h.app.used_codes().await.unwrap().shift.is_empty());
}

#[tokio::test]
async fn already_redeemed_job_error_is_remembered() {
    let polls = Arc::new(AtomicUsize::new(0));
    let counter = polls.clone();
    let h = harness(move |request: &HttpRequest| {
        if let Some(response) = account_route(request) {
            return Ok(response);
        }
        let url = request.url.as_str();
        if url.ends_with("/info") {
            return Ok(json_response(200, shift_info(&[("psn", true)])));
        }
        if url.contains("/redeem/") {
            return Ok(json_response(201, json!({ "job_id": "job-3" })));
        }
        if url.contains("/job/") {
            let poll = counter.fetch_add(1, Ordering::SeqCst) + 1;
            return if poll == 3 {
                // error responses carry the job body too
                Ok(json_response(400, json!({ "success": false, "error": "CODE_ALREADY_REDEEMED" })))
            } else {
                Ok(json_response(200, json!({ "success": false })))
            };
        }
        not_found(request)
    })
    .await;

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();

    assert!(matches!(err, VaultKeyError::AlreadyRedeemed { date: None, .. }));
    assert_eq!(polls.load(Ordering::SeqCst), 3);
    let used = h.app.used_codes().await.unwrap();
    assert_eq!(used.shift.len(), 1);
    assert_eq!(used.shift[0].code, CODE);

    // and the next attempt stops at validation
    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::AlreadyRedeemed { date: Some(_), .. }));
    assert_eq!(h.transport.count_containing("/redeem/"), 1);
}

#[tokio::test]
async fn missing_job_id_is_a_malformed_response() {
    let h = harness(|request: &HttpRequest| {
        if let Some(response) = account_route(request) {
            return Ok(response);
        }
        if request.url.ends_with("/info") {
            return Ok(json_response(200, shift_info(&[("psn", true)])));
        }
        if request.url.contains("/redeem/") {
            return Ok(json_response(200, json!({ "queued": true })));
        }
        not_found(request)
    })
    .await;

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::MalformedResponse(_)));
}

#[tokio::test]
async fn garbage_info_body_surfaces_as_json_error() {
    let h = harness(|request: &HttpRequest| {
        if let Some(response) = account_route(request) {
            return Ok(response);
        }
        Ok(HttpResponse::new(200, "<html>maintenance</html>"))
    })
    .await;

    let err = h.app.redeem_shift(CODE, Some("psn")).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::MalformedJson(_)));
}

fn vip_vendor(status: u16) -> impl Fn(&HttpRequest) -> vaultkey::Result<HttpResponse> {
    move |request: &HttpRequest| {
        if let Some(response) = account_route(request).or_else(|| widget_route(request)) {
            return Ok(response);
        }
        if request.url.starts_with(&format!("{}/code-redemption-campaign/redeem", WIDGETS)) {
            return Ok(json_response(status, json!({ "message": "You earned 500 points!" })));
        }
        not_found(request)
    }
}

#[tokio::test]
async fn vip_code_redeems_against_its_campaign() {
    let h = harness(vip_vendor(200)).await;

    let record = h.app.redeem_vip("SUPERSECRET", VipCodeType::Diamond).await.unwrap();

    assert_eq!(record.platform, None);
    assert_eq!(record.description.as_deref(), Some("You earned 500 points!"));
    let submit = h
        .transport
        .requests()
        .into_iter()
        .find(|r| r.url.contains("/code-redemption-campaign/redeem"))
        .unwrap();
    assert!(submit.url.ends_with("cid=4412"));
    assert_eq!(submit.body.as_deref(), Some(r#"{"code":"SUPERSECRET"}"#));
    assert_eq!(h.app.used_codes().await.unwrap().vip, vec![record]);
}

#[tokio::test]
async fn vip_server_error_marks_code_bad() {
    let h = harness(vip_vendor(503)).await;

    let err = h.app.redeem_vip("BROKEN", VipCodeType::Vault).await.unwrap_err();

    assert!(matches!(err, VaultKeyError::KnownBadCode(ref c) if c == "BROKEN"));
    let bad = h.app.bad_codes().await.unwrap();
    assert_eq!(bad.vip, vec!["BROKEN".to_string()]);
    assert!(bad.shift.is_empty());

    // second attempt is refused locally
    let err = h.app.redeem_vip("BROKEN", VipCodeType::Vault).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::KnownBadCode(_)));
    assert_eq!(h.transport.count_containing("/code-redemption-campaign/redeem"), 1);
}

#[tokio::test]
async fn vip_bad_request_means_already_redeemed() {
    let h = harness(vip_vendor(400)).await;
    let err = h.app.redeem_vip("USEDUP", VipCodeType::Vault).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::AlreadyRedeemed { .. }));
    assert!(h.app.bad_codes().await.unwrap().vip.is_empty());
}

#[tokio::test]
async fn vip_other_status_is_unexpected() {
    let h = harness(vip_vendor(404)).await;
    let err = h.app.redeem_vip("WHO", VipCodeType::Vault).await.unwrap_err();
    assert!(matches!(err, VaultKeyError::UnexpectedStatus(404)));
}

#[tokio::test]
async fn vip_used_list_blocks_resubmission() {
    let h = harness(vip_vendor(200)).await;
    h.app.storage().set("vip", &vec![used_record("SUPERSECRET", None)]).await.unwrap();

    let err = h.app.redeem_vip("SUPERSECRET", VipCodeType::Diamond).await.unwrap_err();

    assert!(matches!(err, VaultKeyError::AlreadyRedeemed { date: Some(_), .. }));
    assert_eq!(h.transport.count_containing("/code-redemption-campaign/redeem"), 0);
}

#[tokio::test]
async fn ledger_kinds_do_not_leak() {
    let h = harness(vip_vendor(503)).await;
    h.app.redeem_vip("SHARED", VipCodeType::Vault).await.unwrap_err();
    assert!(h.app.used_codes().await.unwrap().of(CodeKind::Shift).is_empty());
    assert!(h.app.bad_codes().await.unwrap().of(CodeKind::Shift).is_empty());
}
