/// Routing tests for the ordered primary/fallback pipeline.
/// Channels are replaced with in-memory doubles so no database or webhook is needed.
mod common;

use common::{StubChannel, CONTACT_EMAIL, INTERNAL_DETAIL};
use lead_intake_api::errors::{AppError, DeliveryError};
use lead_intake_api::models::DeliveryMethod;
use lead_intake_api::submission::SubmissionRouter;
use std::sync::Arc;

fn router(primary: &Arc<StubChannel>, fallback: &Arc<StubChannel>) -> SubmissionRouter {
    SubmissionRouter::new("website", CONTACT_EMAIL)
        .with_channel(primary.clone())
        .with_channel(fallback.clone())
}

#[tokio::test]
async fn test_missing_fields_invoke_no_channel() {
    let primary = Arc::new(StubChannel::succeeding(DeliveryMethod::Primary, Some("1")));
    let fallback = Arc::new(StubChannel::succeeding(DeliveryMethod::Fallback, None));
    let router = router(&primary, &fallback);

    let body = br#"{"name": "Jo", "email": "", "company": "Acme"}"#;
    let failure = router.submit(body).await.unwrap_err();

    match &failure.error {
        AppError::Validation(fields) => assert_eq!(fields, &vec!["email", "service", "message"]),
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert!(failure.is_validation());
    assert!(failure.failures.is_empty());
    assert_eq!(primary.calls(), 0);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_invokes_no_channel() {
    let primary = Arc::new(StubChannel::succeeding(DeliveryMethod::Primary, Some("1")));
    let fallback = Arc::new(StubChannel::succeeding(DeliveryMethod::Fallback, None));
    let router = router(&primary, &fallback);

    let bodies: [&[u8]; 5] = [
        b"not json",
        br#"{"name": 42}"#,
        br#""just a string""#,
        br#"["Jo","jo@x.com",null,null,"SEO",null,"hi"]"#,
        b"null",
    ];
    for body in bodies {
        let failure = router.submit(body).await.unwrap_err();
        assert!(matches!(failure.error, AppError::BadRequest(_)));
    }
    assert_eq!(primary.calls(), 0);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn test_primary_success_skips_fallback() {
    let primary = Arc::new(StubChannel::succeeding(
        DeliveryMethod::Primary,
        Some("4f2c7a0e-1111-4222-8333-944455556666"),
    ));
    let fallback = Arc::new(StubChannel::succeeding(DeliveryMethod::Fallback, None));
    let router = router(&primary, &fallback);

    let receipt = router.submit(&common::valid_body()).await.unwrap();

    assert_eq!(receipt.method, DeliveryMethod::Primary);
    assert_eq!(
        receipt.lead_id.as_deref(),
        Some("4f2c7a0e-1111-4222-8333-944455556666")
    );
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn test_primary_failure_routes_to_fallback() {
    let primary = Arc::new(StubChannel::failing(DeliveryMethod::Primary));
    let fallback = Arc::new(StubChannel::succeeding(DeliveryMethod::Fallback, None));
    let router = router(&primary, &fallback);

    let receipt = router.submit(&common::valid_body()).await.unwrap();

    assert_eq!(receipt.method, DeliveryMethod::Fallback);
    assert_eq!(receipt.lead_id, None);
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);

    // Both channels saw the same record
    assert_eq!(primary.received(), fallback.received());
}

#[tokio::test]
async fn test_both_channels_failing_returns_contact_message() {
    let primary = Arc::new(StubChannel::failing(DeliveryMethod::Primary));
    let fallback = Arc::new(StubChannel::failing(DeliveryMethod::Fallback));
    let router = router(&primary, &fallback);

    let failure = router.submit(&common::valid_body()).await.unwrap_err();

    match &failure.error {
        AppError::DeliveryFailed { contact_email } => assert_eq!(contact_email, CONTACT_EMAIL),
        other => panic!("Expected delivery failure, got {:?}", other),
    }
    assert!(!failure.is_validation());
    assert_eq!(failure.failures.len(), 2);
    assert!(matches!(failure.failures[0], DeliveryError::Primary(_)));
    assert!(matches!(failure.failures[1], DeliveryError::Fallback(_)));

    let (_, body) = failure.error.status_and_body();
    let rendered = body.to_string();
    assert!(rendered.contains(CONTACT_EMAIL));
    assert!(!rendered.contains(INTERNAL_DETAIL));
}

#[tokio::test]
async fn test_unconfigured_fallback_is_skipped_not_failed() {
    // {name:"Jo", email:"jo@x.com", service:"SEO", message:"hi"}, primary throwing, no fallback URL
    let primary = Arc::new(StubChannel::failing(DeliveryMethod::Primary));
    let fallback = Arc::new(StubChannel::unconfigured(DeliveryMethod::Fallback));
    let router = router(&primary, &fallback);

    let failure = router.submit(&common::valid_body()).await.unwrap_err();

    assert!(matches!(failure.error, AppError::DeliveryFailed { .. }));
    assert_eq!(failure.failures.len(), 1);
    assert_eq!(failure.failures[0].method(), DeliveryMethod::Primary);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn test_lead_record_carries_source_and_defaults() {
    let primary = Arc::new(StubChannel::succeeding(DeliveryMethod::Primary, Some("1")));
    let fallback = Arc::new(StubChannel::succeeding(DeliveryMethod::Fallback, None));
    let router = SubmissionRouter::new("landing-page", CONTACT_EMAIL)
        .with_channel(primary.clone())
        .with_channel(fallback.clone());

    router.submit(&common::valid_body()).await.unwrap();

    let leads = primary.received();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].source, "landing-page");
    assert_eq!(leads[0].company, "");
    assert_eq!(leads[0].status.as_str(), "new");
}

#[tokio::test]
async fn test_resubmission_is_not_deduplicated() {
    let primary = Arc::new(StubChannel::succeeding(DeliveryMethod::Primary, Some("1")));
    let fallback = Arc::new(StubChannel::succeeding(DeliveryMethod::Fallback, None));
    let router = router(&primary, &fallback);

    router.submit(&common::valid_body()).await.unwrap();
    router.submit(&common::valid_body()).await.unwrap();

    assert_eq!(primary.calls(), 2);
}

#[tokio::test]
async fn test_router_without_channels_fails_uniformly() {
    let router = SubmissionRouter::new("website", CONTACT_EMAIL);

    let failure = router.submit(&common::valid_body()).await.unwrap_err();

    assert!(matches!(failure.error, AppError::DeliveryFailed { .. }));
    assert!(failure.failures.is_empty());
}
