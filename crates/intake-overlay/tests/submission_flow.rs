//! Form submission driving the overlay stack

use intake_form::{SubmissionPayload, ValidatedPayload};
use intake_overlay::dom::{MemoryDocument, Slot};
use intake_overlay::error::SUBMISSION_FAILED_MESSAGE;
use intake_overlay::submission::SUCCESS_MESSAGE;
use intake_overlay::{
    Document, FormState, OverlayController, SubmissionClient, SubmissionState, SubmitError,
    SubmitTransport, TriggerTable, UiEvent,
};
use intake_test_utils::{
    jane_payload, setup_overlays_at, ScriptedTransport, PAGE_CTA, SETUP_OVERLAY, SUCCESS_OVERLAY,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn open_form() -> OverlayController<MemoryDocument> {
    let mut ctl = setup_overlays_at(640.0);
    TriggerTable::standard().dispatch(&mut ctl, &UiEvent::Click { target: PAGE_CTA.into() });
    assert_eq!(ctl.top().map(|id| id.as_str()), Some(SETUP_OVERLAY));
    ctl
}

#[tokio::test]
async fn success_swaps_form_for_confirmation() {
    let mut ctl = open_form();
    let transport = ScriptedTransport::accepting();
    let mut client = SubmissionClient::new(transport.clone(), SUCCESS_OVERLAY);
    let mut form = FormState::new(jane_payload());

    client.submit(&mut form, &mut ctl).await.unwrap();

    assert_eq!(client.state(), &SubmissionState::Succeeded);
    assert_eq!(form, FormState::default());
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(transport.sent()[0].name, "Jane");

    let ids: Vec<&str> = ctl.stack().iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec![SUCCESS_OVERLAY]);
    assert!(ctl.scroll_locked());
    assert!(ctl.document().scroll_log().is_empty(), "no unlock/relock during the swap");
    assert_eq!(
        ctl.document().slot_text(SUCCESS_OVERLAY, Slot::Body),
        Some(SUCCESS_MESSAGE)
    );
    assert_eq!(ctl.document().active_element(), Some("success-close".into()));

    TriggerTable::standard().dispatch(&mut ctl, &UiEvent::Click { target: "success-close".into() });
    assert!(ctl.stack().is_empty());
    assert_eq!(ctl.document().active_element(), Some(PAGE_CTA.into()));
    assert_eq!(ctl.document().scroll_y(), 640.0);
}

#[tokio::test]
async fn service_failure_keeps_form_and_reenables_submit() {
    let mut ctl = open_form();
    let mut client = SubmissionClient::new(
        ScriptedTransport::rejecting(500, "Database insert failed"),
        SUCCESS_OVERLAY,
    );
    let mut form = FormState::new(jane_payload());

    let err = client.submit(&mut form, &mut ctl).await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected { status: 500, .. }));
    assert_eq!(
        client.state(),
        &SubmissionState::Failed(SUBMISSION_FAILED_MESSAGE.to_string())
    );
    assert!(client.submit_enabled());
    assert_eq!(form.payload, jane_payload());
    assert_eq!(ctl.top().map(|id| id.as_str()), Some(SETUP_OVERLAY));
}

#[tokio::test]
async fn invalid_form_is_never_sent() {
    let mut ctl = open_form();
    let transport = ScriptedTransport::accepting();
    let mut client = SubmissionClient::new(transport.clone(), SUCCESS_OVERLAY);
    let mut form = FormState::new(
        SubmissionPayload::new("Jane", "jane@co.com", "Web", "Foundation").with_consents(true, false),
    );

    let err = client.submit(&mut form, &mut ctl).await.unwrap_err();

    assert!(matches!(err, SubmitError::Invalid(_)));
    assert!(transport.sent().is_empty());
    assert_eq!(
        client.state(),
        &SubmissionState::Failed(
            "Please confirm you have the rights and consent to share this information.".into()
        )
    );
}

#[tokio::test]
async fn free_provider_needs_acknowledgment() {
    let mut ctl = open_form();
    let transport = ScriptedTransport::accepting();
    let mut client = SubmissionClient::new(transport.clone(), SUCCESS_OVERLAY);
    let mut form = FormState::new(
        SubmissionPayload::new("Jane", "jane@gmail.com", "Android", "Cleanup").with_consents(true, true),
    );

    let err = client.submit(&mut form, &mut ctl).await.unwrap_err();
    assert!(matches!(err, SubmitError::AcknowledgmentRequired(_)));
    assert!(transport.sent().is_empty());

    form.company_managed_ack = true;
    client.submit(&mut form, &mut ctl).await.unwrap();
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(client.state(), &SubmissionState::Succeeded);
}

/// Never answers within any reasonable deadline
struct StalledTransport;

#[async_trait::async_trait]
impl SubmitTransport for StalledTransport {
    async fn send(&self, _: &ValidatedPayload) -> Result<(), SubmitError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn abandoned_submit_does_not_leave_form_pending() {
    let mut ctl = open_form();
    let mut client = SubmissionClient::new(StalledTransport, SUCCESS_OVERLAY);
    let mut form = FormState::new(jane_payload());

    let abandoned =
        tokio::time::timeout(Duration::from_millis(10), client.submit(&mut form, &mut ctl)).await;
    assert!(abandoned.is_err(), "send should still be in flight");

    assert_eq!(client.state(), &SubmissionState::Idle);
    assert!(client.submit_enabled());
    assert_eq!(form.payload, jane_payload());
    assert_eq!(ctl.top().map(|id| id.as_str()), Some(SETUP_OVERLAY));

    let retry =
        tokio::time::timeout(Duration::from_millis(10), client.submit(&mut form, &mut ctl)).await;
    assert!(retry.is_err(), "second attempt reaches the transport instead of AlreadyPending");
}
