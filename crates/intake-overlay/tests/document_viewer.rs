//! Document viewer: declarative triggers, async loads and stale results

use intake_overlay::content::LOADING_PLACEHOLDER;
use intake_overlay::dom::Slot;
use intake_overlay::{ContentRequest, OverlayController, TriggerTable, UiEvent};
use intake_overlay::dom::MemoryDocument;
use intake_test_utils::{
    setup_overlays, setup_overlays_at, StaticContentSource, PAGE_CTA, README_OVERLAY, SETUP_OVERLAY, TERMS_FILE,
    TERMS_LINK,
};
use pretty_assertions::assert_eq;

const TERMS_TEXT: &str = "\n# Terms of Service\n\nUse of the platform is subject to review.\n\n";

fn source() -> StaticContentSource {
    StaticContentSource::new().with_doc(TERMS_FILE, TERMS_TEXT)
}

fn click(ctl: &mut OverlayController<MemoryDocument>, id: &str) -> Option<ContentRequest> {
    TriggerTable::standard()
        .dispatch(ctl, &UiEvent::Click { target: id.into() })
        .content
}

#[tokio::test]
async fn trigger_loads_labelled_document() {
    let mut ctl = setup_overlays();

    let request = click(&mut ctl, TERMS_LINK).expect("viewer trigger yields a load");
    let doc = ctl.document();
    assert_eq!(doc.slot_text(README_OVERLAY, Slot::Label), Some("TERMS OF SERVICE"));
    assert_eq!(doc.slot_text(README_OVERLAY, Slot::Body), Some(LOADING_PLACEHOLDER));
    assert_eq!(doc.download_target(README_OVERLAY), Some(TERMS_FILE));
    assert!(ctl.is_pending(request.token));

    let response = request.resolve(&source()).await;
    assert!(ctl.apply_content(&response));

    assert_eq!(
        ctl.document().slot_text(README_OVERLAY, Slot::Body),
        Some("# Terms of Service\n\nUse of the platform is subject to review.")
    );
    assert!(!ctl.is_pending(response.token));
}

#[tokio::test]
async fn missing_document_shows_not_found() {
    let mut ctl = setup_overlays();
    let request = ctl
        .open(README_OVERLAY, Some("ads-privacy-policy.md"))
        .unwrap()
        .unwrap();

    let response = request.resolve(&source()).await;
    assert!(ctl.apply_content(&response));
    assert_eq!(
        ctl.document().slot_text(README_OVERLAY, Slot::Label),
        Some("PRIVACY POLICY")
    );
    assert_eq!(
        ctl.document().slot_text(README_OVERLAY, Slot::Body),
        Some("ERROR 404: [ads-privacy-policy.md] not found in repository.")
    );
}

#[tokio::test]
async fn load_finishing_after_close_is_dropped() {
    let mut ctl = setup_overlays();
    let request = click(&mut ctl, TERMS_LINK).unwrap();

    ctl.close();
    let mutations = ctl.document().mutations();

    let response = request.resolve(&source()).await;
    assert!(!ctl.apply_content(&response));
    assert_eq!(ctl.document().mutations(), mutations);
    assert_eq!(
        ctl.document().slot_text(README_OVERLAY, Slot::Body),
        Some(LOADING_PLACEHOLDER)
    );
}

#[tokio::test]
async fn reload_supersedes_earlier_load() {
    let mut ctl = setup_overlays();
    let first = ctl.open(README_OVERLAY, Some(TERMS_FILE)).unwrap().unwrap();
    let second = ctl
        .open(README_OVERLAY, Some("ads-commercial-terms.md"))
        .unwrap()
        .unwrap();
    assert_ne!(first.token, second.token);

    let source = source().with_doc("ads-commercial-terms.md", "Net 30.");
    let late_first = first.resolve(&source).await;
    let second = second.resolve(&source).await;

    assert!(ctl.apply_content(&second));
    assert!(!ctl.apply_content(&late_first));
    assert_eq!(ctl.document().slot_text(README_OVERLAY, Slot::Body), Some("Net 30."));
    assert_eq!(ctl.stack().len(), 1);
}

#[test]
fn viewer_stacks_over_form_and_returns_to_it() {
    let mut ctl = setup_overlays();
    click(&mut ctl, PAGE_CTA);
    assert!(click(&mut ctl, "setup-terms").is_some());

    assert_eq!(ctl.top().map(|id| id.as_str()), Some(README_OVERLAY));
    assert!(!ctl.document().is_visible(SETUP_OVERLAY));

    click(&mut ctl, "readme-close");
    assert_eq!(ctl.top().map(|id| id.as_str()), Some(SETUP_OVERLAY));
    assert!(ctl.document().is_visible(SETUP_OVERLAY));
    assert!(ctl.scroll_locked());
}

#[test]
fn anchor_navigation_closes_everything_first() {
    let mut ctl = setup_overlays_at(300.0);
    ctl.open(SETUP_OVERLAY, None).unwrap();
    ctl.open(README_OVERLAY, None).unwrap();

    ctl.navigate_to_anchor("pricing").unwrap();

    assert!(ctl.stack().is_empty());
    assert!(!ctl.scroll_locked());
    let ys: Vec<f64> = ctl.document().scroll_log().iter().map(|r| r.y).collect();
    assert_eq!(ys, vec![300.0, 1400.0]);

    assert!(ctl.navigate_to_anchor("missing").is_err());
}
