//! Summary documents and contact-detail disclosure through the handlers.

use serde_json::{Value, json};
use signals_api::responses::CONTENT_TYPE_HTML;
use signals_api::{
    Channel, MemoryStore, RequestContext, signal_detail, signal_summary_context,
    signal_summary_html,
};
use signals_core::{Config, Location, Permission, Principal, Priority, StatusState};
use signals_test_helpers::{
    AttachmentFactory, CategoryFactory, DepartmentFactory, PrincipalFactory, SignalFactory,
    at_minutes,
};

struct Setup {
    store: MemoryStore,
    signal_id: i64,
    department_id: i64,
}

fn setup(email: Option<&str>, phone: Option<&str>) -> Setup {
    setup_with(email, phone, |factory| factory)
}

fn setup_with(
    email: Option<&str>,
    phone: Option<&str>,
    customize: impl FnOnce(SignalFactory) -> SignalFactory,
) -> Setup {
    let department = DepartmentFactory::create();
    let category = CategoryFactory::new()
        .name("Container is vol")
        .parent_name("Afval")
        .department(department.clone())
        .build();
    let factory = SignalFactory::new()
        .text("De container staat al dagen vol")
        .category(category)
        .reporter_email(email)
        .reporter_phone(phone)
        .location(Location {
            stadsdeel: None,
            area_code: Some("centrum-oost".into()),
            area_name: Some("Centrum Oost".into()),
            address_text: Some("Amstel 1 1011PN Amsterdam".into()),
        })
        .extra_property("Welke container?", json!({ "label": "Papier", "value": "paper" }))
        .status_at(StatusState::Behandeling, Some("Wij gaan aan de slag"), at_minutes(30));
    let signal = customize(factory).build();
    let signal_id = signal.id;
    Setup {
        store: [signal].into_iter().collect(),
        signal_id,
        department_id: department.id,
    }
}

fn reader(department_id: i64) -> PrincipalFactory {
    PrincipalFactory::new("lezer@example.com")
        .department(department_id)
        .grant(Permission::SiaRead)
}

fn contacts(body: &Value) -> (Value, Value) {
    (
        body["reporter"]["email"].clone(),
        body["reporter"]["phone"].clone(),
    )
}

#[test]
fn summary_masks_for_reader_without_contact_permission() {
    let s = setup(Some("melder@example.com"), Some("0612345678"));
    let ctx = RequestContext::interactive(reader(s.department_id).build());
    let response = signal_summary_context(&s.store, &ctx, s.signal_id);
    assert_eq!(response.status, 200);
    let body = response.body.unwrap();
    assert_eq!(contacts(&body), (json!("*****"), json!("*****")));
    assert_eq!(body["generated_by"], json!("lezer@example.com"));
}

#[test]
fn summary_reveals_with_contact_permission() {
    let s = setup(Some("melder@example.com"), Some("0612345678"));
    let principal = reader(s.department_id)
        .grant(Permission::SiaCanViewContactDetails)
        .build();
    let response = signal_summary_context(&s.store, &RequestContext::interactive(principal), s.signal_id);
    assert_eq!(
        contacts(&response.body.unwrap()),
        (json!("melder@example.com"), json!("0612345678"))
    );
}

#[test]
fn absent_contact_values_stay_null() {
    let s = setup(Some("melder@example.com"), None);
    let ctx = RequestContext::interactive(reader(s.department_id).build());
    let body = signal_summary_context(&s.store, &ctx, s.signal_id)
        .body
        .unwrap();
    assert_eq!(contacts(&body), (json!("*****"), Value::Null));
}

#[test]
fn summary_needs_department_for_interactive_requests() {
    let s = setup(Some("melder@example.com"), None);
    let ctx = RequestContext::interactive(reader(s.department_id + 10_000).build());
    let response = signal_summary_context(&s.store, &ctx, s.signal_id);
    assert_eq!(response.status, 403);
}

#[test]
fn trusted_client_gets_unredacted_contacts() {
    let s = setup(Some("melder@example.com"), Some("0612345678"));
    let config = Config::default();
    let ctx = RequestContext::from_client(None, Some("sigmax"), &config);
    assert_eq!(ctx.channel, Channel::TrustedIntegration);

    let response = signal_summary_context(&s.store, &ctx, s.signal_id);
    assert_eq!(response.status, 200);
    let body = response.body.unwrap();
    assert_eq!(
        contacts(&body),
        (json!("melder@example.com"), json!("0612345678"))
    );
    assert_eq!(body["generated_by"], Value::Null);
}

#[test]
fn trusted_channel_overrides_redaction_for_plain_principal() {
    let s = setup(Some("melder@example.com"), None);
    let principal: Principal = reader(s.department_id).build();
    let ctx = RequestContext {
        principal: Some(principal),
        channel: Channel::TrustedIntegration,
    };
    let body = signal_detail(&s.store, &ctx, s.signal_id).body.unwrap();
    assert_eq!(contacts(&body), (json!("melder@example.com"), Value::Null));
}

#[test]
fn summary_context_carries_document_fields() {
    let s = setup(None, None);
    let ctx = RequestContext::interactive(reader(s.department_id).build());
    let body = signal_summary_context(&s.store, &ctx, s.signal_id)
        .body
        .unwrap();

    assert_eq!(body["category"]["name"], json!("Container is vol"));
    assert_eq!(body["category"]["parent_name"], json!("Afval"));
    assert_eq!(body["location"]["area"], json!("Centrum Oost"));
    assert_eq!(body["status"], json!("In behandeling"));
    assert_eq!(body["extra_properties"][0]["answer"], json!("Papier"));
    let statuses = body["statuses"].as_array().unwrap();
    assert_eq!(statuses.last().unwrap()["text"], json!("Wij gaan aan de slag"));
}

fn html_body(response: signals_api::ApiResponse) -> String {
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, CONTENT_TYPE_HTML);
    response
        .body
        .and_then(|body| body.as_str().map(str::to_string))
        .expect("html body")
}

#[test]
fn summary_html_escapes_and_masks() {
    let s = setup_with(Some("melder@example.com"), Some("0612345678"), |f| {
        f.text("<script>alert('melding')</script>")
    });
    let ctx = RequestContext::interactive(reader(s.department_id).build());
    let html = html_body(signal_summary_html(&s.store, &ctx, s.signal_id));

    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("*****"));
    assert!(!html.contains("melder@example.com"));
    assert!(!html.contains("0612345678"));
    assert!(html.contains("Container is vol"));
    assert!(html.contains("Amstel 1 1011PN Amsterdam"));
}

#[test]
fn summary_html_shows_contact_details_when_allowed() {
    let s = setup(Some("melder@example.com"), Some("0612345678"));

    let trusted = html_body(signal_summary_html(
        &s.store,
        &RequestContext::trusted_integration(),
        s.signal_id,
    ));
    assert!(trusted.contains("melder@example.com"));
    assert!(trusted.contains("0612345678"));
    assert!(!trusted.contains("*****"));

    let principal = reader(s.department_id)
        .grant(Permission::SiaCanViewContactDetails)
        .build();
    let permitted = html_body(signal_summary_html(
        &s.store,
        &RequestContext::interactive(principal),
        s.signal_id,
    ));
    assert!(permitted.contains("melder@example.com"));
    assert!(permitted.contains("0612345678"));
}

#[test]
fn summary_html_lists_history_and_document_fields() {
    let s = setup_with(None, None, |f| {
        f.source("meldingen-app")
            .priority(Priority::High)
            .attachment(AttachmentFactory::document().file_name("plattegrond.pdf").build())
    });
    let ctx = RequestContext::interactive(reader(s.department_id).build());
    let html = html_body(signal_summary_html(&s.store, &ctx, s.signal_id));

    assert!(html.contains("In behandeling (b)"));
    assert!(html.contains("Wij gaan aan de slag"));
    assert!(html.contains("meldingen-app"));
    assert!(html.contains("Hoog"));
    assert!(html.contains("plattegrond.pdf"));
}

#[test]
fn summary_html_for_unknown_signal_is_not_found() {
    let s = setup(None, None);
    let ctx = RequestContext::trusted_integration();
    assert_eq!(signal_summary_html(&s.store, &ctx, -5).status, 404);
}
