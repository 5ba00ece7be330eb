//! Request handlers for the private signal and attachment endpoints.
//!
//! Every handler follows the same order: authenticate, check the endpoint's
//! method permissions, resolve the records, then ask the access engine.
//! Only after access is granted does the disclosure engine shape the body.

use serde_json::{Value, json};
use signals_core::{Attachment, Principal, Signal, SignalsError};
use signals_policy::templates::{PDF_SUMMARY_TEMPLATE, render_template};
use signals_policy::{
    HttpMethod, PermissionProfile, RenderingContext, can_delete_attachment, can_view,
    can_view_attachment, get_contact_details, get_rendering_context,
};

use crate::context::RequestContext;
use crate::responses::ApiResponse;
use crate::store::SignalStore;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

type HandlerResult<T> = Result<T, ApiResponse>;

fn authorize(
    ctx: &RequestContext,
    profile: PermissionProfile,
    method: HttpMethod,
) -> HandlerResult<&Principal> {
    let Some(principal) = ctx.principal.as_ref() else {
        tracing::debug!(%method, "unauthenticated request rejected");
        return Err(ApiResponse::forbidden(Some(NOT_AUTHENTICATED.to_string())));
    };
    match profile.has_permission(principal, method) {
        Ok(true) => Ok(principal),
        Ok(false) => Err(ApiResponse::forbidden(Some(PERMISSION_DENIED.to_string()))),
        Err(err) => Err(ApiResponse::from_error(&err)),
    }
}

fn load_signal<S: SignalStore + ?Sized>(store: &S, signal_id: i64) -> HandlerResult<Signal> {
    store
        .signal(signal_id)
        .ok_or_else(|| ApiResponse::from_error(&SignalsError::SignalNotFound(signal_id)))
}

fn ensure_view(principal: &Principal, signal: &Signal) -> HandlerResult<()> {
    if can_view(principal, signal) {
        Ok(())
    } else {
        Err(ApiResponse::forbidden(None))
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> HandlerResult<Value> {
    serde_json::to_value(value).map_err(|err| ApiResponse::from_error(&SignalsError::from(err)))
}

/// Signal representation with reporter contacts passed through disclosure.
fn signal_body(
    signal: &Signal,
    principal: Option<&Principal>,
    channel_override: bool,
) -> HandlerResult<Value> {
    let mut body = to_body(signal)?;
    let contacts = get_contact_details(signal, principal, channel_override);
    if let Some(object) = body.as_object_mut() {
        object.insert("id_display".to_string(), json!(signal.id_display()));
        object.insert(
            "structural_kind".to_string(),
            json!(signal.structural_kind()),
        );
        if let Some(reporter) = object.get_mut("reporter").and_then(Value::as_object_mut) {
            reporter.insert("email".to_string(), json!(contacts.email));
            reporter.insert("phone".to_string(), json!(contacts.phone));
        }
    }
    Ok(body)
}

fn respond(result: HandlerResult<ApiResponse>) -> ApiResponse {
    result.unwrap_or_else(|response| response)
}

// =============================================================================
// Signals
// =============================================================================

/// `GET /signals/{id}`
pub fn signal_detail<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> ApiResponse {
    respond(try_signal_detail(store, ctx, signal_id))
}

fn try_signal_detail<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> HandlerResult<ApiResponse> {
    let principal = authorize(ctx, PermissionProfile::Sia, HttpMethod::Get)?;
    let signal = load_signal(store, signal_id)?;
    ensure_view(principal, &signal)?;
    let body = signal_body(&signal, Some(principal), ctx.is_trusted())?;
    Ok(ApiResponse::ok(body))
}

// =============================================================================
// Attachments
// =============================================================================

fn attachment_body(signal: &Signal, attachment: &Attachment) -> Value {
    json!({
        "id": attachment.id,
        "signal_id": signal.id,
        "file_name": attachment.file_name,
        "is_image": attachment.is_image,
        "created_by": attachment.created_by,
        "created_at": attachment.created_at,
    })
}

fn attachment_not_found(signal_id: i64, attachment_id: i64) -> ApiResponse {
    ApiResponse::from_error(&SignalsError::AttachmentNotFound {
        signal_id,
        attachment_id,
    })
}

/// `GET /signals/{id}/attachments/`
pub fn list_attachments<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> ApiResponse {
    respond(try_list_attachments(store, ctx, signal_id))
}

fn try_list_attachments<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> HandlerResult<ApiResponse> {
    let principal = authorize(ctx, PermissionProfile::Sia, HttpMethod::Get)?;
    let signal = load_signal(store, signal_id)?;
    ensure_view(principal, &signal)?;
    let results: Vec<Value> = signal
        .attachments
        .iter()
        .map(|a| attachment_body(&signal, a))
        .collect();
    Ok(ApiResponse::ok(json!({
        "count": results.len(),
        "results": results,
    })))
}

/// `GET /signals/{id}/attachments/{attachment_id}`
pub fn attachment_detail<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
    attachment_id: i64,
) -> ApiResponse {
    respond(try_attachment_detail(store, ctx, signal_id, attachment_id))
}

fn try_attachment_detail<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
    attachment_id: i64,
) -> HandlerResult<ApiResponse> {
    let principal = authorize(ctx, PermissionProfile::Sia, HttpMethod::Get)?;
    let signal = load_signal(store, signal_id)?;
    ensure_view(principal, &signal)?;
    let attachment = signal
        .attachment(attachment_id)
        .ok_or_else(|| attachment_not_found(signal_id, attachment_id))?;
    if !can_view_attachment(principal, attachment) {
        return Err(ApiResponse::forbidden(None));
    }
    Ok(ApiResponse::ok(attachment_body(&signal, attachment.attachment)))
}

/// `DELETE /signals/{id}/attachments/{attachment_id}`
pub fn delete_attachment<S: SignalStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    signal_id: i64,
    attachment_id: i64,
) -> ApiResponse {
    respond(try_delete_attachment(store, ctx, signal_id, attachment_id))
}

fn try_delete_attachment<S: SignalStore + ?Sized>(
    store: &mut S,
    ctx: &RequestContext,
    signal_id: i64,
    attachment_id: i64,
) -> HandlerResult<ApiResponse> {
    let principal = authorize(ctx, PermissionProfile::Sia, HttpMethod::Delete)?;
    let signal = load_signal(&*store, signal_id)?;
    ensure_view(principal, &signal)?;
    let attachment = signal
        .attachment(attachment_id)
        .ok_or_else(|| attachment_not_found(signal_id, attachment_id))?;
    can_delete_attachment(principal, attachment).map_err(ApiResponse::deny)?;

    store
        .remove_attachment(signal_id, attachment_id)
        .map_err(|err| ApiResponse::from_error(&err))?;
    tracing::info!(
        principal = %principal.email,
        signal_id,
        attachment_id,
        "attachment deleted"
    );
    Ok(ApiResponse::no_content())
}

// =============================================================================
// Summary document
// =============================================================================

/// Resolve the signal and the viewer for a summary document.
///
/// A trusted integration channel needs no principal and skips the
/// department check. Everyone else is a regular interactive read.
fn summary_context<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> HandlerResult<RenderingContext> {
    if ctx.is_trusted() {
        let signal = load_signal(store, signal_id)?;
        return Ok(get_rendering_context(&signal, ctx.principal.as_ref(), true));
    }
    let principal = authorize(ctx, PermissionProfile::Sia, HttpMethod::Get)?;
    let signal = load_signal(store, signal_id)?;
    ensure_view(principal, &signal)?;
    Ok(get_rendering_context(&signal, Some(principal), false))
}

/// `GET /signals/{id}/pdf` as structured data.
pub fn signal_summary_context<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> ApiResponse {
    respond(
        summary_context(store, ctx, signal_id)
            .and_then(|rendering| to_body(&rendering))
            .map(ApiResponse::ok),
    )
}

/// `GET /signals/{id}/pdf` as the HTML handed to the PDF renderer.
pub fn signal_summary_html<S: SignalStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    signal_id: i64,
) -> ApiResponse {
    respond(summary_context(store, ctx, signal_id).and_then(|rendering| {
        render_template(PDF_SUMMARY_TEMPLATE, &rendering)
            .map(ApiResponse::html)
            .map_err(|err| ApiResponse::from_error(&err))
    }))
}
