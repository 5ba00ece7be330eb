//! Email notification actions.
//!
//! An action couples a rule (does this signal warrant an email?) with the
//! template key, subject and context used to render it. Delivery happens
//! elsewhere; this module stops at a rendered [`EmailMessage`].

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};
use signals_core::{Config, Signal, SignalsError, StatusState};

use crate::disclosure::get_reopened_notification_context;
use crate::templates::{SIGNAL_REOPENED_TEMPLATE, render_str, render_template};

/// Identifiers of the email templates maintained by the municipality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EmailTemplateKey {
    #[serde(rename = "send_mail_signal_created")]
    SignalCreated,
    #[serde(rename = "send_mail_signal_handled")]
    SignalHandled,
    #[serde(rename = "send_mail_signal_status_changed_heropend")]
    SignalStatusChangedHeropend,
}

impl EmailTemplateKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignalCreated => "send_mail_signal_created",
            Self::SignalHandled => "send_mail_signal_handled",
            Self::SignalStatusChangedHeropend => "send_mail_signal_status_changed_heropend",
        }
    }
}

impl fmt::Display for EmailTemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered email, ready to hand to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub template_key: EmailTemplateKey,
    /// Line added to the signal's history once the email is sent.
    pub note: &'static str,
}

pub trait NotificationAction {
    fn key(&self) -> EmailTemplateKey;

    /// Embedded template that renders the body.
    fn template_name(&self) -> &'static str;

    /// Whether `signal` should trigger this email.
    fn rule(&self, signal: &Signal) -> bool;

    fn subject_template(&self) -> &'static str;

    fn note(&self) -> &'static str;

    /// Extra template variables on top of the shared email context.
    fn additional_context(&self, _signal: &Signal) -> Value {
        Value::Object(Map::new())
    }

    fn enabled(&self, _config: &Config) -> bool {
        true
    }
}

/// Sent to the reporter when a handled signal is reopened.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalReopenedAction;

impl NotificationAction for SignalReopenedAction {
    fn key(&self) -> EmailTemplateKey {
        EmailTemplateKey::SignalStatusChangedHeropend
    }

    fn template_name(&self) -> &'static str {
        SIGNAL_REOPENED_TEMPLATE
    }

    fn rule(&self, signal: &Signal) -> bool {
        signal.status.state == StatusState::Heropend
            && signal
                .reporter
                .email
                .as_deref()
                .is_some_and(|email| !email.trim().is_empty())
    }

    fn subject_template(&self) -> &'static str {
        "Meer over uw melding {{ formatted_signal_id }}"
    }

    fn note(&self) -> &'static str {
        "Automatische e-mail bij heropenen is verzonden aan de melder."
    }

    fn additional_context(&self, signal: &Signal) -> Value {
        serde_json::to_value(get_reopened_notification_context(signal))
            .unwrap_or_else(|_| Value::Object(Map::new()))
    }

    fn enabled(&self, config: &Config) -> bool {
        config.reopened_email_enabled
    }
}

/// Shared email context merged with the action's additional context.
///
/// Keys from the additional context win on collision.
#[must_use]
pub fn build_email_context(
    action: &dyn NotificationAction,
    signal: &Signal,
    organization_name: &str,
) -> Value {
    let mut context = json!({
        "signal_id": signal.id,
        "formatted_signal_id": signal.id_display(),
        "created_at": signal.created_at.format("%d-%m-%Y %H:%M").to_string(),
        "text": signal.text,
        "status_text": signal.status.text,
        "status_state": signal.status.state,
        "reporter_email": signal.reporter.email,
        "ORGANIZATION_NAME": organization_name,
    });

    if let (Value::Object(base), Value::Object(extra)) =
        (&mut context, action.additional_context(signal))
    {
        base.extend(extra);
    }
    context
}

/// Render the email `action` would send for `signal`.
///
/// Returns `Ok(None)` when the action is disabled or its rule does not
/// apply.
pub fn prepare_email(
    action: &dyn NotificationAction,
    signal: &Signal,
    config: &Config,
) -> Result<Option<EmailMessage>, SignalsError> {
    if !action.enabled(config) {
        tracing::debug!(key = %action.key(), "notification action disabled");
        return Ok(None);
    }
    if !action.rule(signal) {
        return Ok(None);
    }
    let Some(to) = signal.reporter.email.clone() else {
        return Ok(None);
    };

    let context = build_email_context(action, signal, &config.organization_name);
    let subject = render_str(action.subject_template(), &context)?;
    let body = render_template(action.template_name(), &context)?;

    tracing::info!(
        signal_id = signal.id,
        key = %action.key(),
        "prepared notification email"
    );
    Ok(Some(EmailMessage {
        to,
        from: config.email_from.clone(),
        subject,
        body,
        template_key: action.key(),
        note: action.note(),
    }))
}
