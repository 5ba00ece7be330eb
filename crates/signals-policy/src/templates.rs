//! Template rendering for notification emails and signal summaries.
//!
//! Templates are embedded at compile time. Files ending in `.html` are
//! auto-escaped; plain text templates are rendered verbatim.

use std::sync::LazyLock;

use include_dir::{Dir, include_dir};
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Error, ErrorKind};
use signals_core::SignalsError;

static TEMPLATE_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Template for the summary document of a single signal.
pub const PDF_SUMMARY_TEMPLATE: &str = "pdf_summary.html";

/// Body template for the "signal reopened" email.
pub const SIGNAL_REOPENED_TEMPLATE: &str = "signal_reopened.txt";

/// Render `None`/empty values as a dash.
#[allow(clippy::needless_pass_by_value)] // MiniJinja filter signature uses owned `Value`.
fn or_dash(value: Value) -> Value {
    if value.is_none() || value.is_undefined() || value.to_string().trim().is_empty() {
        Value::from("-")
    } else {
        value
    }
}

/// Dutch yes/no for optional booleans.
#[allow(clippy::needless_pass_by_value)]
fn ja_nee(value: Value) -> Value {
    if value.is_none() || value.is_undefined() {
        Value::from("-")
    } else if value.is_true() {
        Value::from("Ja")
    } else {
        Value::from("Nee")
    }
}

fn auto_escape(name: &str) -> AutoEscape {
    let is_html = std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    if is_html {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(auto_escape);
    env.add_filter("or_dash", or_dash);
    env.add_filter("ja_nee", ja_nee);
    env
}

static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = base_environment();

    for file in TEMPLATE_DIR.files() {
        let Some(name) = file.path().to_str() else {
            continue;
        };
        let Ok(contents) = std::str::from_utf8(file.contents()) else {
            tracing::warn!(template = name, "skipping template with invalid utf-8");
            continue;
        };
        if let Err(err) = env.add_template(name, contents) {
            tracing::warn!(template = name, error = %err, "failed to load template");
        }
    }

    env
});

fn to_signals_error(err: &Error) -> SignalsError {
    SignalsError::Template(err.to_string())
}

/// Render one of the embedded templates.
pub fn render_template<T: serde::Serialize>(name: &str, ctx: T) -> Result<String, SignalsError> {
    let tpl = ENV.get_template(name).map_err(|e| to_signals_error(&e))?;
    tpl.render(ctx).map_err(|e| to_signals_error(&e))
}

/// Render a one-off template string, such as an email subject line.
///
/// Strings are never auto-escaped.
pub fn render_str<T: serde::Serialize>(source: &str, ctx: T) -> Result<String, SignalsError> {
    let env = base_environment();
    env.render_str(source, ctx).map_err(|e| to_signals_error(&e))
}

/// Names of all embedded templates, sorted.
#[must_use]
pub fn template_names() -> Vec<&'static str> {
    let mut names: Vec<_> = TEMPLATE_DIR
        .files()
        .filter_map(|f| f.path().to_str())
        .collect();
    names.sort_unstable();
    names
}

/// Check that a template exists without rendering it.
pub fn ensure_template(name: &str) -> Result<(), SignalsError> {
    ENV.get_template(name).map(|_| ()).map_err(|e| {
        if e.kind() == ErrorKind::TemplateNotFound {
            SignalsError::Template(format!("template not found: {name}"))
        } else {
            to_signals_error(&e)
        }
    })
}
