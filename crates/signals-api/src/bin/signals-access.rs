//! signals-access - evaluate access and disclosure decisions against a fixture
//!
//! Loads a JSON snapshot of signals and principals and runs the same
//! handlers and engines the API uses, printing the outcome as JSON.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use signals_api::{
    ApiResponse, Fixture, FixtureError, RequestContext, SignalStore, attachment_detail,
    delete_attachment, logging, signal_detail, signal_summary_context, signal_summary_html,
};
use signals_core::{Config, Principal, Signal, SignalsError};
use signals_policy::notifications::prepare_email;
use signals_policy::{
    SignalReopenedAction, can_view, get_contact_details, get_reopened_notification_context,
};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "signals-access")]
#[command(version, about = "Evaluate Signals access and disclosure rules against a JSON fixture")]
struct Cli {
    /// Fixture with `signals` and `principals`
    #[arg(short, long)]
    fixture: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// GET a signal, or one of its attachments
    View {
        #[arg(long)]
        principal: String,
        #[arg(long)]
        signal: i64,
        #[arg(long)]
        attachment: Option<i64>,
    },

    /// DELETE an attachment (against the in-memory copy only)
    Delete {
        #[arg(long)]
        principal: String,
        #[arg(long)]
        signal: i64,
        #[arg(long)]
        attachment: i64,
    },

    /// Reporter contact details as disclosed to a viewer or client
    Contacts {
        #[arg(long)]
        signal: i64,
        #[arg(long)]
        principal: Option<String>,
        /// Client id of the calling integration
        #[arg(long)]
        client: Option<String>,
    },

    /// Feedback context for the "signal reopened" email
    ReopenedContext {
        #[arg(long)]
        signal: i64,
        /// Render the full email instead of only the context
        #[arg(long)]
        email: bool,
    },

    /// Summary document context, or its HTML
    Summary {
        #[arg(long)]
        signal: i64,
        #[arg(long)]
        principal: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        html: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Signals(#[from] SignalsError),

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = Config::get();
    if cli.verbose {
        config.log_level = "debug".to_string();
    }
    logging::init(&config);

    let result = Fixture::load(&cli.fixture)
        .map_err(CliError::from)
        .and_then(|fixture| run(cli.command, &fixture, &config));
    match result {
        Ok(response) => {
            let ok = response.is_success();
            match print_response(&response) {
                Ok(()) if ok => ExitCode::SUCCESS,
                Ok(()) => ExitCode::from(1),
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::from(2)
                }
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn print_response(response: &ApiResponse) -> Result<(), CliError> {
    let out = json!({ "status": response.status, "body": response.body });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn find_signal(fixture: &Fixture, signal_id: i64) -> Result<Signal, CliError> {
    fixture
        .store()
        .signal(signal_id)
        .ok_or(CliError::Signals(SignalsError::SignalNotFound(signal_id)))
}

fn optional_principal(
    fixture: &Fixture,
    email: Option<&str>,
) -> Result<Option<Principal>, CliError> {
    email
        .map(|email| fixture.principal(email).cloned())
        .transpose()
        .map_err(CliError::from)
}

fn run(command: Commands, fixture: &Fixture, config: &Config) -> Result<ApiResponse, CliError> {
    match command {
        Commands::View {
            principal,
            signal,
            attachment,
        } => {
            let store = fixture.store();
            let ctx = RequestContext::interactive(fixture.principal(&principal)?.clone());
            Ok(match attachment {
                Some(attachment_id) => attachment_detail(&store, &ctx, signal, attachment_id),
                None => signal_detail(&store, &ctx, signal),
            })
        }
        Commands::Delete {
            principal,
            signal,
            attachment,
        } => {
            let mut store = fixture.store();
            let ctx = RequestContext::interactive(fixture.principal(&principal)?.clone());
            Ok(delete_attachment(&mut store, &ctx, signal, attachment))
        }
        Commands::Contacts {
            signal,
            principal,
            client,
        } => {
            let record = find_signal(fixture, signal)?;
            let principal = optional_principal(fixture, principal.as_deref())?;
            let ctx = RequestContext::from_client(principal, client.as_deref(), config);
            let allowed = ctx.is_trusted()
                || ctx
                    .principal
                    .as_ref()
                    .is_some_and(|principal| can_view(principal, &record));
            if !allowed {
                return Ok(ApiResponse::forbidden(None));
            }
            let contacts = get_contact_details(&record, ctx.principal.as_ref(), ctx.is_trusted());
            Ok(ApiResponse::ok(serde_json::to_value(contacts)?))
        }
        Commands::ReopenedContext { signal, email } => {
            let record = find_signal(fixture, signal)?;
            if email {
                let message = prepare_email(&SignalReopenedAction, &record, config)?;
                return Ok(ApiResponse::ok(
                    message.map_or(Value::Null, |m| json!(m)),
                ));
            }
            let context = get_reopened_notification_context(&record);
            Ok(ApiResponse::ok(serde_json::to_value(context)?))
        }
        Commands::Summary {
            signal,
            principal,
            client,
            html,
        } => {
            let store = fixture.store();
            let principal = optional_principal(fixture, principal.as_deref())?;
            let ctx = RequestContext::from_client(principal, client.as_deref(), config);
            Ok(if html {
                signal_summary_html(&store, &ctx, signal)
            } else {
                signal_summary_context(&store, &ctx, signal)
            })
        }
    }
}
