//! Output renderers for CLI commands.

use anyhow::anyhow;
use coldsnap_api::Account;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_account(account: &Account, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "account": account })),
        OutputFormat::Table => {
            println!("logged in as {}", account.username());
            Ok(())
        }
    }
}

pub(crate) fn render_token(timestamp: &str, token: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "timestamp": timestamp, "req_token": token })),
        OutputFormat::Table => {
            println!("timestamp: {timestamp}");
            println!("req_token: {token}");
            Ok(())
        }
    }
}

/// Report a command error on stderr in the selected format.
pub(crate) fn render_error(err: &CliError, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&error_document(err)) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("error: {}", err.display_message()),
        },
        OutputFormat::Table => eprintln!("error: {}", err.display_message()),
    }
}

fn error_document(err: &CliError) -> serde_json::Value {
    json!({
        "error": {
            "kind": err.kind(),
            "message": err.display_message(),
            "exit_code": err.exit_code(),
        }
    })
}

fn print_json(value: &serde_json::Value) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_serializes_username() -> anyhow::Result<()> {
        let account = Account::from_login_json(r#"{"updates_response":{"username":"alice"}}"#)?;
        assert_eq!(
            json!({ "account": account }),
            json!({ "account": { "username": "alice" } })
        );
        render_account(&account, OutputFormat::Table)
            .map_err(|err| anyhow!(err.display_message()))?;
        Ok(())
    }

    #[test]
    fn rejection_renders_as_json_document() {
        let err = CliError::rejected("bad creds");
        assert_eq!(
            error_document(&err),
            json!({
                "error": { "kind": "rejected", "message": "bad creds", "exit_code": 1 }
            })
        );
        render_error(&err, OutputFormat::Json);
        render_error(&err, OutputFormat::Table);
    }

    #[test]
    fn failure_document_hides_detail() {
        let err = CliError::failure(anyhow!("connection refused at 10.0.0.1"));
        let document = error_document(&err);
        assert_eq!(document["error"]["kind"], "failure");
        assert_eq!(document["error"]["exit_code"], 3);
        assert!(
            !document.to_string().contains("10.0.0.1"),
            "{document}"
        );
    }

    #[test]
    fn token_renders_in_both_formats() {
        for format in [OutputFormat::Table, OutputFormat::Json] {
            assert!(render_token("1", "abc", format).is_ok());
        }
    }
}
