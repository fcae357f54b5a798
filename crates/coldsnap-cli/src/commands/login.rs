use std::io::{self, IsTerminal};

use anyhow::anyhow;
use coldsnap_api::LogInOutcome;

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_account;

pub(crate) async fn handle_login(
    ctx: &AppContext,
    args: LoginArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let username = args.username.trim();
    if username.is_empty() {
        return Err(CliError::validation("username cannot be empty"));
    }
    let password = resolve_password(args.password.as_deref())?;

    match ctx.session.authenticate(username, &password).await? {
        LogInOutcome::Success(account) => render_account(&account, format),
        LogInOutcome::Failure { message } => Err(CliError::rejected(message)),
    }
}

pub(crate) fn resolve_password(password: Option<&str>) -> CliResult<String> {
    if let Some(value) = password {
        if value.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        return Ok(value.to_string());
    }

    if io::stdin().is_terminal() {
        let entered = rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from stdin: {err}"))
        })?;
        if entered.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        Ok(entered)
    } else {
        Err(CliError::validation(
            "password required; supply via --password or COLDSNAP_PASSWORD when running non-interactively",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldsnap_api::{GENERIC_LOGIN_FAILURE, SessionConfig};
    use httpmock::prelude::*;
    use serde_json::json;

    fn context_with(server: &MockServer) -> AppContext {
        let config = SessionConfig::new("static", "secret")
            .with_api_base(format!("{}/", server.base_url()).parse().expect("valid URL"));
        AppContext::new(config).expect("session should build")
    }

    fn login_args(password: &str) -> LoginArgs {
        LoginArgs {
            username: "alice".to_string(),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn login_renders_account_on_success() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/loq/login");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"updates_response": {"username": "alice"}}));
        });

        let ctx = context_with(&server);
        handle_login(&ctx, login_args("hunter2"), OutputFormat::Json)
            .await
            .expect("login should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn login_surfaces_rejection_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/loq/login");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"logged": false}));
        });

        let ctx = context_with(&server);
        let err = handle_login(&ctx, login_args("wrong"), OutputFormat::Table)
            .await
            .expect_err("rejection expected");
        assert!(matches!(err, CliError::Rejected(message) if message == GENERIC_LOGIN_FAILURE));
    }

    #[tokio::test]
    async fn login_maps_server_errors_to_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/loq/login");
            then.status(502);
        });

        let ctx = context_with(&server);
        let err = handle_login(&ctx, login_args("hunter2"), OutputFormat::Table)
            .await
            .expect_err("failure expected");
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn blank_username_is_rejected_before_any_request() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server);
        let args = LoginArgs {
            username: "  ".to_string(),
            password: Some("x".to_string()),
        };
        let err = handle_login(&ctx, args, OutputFormat::Table)
            .await
            .expect_err("validation expected");
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn empty_password_flag_is_rejected() {
        assert!(matches!(
            resolve_password(Some("")),
            Err(CliError::Validation(_))
        ));
        assert!(matches!(resolve_password(Some(" pw ")), Ok(value) if value == " pw "));
    }
}
