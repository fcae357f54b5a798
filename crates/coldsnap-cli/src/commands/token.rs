use coldsnap_api::{generate_request_token, timestamps};

use crate::cli::{OutputFormat, TokenArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_token;

pub(crate) fn handle_token(
    ctx: &AppContext,
    args: TokenArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let timestamp = args.timestamp.unwrap_or_else(timestamps::now_millis);
    if timestamp < 0 {
        return Err(CliError::validation("timestamp must not precede the epoch"));
    }

    let session_token = args
        .session_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .unwrap_or(ctx.config.static_token.as_str());

    let timestamp = timestamp.to_string();
    let token = generate_request_token(&ctx.config.secret_token, session_token, &timestamp);
    render_token(&timestamp, &token, format)
}
