use std::io::{self, Write};

use anyhow::Context;

use crate::cli::FetchArgs;
use crate::client::{AppContext, CliError, CliResult};

pub(crate) async fn handle_fetch(ctx: &AppContext, args: FetchArgs) -> CliResult<()> {
    let function = args.function.trim();
    if function.is_empty() {
        return Err(CliError::validation("function name cannot be empty"));
    }

    let body = ctx.session.endpoint(args.endpoint).get(function, None).await?;
    write_body(&mut io::stdout().lock(), &body)
}

fn write_body(out: &mut impl Write, body: &[u8]) -> CliResult<()> {
    out.write_all(body)
        .and_then(|()| out.flush())
        .context("failed to write response body")
        .map_err(CliError::failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldsnap_api::{EndpointVersion, SessionConfig};
    use httpmock::prelude::*;

    #[tokio::test]
    async fn fetch_issues_unsigned_get() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ph/blob").header("accept", "*/*");
            then.status(200).body("payload");
        });

        let config = SessionConfig::new("static", "secret")
            .with_api_base(format!("{}/", server.base_url()).parse().expect("valid URL"));
        let ctx = AppContext::new(config).expect("session should build");
        handle_fetch(
            &ctx,
            FetchArgs {
                endpoint: EndpointVersion::Ph,
                function: "blob".to_string(),
            },
        )
        .await
        .expect("fetch should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn fetch_refuses_function_outside_endpoint() {
        let server = MockServer::start_async().await;
        let config = SessionConfig::new("static", "secret")
            .with_api_base(format!("{}/", server.base_url()).parse().expect("valid URL"));
        let ctx = AppContext::new(config).expect("session should build");
        let err = handle_fetch(
            &ctx,
            FetchArgs {
                endpoint: EndpointVersion::Ph,
                function: "http://elsewhere.example/blob".to_string(),
            },
        )
        .await
        .expect_err("foreign host must be refused");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn binary_body_is_written_verbatim() {
        let mut out = Vec::new();
        write_body(&mut out, &[0xff, 0xd8, 0xff, 0xe0]).expect("write to vec");
        assert_eq!(out, vec![0xff, 0xd8, 0xff, 0xe0]);
    }
}
