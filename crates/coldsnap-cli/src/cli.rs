//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use coldsnap_api::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, EndpointVersion};
use coldsnap_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, parse_endpoint, parse_url};
use crate::commands::fetch::handle_fetch;
use crate::commands::login::handle_login;
use crate::commands::token::handle_token;
use crate::output::render_error;

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: LogFormat::parse(&cli.log_format),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }

    let trace_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "coldsnap",
        command = command_label(&cli.command),
        trace_id = %trace_id
    );

    let output = cli.output;
    match dispatch(cli).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            err.log();
            render_error(&err, output);
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli)?;
    match cli.command {
        Command::Login(args) => handle_login(&ctx, args, cli.output).await,
        Command::Token(args) => handle_token(&ctx, args, cli.output),
        Command::Fetch(args) => handle_fetch(&ctx, args).await,
    }
}

#[derive(Parser)]
#[command(name = "coldsnap", about = "Client for the private API's login protocol")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "COLDSNAP_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_BASE
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "COLDSNAP_STATIC_TOKEN", hide_env_values = true)]
    pub(crate) static_token: Option<String>,
    #[arg(long, global = true, env = "COLDSNAP_SECRET_TOKEN", hide_env_values = true)]
    pub(crate) secret_token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "COLDSNAP_USER_AGENT",
        default_value = DEFAULT_USER_AGENT
    )]
    pub(crate) user_agent: String,
    #[arg(
        long,
        global = true,
        env = "COLDSNAP_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "COLDSNAP_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(
        long,
        global = true,
        env = "COLDSNAP_LOG_FORMAT",
        default_value = "pretty",
        help = "Log format: pretty or json"
    )]
    pub(crate) log_format: String,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log in and print the account username.
    Login(LoginArgs),
    /// Print the request token for a timestamp.
    Token(TokenArgs),
    /// Send an unsigned GET to an endpoint function and print the body.
    Fetch(FetchArgs),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long, env = "COLDSNAP_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct TokenArgs {
    #[arg(long, help = "Milliseconds since the epoch (defaults to now)")]
    pub(crate) timestamp: Option<i64>,
    #[arg(long, help = "Session token to sign with (defaults to the static token)")]
    pub(crate) session_token: Option<String>,
}

#[derive(Args)]
pub(crate) struct FetchArgs {
    #[arg(long, value_parser = parse_endpoint, default_value = "bq")]
    pub(crate) endpoint: EndpointVersion,
    #[arg(help = "Function name beneath the endpoint")]
    pub(crate) function: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Token(_) => "token",
        Command::Fetch(_) => "fetch",
    }
}
