use anyhow::Context;
use clap::{value_parser, Arg, Command};
use intake_server::config::{DEFAULT_BIND, DEFAULT_NOTIFY_FROM, DEFAULT_TABLE};
use intake_server::telemetry::{self, LogFormat};
use intake_server::{IntakeConfig, IntakeService, NotifyConfig, StoreConfig, INTAKE_PATH};
use std::net::SocketAddr;

fn cli() -> Command {
    Command::new("intake-server")
        .version(intake_server::VERSION)
        .about("Setup request intake endpoint")
        .arg(
            Arg::new("bind")
                .long("bind")
                .env("INTAKE_BIND")
                .default_value(DEFAULT_BIND)
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address"),
        )
        .arg(
            Arg::new("supabase-url")
                .long("supabase-url")
                .env("SUPABASE_URL")
                .required(true)
                .help("Base URL of the REST store"),
        )
        .arg(
            Arg::new("supabase-key")
                .long("supabase-key")
                .env("SUPABASE_ANON_KEY")
                .required(true)
                .hide_env_values(true)
                .help("API key for the REST store"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .default_value(DEFAULT_TABLE)
                .help("Table receiving setup requests"),
        )
        .arg(
            Arg::new("resend-api-key")
                .long("resend-api-key")
                .env("RESEND_API_KEY")
                .hide_env_values(true)
                .help("Email provider key; notifications are off without it"),
        )
        .arg(
            Arg::new("notify-email")
                .long("notify-email")
                .env("NOTIFY_EMAIL")
                .help("Address receiving request notifications"),
        )
        .arg(
            Arg::new("notify-from")
                .long("notify-from")
                .env("NOTIFY_FROM")
                .default_value(DEFAULT_NOTIFY_FROM)
                .help("Sender of request notifications"),
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .default_value("10")
                .value_parser(value_parser!(u64))
                .help("Timeout for store and email requests"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .default_value("pretty")
                .value_parser(["pretty", "json"])
                .help("Log output format"),
        )
}

fn config_from(matches: &clap::ArgMatches) -> IntakeConfig {
    let string = |id: &str| matches.get_one::<String>(id).cloned();

    let store = StoreConfig::new(
        string("supabase-url").unwrap_or_default(),
        string("supabase-key").unwrap_or_default(),
    )
    .with_table(string("table").unwrap_or_else(|| DEFAULT_TABLE.to_string()));

    let notify = NotifyConfig::from_parts(string("resend-api-key"), string("notify-email"))
        .map(|n| n.with_from(string("notify-from").unwrap_or_else(|| DEFAULT_NOTIFY_FROM.to_string())));

    let mut config = IntakeConfig::new().with_store(store).with_notify(notify);
    if let Some(bind) = matches.get_one::<SocketAddr>("bind") {
        config = config.with_bind(*bind);
    }
    if let Some(secs) = matches.get_one::<u64>("timeout-secs") {
        config = config.with_request_timeout(*secs);
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let format = matches
        .get_one::<String>("log-format")
        .map_or(Ok(LogFormat::Pretty), |f| f.parse::<LogFormat>())
        .map_err(anyhow::Error::msg)?;
    telemetry::init(format).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let config = config_from(&matches);
    let service = IntakeService::from_config(&config).context("invalid configuration")?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        path = INTAKE_PATH,
        notifications = service.notifies(),
        "intake server listening"
    );

    intake_server::serve(listener, service).await.context("server error")
}
