//! smsgate daemon
//!
//! Polls a serial GSM modem for incoming SMS and fans each message out to
//! the configured sinks (email, HTTP relay queue, Redis publish).
//!
//! Initialization failure stops the process: no modem means no service.
//! After that, transient modem or sink trouble only ever costs a poll
//! cycle, never the daemon.

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use smsgate_core::config::GatewayConfig;
use smsgate_core::modem::{self, ModemSession, SmsPoller};
use smsgate_core::sink::{EmailSink, FanoutSink, HttpRelaySink, MessageSink, RedisSink};

/// GSM modem SMS gateway daemon.
#[derive(Parser, Debug)]
#[command(name = "smsgate", about = "GSM modem SMS gateway", version)]
struct Cli {
    /// Path to the gateway configuration file.
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Override the modem serial device from the config file.
    #[arg(long)]
    device: Option<String>,

    /// Override the poll interval (seconds) from the config file.
    #[arg(long)]
    poll_interval: Option<u64>,

    /// List available serial ports and exit.
    #[arg(long, default_value_t = false)]
    list_ports: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_ports {
        for port in modem::list_ports() {
            match &port.product {
                Some(product) => println!("{}\t{}", port.name, product),
                None => println!("{}", port.name),
            }
        }
        return Ok(());
    }

    let mut config = GatewayConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    if let Some(device) = cli.device {
        config.modem.device = device;
    }
    if let Some(interval) = cli.poll_interval {
        config.modem.poll_interval_secs = interval;
    }

    info!(
        version = smsgate_core::VERSION,
        device = %config.modem.device,
        baud = config.modem.baud,
        "smsgate starting"
    );

    let sink = build_sinks(&config)?;

    let mut session = ModemSession::open(&config.session_config()).with_context(|| {
        format!(
            "failed to open modem on {} (try --list-ports)",
            config.modem.device
        )
    })?;
    session.initialize().context("modem initialization failed")?;

    let mut poller = SmsPoller::new(session, config.poller_config());
    poller.run(&sink);

    Ok(())
}

/// Build every configured sink. A dead Redis is non-fatal (the sink is
/// skipped with a warning); email and relay misconfiguration is fatal.
fn build_sinks(config: &GatewayConfig) -> anyhow::Result<FanoutSink> {
    let mut sinks: Vec<Box<dyn MessageSink>> = Vec::new();

    if let Some(email) = &config.email {
        let sink = EmailSink::new(email, config.imei_to_phone.clone())
            .context("failed to build email sink")?;
        info!(recipients = email.recipients.len(), "email delivery enabled");
        sinks.push(Box::new(sink));
    }

    if let Some(relay) = &config.relay {
        let sink = HttpRelaySink::new(relay).context("failed to build HTTP relay sink")?;
        info!(url = %relay.server_url, "HTTP relay enabled");
        sinks.push(Box::new(sink));
    }

    if let Some(redis) = &config.redis {
        match RedisSink::new(redis) {
            Ok(sink) => {
                info!(host = %redis.host, port = redis.port, "Redis publish enabled");
                sinks.push(Box::new(sink));
            }
            Err(e) => warn!(error = %e, "Redis connection failed (non-fatal), sink disabled"),
        }
    }

    if sinks.is_empty() {
        warn!("no sinks configured; received messages will only be logged");
    }

    Ok(FanoutSink::new(sinks))
}
