use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use regex::Regex;
use surge_ping::{Client as PingClient, Config as PingConfig, PingIdentifier, PingSequence};
use tracing::{debug, info};

use crate::address::MonitorTarget;
use crate::error::ConfigError;
use crate::models::ProbeResult;
use crate::utils::extract_html_title;

const PING_TIMEOUT_MS: u64 = 3500;
const HTTP_TIMEOUT_MS: u64 = 10_000;

static DOTTED_QUAD: OnceLock<Regex> = OnceLock::new();

/// The ping host must be a plain dotted-quad: four 1-3 digit groups, no
/// scheme, nothing trailing. Pure validation, no network call.
pub fn validate_ping_host(host: &str) -> Result<(), ConfigError> {
    let pattern = DOTTED_QUAD
        .get_or_init(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("literal pattern"));
    if pattern.is_match(host) {
        Ok(())
    } else {
        Err(ConfigError::InvalidPingHost { given: host.to_string() })
    }
}

/// Runs the four reachability checks. Each check folds ordinary
/// unreachability into `false`; the only errors this type surfaces are
/// construction-time ones.
pub struct ReachabilityProbe {
    ping_client: PingClient,
    dns_resolver: TokioResolver,
    http_client: reqwest::Client,
    ping_host: String,
}

impl ReachabilityProbe {
    /// Builds the probe with the default well-known ping host; callers
    /// override it through `set_ping_host`.
    pub fn new() -> Result<Self> {
        let ping_client =
            PingClient::new(&PingConfig::default()).context("Failed to create ping client")?;

        let dns_resolver = TokioResolver::builder_with_config(
            ResolverConfig::cloudflare(),
            TokioConnectionProvider::default(),
        )
        .build();
        info!("DNS resolver configured: Cloudflare 1.1.1.1 / 1.0.0.1");

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(HTTP_TIMEOUT_MS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            ping_client,
            dns_resolver,
            http_client,
            ping_host: crate::config::default_ping_host(),
        })
    }

    pub fn ping_host(&self) -> &str {
        &self.ping_host
    }

    pub fn set_ping_host(&mut self, host: &str) -> Result<(), ConfigError> {
        validate_ping_host(host)?;
        self.ping_host = host.to_string();
        Ok(())
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// One pass of all four checks against the target's active port, in the
    /// fixed order local network, machine, server, page. The page check is
    /// skipped when the server check fails.
    pub async fn probe(&self, target: &MonitorTarget) -> ProbeResult {
        let url = target.full_address();
        let local_network_up = self.local_network_up().await;
        let machine_up = self.machine_up(target.host()).await;
        let (server_up, page_up, html_title) = server_then_page(&self.http_client, &url).await;
        ProbeResult {
            local_network_up,
            machine_up,
            server_up,
            page_up,
            html_title,
        }
    }

    /// Pings the well-known host to establish that this machine has any
    /// network connectivity at all.
    pub async fn local_network_up(&self) -> bool {
        self.ping_host_or_ip(&self.ping_host).await
    }

    /// Pings the monitored machine itself.
    pub async fn machine_up(&self, host: &str) -> bool {
        self.ping_host_or_ip(host).await
    }

    async fn ping_host_or_ip(&self, host: &str) -> bool {
        let ip = match self.resolve(host).await {
            Ok(ip) => ip,
            Err(e) => {
                debug!("domain resolution failed for {host}: {e}");
                return false;
            }
        };
        let payload = [0u8; 56];
        let mut pinger = self.ping_client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(Duration::from_millis(PING_TIMEOUT_MS));
        pinger.ping(PingSequence(0), &payload).await.is_ok()
    }

    async fn resolve(&self, address: &str) -> Result<IpAddr, String> {
        if let Ok(ip) = address.parse::<IpAddr>() {
            return Ok(ip);
        }
        match self.dns_resolver.lookup_ip(address).await {
            Ok(lookup) => lookup.iter().next().ok_or_else(|| "no address found".into()),
            Err(e) => Err(format!("DNS resolution failed: {e}")),
        }
    }
}

/// Server check then page check against one URL. The server is up when a
/// connection is established at all, whatever the status code; the page is
/// up only for a success status, and is never attempted when the server
/// check failed. Captures the HTML title while it has the body in hand.
pub(crate) async fn server_then_page(
    client: &reqwest::Client,
    url: &str,
) -> (bool, bool, Option<String>) {
    let server_up = server_reachable(client, url).await;
    if !server_up {
        return (false, false, None);
    }
    let (page_up, html_title) = page_reachable(client, url).await;
    (server_up, page_up, html_title)
}

async fn server_reachable(client: &reqwest::Client, url: &str) -> bool {
    client.get(url).send().await.is_ok()
}

async fn page_reachable(client: &reqwest::Client, url: &str) -> (bool, Option<String>) {
    match client.get(url).send().await {
        Ok(response) => {
            let page_up = response.status().is_success();
            let html_title = if page_up {
                response
                    .text()
                    .await
                    .ok()
                    .and_then(|body| extract_html_title(&body))
            } else {
                None
            };
            (page_up, html_title)
        }
        Err(_) => (false, None),
    }
}
