//! # Live Resource Fetch
//!
//! Pulls exactly one resource from a running Redfish service with HTTP basic
//! authentication. Unlike mockup modes, a connection failure or non-success
//! status ends the run — there is only one resource to process.
//!
//! TLS certificate verification can be disabled with the `--insecure` flag
//! for lab racks using self-signed certificates. The original tool disabled
//! verification unconditionally; here it is an explicit, labeled opt-in.

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Connection settings for a live fetch.
#[derive(Debug, Clone)]
pub struct LiveTarget {
    /// Host or IP, with optional `:port` and optional scheme. A bare host
    /// defaults to `https://`.
    pub host: String,
    /// Resource URL on the service, e.g. `/redfish/v1`.
    pub url: String,
    /// Basic-auth user name.
    pub user: String,
    /// Basic-auth password.
    pub password: String,
    /// Skip TLS certificate verification (self-signed lab racks).
    pub insecure: bool,
    /// Request timeout.
    pub timeout: Duration,
}

impl LiveTarget {
    /// The full request URL, with a scheme prepended if the host had none.
    pub fn request_url(&self) -> String {
        if self.host.contains("://") {
            format!("{}{}", self.host, self.url)
        } else {
            format!("https://{}{}", self.host, self.url)
        }
    }
}

/// GET the target resource and return the response body text.
///
/// # Errors
///
/// Fails on client construction, transport errors, or a non-success status.
/// All are run-fatal in live mode.
pub fn fetch_resource(target: &LiveTarget) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(target.timeout)
        .danger_accept_invalid_certs(target.insecure)
        .build()
        .context("failed to build HTTP client")?;

    let url = target.request_url();
    tracing::debug!(url = %url, insecure = target.insecure, "fetching live resource");

    let response = client
        .get(&url)
        .basic_auth(&target.user, Some(&target.password))
        .send()
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("invalid response from {url}: HTTP status {status}");
    }
    response
        .text()
        .with_context(|| format!("failed to read response body from {url}"))
}
