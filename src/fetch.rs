use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

/// Public status page of the CCI ARTESP traffic panel.
pub const CCI_URL: &str = "https://cci.artesp.sp.gov.br/";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// The panel serves a bot-hostile default page to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetch one HTML snapshot of the status page.
pub async fn fetch_page(url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    info!("Fetching status page: {}", url);
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .header(reqwest::header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Status page returned HTTP {}", status);
    }

    response
        .text()
        .await
        .context("Failed to read status page body")
}
