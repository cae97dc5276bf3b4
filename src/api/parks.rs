use crate::domain::{Park, ParkDetail};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = "parktrack/0.1.0";

fn build_client(timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to create HTTP client")
}

/// Fetch the full parks list from the backend.
///
/// # Arguments
/// * `base_url` - Backend base URL, e.g. `http://localhost:5000`
/// * `timeout_secs` - Request timeout
///
/// # Returns
/// * Park records in the order the backend serves them (order is preserved
///   downstream for stable nearest-park tie-breaking)
pub fn fetch_parks(base_url: &str, timeout_secs: u64) -> Result<Vec<Park>> {
    let client = build_client(timeout_secs)?;
    let url = format!("{}/api/parks", base_url.trim_end_matches('/'));

    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("Failed to fetch parks list from {}", url))?;

    if !response.status().is_success() {
        bail!("Parks API returned error status: {}", response.status());
    }

    response.json().context("Failed to parse parks list JSON")
}

/// Fetch the detail record for one park.
///
/// The backend answers with at least the bare park record; the NPS block,
/// best-time-to-go, and note fields are optional and decode to `None` when
/// absent.
pub fn fetch_park_detail(base_url: &str, id: &str, timeout_secs: u64) -> Result<ParkDetail> {
    let client = build_client(timeout_secs)?;
    let url = format!(
        "{}/api/park/{}",
        base_url.trim_end_matches('/'),
        percent_encode(id)
    );

    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("Failed to fetch park detail from {}", url))?;

    if response.status().as_u16() == 404 {
        bail!("Park not found: {}", id);
    }
    if !response.status().is_success() {
        bail!("Park API returned error status: {}", response.status());
    }

    response.json().context("Failed to parse park detail JSON")
}

/// Load a parks list from a local JSON snapshot instead of the API.
pub fn load_parks_file(path: &Path) -> Result<Vec<Park>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parks file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse parks file: {}", path.display()))
}

/// Minimal percent-encoding for a path segment. Park ids are short
/// alphanumeric codes in practice, but the URL must stay well-formed for
/// anything else.
fn percent_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
