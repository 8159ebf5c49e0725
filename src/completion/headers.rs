//! Header utilities for completion requests
//!
//! Outbound requests carry only the provider credentials and the content type;
//! nothing from the inbound request is forwarded.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Build the headers sent with every completion request
pub fn build_default_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .context("COMPLETION_API_KEY contains characters not allowed in a header")?;
    auth.set_sensitive(true);

    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
