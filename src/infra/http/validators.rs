//! Field checks applied to submitted post forms.

use url::{Host, Url};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL.";

/// Blank or whitespace-only input counts as missing.
pub fn required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    Ok(())
}

/// Absolute URL with a scheme and a host; named hosts need a dot (`example.com`, not `localhost`).
pub fn url(value: &str) -> Result<(), String> {
    let invalid = || INVALID_URL_MESSAGE.to_string();

    if value != value.trim() || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let parsed = Url::parse(value).map_err(|_| invalid())?;
    match parsed.host() {
        Some(Host::Domain(domain)) => {
            let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
            if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
                return Err(invalid());
            }
            Ok(())
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        None => Err(invalid()),
    }
}
