use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Not a valid URL")]
    Invalid,
    #[error("Only http and https links can be opened")]
    UnsupportedScheme,
    #[error("Refusing URL with embedded credentials")]
    HasCredentials,
}

/// Validate a backend-supplied link before passing it to the system
/// browser.
///
/// Backend data is not trusted with the ability to launch arbitrary URL
/// handlers (`file:`, `javascript:`, custom schemes); only plain web links
/// pass. URLs carrying userinfo are rejected as a phishing vector
/// (`https://trusted.com@evil.example/`).
pub fn validate_link(raw: &str) -> Result<Url, LinkError> {
    let url = Url::parse(raw.trim()).map_err(|_| LinkError::Invalid)?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(LinkError::UnsupportedScheme),
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(LinkError::HasCredentials);
    }

    if url.host_str().is_none() {
        return Err(LinkError::Invalid);
    }

    Ok(url)
}
