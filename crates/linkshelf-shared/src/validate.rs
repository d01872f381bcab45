//! Validation of user-supplied link drafts and profiles.
//!
//! Everything here is pure: no network lookups, no reachability checks. The
//! client runs these before calling the service and the server runs them
//! again on every write.

use base64::Engine;
use url::Url;

use crate::constants::MAX_IMAGE_BYTES;
use crate::error::{UrlError, ValidationError};
use crate::types::{Link, UserProfile};

/// Check that `raw` is a URL worth storing.
///
/// Rules, in order, on the trimmed input:
/// 1. not empty
/// 2. starts with `http://` or `https://`
/// 3. parses as a URL
/// 4. has a hostname
/// 5. the hostname contains a dot, or is exactly `localhost`
pub fn validate_url(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Required);
    }

    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(UrlError::BadScheme);
    }

    let parsed = Url::parse(trimmed).map_err(|_| UrlError::Malformed)?;

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(UrlError::MissingHost),
    };

    if !host.contains('.') && host != "localhost" {
        return Err(UrlError::InvalidDomain);
    }

    Ok(parsed)
}

/// `None` when `raw` is acceptable, otherwise the reason it is not.
pub fn url_error(raw: &str) -> Option<String> {
    validate_url(raw).err().map(|e| e.to_string())
}

/// Validate a link draft and return it normalized: URL, title, description
/// and color trimmed, empty optional fields dropped.
pub fn validate_link(link: &Link) -> Result<Link, ValidationError> {
    validate_url(&link.url)?;

    let title = link.title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    let image = link
        .image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| validate_image(s).map(|_| s.to_string()))
        .transpose()?;

    Ok(Link {
        url: link.url.trim().to_string(),
        title: title.to_string(),
        description: non_empty(link.description.as_deref()),
        image,
        color: non_empty(link.color.as_deref()),
    })
}

/// Check that `id` can be stored and addressed again as one path segment.
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::IdRequired);
    }
    // dot segments are collapsed by URL normalization
    if id == "." || id == ".." {
        return Err(ValidationError::InvalidId);
    }
    Ok(())
}

pub fn validate_profile(profile: &UserProfile) -> Result<UserProfile, ValidationError> {
    let name = profile.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(UserProfile {
        name: name.to_string(),
    })
}

/// Reject anything but `data:image/<subtype>;base64,<payload>` with a
/// decodable payload of at most [`MAX_IMAGE_BYTES`].
fn validate_image(uri: &str) -> Result<(), ValidationError> {
    let (meta, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or(ValidationError::InvalidImage)?;

    let mime = meta
        .strip_suffix(";base64")
        .ok_or(ValidationError::InvalidImage)?;
    match mime.strip_prefix("image/") {
        Some(subtype) if !subtype.is_empty() => {}
        _ => return Err(ValidationError::InvalidImage),
    }

    // cheap upper bound before decoding
    if payload.len() / 4 * 3 > MAX_IMAGE_BYTES + 3 {
        return Err(ValidationError::ImageTooLarge);
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| ValidationError::InvalidImage)?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
