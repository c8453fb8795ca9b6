use crate::blob_ref::BlobRef;

use super::error::PrefixResolutionError;

const ANCHOR_EDGE: usize = 20;

/// Path of the share URL, relative to the server.
///
/// A directory share is fetched through the claim alone. A file share
///  names the file and routes through the claim, asking the server to
///  assemble the file's contents.
pub fn share_path(share_root: &str, claim: &BlobRef, target: &BlobRef, is_dir: bool) -> String {
    if is_dir {
        format!("{}{}", share_root, claim)
    } else {
        format!("{}{}?via={}&assemble=1", share_root, target, claim)
    }
}

/// Scheme and host of the server, found by locating the UI root in the
///  current location: everything before it is the prefix.
pub fn url_prefix(location: &str, ui_root: &str) -> Result<String, PrefixResolutionError> {
    let not_found = || PrefixResolutionError {
        location: location.to_string(),
        ui_root: ui_root.to_string(),
    };

    if ui_root.is_empty() {
        return Err(not_found());
    }
    if let Some(prefix) = location.strip_suffix(ui_root) {
        return Ok(prefix.to_string());
    }
    location
        .find(ui_root)
        .map(|idx| location[..idx].to_string())
        .ok_or_else(not_found)
}

/// Absolute share URL for a share path, given where the UI is running
pub fn absolute_share_url(
    location: &str,
    ui_root: &str,
    path: &str,
) -> Result<String, PrefixResolutionError> {
    Ok(format!("{}{}", url_prefix(location, ui_root)?, path))
}

/// Shortened form of a URL for display: the first and last 20 characters
pub fn anchor_text(url: &str) -> String {
    let len = url.chars().count();
    if len <= 2 * ANCHOR_EDGE {
        return url.to_string();
    }
    let head: String = url.chars().take(ANCHOR_EDGE).collect();
    let tail: String = url.chars().skip(len - ANCHOR_EDGE).collect();
    format!("{}...{}", head, tail)
}
