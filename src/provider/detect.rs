//! provider::detect
//!
//! Provider detection from a remote URL.
//!
//! # Design
//!
//! Each provider kind that can be inferred from a remote gets one
//! recogniser here. Detection tries them in order and returns the first
//! match. Unrecognised URLs yield `None`, which callers treat as "no
//! provider could be guessed".

use super::github::parse_github_url;
use super::ProviderInfo;

/// Detect the provider behind a remote URL.
///
/// # Arguments
///
/// * `remote_url` - Git remote URL (SSH or HTTPS format)
/// * `version` - Version marker to record for the provider (may be empty)
///
/// # Returns
///
/// A fully populated provider if the URL matches a known host, `None`
/// otherwise.
pub fn detect_provider(remote_url: &str, version: &str) -> Option<ProviderInfo> {
    if let Some((user, repo)) = parse_github_url(remote_url) {
        return Some(ProviderInfo::Github {
            user,
            repo,
            version: version.to_string(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    #[test]
    fn github_ssh() {
        let provider = detect_provider("git@github.com:acme/widget.git", "abc").unwrap();
        assert_eq!(provider.kind(), ProviderKind::GitHub);
    }

    #[test]
    fn github_https_records_version() {
        let provider = detect_provider("https://github.com/acme/widget.git", "abc").unwrap();
        assert_eq!(
            provider,
            ProviderInfo::Github {
                user: "acme".into(),
                repo: "widget".into(),
                version: "abc".into(),
            }
        );
    }

    #[test]
    fn unknown_url() {
        assert_eq!(detect_provider("git@unknown.com:acme/widget.git", "abc"), None);
        assert_eq!(detect_provider("not-a-url", ""), None);
    }
}
