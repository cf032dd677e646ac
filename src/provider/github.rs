//! provider::github
//!
//! GitHub remote URL recognition.

/// Host every recognised GitHub remote points at.
pub const GITHUB_HOST: &str = "github.com";

/// Parse a GitHub remote URL into its account and repository.
///
/// Supports the SSH shorthand (`git@github.com:owner/repo.git`) and HTTPS
/// (`https://github.com/owner/repo.git`) forms. A trailing `.git` or `/` is
/// stripped from the repository. The host is matched without regard to
/// ASCII case.
///
/// # Example
///
/// ```
/// use corepub::provider::github::parse_github_url;
///
/// assert_eq!(
///     parse_github_url("git@github.com:acme/widget.git"),
///     Some(("acme".to_string(), "widget".to_string()))
/// );
/// assert_eq!(parse_github_url("https://gitlab.com/acme/widget"), None);
/// ```
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    // SSH format: git@github.com:owner/repo.git
    // HTTPS format: https://github.com/owner/repo.git
    let (host, path) = match url.strip_prefix("git@") {
        Some(rest) => rest.split_once(':')?,
        None => url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))?
            .split_once('/')?,
    };

    if !host.eq_ignore_ascii_case(GITHUB_HOST) {
        return None;
    }
    split_account_repo(path)
}

fn split_account_repo(path: &str) -> Option<(String, String)> {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.splitn(2, '/');
    let account = parts.next()?;
    let repo = parts.next()?;
    if account.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((account.to_string(), repo.to_string()))
}
