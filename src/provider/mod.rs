//! provider
//!
//! Source-code providers a core can declare, and inference of a provider
//! from a local checkout.
//!
//! # Architecture
//!
//! [`ProviderInfo`] is a closed set of provider variants. Each variant has a
//! [`ProviderKind`], and the kind decides whether a core using it can be
//! published ([`ProviderKind::is_publishable`]). The publish workflow only
//! asks that question; it never matches on individual providers.
//!
//! Adding a provider means adding a variant here and, if it can be inferred
//! from a remote URL, a recogniser in `detect`.
//!
//! # Modules
//!
//! - [`github`]: GitHub remote URL parsing
//! - `detect`: Provider detection from remote URLs
//! - [`probe`]: Version-control probing of a core's checkout
//!
//! # Example
//!
//! ```
//! use corepub::provider::{detect_provider, ProviderKind};
//!
//! let provider = detect_provider("git@github.com:acme/widget.git", "abc123").unwrap();
//! assert_eq!(provider.kind(), ProviderKind::GitHub);
//! assert!(provider.kind().is_publishable());
//! ```

mod detect;
pub mod github;
pub mod probe;

pub use detect::detect_provider;
pub use probe::{guess_provider, GitCli, ProviderGuess, VcsError, VcsTool};

use serde::{Deserialize, Serialize};

/// Provider kinds a descriptor may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Sources hosted on GitHub
    GitHub,
    /// Sources in an arbitrary git repository
    Git,
    /// Sources downloaded from a plain URL
    Url,
}

impl ProviderKind {
    /// Get the provider name as used in descriptor files.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::Git => "git",
            ProviderKind::Url => "url",
        }
    }

    /// Whether the registry accepts cores fetched from this kind of provider.
    pub fn is_publishable(&self) -> bool {
        matches!(self, ProviderKind::GitHub)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The `[provider]` section of a core descriptor.
///
/// Every variant is fully populated once deserialized; a descriptor either
/// has a complete provider or none at all.
///
/// # Example
///
/// ```toml
/// [provider]
/// name = "github"
/// user = "acme"
/// repo = "widget"
/// version = "v1.0"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum ProviderInfo {
    /// A GitHub repository at a given version (tag or commit).
    Github {
        user: String,
        repo: String,
        version: String,
    },
    /// Any git repository.
    Git {
        repo: String,
        version: Option<String>,
    },
    /// A downloadable archive or file.
    Url {
        url: String,
        filetype: Option<String>,
    },
}

impl ProviderInfo {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderInfo::Github { .. } => ProviderKind::GitHub,
            ProviderInfo::Git { .. } => ProviderKind::Git,
            ProviderInfo::Url { .. } => ProviderKind::Url,
        }
    }

    /// Render this provider as a `[provider]` descriptor section.
    ///
    /// The text parses back into the same provider when appended to a
    /// descriptor.
    pub fn render_section(&self) -> String {
        let mut fields = vec![("name", self.kind().name().to_string())];
        match self {
            ProviderInfo::Github {
                user,
                repo,
                version,
            } => {
                fields.push(("user", user.clone()));
                fields.push(("repo", repo.clone()));
                fields.push(("version", version.clone()));
            }
            ProviderInfo::Git { repo, version } => {
                fields.push(("repo", repo.clone()));
                if let Some(version) = version {
                    fields.push(("version", version.clone()));
                }
            }
            ProviderInfo::Url { url, filetype } => {
                fields.push(("url", url.clone()));
                if let Some(filetype) = filetype {
                    fields.push(("filetype", filetype.clone()));
                }
            }
        }

        let mut section = String::from("[provider]\n");
        for (key, value) in fields {
            section.push_str(&format!("{} = {}\n", key, toml::Value::String(value)));
        }
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        provider: ProviderInfo,
    }

    mod provider_kind {
        use super::*;

        const KINDS: [ProviderKind; 3] = [ProviderKind::GitHub, ProviderKind::Git, ProviderKind::Url];

        #[test]
        fn only_github_is_publishable() {
            for kind in KINDS {
                assert_eq!(kind.is_publishable(), kind == ProviderKind::GitHub);
            }
        }

        #[test]
        fn display_matches_descriptor_tag() {
            for kind in KINDS {
                assert_eq!(format!("{}", kind), kind.name());
            }
            assert_eq!(ProviderKind::GitHub.name(), "github");
        }

        #[test]
        fn kind_follows_variant() {
            let provider = ProviderInfo::Url {
                url: "https://example.com/w.tgz".into(),
                filetype: None,
            };
            assert_eq!(provider.kind(), ProviderKind::Url);
        }
    }

    mod provider_info {
        use super::*;

        #[test]
        fn deserializes_github() {
            let holder: Holder = toml::from_str(
                "[provider]\nname = \"github\"\nuser = \"acme\"\nrepo = \"widget\"\nversion = \"v1\"\n",
            )
            .unwrap();
            assert_eq!(
                holder.provider,
                ProviderInfo::Github {
                    user: "acme".into(),
                    repo: "widget".into(),
                    version: "v1".into(),
                }
            );
        }

        #[test]
        fn partial_github_rejected() {
            let result: Result<Holder, _> =
                toml::from_str("[provider]\nname = \"github\"\nuser = \"acme\"\n");
            assert!(result.is_err());
        }

        #[test]
        fn unknown_name_rejected() {
            let err = toml::from_str::<Holder>("[provider]\nname = \"svn\"\nrepo = \"x\"\n")
                .unwrap_err();
            assert!(err.message().contains("svn"), "unexpected message: {}", err);
        }

        #[test]
        fn git_version_is_optional() {
            let holder: Holder =
                toml::from_str("[provider]\nname = \"git\"\nrepo = \"https://example.com/x\"\n")
                    .unwrap();
            assert_eq!(holder.provider.kind(), ProviderKind::Git);
        }

        #[test]
        fn rendered_section_parses_back() {
            let providers = [
                ProviderInfo::Github {
                    user: "acme".into(),
                    repo: "widget".into(),
                    version: "".into(),
                },
                ProviderInfo::Url {
                    url: "https://example.com/w.tar.gz".into(),
                    filetype: Some("tar".into()),
                },
            ];
            for provider in providers {
                let section = provider.render_section();
                assert!(section.starts_with("[provider]\n"));
                let holder: Holder = toml::from_str(&section).unwrap();
                assert_eq!(holder.provider, provider);
            }
        }

        #[test]
        fn rendered_values_are_quoted() {
            let provider = ProviderInfo::Github {
                user: "acme".into(),
                repo: "wid\"get".into(),
                version: "abc".into(),
            };
            let holder: Holder = toml::from_str(&provider.render_section()).unwrap();
            assert_eq!(holder.provider, provider);
        }
    }
}
