//! Credentials, scopes and token verification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Access scope carried by a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// An interactive user.
    User,
    /// A running build.
    Build,
    /// A pipeline-scoped service token.
    Pipeline,
    /// An administrator.
    Admin,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Build => write!(f, "build"),
            Self::Pipeline => write!(f, "pipeline"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "build" => Ok(Self::Build),
            "pipeline" => Ok(Self::Pipeline),
            "admin" => Ok(Self::Admin),
            _ => Err(format!(
                "Invalid scope: {s}. Valid scopes: user, build, pipeline, admin"
            )),
        }
    }
}

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Who the token belongs to.
    pub subject: String,
    /// What the token may do.
    pub scopes: BTreeSet<Scope>,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(subject: impl Into<String>, scopes: impl IntoIterator<Item = Scope>) -> Self {
        Self {
            subject: subject.into(),
            scopes: scopes.into_iter().collect(),
        }
    }

    /// Returns true if any of `required` is held.
    #[must_use]
    pub fn has_any_scope(&self, required: &[Scope]) -> bool {
        required.iter().any(|s| self.scopes.contains(s))
    }
}

/// Resolves bearer tokens to credentials.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the credentials for `token`, or `None` if it is not valid.
    async fn verify(&self, token: &str) -> Option<Credentials>;
}

/// A configured token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// The bearer token.
    pub token: String,
    /// Subject reported for the token.
    pub subject: String,
    /// Scopes granted to the token.
    #[serde(default)]
    pub scopes: Vec<Scope>,
}

impl fmt::Debug for TokenEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEntry")
            .field("token", &"[REDACTED]")
            .field("subject", &self.subject)
            .field("scopes", &self.scopes)
            .finish()
    }
}

fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifier over a fixed token list.
///
/// Tokens are hashed at construction and never kept in plaintext.
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    by_digest: HashMap<String, Credentials>,
}

impl fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("tokens", &self.by_digest.len())
            .finish()
    }
}

impl StaticTokenVerifier {
    /// Creates an empty verifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a verifier from configured entries.
    #[must_use]
    pub fn from_entries(entries: &[TokenEntry]) -> Self {
        entries.iter().fold(Self::new(), |verifier, entry| {
            verifier.with_token(
                &entry.token,
                Credentials::new(entry.subject.clone(), entry.scopes.iter().copied()),
            )
        })
    }

    /// Registers a token.
    #[must_use]
    pub fn with_token(mut self, token: &str, credentials: Credentials) -> Self {
        self.by_digest.insert(digest(token), credentials);
        self
    }

    /// Returns the number of registered tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    /// Returns true if no tokens are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Option<Credentials> {
        self.by_digest.get(&digest(token)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parse_and_display() {
        assert_eq!("Pipeline".parse::<Scope>(), Ok(Scope::Pipeline));
        assert_eq!(Scope::Build.to_string(), "build");
        assert!("temporal".parse::<Scope>().is_err());
    }

    #[test]
    fn test_scope_serde() {
        let scopes: Vec<Scope> = serde_json::from_str(r#"["user","admin"]"#).unwrap();
        assert_eq!(scopes, vec![Scope::User, Scope::Admin]);
    }

    #[test]
    fn test_has_any_scope() {
        let creds = Credentials::new("alice", [Scope::Build]);
        assert!(creds.has_any_scope(&[Scope::User, Scope::Build]));
        assert!(!creds.has_any_scope(&[Scope::Admin]));
        assert!(!creds.has_any_scope(&[]));
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticTokenVerifier::from_entries(&[TokenEntry {
            token: "s3cret".to_string(),
            subject: "alice".to_string(),
            scopes: vec![Scope::User],
        }]);

        assert_eq!(verifier.len(), 1);
        let creds = verifier.verify("s3cret").await.unwrap();
        assert_eq!(creds.subject, "alice");
        assert!(verifier.verify("wrong").await.is_none());
    }

    #[test]
    fn test_token_entry_debug_redacts() {
        let entry = TokenEntry {
            token: "s3cret".to_string(),
            subject: "alice".to_string(),
            scopes: vec![],
        };
        let debug = format!("{entry:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("REDACTED"));
    }
}
