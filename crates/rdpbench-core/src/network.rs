//! Network capability consumed by checks that verify external claims.
//!
//! The engine never talks HTTP itself. A check that needs to know whether a
//! DOI resolves or a license URL answers asks a [`Resolver`], and turns any
//! [`ResolveError`] into an unsuccessful result.

use std::collections::BTreeMap;

use thiserror::Error;

/// Status line and headers of a HEAD-style request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
}

impl Resolution {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }
}

/// Failure of the network capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{uri} is unreachable")]
    Unreachable { uri: String },
    #[error("transport error for {uri}: {reason}")]
    Transport { uri: String, reason: String },
}

/// Resolve a URI without following redirects.
pub trait Resolver: Send + Sync {
    fn resolve(&self, uri: &str) -> Result<Resolution, ResolveError>;
}

/// Table-backed resolver.
///
/// Answers only the URIs it was given; everything else is unreachable.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    answers: BTreeMap<String, Result<Resolution, ResolveError>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a successful answer for `uri`.
    pub fn answer(mut self, uri: impl Into<String>, resolution: Resolution) -> Self {
        self.answers.insert(uri.into(), Ok(resolution));
        self
    }

    /// Register a transport failure for `uri`.
    pub fn fail(mut self, uri: impl Into<String>, reason: impl Into<String>) -> Self {
        let uri = uri.into();
        let error = ResolveError::Transport {
            uri: uri.clone(),
            reason: reason.into(),
        };
        self.answers.insert(uri, Err(error));
        self
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, uri: &str) -> Result<Resolution, ResolveError> {
        match self.answers.get(uri) {
            Some(answer) => answer.clone(),
            None => Err(ResolveError::Unreachable {
                uri: uri.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_resolver_answers_known_uris_only() {
        let resolver = StaticResolver::new()
            .answer(
                "https://doi.org/10.5281/zenodo.3490396",
                Resolution::new(302).with_header("Location", "https://zenodo.org/record/3490396"),
            )
            .fail("https://broken.example.org", "connection reset");

        let resolution = resolver
            .resolve("https://doi.org/10.5281/zenodo.3490396")
            .expect("known uri");
        assert_eq!(resolution.status_code, 302);
        assert_eq!(
            resolution.location(),
            Some("https://zenodo.org/record/3490396")
        );

        assert!(matches!(
            resolver.resolve("https://broken.example.org"),
            Err(ResolveError::Transport { .. })
        ));
        assert!(matches!(
            resolver.resolve("https://unknown.example.org"),
            Err(ResolveError::Unreachable { .. })
        ));
    }
}
