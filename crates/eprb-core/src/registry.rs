//! Package registry (EPR) search client.
//!
//! `GET {base}/search?kibana.version={version}` returns a JSON array of
//! package descriptors. Artifact and signature paths in the response are
//! server-relative and resolve against the registry origin.

use crate::http::HttpClient;
use crate::retry::FetchError;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Public Elastic Package Registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://epr.elastic.co";

/// One catalog entry: an artifact and its detached signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDescriptor {
    /// Server-relative artifact path, e.g. `/epr/apache/apache-1.3.0.zip`.
    pub download: String,
    /// Server-relative signature path, e.g. `/epr/apache/apache-1.3.0.zip.sig`.
    pub signature_path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PackageDescriptor {
    /// `name-version` when the registry sent both, for log lines.
    pub fn label(&self) -> String {
        match (&self.name, &self.version) {
            (Some(n), Some(v)) => format!("{n}-{v}"),
            (Some(n), None) => n.clone(),
            _ => self.download.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid registry URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("registry search {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    #[error("registry search {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("registry search {url} returned malformed JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Registry search client. Every call hits the network; nothing is cached.
#[derive(Clone)]
pub struct RegistryClient {
    base: Url,
    http: Arc<HttpClient>,
}

impl RegistryClient {
    pub fn new(base: &str, http: Arc<HttpClient>) -> Result<Self, RegistryError> {
        let mut base = Url::parse(base).map_err(|source| RegistryError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;
        // Treat the base as a directory so `search` is appended, not substituted.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, http })
    }

    /// Search endpoint for `version`, with the version query-encoded.
    pub fn search_url(&self, version: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("{}search", self.base.path()));
        url.query_pairs_mut().append_pair("kibana.version", version);
        url
    }

    /// Resolves a server-relative path from a descriptor against the registry origin.
    pub fn resolve(&self, path: &str) -> Result<Url, RegistryError> {
        self.base
            .join(path)
            .map_err(|source| RegistryError::InvalidUrl {
                url: path.to_string(),
                source,
            })
    }

    /// Fetches the package catalog for `version`.
    pub fn fetch(&self, version: &str) -> Result<Vec<PackageDescriptor>, RegistryError> {
        let url = self.search_url(version);
        tracing::debug!(url = %url, "querying registry");
        let body = self.http.get_bytes(url.as_str()).map_err(|e| match e {
            FetchError::Http(status) => RegistryError::Status {
                url: url.to_string(),
                status,
            },
            source => RegistryError::Transport {
                url: url.to_string(),
                source,
            },
        })?;
        let packages = parse_catalog(&body).map_err(|source| RegistryError::Decode {
            url: url.to_string(),
            source,
        })?;
        tracing::info!(version, packages = packages.len(), "fetched registry catalog");
        Ok(packages)
    }
}

/// Decodes a search response body.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<PackageDescriptor>, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RegistryClient {
        RegistryClient::new(base, Arc::new(HttpClient::default())).unwrap()
    }

    #[test]
    fn search_url_from_bare_origin() {
        let c = client("https://epr.elastic.co");
        assert_eq!(
            c.search_url("8.11.1").as_str(),
            "https://epr.elastic.co/search?kibana.version=8.11.1"
        );
    }

    #[test]
    fn search_url_keeps_base_path() {
        let c = client("http://127.0.0.1:8080/mirror");
        assert_eq!(
            c.search_url("8.11.1").as_str(),
            "http://127.0.0.1:8080/mirror/search?kibana.version=8.11.1"
        );
    }

    #[test]
    fn search_url_encodes_version() {
        let c = client("https://epr.elastic.co/");
        assert_eq!(
            c.search_url("8.11.1 beta&x").as_str(),
            "https://epr.elastic.co/search?kibana.version=8.11.1+beta%26x"
        );
    }

    #[test]
    fn resolve_is_origin_relative() {
        let c = client("http://127.0.0.1:8080/mirror");
        assert_eq!(
            c.resolve("/epr/apache/apache-1.3.0.zip").unwrap().as_str(),
            "http://127.0.0.1:8080/epr/apache/apache-1.3.0.zip"
        );
    }

    #[test]
    fn invalid_base_rejected() {
        let err = RegistryClient::new("not a url", Arc::new(HttpClient::default()))
            .err()
            .expect("should fail");
        assert!(matches!(err, RegistryError::InvalidUrl { .. }));
    }

    #[test]
    fn parse_catalog_ignores_unknown_fields() {
        let body = br#"[
            {"name":"apache","version":"1.3.0","title":"Apache","download":"/epr/apache/apache-1.3.0.zip",
             "signature_path":"/epr/apache/apache-1.3.0.zip.sig","type":"integration","categories":["web"]},
            {"download":"/epr/nginx/nginx-1.2.0.zip","signature_path":"/epr/nginx/nginx-1.2.0.zip.sig"}
        ]"#;
        let pkgs = parse_catalog(body).unwrap();
        assert_eq!(pkgs.len(), 2);
        assert_eq!(pkgs[0].label(), "apache-1.3.0");
        assert_eq!(pkgs[1].name, None);
        assert_eq!(pkgs[1].label(), "/epr/nginx/nginx-1.2.0.zip");
    }

    #[test]
    fn parse_catalog_rejects_missing_paths() {
        assert!(parse_catalog(br#"[{"name":"x","download":"/a.zip"}]"#).is_err());
        assert!(parse_catalog(br#"{"not":"an array"}"#).is_err());
    }

    #[test]
    fn parse_catalog_empty() {
        assert!(parse_catalog(b"[]").unwrap().is_empty());
    }
}
