use std::fmt;
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::Metadata;

/// Source of metadata records, keyed by pid.
pub trait MetadataProvider: Send + Sync {
    fn fetch(&self, pid: &str) -> Result<Metadata>;
}

/// Small keyed collection preserving insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle<T> {
    items: Vec<(String, T)>,
}

impl<T> Default for Bundle<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Bundle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the item stored under `key`.
    pub fn put(&mut self, key: impl Into<String>, item: T) {
        let key = key.into();
        match self.items.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = item,
            None => self.items.push((key, item)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, item)| item)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(key, item)| (key.as_str(), item))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }
}

/// A file that is part of the RDP payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataItem {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// A service giving access to the RDP's data or metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Service {
    pub name: String,
    /// Protocol spoken by the endpoint (`oai-pmh`, `zenodo-rest`, ...).
    pub protocol: String,
    pub endpoint: String,
    /// Capacities the service offers (`GetRecord`, `ListFiles`, ...).
    #[serde(default)]
    pub capacities: Vec<String>,
}

/// Research data product under assessment.
///
/// Metadata is resolved at most once, either eagerly at construction or on
/// first access through a [`MetadataProvider`].
pub struct Rdp {
    pid: String,
    metadata: OnceLock<Option<Metadata>>,
    provider: Option<Box<dyn MetadataProvider>>,
    data: Bundle<DataItem>,
    services: Bundle<Service>,
}

impl Rdp {
    pub fn from_metadata(pid: impl Into<String>, metadata: Metadata) -> Self {
        Self::build(pid.into(), OnceLock::from(Some(metadata)), None)
    }

    /// An RDP whose metadata could not be obtained.
    pub fn without_metadata(pid: impl Into<String>) -> Self {
        Self::build(pid.into(), OnceLock::from(None), None)
    }

    pub fn with_provider(
        pid: impl Into<String>,
        provider: impl MetadataProvider + 'static,
    ) -> Self {
        Self::build(pid.into(), OnceLock::new(), Some(Box::new(provider)))
    }

    fn build(
        pid: String,
        metadata: OnceLock<Option<Metadata>>,
        provider: Option<Box<dyn MetadataProvider>>,
    ) -> Self {
        Self {
            pid,
            metadata,
            provider,
            data: Bundle::new(),
            services: Bundle::new(),
        }
    }

    pub fn with_data(mut self, item: DataItem) -> Self {
        self.data.put(item.source.clone(), item);
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.put(service.name.clone(), service);
        self
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    /// Metadata of the RDP, resolving it on first access.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata
            .get_or_init(|| {
                let provider = self.provider.as_ref()?;
                match provider.fetch(&self.pid) {
                    Ok(metadata) => Some(metadata),
                    Err(err) => {
                        tracing::warn!(
                            event = "metadata_unavailable",
                            pid = %self.pid,
                            error = %err
                        );
                        None
                    }
                }
            })
            .as_ref()
    }

    pub fn data(&self) -> &Bundle<DataItem> {
        &self.data
    }

    pub fn services(&self) -> &Bundle<Service> {
        &self.services
    }
}

impl fmt::Debug for Rdp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rdp")
            .field("pid", &self.pid)
            .field("metadata", &self.metadata.get())
            .field("has_provider", &self.provider.is_some())
            .field("data", &self.data)
            .field("services", &self.services)
            .finish()
    }
}

/// Serialized form of an RDP as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RdpRecord {
    pub pid: String,
    /// Absent when the metadata could not be harvested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<DataItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
}

impl RdpRecord {
    pub fn into_rdp(self) -> Rdp {
        let mut rdp = match self.metadata {
            Some(metadata) => Rdp::from_metadata(self.pid, metadata),
            None => Rdp::without_metadata(self.pid),
        };
        for item in self.data {
            rdp = rdp.with_data(item);
        }
        for service in self.services {
            rdp = rdp.with_service(service);
        }
        rdp
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MetadataProvider for CountingProvider {
        fn fetch(&self, _pid: &str) -> Result<Metadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Provider("endpoint down".to_string()));
            }
            Ok(Metadata {
                version: Some("1.0.0".to_string()),
                ..Metadata::default()
            })
        }
    }

    #[test]
    fn provider_is_called_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let rdp = Rdp::with_provider(
            "10.5281/zenodo.3490396",
            CountingProvider {
                calls: Arc::clone(&calls),
                fail: false,
            },
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            rdp.metadata().and_then(|md| md.version.as_deref()),
            Some("1.0.0")
        );
        assert!(rdp.metadata().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_provider_means_no_metadata() {
        let calls = Arc::new(AtomicUsize::new(0));
        let rdp = Rdp::with_provider(
            "10.123/broken",
            CountingProvider {
                calls: Arc::clone(&calls),
                fail: true,
            },
        );
        assert!(rdp.metadata().is_none());
        assert!(rdp.metadata().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn record_payload_lands_in_bundles() {
        let record = RdpRecord {
            pid: "10.5281/zenodo.3490396".to_string(),
            metadata: None,
            data: vec![
                DataItem {
                    source: "soil.csv".to_string(),
                    media_type: Some("text/csv".to_string()),
                },
                DataItem {
                    source: "soil.csv".to_string(),
                    media_type: Some("text/plain".to_string()),
                },
            ],
            services: vec![Service {
                name: "zenodo".to_string(),
                protocol: "oai-pmh".to_string(),
                endpoint: "https://zenodo.org/oai2d".to_string(),
                capacities: vec!["GetRecord".to_string()],
            }],
        };
        let rdp = record.into_rdp();
        assert!(rdp.metadata().is_none());
        assert_eq!(rdp.data().len(), 1);
        assert_eq!(
            rdp.data().get("soil.csv").and_then(|item| item.media_type.as_deref()),
            Some("text/plain")
        );
        assert!(rdp.services().has("zenodo"));
    }

    #[test]
    fn bundle_put_replaces_in_place() {
        let mut bundle = Bundle::new();
        bundle.put("a", 1);
        bundle.put("b", 2);
        bundle.put("a", 3);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get("a"), Some(&3));
        let keys: Vec<&str> = bundle.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
