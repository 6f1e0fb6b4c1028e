use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

pub type ServiceId = String;

/// A purchasable catalog entry. Read-only to the engine; prices here are
/// snapshotted into orders at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price: u64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Process-wide service catalog, supplied by static configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: BTreeMap<ServiceId, Service>,
}

impl ServiceCatalog {
    pub fn new(services: impl IntoIterator<Item = Service>) -> Self {
        Self {
            services: services
                .into_iter()
                .map(|service| (service.id.clone(), service))
                .collect(),
        }
    }

    /// Load a catalog from a JSON array of services.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StorageError> {
        let services: Vec<Service> = serde_json::from_reader(reader)?;
        Ok(Self::new(services))
    }

    /// Look up an entry by id, active or not.
    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.get(id)
    }

    /// Look up an entry that can currently be purchased.
    pub fn purchasable(&self, id: &str) -> Option<&Service> {
        self.services.get(id).filter(|service| service.active)
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, price: u64, active: bool) -> Service {
        Service {
            id: id.to_string(),
            name: format!("Service {id}"),
            price,
            active,
        }
    }

    #[test]
    fn test_purchasable_skips_inactive() {
        let catalog = ServiceCatalog::new([service("boost", 50_000, true), service("old", 10_000, false)]);

        assert!(catalog.purchasable("boost").is_some());
        assert!(catalog.purchasable("old").is_none());
        assert!(catalog.get("old").is_some());
        assert!(catalog.purchasable("missing").is_none());
    }

    #[test]
    fn test_from_reader_parses_json_array() {
        let json = r#"[
            {"id": "boost", "name": "Account boost", "price": 50000},
            {"id": "old", "name": "Retired", "price": 10000, "active": false}
        ]"#;
        let catalog = ServiceCatalog::from_reader(json.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        // `active` defaults to true when omitted
        assert!(catalog.purchasable("boost").is_some());
        assert!(catalog.purchasable("old").is_none());
    }

    #[test]
    fn test_from_reader_rejects_malformed_json() {
        assert!(ServiceCatalog::from_reader("{not json".as_bytes()).is_err());
    }
}
