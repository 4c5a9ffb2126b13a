use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::error::{DocumentError, LedgerError};
use super::ledger::{EvmLedger, Ledger};
use super::pinning::{PinataClient, PinningStore};
use super::types::{DocumentRecord, Network};
use crate::config::{AppConfig, ChainConfig, ConfigError, Secrets};

/// Document lookups across the pinning provider and both chains.
///
/// `ethereum` is the authoritative registry: a document it does not know is
/// reported as not found, whatever the mirror says.
pub struct DocumentService {
    pinning: Arc<dyn PinningStore>,
    ethereum: Arc<dyn Ledger>,
    base: Arc<dyn Ledger>,
}

impl DocumentService {
    pub fn new(
        pinning: Arc<dyn PinningStore>,
        ethereum: Arc<dyn Ledger>,
        base: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            pinning,
            ethereum,
            base,
        }
    }

    pub fn from_config(config: &AppConfig, secrets: &Secrets) -> Result<Self, ConfigError> {
        let timeout: Duration = config.request_timeout();
        let pinning = PinataClient::new(&config.pinning.api_url, &secrets.pinning_jwt, timeout)?;

        let chain = |cfg: &ChainConfig| {
            EvmLedger::new(cfg, timeout).map_err(|e| ConfigError::Invalid {
                key: "chains",
                reason: e.to_string(),
            })
        };
        let ethereum = chain(&config.chains.ethereum)?;
        let base = chain(&config.chains.base)?;

        Ok(Self::new(
            Arc::new(pinning),
            Arc::new(ethereum),
            Arc::new(base),
        ))
    }

    /// Fetch a registered document with its on-chain presence flags.
    pub async fn get_document(
        &self,
        network: Network,
        cid: &str,
    ) -> Result<DocumentRecord, DocumentError> {
        let cid = cid.trim();
        if cid.is_empty() {
            return Err(DocumentError::InvalidRequest("CID must not be empty".into()));
        }

        let (on_ethereum, on_base) = tokio::join!(
            self.ethereum.document_exists(cid),
            self.base.document_exists(cid)
        );
        let is_exist_ethereum = presence(self.ethereum.chain(), cid, on_ethereum);
        let is_exist_base = presence(self.base.chain(), cid, on_base);

        if !is_exist_ethereum {
            return Err(DocumentError::NotFound(cid.to_string()));
        }

        let file = self
            .pinning
            .find_file(network, cid)
            .await?
            .ok_or_else(|| DocumentError::NotFound(cid.to_string()))?;

        tracing::debug!(
            "[DOCS] {} found on {} network (base: {})",
            cid,
            network,
            is_exist_base
        );

        Ok(DocumentRecord {
            file,
            is_exist_ethereum,
            is_exist_base,
        })
    }

    pub async fn list_files(
        &self,
        network: Network,
        group_id: Option<&str>,
    ) -> Result<Value, DocumentError> {
        let group_id = group_id.map(str::trim).filter(|g| !g.is_empty());
        self.pinning.list_files(network, group_id).await
    }

    pub async fn list_groups(&self, network: Network) -> Result<Value, DocumentError> {
        self.pinning.list_groups(network).await
    }

    pub async fn create_group(&self, network: Network, name: &str) -> Result<Value, DocumentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocumentError::InvalidRequest(
                "groupName must not be empty".into(),
            ));
        }
        let created = self.pinning.create_group(network, name).await?;
        tracing::info!("[DOCS] created group '{}' on {} network", name, network);
        Ok(created)
    }
}

/// A failed chain read counts as "not registered".
fn presence(chain: &str, cid: &str, result: Result<bool, LedgerError>) -> bool {
    result.unwrap_or_else(|e| {
        tracing::warn!("[LEDGER] {} read for {} failed, assuming absent: {}", chain, cid, e);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::ledger::MockLedger;
    use async_trait::async_trait;
    use serde_json::{Map, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubPinning {
        files: Vec<Map<String, Value>>,
        created: Mutex<Vec<String>>,
    }

    impl StubPinning {
        fn with_file(cid: &str) -> Self {
            let mut file = Map::new();
            file.insert("cid".into(), json!(cid));
            file.insert("name".into(), json!("deed.pdf"));
            Self {
                files: vec![file],
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl PinningStore for StubPinning {
        async fn find_file(
            &self,
            _network: Network,
            cid: &str,
        ) -> Result<Option<Map<String, Value>>, DocumentError> {
            Ok(self.files.iter().find(|f| f["cid"] == cid).cloned())
        }

        async fn list_files(
            &self,
            _network: Network,
            group_id: Option<&str>,
        ) -> Result<Value, DocumentError> {
            Ok(json!({ "group": group_id }))
        }

        async fn list_groups(&self, network: Network) -> Result<Value, DocumentError> {
            Ok(json!({ "network": network }))
        }

        async fn create_group(
            &self,
            _network: Network,
            name: &str,
        ) -> Result<Value, DocumentError> {
            self.created.lock().unwrap().push(name.to_string());
            Ok(json!({ "name": name }))
        }
    }

    fn service(pinning: StubPinning, ethereum: MockLedger, base: MockLedger) -> DocumentService {
        DocumentService::new(Arc::new(pinning), Arc::new(ethereum), Arc::new(base))
    }

    #[tokio::test]
    async fn test_document_on_both_chains() {
        let svc = service(
            StubPinning::with_file("bafy1"),
            MockLedger::new("holesky").with_document("bafy1"),
            MockLedger::new("base-sepolia").with_document("bafy1"),
        );

        let record = svc.get_document(Network::Private, "bafy1").await.unwrap();
        assert_eq!(record.file["name"], "deed.pdf");
        assert!(record.is_exist_ethereum);
        assert!(record.is_exist_base);
    }

    #[tokio::test]
    async fn test_absent_on_authoritative_chain_is_not_found() {
        let svc = service(
            StubPinning::with_file("bafy1"),
            MockLedger::new("holesky"),
            MockLedger::new("base-sepolia").with_document("bafy1"),
        );

        let err = svc.get_document(Network::Private, "bafy1").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(cid) if cid == "bafy1"));
    }

    #[tokio::test]
    async fn test_mirror_failure_degrades_to_false() {
        let svc = service(
            StubPinning::with_file("bafy1"),
            MockLedger::new("holesky").with_document("bafy1"),
            MockLedger::new("base-sepolia").unreachable(),
        );

        let record = svc.get_document(Network::Public, "bafy1").await.unwrap();
        assert!(record.is_exist_ethereum);
        assert!(!record.is_exist_base);
    }

    #[tokio::test]
    async fn test_authoritative_failure_is_not_found() {
        let svc = service(
            StubPinning::with_file("bafy1"),
            MockLedger::new("holesky").unreachable(),
            MockLedger::new("base-sepolia").with_document("bafy1"),
        );

        assert!(matches!(
            svc.get_document(Network::Public, "bafy1").await,
            Err(DocumentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_registered_but_not_pinned() {
        let svc = service(
            StubPinning::default(),
            MockLedger::new("holesky").with_document("bafy1"),
            MockLedger::new("base-sepolia"),
        );

        assert!(matches!(
            svc.get_document(Network::Private, "bafy1").await,
            Err(DocumentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_group_filter_dropped() {
        let svc = service(
            StubPinning::default(),
            MockLedger::new("holesky"),
            MockLedger::new("base-sepolia"),
        );

        let listing = svc.list_files(Network::Public, Some("  ")).await.unwrap();
        assert_eq!(listing, json!({ "group": null }));
    }

    #[tokio::test]
    async fn test_create_group_trims_and_rejects_blank() {
        let pinning = Arc::new(StubPinning::default());
        let svc = DocumentService::new(
            pinning.clone(),
            Arc::new(MockLedger::new("holesky")),
            Arc::new(MockLedger::new("base-sepolia")),
        );

        assert!(matches!(
            svc.create_group(Network::Public, "   ").await,
            Err(DocumentError::InvalidRequest(_))
        ));
        svc.create_group(Network::Public, " invoices ").await.unwrap();
        assert_eq!(*pinning.created.lock().unwrap(), vec!["invoices".to_string()]);
    }
}
