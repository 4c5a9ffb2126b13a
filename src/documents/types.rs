//! Document API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Pinning-provider network a document lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Public,
    Private,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Public => "public",
            Network::Private => "private",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `?network=`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NetworkQuery {
    /// `public` or `private`
    pub network: Network,
}

/// `?network=&groupId=`
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    /// `public` or `private`
    pub network: Network,
    /// Restrict the listing to one group
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Create a pinning group
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub network: Network,
    #[validate(length(min = 1, max = 256, message = "groupName must not be empty"))]
    #[schema(example = "contracts-2024")]
    pub group_name: String,
}

/// File record from the pinning provider plus on-chain presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Provider fields (`id`, `name`, `cid`, `size`, `mime_type`, ...) passed through as-is
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub file: Map<String, Value>,
    /// Registered on the authoritative chain (Ethereum Holesky)
    pub is_exist_ethereum: bool,
    /// Registered on the mirror chain (Base Sepolia)
    pub is_exist_base: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_parse() {
        let q: NetworkQuery = serde_json::from_value(json!({"network": "private"})).unwrap();
        assert_eq!(q.network, Network::Private);
        assert!(serde_json::from_value::<NetworkQuery>(json!({"network": "secret"})).is_err());
        assert_eq!(Network::Public.to_string(), "public");
    }

    #[test]
    fn test_empty_group_name_invalid() {
        let req: CreateGroupRequest =
            serde_json::from_value(json!({"network": "public", "groupName": ""})).unwrap();
        assert!(req.validate().is_err());

        let req: CreateGroupRequest =
            serde_json::from_value(json!({"network": "public", "groupName": "invoices"})).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_record_flattens_provider_fields() {
        let mut file = Map::new();
        file.insert("cid".into(), json!("bafy123"));
        file.insert("mime_type".into(), json!("application/pdf"));
        let record = DocumentRecord {
            file,
            is_exist_ethereum: true,
            is_exist_base: false,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "cid": "bafy123",
                "mime_type": "application/pdf",
                "isExistEthereum": true,
                "isExistBase": false
            })
        );
    }
}
