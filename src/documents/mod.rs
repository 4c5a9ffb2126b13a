//! Document gateway.
//!
//! Thin service over two collaborators: the pinning provider that stores
//! file records, and the registry contracts on Ethereum (authoritative) and
//! Base (mirror) that say whether a CID was anchored.

pub mod error;
pub mod handlers;
pub mod ledger;
pub mod pinning;
pub mod service;
pub mod types;

pub use error::{DocumentError, LedgerError};
pub use ledger::{EvmLedger, Ledger, MockLedger};
pub use pinning::{PinataClient, PinningStore};
pub use service::DocumentService;
pub use types::{CreateGroupRequest, DocumentRecord, ListFilesQuery, Network, NetworkQuery};
