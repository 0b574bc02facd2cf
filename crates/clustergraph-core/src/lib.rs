pub mod attributes;
pub mod codec;
pub mod config;
pub mod error;
pub mod inventory;
pub mod records;
pub mod traits;
pub mod types;
pub mod wildcard;

pub use attributes::*;
pub use codec::{TabularRecord, DELIMITER};
pub use config::{
    CollectionConfig, CredentialsConfig, LoggingConfig, Settings, SnapshotConfig,
};
pub use error::*;
pub use inventory::*;
pub use records::*;
pub use traits::*;
pub use types::*;
pub use wildcard::{in_any, TagFilter};
