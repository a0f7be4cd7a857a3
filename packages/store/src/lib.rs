pub mod config;
pub mod digest;
pub mod error;
pub mod models;
pub mod repo;
pub mod webhook;

mod memory;
pub use memory::MemoryStore;

pub use config::{DirectoryConfig, StoreConfig, SyncConfig, WebhookConfig};
pub use digest::SnapshotDigest;
pub use error::{ConfigError, StoreError, TransportError};
pub use models::{
    ChangeEvent, ChangeKind, Employee, EmployeeDraft, EmployeeField, EmployeeId, EmployeePatch,
};
pub use repo::{ChangeFeed, EmployeeStore};
pub use webhook::{Dispatched, EmailRequest, EmailTrigger};
