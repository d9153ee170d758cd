//! delproof store - object store adapters, credentials and receipt output
//!
//! Provides:
//! - `DriveObjectStore`, a Google Drive v3 implementation of `ObjectStore`
//! - `InMemoryObjectStore` with injectable faults
//! - Bearer token loading wrapped in `Sensitive`
//! - Text and JSON receipt renderers writing atomically to disk

pub mod atomic;
pub mod credentials;
pub mod drive;
pub mod errors;
pub mod memory;
pub mod renderer;

pub use credentials::{load_access_token, parse_access_token};
pub use drive::{DriveObjectStore, DriveSettings, DEFAULT_DRIVE_BASE_URL};
pub use errors::Result;
pub use memory::{CallCounts, InMemoryObjectStore, StoreFaults};
pub use renderer::{JsonReceiptRenderer, TextReceiptRenderer};
