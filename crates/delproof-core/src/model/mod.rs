pub mod commitment;
pub mod metadata;
pub mod receipt;
pub mod record;
pub mod state;
pub mod token;

pub use commitment::Commitment;
pub use metadata::ObjectMetadata;
pub use receipt::ReceiptData;
pub use record::DeletionRecord;
pub use state::WorkflowState;
pub use token::TimestampToken;
