pub mod commitment;
pub mod receipt;

pub use commitment::{canonical_string, commit};
pub use receipt::{assemble, render_text};
