//! Contract interface descriptions and their text rendering
//!
//! The lookup service hands back a JSON ABI; `types` decodes it into an ordered
//! list of entries and `formatter` turns the callable ones into the compact
//! signature listing that gets embedded in the summary prompt.

pub mod formatter;
pub mod types;

pub use formatter::{AbiFormatter, NO_FUNCTIONS_SENTINEL};
pub use types::{AbiEntry, AbiParam, ContractInterface, EntryKind};
