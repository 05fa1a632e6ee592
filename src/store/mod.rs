mod memory;
mod sqlite;
pub mod traits;

pub use memory::InMemoryGraphStore;
pub use sqlite::SqliteGraphStore;
pub use traits::{DefinitionStore, RecordStore, StoreFuture};
