//! redb table definitions for the persistent store.

use redb::TableDefinition;

/// Every tuple, keyed by its absolute path. Values are UTF-8 documents.
pub const TUPLES: TableDefinition<&str, &str> = TableDefinition::new("tuples");
