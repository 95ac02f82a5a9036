/*!
 * Glossary data and lookups.
 *
 * - `model`: glossary records, term occurrences and marker ids
 * - `store`: the `GlossaryStore` trait and its backends
 * - `matcher`: word-boundary term matching with overlap resolution
 * - `stats`: read-only statistics and term lookup
 * - `import`: conversion of spreadsheet-style rows into terms
 */

pub mod import;
pub mod matcher;
pub mod model;
pub mod stats;
pub mod store;

pub use import::{GlossaryImporter, GlossaryRow, ImportReport};
pub use matcher::{PatternCache, TermMatcher};
pub use model::{GlossaryTerm, MarkerId, OffsetMap, TermOccurrence};
pub use stats::{GlossaryStats, StatsService, TermInfo};
pub use store::{GlossaryStore, InMemoryGlossaryStore, JsonGlossaryStore};
