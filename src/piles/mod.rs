//! Pile system for card locations.
//!
//! The table layout is fixed: 4 foundations, 7 tableau columns, the stock
//! and the talon. `Table` owns every card and pile and is the only place
//! where cards change pile.
//!
//! ## Key Types
//!
//! - `PileId`: Fixed pile identifier with its `Section`
//! - `Pile`: Ordered card ids, bottom to top, plus the `waiting` flag
//! - `Table`: Card storage, pile storage and the owner index between them
//! - `TableSnapshot`: Comparable, serializable capture of a table

pub mod pile;
pub mod snapshot;
pub mod table;

pub use pile::{Pile, PileId, Section, FOUNDATION_COUNT, PILE_COUNT, TABLEAU_COUNT};
pub use snapshot::TableSnapshot;
pub use table::{Census, Table};
