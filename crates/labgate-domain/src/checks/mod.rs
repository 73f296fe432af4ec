//! Reusable check families. Each type implements [`Rule`](crate::Rule) and is
//! configured with explicit, named edge-case parameters.

mod anchor;
mod capacity;
mod containment;
mod layers;
mod limit;
mod ordering;
mod presence;
mod sets;
mod threshold;
mod utils;
mod vocabulary;


pub use anchor::{Anchor, AnchorPresence};
pub use capacity::Capacity;
pub use containment::{Containment, EmptyPrefixes, MatchMode};
pub use layers::{ColumnsPresent, Layer, LayeredKeys, LayeredRowCounts, layers};
pub use limit::{Limit, Quantity};
pub use ordering::{CanonicalOrder, KnownElements, RequiredElements, TerminalElement};
pub use presence::{EveryItemHas, NonEmpty, PlanEntries, RowCountsMatch, Shape, TablesPresent};
pub use sets::{KeyConsistency, Keys};
pub use threshold::{Bound, Bounds, DeltaThreshold, DeriveFn, Num, Relation};
pub use utils::{fmt_number, guarded_ratio, is_truthy, join, number_metric};
pub use vocabulary::Vocabulary;
