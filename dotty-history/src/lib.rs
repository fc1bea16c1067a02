pub mod normalize;
pub mod render;
pub mod store;

pub use normalize::{Normalize, TooltipNormalizer};
pub use render::{AlertCounts, Badge, BadgeColor, Graphviz, RenderError};
pub use store::{Cursor, IngestError, Ingested, Snapshot, VersionStore};
