pub mod abbreviation;
pub mod catalog;
pub mod gate;
pub mod lexicon;
pub mod matcher;
pub mod normalize;
pub mod rank;
pub mod script;

pub use catalog::{CatalogItem, Level};
pub use gate::{GateDecision, GateQuery, GateReason, RelevanceGate};
pub use normalize::{NormalizedQuery, QueryNormalizer};
