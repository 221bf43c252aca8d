//! Data model shared by every analysis step.
//!
//! - `listing` - listing records and their categorical columns
//! - `effect` - per-zip random intercepts
//! - `coefficient` - regression summary rows

pub mod coefficient;
pub mod effect;
pub mod listing;

pub use coefficient::CoefficientRow;
pub use effect::RandomEffectEstimate;
pub use listing::{ListingRecord, ObjectType, ROOM_ORDER, Rooms};
