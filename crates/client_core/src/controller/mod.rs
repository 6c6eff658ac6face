//! Controller layer: one controller per screen instance, each owning its own
//! fetch-by-identifier logic and state.

pub mod clause;
pub mod errors;
pub mod results;
pub mod retrieval;
pub mod upload;
