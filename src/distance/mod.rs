//! Distance matrix and candidate lists.
//!
//! Provides the precomputed integer distance table and the k-nearest
//! neighbor lists that bound local search neighborhoods.

mod candidates;
mod matrix;

pub use candidates::CandidateLists;
pub use matrix::DistanceMatrix;
