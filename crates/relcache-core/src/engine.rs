//! The two primitives exposed to consumers: [`normalize`] merges a nested
//! payload into a cache, [`get`] reads a denormalized view back out.

mod clean;

mod normalize;
pub use normalize::normalize;

mod resolve;
pub use resolve::get;
