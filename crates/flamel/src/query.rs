//! Query building.
//!
//! [`SqlBuilder`] renders individual SQL fragments; [`Query`] strings them
//! together with bound parameters and hands the result to an executor.

pub mod builder;
pub mod fluent;

pub use builder::{Direction, Filters, JoinKind, SqlBuilder};
pub use fluent::Query;
