pub mod mutation;
pub mod query;

pub use mutation::{Mutation, NewScore};
pub use query::Query;
