pub mod mutation;
pub mod query;

pub use mutation::{Mutation, NewContact};
pub use query::Query;
