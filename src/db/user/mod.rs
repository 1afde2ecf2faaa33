pub mod mutation;
pub mod query;

pub use mutation::{Mutation, NewUser};
pub use query::Query;
