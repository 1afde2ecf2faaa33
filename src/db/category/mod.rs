pub mod mutation;
pub mod query;

pub use mutation::{slugify, Mutation};
pub use query::Query;
