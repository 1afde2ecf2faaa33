pub mod mutation;
pub mod query;

pub use mutation::{Mutation, QuestionDraft, QuizMeta};
pub use query::{DiscoverFilter, Query, Sort};
