pub mod answer_query;

pub use answer_query::AnswerQueryUseCase;
