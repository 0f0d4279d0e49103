pub mod categories;
pub mod questions;
pub mod quizzes;
pub mod search;

// Re-export handler functions for use in routing
pub use categories::list as categories_get;
pub use categories::questions as category_questions_get;

pub use questions::list as questions_get;
pub use questions::create as questions_post;
pub use questions::delete as question_delete;

pub use search::post as search_post;
pub use quizzes::post as quizzes_post;
