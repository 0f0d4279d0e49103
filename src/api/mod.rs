pub mod extract;
pub mod format;
pub mod pagination;

pub use extract::JsonBody;
pub use pagination::{paginate, PageQuery, QUESTIONS_PER_PAGE};
