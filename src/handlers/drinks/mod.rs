pub mod list;
pub mod record;

// Re-export handler functions for use in routing
pub use list::short as drinks_get;
pub use list::detail as drinks_detail_get;

pub use record::post as drink_post;
pub use record::patch as drink_patch;
pub use record::delete as drink_delete;
