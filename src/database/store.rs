use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, Drink, DrinkChanges, NewDrink, NewQuestion, Question};

/// Persistence operations behind the trivia and drink handlers.
///
/// Listing methods return rows ordered by id ascending.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    async fn find_category(&self, id: i32) -> Result<Option<Category>, DatabaseError>;

    async fn list_questions(&self) -> Result<Vec<Question>, DatabaseError>;

    async fn find_question(&self, id: i32) -> Result<Option<Question>, DatabaseError>;

    async fn insert_question(&self, new: NewQuestion) -> Result<Question, DatabaseError>;

    /// Fails with `NotFound` when no row was removed
    async fn delete_question(&self, id: i32) -> Result<(), DatabaseError>;

    /// Case-insensitive literal substring match on the question text
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, DatabaseError>;

    async fn questions_in_category(&self, category: i32) -> Result<Vec<Question>, DatabaseError>;

    /// Questions not in `exclude`, optionally restricted to one category
    async fn quiz_candidates(
        &self,
        category: Option<i32>,
        exclude: &[i32],
    ) -> Result<Vec<Question>, DatabaseError>;

    async fn list_drinks(&self) -> Result<Vec<Drink>, DatabaseError>;

    async fn find_drink(&self, id: i32) -> Result<Option<Drink>, DatabaseError>;

    async fn insert_drink(&self, new: NewDrink) -> Result<Drink, DatabaseError>;

    /// Fails with `NotFound` when the drink does not exist
    async fn update_drink(&self, id: i32, changes: DrinkChanges) -> Result<Drink, DatabaseError>;

    /// Fails with `NotFound` when no row was removed
    async fn delete_drink(&self, id: i32) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
