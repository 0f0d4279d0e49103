use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Category, Drink, DrinkChanges, Ingredient, NewDrink, NewQuestion, Question, Recipe,
};
use crate::database::store::Store;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

#[derive(FromRow)]
struct DrinkRow {
    id: i32,
    title: String,
    recipe: Json<Vec<Ingredient>>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: Recipe(row.recipe.0),
        }
    }
}

/// `Store` backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl Store for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>("SELECT id, type FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, DatabaseError> {
        let sql = format!("SELECT {} FROM questions ORDER BY id", QUESTION_COLUMNS);
        let rows = sqlx::query_as::<_, Question>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_question(&self, id: i32) -> Result<Option<Question>, DatabaseError> {
        let sql = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);
        let row = sqlx::query_as::<_, Question>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_question(&self, new: NewQuestion) -> Result<Question, DatabaseError> {
        let difficulty = new.difficulty()?;
        let category = new.category()?;
        let sql = format!(
            "INSERT INTO questions (question, answer, difficulty, category) VALUES ($1, $2, $3, $4) RETURNING {}",
            QUESTION_COLUMNS
        );
        let row = sqlx::query_as::<_, Question>(&sql)
            .bind(new.question)
            .bind(new.answer)
            .bind(difficulty)
            .bind(category)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_question(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("question {}", id)));
        }
        Ok(())
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM questions WHERE question ILIKE $1 ORDER BY id",
            QUESTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Question>(&sql)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn questions_in_category(&self, category: i32) -> Result<Vec<Question>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM questions WHERE category = $1 ORDER BY id",
            QUESTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Question>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn quiz_candidates(
        &self,
        category: Option<i32>,
        exclude: &[i32],
    ) -> Result<Vec<Question>, DatabaseError> {
        // NULL category means every category
        let sql = format!(
            "SELECT {} FROM questions \
             WHERE NOT (id = ANY($1)) AND ($2::INTEGER IS NULL OR category = $2) \
             ORDER BY id",
            QUESTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Question>(&sql)
            .bind(exclude)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_drinks(&self) -> Result<Vec<Drink>, DatabaseError> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Drink::from).collect())
    }

    async fn find_drink(&self, id: i32) -> Result<Option<Drink>, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Drink::from))
    }

    async fn insert_drink(&self, new: NewDrink) -> Result<Drink, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(new.title)
        .bind(Json(new.recipe.0))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_drink(&self, id: i32, changes: DrinkChanges) -> Result<Drink, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "UPDATE drinks SET title = COALESCE($2, title), recipe = COALESCE($3, recipe) \
             WHERE id = $1 RETURNING id, title, recipe",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.recipe.map(|r| Json(r.0)))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Drink::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("drink {}", id)))
    }

    async fn delete_drink(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("drink {}", id)));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
