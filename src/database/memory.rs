use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, Drink, DrinkChanges, NewDrink, NewQuestion, Question};
use crate::database::seed;
use crate::database::store::Store;

/// Matches the VARCHAR(80) drink title column
const MAX_TITLE_LEN: usize = 80;

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    questions: BTreeMap<i32, Question>,
    drinks: BTreeMap<i32, Drink>,
    next_question_id: i32,
    next_drink_id: i32,
}

/// In-process `Store` enforcing the same constraints as the SQL schema.
///
/// BTreeMap keys keep every listing ordered by id.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_question_id: 1,
                next_drink_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Store pre-loaded with the seed categories, questions and drinks
    pub fn seeded() -> Self {
        let mut tables = Tables {
            next_question_id: 1,
            next_drink_id: 1,
            ..Default::default()
        };

        for (idx, label) in seed::CATEGORIES.iter().enumerate() {
            let id = idx as i32 + 1;
            tables.categories.insert(id, Category::new(id, *label));
        }
        for s in seed::QUESTIONS {
            let id = tables.next_question_id;
            tables.next_question_id += 1;
            tables.questions.insert(
                id,
                Question {
                    id,
                    question: s.question.to_string(),
                    answer: s.answer.to_string(),
                    category: s.category,
                    difficulty: s.difficulty,
                },
            );
        }
        for (title, recipe) in seed::default_drinks() {
            let id = tables.next_drink_id;
            tables.next_drink_id += 1;
            tables.drinks.insert(id, Drink { id, title: title.to_string(), recipe });
        }

        Self { tables: RwLock::new(tables) }
    }

    /// Register a category; the HTTP surface never creates them
    pub async fn add_category(&self, id: i32, kind: &str) {
        self.tables.write().await.categories.insert(id, Category::new(id, kind));
    }
}

fn required<T>(value: Option<T>, column: &str) -> Result<T, DatabaseError> {
    value.ok_or_else(|| {
        DatabaseError::Constraint(format!("null value in column \"{}\" violates not-null constraint", column))
    })
}

impl Tables {
    fn check_title(&self, title: &str, except: Option<i32>) -> Result<(), DatabaseError> {
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DatabaseError::Constraint(format!(
                "title longer than {} characters",
                MAX_TITLE_LEN
            )));
        }
        let taken = self
            .drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except);
        if taken {
            return Err(DatabaseError::Constraint(format!(
                "duplicate key value violates unique constraint: title '{}'",
                title
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, DatabaseError> {
        Ok(self.tables.read().await.questions.values().cloned().collect())
    }

    async fn find_question(&self, id: i32) -> Result<Option<Question>, DatabaseError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn insert_question(&self, new: NewQuestion) -> Result<Question, DatabaseError> {
        let mut tables = self.tables.write().await;

        let difficulty = required(new.difficulty()?, "difficulty")?;
        let category = required(new.category()?, "category")?;
        let question = required(new.question, "question")?;
        let answer = required(new.answer, "answer")?;
        if !tables.categories.contains_key(&category) {
            return Err(DatabaseError::Constraint(format!(
                "insert on table \"questions\" violates foreign key constraint: category {} is not present",
                category
            )));
        }

        let id = tables.next_question_id;
        tables.next_question_id += 1;
        let row = Question { id, question, answer, category, difficulty };
        tables.questions.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_question(&self, id: i32) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("question {}", id)))
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, DatabaseError> {
        let needle = term.to_lowercase();
        Ok(self
            .tables
            .read()
            .await
            .questions
            .values()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn questions_in_category(&self, category: i32) -> Result<Vec<Question>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .questions
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn quiz_candidates(
        &self,
        category: Option<i32>,
        exclude: &[i32],
    ) -> Result<Vec<Question>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .questions
            .values()
            .filter(|q| !exclude.contains(&q.id))
            .filter(|q| category.map_or(true, |c| q.category == c))
            .cloned()
            .collect())
    }

    async fn list_drinks(&self) -> Result<Vec<Drink>, DatabaseError> {
        Ok(self.tables.read().await.drinks.values().cloned().collect())
    }

    async fn find_drink(&self, id: i32) -> Result<Option<Drink>, DatabaseError> {
        Ok(self.tables.read().await.drinks.get(&id).cloned())
    }

    async fn insert_drink(&self, new: NewDrink) -> Result<Drink, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_title(&new.title, None)?;

        let id = tables.next_drink_id;
        tables.next_drink_id += 1;
        let drink = Drink { id, title: new.title, recipe: new.recipe };
        tables.drinks.insert(id, drink.clone());
        Ok(drink)
    }

    async fn update_drink(&self, id: i32, changes: DrinkChanges) -> Result<Drink, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.drinks.contains_key(&id) {
            return Err(DatabaseError::NotFound(format!("drink {}", id)));
        }
        if let Some(title) = &changes.title {
            tables.check_title(title, Some(id))?;
        }

        let drink = tables
            .drinks
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("drink {}", id)))?;
        if let Some(title) = changes.title {
            drink.title = title;
        }
        if let Some(recipe) = changes.recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    async fn delete_drink(&self, id: i32) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .drinks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("drink {}", id)))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Ingredient, Recipe};
    use serde_json::json;

    fn recipe(name: &str) -> Recipe {
        Recipe(vec![Ingredient { name: name.to_string(), color: "brown".to_string(), parts: 1 }])
    }

    #[tokio::test]
    async fn seeded_store_orders_by_id() {
        let store = MemoryStore::seeded();
        let categories = store.list_categories().await.unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].kind, "Science");

        let questions = store.list_questions().await.unwrap();
        assert_eq!(questions.len(), seed::QUESTIONS.len());
        assert!(questions.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn insert_question_enforces_constraints() {
        let store = MemoryStore::seeded();

        let missing = NewQuestion { question: Some("Q?".into()), ..Default::default() };
        assert!(matches!(store.insert_question(missing).await, Err(DatabaseError::Constraint(_))));

        let bad_category = NewQuestion {
            question: Some("Q?".into()),
            answer: Some("A".into()),
            difficulty: Some(json!(1)),
            category: Some(json!(10)),
        };
        assert!(matches!(
            store.insert_question(bad_category).await,
            Err(DatabaseError::Constraint(_))
        ));

        let ok = NewQuestion {
            question: Some("Q?".into()),
            answer: Some("A".into()),
            difficulty: Some(json!("1")),
            category: Some(json!(1)),
        };
        let created = store.insert_question(ok).await.unwrap();
        assert_eq!(created.id as usize, seed::QUESTIONS.len() + 1);
    }

    #[tokio::test]
    async fn delete_question_twice_reports_not_found() {
        let store = MemoryStore::seeded();
        store.delete_question(1).await.unwrap();
        assert!(matches!(store.delete_question(1).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_literal() {
        let store = MemoryStore::seeded();
        let hits = store.search_questions("what").await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|q| q.question.to_lowercase().contains("what")));
        assert!(store.search_questions("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quiz_candidates_filters_category_and_exclusions() {
        let store = MemoryStore::seeded();
        let science = store.quiz_candidates(Some(1), &[]).await.unwrap();
        assert!(science.iter().all(|q| q.category == 1));

        let first = science[0].id;
        let rest = store.quiz_candidates(Some(1), &[first]).await.unwrap();
        assert_eq!(rest.len(), science.len() - 1);

        let all_ids: Vec<i32> = (0..30).collect();
        assert!(store.quiz_candidates(None, &all_ids).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn drink_titles_are_unique() {
        let store = MemoryStore::seeded();
        let dup = NewDrink { title: "water".to_string(), recipe: recipe("water") };
        assert!(matches!(store.insert_drink(dup).await, Err(DatabaseError::Constraint(_))));

        let latte = store
            .insert_drink(NewDrink { title: "latte".to_string(), recipe: recipe("espresso") })
            .await
            .unwrap();
        let rename = DrinkChanges { title: Some("water".to_string()), recipe: None };
        assert!(matches!(
            store.update_drink(latte.id, rename).await,
            Err(DatabaseError::Constraint(_))
        ));

        let keep_title = DrinkChanges { title: Some("latte".to_string()), recipe: Some(recipe("milk")) };
        let updated = store.update_drink(latte.id, keep_title).await.unwrap();
        assert_eq!(updated.recipe.ingredients()[0].name, "milk");
    }

    #[tokio::test]
    async fn update_and_delete_missing_drink() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.update_drink(7, DrinkChanges::default()).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(store.delete_drink(7).await, Err(DatabaseError::NotFound(_))));
    }
}
