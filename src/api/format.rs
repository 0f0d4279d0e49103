use serde_json::{json, Value};

use crate::database::models::{Category, Drink, Question};

/// Which drink fields a response exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkProjection {
    /// id and title only
    Short,
    /// id, title and full recipe
    Long,
}

/// Public wire format for a question: { id, question, answer, category, difficulty }
pub fn question_to_api_value(question: &Question) -> Value {
    json!({
        "id": question.id,
        "question": question.question,
        "answer": question.answer,
        "category": question.category,
        "difficulty": question.difficulty,
    })
}

pub fn questions_to_api_values(questions: &[Question]) -> Vec<Value> {
    questions.iter().map(question_to_api_value).collect()
}

/// Category labels in the given order; ids are not exposed
pub fn category_labels(categories: &[Category]) -> Vec<String> {
    categories.iter().map(|c| c.kind.clone()).collect()
}

pub fn drink_to_api_value(drink: &Drink, projection: DrinkProjection) -> Value {
    match projection {
        DrinkProjection::Short => json!({
            "id": drink.id,
            "title": drink.title,
        }),
        DrinkProjection::Long => json!({
            "id": drink.id,
            "title": drink.title,
            "recipe": drink.recipe,
        }),
    }
}

pub fn drinks_to_api_values(drinks: &[Drink], projection: DrinkProjection) -> Vec<Value> {
    drinks
        .iter()
        .map(|d| drink_to_api_value(d, projection))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Ingredient, Recipe};

    fn drink() -> Drink {
        Drink {
            id: 3,
            title: "matcha".to_string(),
            recipe: Recipe(vec![Ingredient {
                name: "matcha".to_string(),
                color: "green".to_string(),
                parts: 1,
            }]),
        }
    }

    #[test]
    fn short_projection_omits_recipe() {
        let v = drink_to_api_value(&drink(), DrinkProjection::Short);
        assert_eq!(v["title"], "matcha");
        assert!(v.get("recipe").is_none());
    }

    #[test]
    fn long_projection_includes_recipe() {
        let v = drink_to_api_value(&drink(), DrinkProjection::Long);
        assert_eq!(v["recipe"][0]["color"], "green");
        assert_eq!(v["recipe"][0]["parts"], 1);
    }

    #[test]
    fn labels_drop_ids() {
        let labels = category_labels(&[Category::new(2, "Art"), Category::new(1, "Science")]);
        assert_eq!(labels, vec!["Art", "Science"]);
    }
}
