use axum::extract::State;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::format::question_to_api_value;
use crate::api::JsonBody;
use crate::app::AppState;
use crate::database::models::Question;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Category id meaning "no category filter"
pub const ALL_CATEGORIES: i32 = 0;

#[derive(Debug, Default, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Option<Vec<i32>>,
    /// Kept untyped so a malformed category is reported as 405, not a body error
    #[serde(default)]
    pub quiz_category: Value,
}

/// Integer `id` of a `{ "id": ... }` quiz category.
/// Accepts integers, floats (truncated) and numeric strings.
pub fn quiz_category_id(quiz_category: &Value) -> Option<i32> {
    let id = quiz_category.as_object()?.get("id")?;
    let id = match id {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(id).ok()
}

/// Uniform pick over the candidates
pub fn pick_question<'a, R: Rng + ?Sized>(candidates: &'a [Question], rng: &mut R) -> Option<&'a Question> {
    if candidates.is_empty() {
        return None;
    }
    Some(&candidates[rng.gen_range(0..candidates.len())])
}

/// POST /quizzes - a random question not yet asked, optionally from one category
pub async fn post(State(state): State<AppState>, JsonBody(request): JsonBody<QuizRequest>) -> ApiResult<Value> {
    let category_id = quiz_category_id(&request.quiz_category)
        .ok_or_else(|| ApiError::method_not_allowed(format!("malformed quiz_category: {}", request.quiz_category)))?;

    let previous = request.previous_questions.unwrap_or_default();
    let category = (category_id != ALL_CATEGORIES).then_some(category_id);

    let candidates = state
        .store
        .quiz_candidates(category, &previous)
        .await
        .map_err(ApiError::unprocessable_from)?;

    let question = {
        let mut rng = rand::thread_rng();
        pick_question(&candidates, &mut rng).cloned()
    };

    let question = question.ok_or_else(|| {
        ApiError::not_found(format!(
            "no questions left in category {} after {} previous",
            category_id,
            previous.len()
        ))
    })?;

    Ok(ApiResponse::success(json!({
        "question": question_to_api_value(&question),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn question(id: i32) -> Question {
        Question {
            id,
            question: format!("Q{}", id),
            answer: "A".to_string(),
            category: 1,
            difficulty: 1,
        }
    }

    #[test]
    fn coerces_category_id() {
        assert_eq!(quiz_category_id(&json!({ "id": 0 })), Some(0));
        assert_eq!(quiz_category_id(&json!({ "id": "3", "type": "Geography" })), Some(3));
        assert_eq!(quiz_category_id(&json!({ "id": 2.9 })), Some(2));
    }

    #[test]
    fn rejects_malformed_category() {
        assert_eq!(quiz_category_id(&json!("Science")), None);
        assert_eq!(quiz_category_id(&json!({ "type": "Science" })), None);
        assert_eq!(quiz_category_id(&json!({ "id": "Science" })), None);
        assert_eq!(quiz_category_id(&json!({ "id": null })), None);
        assert_eq!(quiz_category_id(&json!({ "id": 1e12 })), None);
        assert_eq!(quiz_category_id(&Value::Null), None);
    }

    #[test]
    fn picks_only_from_candidates() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates: Vec<Question> = (1..=5).map(question).collect();
        for _ in 0..50 {
            let picked = pick_question(&candidates, &mut rng).unwrap();
            assert!((1..=5).contains(&picked.id));
        }
        assert!(pick_question(&[], &mut rng).is_none());
    }

    #[test]
    fn pick_reaches_every_candidate() {
        let mut rng = StdRng::seed_from_u64(42);
        let candidates: Vec<Question> = (1..=3).map(question).collect();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_question(&candidates, &mut rng).unwrap().id);
        }
        assert_eq!(seen.len(), 3);
    }
}
