use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::database::manager::DatabaseError;

/// Stored trivia question; its serialized form is the wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

/// Submitted question. Fields are not checked for presence here;
/// the store rejects incomplete rows and unknown categories.
///
/// `difficulty` and `category` are kept as submitted so that numeric strings
/// insert and anything else fails at the store, not at body parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

impl NewQuestion {
    pub fn difficulty(&self) -> Result<Option<i32>, DatabaseError> {
        integer_column(self.difficulty.as_ref(), "difficulty")
    }

    pub fn category(&self) -> Result<Option<i32>, DatabaseError> {
        integer_column(self.category.as_ref(), "category")
    }
}

/// Cast a submitted value to an INTEGER column the way PostgreSQL would:
/// integral numbers and numeric strings pass, anything else is a constraint error
fn integer_column(value: Option<&Value>, column: &str) -> Result<Option<i32>, DatabaseError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    parsed
        .and_then(|n| i32::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| {
            DatabaseError::Constraint(format!(
                "invalid input for integer column \"{}\": {}",
                column,
                value.map(Value::to_string).unwrap_or_default()
            ))
        })
}
