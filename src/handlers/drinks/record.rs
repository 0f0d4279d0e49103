use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::format::{drink_to_api_value, DrinkProjection};
use crate::api::JsonBody;
use crate::app::AppState;
use crate::database::manager::DatabaseError;
use crate::database::models::{DrinkChanges, NewDrink, Recipe};
use crate::error::ApiError;
use crate::handlers::route_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Default, Deserialize)]
pub struct DrinkPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Value>,
}

fn parse_title(title: String) -> Result<String, ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title is blank"));
    }
    Ok(title)
}

fn parse_recipe(recipe: &Value) -> Result<Recipe, ApiError> {
    Recipe::parse(recipe).map_err(|e| ApiError::bad_request(e.to_string()))
}

fn drink_id(raw: &str) -> Result<i32, ApiError> {
    route_id(raw).ok_or_else(|| ApiError::unprocessable(format!("drink id '{}' is not an integer", raw)))
}

/// 404 for a missing drink, 422 for anything else the store reports
fn map_store_error(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::NotFound(msg) => ApiError::not_found(msg),
        other => ApiError::unprocessable_from(other),
    }
}

/// POST /drinks - requires `post:drinks`
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<DrinkPayload>,
) -> ApiResult<Value> {
    let (Some(title), Some(recipe)) = (payload.title, payload.recipe) else {
        return Err(ApiError::bad_request("title and recipe are required"));
    };
    let new = NewDrink {
        title: parse_title(title)?,
        recipe: parse_recipe(&recipe)?,
    };

    let drink = state
        .store
        .insert_drink(new)
        .await
        .map_err(ApiError::unprocessable_from)?;

    tracing::info!("'{}' created drink {} ({})", user.subject, drink.id, drink.title);

    Ok(ApiResponse::success(json!({
        "drinks": [drink_to_api_value(&drink, DrinkProjection::Long)],
    })))
}

/// PATCH /drinks/:id - requires `patch:drinks`
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<DrinkPayload>,
) -> ApiResult<Value> {
    let changes = DrinkChanges {
        title: payload.title.map(parse_title).transpose()?,
        recipe: payload.recipe.as_ref().map(parse_recipe).transpose()?,
    };
    if changes.is_empty() {
        return Err(ApiError::bad_request("title or recipe is required"));
    }
    let drink_id = drink_id(&id)?;

    let drink = state
        .store
        .update_drink(drink_id, changes)
        .await
        .map_err(map_store_error)?;

    tracing::info!("'{}' updated drink {}", user.subject, drink.id);

    Ok(ApiResponse::success(json!({
        "drinks": [drink_to_api_value(&drink, DrinkProjection::Long)],
    })))
}

/// DELETE /drinks/:id - requires `delete:drinks`; echoes the id as given
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let drink_id = drink_id(&id)?;

    state
        .store
        .delete_drink(drink_id)
        .await
        .map_err(map_store_error)?;

    tracing::info!("'{}' deleted drink {}", user.subject, drink_id);

    Ok(ApiResponse::success(json!({
        "delete": id,
    })))
}
