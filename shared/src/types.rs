//! API request and response types

use crate::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Pagination
// ============================================================================

/// Raw `limit`/`offset` query parameters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Pagination envelope for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    /// Total number of rows, not the page size
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, count: i64, page: Page) -> Self {
        Self {
            data,
            count,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

// ============================================================================
// Users and authentication
// ============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,
    #[validate(length(min = 8, max = 30, message = "Password must be between 8-30 characters"))]
    pub password: String,
}

/// Partial user update (admin only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: Option<String>,
}

/// Token plus the profile it was issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

// ============================================================================
// Beers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBeerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, max = 100.0, message = "Percentage must be between 0 and 100"))]
    pub percentage: f64,
    #[serde(default, alias = "breweryId")]
    pub brewery_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBeerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Percentage must be between 0 and 100"))]
    pub percentage: Option<f64>,
    #[serde(default, alias = "breweryId")]
    pub brewery_id: Option<Uuid>,
}

// ============================================================================
// Breweries
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBreweryRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Country must be between 1-255 characters"))]
    pub country: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBreweryRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Country must be between 1-255 characters"))]
    pub country: Option<String>,
}

// ============================================================================
// Reviews
// ============================================================================

/// New review; the author is always the authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 0, max = 5, message = "Rating must be between 0 and 5"))]
    pub rating: i32,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Description must be between 1-255 characters"
    ))]
    pub description: String,
    /// Defaults to the time of the request
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(alias = "beerId")]
    pub beer_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 0, max = 5, message = "Rating must be between 0 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Description must be between 1-255 characters"
    ))]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, alias = "beerId")]
    pub beer_id: Option<Uuid>,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub pong: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub env: String,
    pub version: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_beer_accepts_camel_case_brewery() {
        let json = r#"{"name":"Duvel","percentage":8.5,"breweryId":"7f28c5f9-d711-4cd6-ac15-d13d71ab0b01"}"#;
        let req: CreateBeerRequest = serde_json::from_str(json).unwrap();
        assert!(req.brewery_id.is_some());
    }

    #[test]
    fn test_create_beer_without_brewery() {
        let req: CreateBeerRequest =
            serde_json::from_str(r#"{"name":"Duvel","percentage":8.5}"#).unwrap();
        assert!(req.brewery_id.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_requests_validate_only_present_fields() {
        let empty = UpdateBeerRequest::default();
        assert!(empty.validate().is_ok());

        let bad = UpdateBeerRequest {
            percentage: Some(150.0),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("percentage"));
    }

    #[test]
    fn test_list_response_keeps_total_count() {
        let page = Page { limit: 2, offset: 1 };
        let list = ListResponse::new(vec![1, 2], 10, page);
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["count"], 10);
        assert_eq!(json["limit"], 2);
        assert_eq!(json["offset"], 1);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }
}
