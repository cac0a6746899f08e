//! Review service
//!
//! The author of a review is always the authenticated caller. Only the
//! author or an admin may change or remove it.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewReview, Repositories, ReviewChanges};
use beer_review_shared::{
    CreateReviewRequest, ListResponse, Page, Review, UpdateReviewRequest,
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

pub struct ReviewService;

impl ReviewService {
    pub async fn get_all(repos: &Repositories, page: Page) -> ApiResult<ListResponse<Review>> {
        debug!(limit = page.limit, offset = page.offset, "Fetching all reviews");
        let data = repos.reviews.find_all(page).await?;
        let count = repos.reviews.count().await?;

        Ok(ListResponse::new(data, count, page))
    }

    pub async fn get_by_id(repos: &Repositories, id: Uuid) -> ApiResult<Review> {
        debug!(%id, "Fetching review");
        repos
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(
        repos: &Repositories,
        author: &AuthUser,
        input: CreateReviewRequest,
    ) -> ApiResult<Review> {
        input.validate()?;
        debug!(
            beer_id = %input.beer_id,
            user_id = %author.user_id,
            rating = input.rating,
            "Creating new review"
        );

        ensure_beer_exists(repos, input.beer_id).await?;
        if repos.users.find_by_id(author.user_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "No user with id {} exists",
                author.user_id
            )));
        }

        let review = repos
            .reviews
            .create(NewReview {
                rating: input.rating,
                description: input.description,
                date: input.date.unwrap_or_else(Utc::now),
                beer_id: input.beer_id,
                user_id: author.user_id,
            })
            .await?;
        Ok(review)
    }

    pub async fn update_by_id(
        repos: &Repositories,
        caller: &AuthUser,
        id: Uuid,
        input: UpdateReviewRequest,
    ) -> ApiResult<Review> {
        input.validate()?;
        debug!(%id, user_id = %caller.user_id, "Updating review");

        let existing = Self::get_by_id(repos, id).await?;
        ensure_may_modify(caller, &existing)?;

        if let Some(beer_id) = input.beer_id {
            ensure_beer_exists(repos, beer_id).await?;
        }

        repos
            .reviews
            .update(
                id,
                ReviewChanges {
                    rating: input.rating,
                    description: input.description,
                    date: input.date,
                    beer_id: input.beer_id,
                },
            )
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete_by_id(repos: &Repositories, caller: &AuthUser, id: Uuid) -> ApiResult<()> {
        debug!(%id, user_id = %caller.user_id, "Deleting review");

        let existing = Self::get_by_id(repos, id).await?;
        ensure_may_modify(caller, &existing)?;

        match repos.reviews.delete(id).await? {
            0 => Err(not_found(id)),
            _ => Ok(()),
        }
    }
}

fn ensure_may_modify(caller: &AuthUser, review: &Review) -> ApiResult<()> {
    if review.user.id == caller.user_id || caller.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the author or an admin can change this review".to_string(),
        ))
    }
}

async fn ensure_beer_exists(repos: &Repositories, beer_id: Uuid) -> ApiResult<()> {
    match repos.beers.find_by_id(beer_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound(format!(
            "No beer with id {} exists",
            beer_id
        ))),
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("There is no review with id {}", id))
}
