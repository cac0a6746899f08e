//! Beer service

use crate::error::{ApiError, ApiResult};
use crate::repositories::{BeerChanges, NewBeer, Repositories};
use beer_review_shared::{Beer, CreateBeerRequest, ListResponse, Page, UpdateBeerRequest};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

pub struct BeerService;

impl BeerService {
    pub async fn get_all(repos: &Repositories, page: Page) -> ApiResult<ListResponse<Beer>> {
        debug!(limit = page.limit, offset = page.offset, "Fetching all beers");
        let data = repos.beers.find_all(page).await?;
        let count = repos.beers.count().await?;

        Ok(ListResponse::new(data, count, page))
    }

    pub async fn get_by_id(repos: &Repositories, id: Uuid) -> ApiResult<Beer> {
        debug!(%id, "Fetching beer");
        repos
            .beers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("No beer with id {} exists", id)))
    }

    pub async fn create(repos: &Repositories, input: CreateBeerRequest) -> ApiResult<Beer> {
        input.validate()?;
        debug!(name = %input.name, percentage = input.percentage, "Creating new beer");

        if let Some(brewery_id) = input.brewery_id {
            ensure_brewery_exists(repos, brewery_id).await?;
        }

        let beer = repos
            .beers
            .create(NewBeer {
                name: input.name,
                percentage: input.percentage,
                brewery_id: input.brewery_id,
            })
            .await?;
        Ok(beer)
    }

    pub async fn update_by_id(
        repos: &Repositories,
        id: Uuid,
        input: UpdateBeerRequest,
    ) -> ApiResult<Beer> {
        input.validate()?;
        debug!(%id, "Updating beer");

        if let Some(brewery_id) = input.brewery_id {
            ensure_brewery_exists(repos, brewery_id).await?;
        }

        repos
            .beers
            .update(
                id,
                BeerChanges {
                    name: input.name,
                    percentage: input.percentage,
                    brewery_id: input.brewery_id,
                },
            )
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("No beer with id {} exists", id)))
    }

    pub async fn delete_by_id(repos: &Repositories, id: Uuid) -> ApiResult<()> {
        debug!(%id, "Deleting beer");
        match repos.beers.delete(id).await? {
            0 => Err(ApiError::NotFound(format!("No beer with id {} exists", id))),
            _ => Ok(()),
        }
    }
}

async fn ensure_brewery_exists(repos: &Repositories, brewery_id: Uuid) -> ApiResult<()> {
    match repos.breweries.find_by_id(brewery_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound(format!(
            "No brewery with id {} exists",
            brewery_id
        ))),
    }
}
