//! Brewery service

use crate::error::{ApiError, ApiResult};
use crate::repositories::{BreweryChanges, NewBrewery, Repositories};
use beer_review_shared::{
    Brewery, CreateBreweryRequest, ListResponse, Page, UpdateBreweryRequest,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

pub struct BreweryService;

impl BreweryService {
    pub async fn get_all(repos: &Repositories, page: Page) -> ApiResult<ListResponse<Brewery>> {
        debug!(limit = page.limit, offset = page.offset, "Fetching all breweries");
        let data = repos.breweries.find_all(page).await?;
        let count = repos.breweries.count().await?;

        Ok(ListResponse::new(data, count, page))
    }

    pub async fn get_by_id(repos: &Repositories, id: Uuid) -> ApiResult<Brewery> {
        debug!(%id, "Fetching brewery");
        repos
            .breweries
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(repos: &Repositories, input: CreateBreweryRequest) -> ApiResult<Brewery> {
        input.validate()?;
        debug!(name = %input.name, country = %input.country, "Creating new brewery");

        let brewery = repos
            .breweries
            .create(NewBrewery {
                name: input.name,
                country: input.country,
            })
            .await?;
        Ok(brewery)
    }

    pub async fn update_by_id(
        repos: &Repositories,
        id: Uuid,
        input: UpdateBreweryRequest,
    ) -> ApiResult<Brewery> {
        input.validate()?;
        debug!(%id, "Updating brewery");

        repos
            .breweries
            .update(
                id,
                BreweryChanges {
                    name: input.name,
                    country: input.country,
                },
            )
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Beers brewed here keep existing without a brewery
    pub async fn delete_by_id(repos: &Repositories, id: Uuid) -> ApiResult<()> {
        debug!(%id, "Deleting brewery");
        match repos.breweries.delete(id).await? {
            0 => Err(not_found(id)),
            _ => Ok(()),
        }
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("No brewery with id {} exists", id))
}
