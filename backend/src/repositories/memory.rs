//! In-memory repositories
//!
//! Mirrors the Postgres schema rules: unique names and emails, foreign key
//! checks, `SET NULL` on brewery delete and cascading review deletes.

use super::{
    BeerChanges, BeerRepository, BreweryChanges, BreweryRepository, NewBeer, NewBrewery,
    NewReview, NewUser, RepoResult, RepositoryError, ReviewChanges, ReviewRepository,
    UserChanges, UserRecord, UserRepository,
};
use async_trait::async_trait;
use beer_review_shared::{Beer, Brewery, Page, Review, ReviewBeer, ReviewUser};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredReview {
    id: Uuid,
    rating: i32,
    description: String,
    date: DateTime<Utc>,
    beer_id: Uuid,
    user_id: Uuid,
}

#[derive(Debug, Default)]
struct Tables {
    beers: HashMap<Uuid, Beer>,
    breweries: HashMap<Uuid, Brewery>,
    reviews: HashMap<Uuid, StoredReview>,
    users: HashMap<Uuid, UserRecord>,
}

impl Tables {
    fn check_brewery(&self, brewery_id: Option<Uuid>) -> RepoResult<()> {
        match brewery_id {
            Some(id) if !self.breweries.contains_key(&id) => Err(RepositoryError::ForeignKey(
                "This brewery does not exist".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn check_beer_name(&self, name: &str, except: Option<Uuid>) -> RepoResult<()> {
        let taken = self
            .beers
            .values()
            .any(|beer| beer.name == name && Some(beer.id) != except);
        if taken {
            return Err(RepositoryError::Conflict(
                "A beer with this name already exists".to_string(),
            ));
        }
        Ok(())
    }

    fn check_brewery_name(&self, name: &str, except: Option<Uuid>) -> RepoResult<()> {
        let taken = self
            .breweries
            .values()
            .any(|brewery| brewery.name == name && Some(brewery.id) != except);
        if taken {
            return Err(RepositoryError::Conflict(
                "A brewery with this name already exists".to_string(),
            ));
        }
        Ok(())
    }

    fn check_email(&self, email: &str, except: Option<Uuid>) -> RepoResult<()> {
        let taken = self
            .users
            .values()
            .any(|user| user.email == email && Some(user.id) != except);
        if taken {
            return Err(RepositoryError::Conflict(
                "There is already a user with this email address".to_string(),
            ));
        }
        Ok(())
    }

    fn check_review_refs(&self, beer_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        if !self.beers.contains_key(&beer_id) {
            return Err(RepositoryError::ForeignKey("This beer does not exist".to_string()));
        }
        if !self.users.contains_key(&user_id) {
            return Err(RepositoryError::ForeignKey("This user does not exist".to_string()));
        }
        Ok(())
    }

    /// Join a stored review with its beer and author, like the SQL read
    fn joined(&self, review: &StoredReview) -> Option<Review> {
        let beer = self.beers.get(&review.beer_id)?;
        let user = self.users.get(&review.user_id)?;
        Some(Review {
            id: review.id,
            rating: review.rating,
            description: review.description.clone(),
            date: review.date,
            beer: ReviewBeer {
                id: beer.id,
                name: beer.name.clone(),
            },
            user: ReviewUser {
                id: user.id,
                name: user.name.clone(),
            },
        })
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

/// Matches `ORDER BY LOWER(name COLLATE "C")`: ASCII case folded, then bytes
fn by_name(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
}

fn count_of(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Process-local storage implementing every repository trait
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

#[async_trait]
impl BeerRepository for InMemoryStore {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Beer>> {
        let tables = self.tables.read().await;
        let mut beers: Vec<Beer> = tables.beers.values().cloned().collect();
        beers.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(beers, page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(count_of(self.tables.read().await.beers.len()))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Beer>> {
        Ok(self.tables.read().await.beers.get(&id).cloned())
    }

    async fn create(&self, input: NewBeer) -> RepoResult<Beer> {
        let mut tables = self.tables.write().await;
        tables.check_beer_name(&input.name, None)?;
        tables.check_brewery(input.brewery_id)?;

        let beer = Beer {
            id: Uuid::new_v4(),
            name: input.name,
            percentage: input.percentage,
            brewery_id: input.brewery_id,
        };
        tables.beers.insert(beer.id, beer.clone());
        Ok(beer)
    }

    async fn update(&self, id: Uuid, changes: BeerChanges) -> RepoResult<Option<Beer>> {
        let mut tables = self.tables.write().await;
        let Some(mut beer) = tables.beers.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            tables.check_beer_name(&name, Some(id))?;
            beer.name = name;
        }
        if let Some(percentage) = changes.percentage {
            beer.percentage = percentage;
        }
        if let Some(brewery_id) = changes.brewery_id {
            tables.check_brewery(Some(brewery_id))?;
            beer.brewery_id = Some(brewery_id);
        }

        tables.beers.insert(id, beer.clone());
        Ok(Some(beer))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.beers.remove(&id).is_none() {
            return Ok(0);
        }
        tables.reviews.retain(|_, review| review.beer_id != id);
        Ok(1)
    }
}

#[async_trait]
impl BreweryRepository for InMemoryStore {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Brewery>> {
        let tables = self.tables.read().await;
        let mut breweries: Vec<Brewery> = tables.breweries.values().cloned().collect();
        breweries.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(breweries, page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(count_of(self.tables.read().await.breweries.len()))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Brewery>> {
        Ok(self.tables.read().await.breweries.get(&id).cloned())
    }

    async fn create(&self, input: NewBrewery) -> RepoResult<Brewery> {
        let mut tables = self.tables.write().await;
        tables.check_brewery_name(&input.name, None)?;

        let brewery = Brewery {
            id: Uuid::new_v4(),
            name: input.name,
            country: input.country,
        };
        tables.breweries.insert(brewery.id, brewery.clone());
        Ok(brewery)
    }

    async fn update(&self, id: Uuid, changes: BreweryChanges) -> RepoResult<Option<Brewery>> {
        let mut tables = self.tables.write().await;
        let Some(mut brewery) = tables.breweries.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            tables.check_brewery_name(&name, Some(id))?;
            brewery.name = name;
        }
        if let Some(country) = changes.country {
            brewery.country = country;
        }

        tables.breweries.insert(id, brewery.clone());
        Ok(Some(brewery))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.breweries.remove(&id).is_none() {
            return Ok(0);
        }
        for beer in tables.beers.values_mut() {
            if beer.brewery_id == Some(id) {
                beer.brewery_id = None;
            }
        }
        Ok(1)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Review>> {
        let tables = self.tables.read().await;
        let mut stored: Vec<&StoredReview> = tables.reviews.values().collect();
        stored.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let reviews = stored
            .into_iter()
            .filter_map(|review| tables.joined(review))
            .collect();
        Ok(paginate(reviews, page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(count_of(self.tables.read().await.reviews.len()))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Review>> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.get(&id).and_then(|review| tables.joined(review)))
    }

    async fn create(&self, input: NewReview) -> RepoResult<Review> {
        let mut tables = self.tables.write().await;
        tables.check_review_refs(input.beer_id, input.user_id)?;

        let stored = StoredReview {
            id: Uuid::new_v4(),
            rating: input.rating,
            description: input.description,
            date: input.date,
            beer_id: input.beer_id,
            user_id: input.user_id,
        };
        let review = tables
            .joined(&stored)
            .ok_or_else(|| RepositoryError::Database(sqlx::Error::RowNotFound))?;
        tables.reviews.insert(stored.id, stored);
        Ok(review)
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> RepoResult<Option<Review>> {
        let mut tables = self.tables.write().await;
        let Some(mut stored) = tables.reviews.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(rating) = changes.rating {
            stored.rating = rating;
        }
        if let Some(description) = changes.description {
            stored.description = description;
        }
        if let Some(date) = changes.date {
            stored.date = date;
        }
        if let Some(beer_id) = changes.beer_id {
            tables.check_review_refs(beer_id, stored.user_id)?;
            stored.beer_id = beer_id;
        }

        let review = tables.joined(&stored);
        tables.reviews.insert(id, stored);
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let removed = self.tables.write().await.reviews.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<UserRecord>> {
        let tables = self.tables.read().await;
        let mut users: Vec<UserRecord> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(users, page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(count_of(self.tables.read().await.users.len()))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<UserRecord>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|user| user.email == email).cloned())
    }

    async fn create(&self, input: NewUser) -> RepoResult<UserRecord> {
        let mut tables = self.tables.write().await;
        tables.check_email(&input.email, None)?;

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            roles: input.roles.iter().map(|role| role.as_str().to_string()).collect(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<UserRecord>> {
        let mut tables = self.tables.write().await;
        let Some(mut user) = tables.users.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            tables.check_email(&email, Some(id))?;
            user.email = email;
        }
        if let Some(roles) = changes.roles {
            user.roles = roles.iter().map(|role| role.as_str().to_string()).collect();
        }
        user.updated_at = Utc::now();

        tables.users.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(0);
        }
        tables.reviews.retain(|_, review| review.user_id != id);
        Ok(1)
    }
}
