//! Business logic services
//!
//! Services validate input, enforce ownership and existence rules, and
//! coordinate between repositories and the auth primitives.

pub mod beer;
pub mod brewery;
pub mod review;
pub mod user;

pub use beer::BeerService;
pub use brewery::BreweryService;
pub use review::ReviewService;
pub use user::UserService;
