//! Data models for the Beer Review application

use crate::errors::InputError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Coarse permission tag attached to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(InputError::UnknownRole(other.to_string())),
        }
    }
}

/// Public user profile (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// A beer that can be reviewed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: Uuid,
    pub name: String,
    pub percentage: f64,
    pub brewery_id: Option<Uuid>,
}

/// The brewery where a beer is brewed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brewery {
    pub id: Uuid,
    pub name: String,
    pub country: String,
}

/// Beer summary embedded in a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewBeer {
    pub id: Uuid,
    pub name: String,
}

/// Author summary embedded in a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewUser {
    pub id: Uuid,
    pub name: String,
}

/// A review of a beer, written by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub rating: i32,
    pub description: String,
    pub date: DateTime<Utc>,
    pub beer: ReviewBeer,
    pub user: ReviewUser,
}
