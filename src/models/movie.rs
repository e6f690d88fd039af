use serde::{Deserialize, Serialize};
use std::fmt::Display;

// ============================================================================
// TMDB API Types
// ============================================================================

/// A `{ "name": ... }` object as used for genres and production companies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Named {
    pub name: String,
}

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genres: Vec<Named>,
    #[serde(default)]
    pub production_companies: Vec<Named>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Response from GET /movie/{id}/credits
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Response from GET /movie/{id}/reviews
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub results: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    #[serde(default = "anonymous")]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

/// Response from GET /person/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Response from GET /person/{id}/combined_credits
#[derive(Debug, Clone, Deserialize)]
pub struct PersonCreditsResponse {
    #[serde(default)]
    pub cast: Vec<PersonCredit>,
}

/// A movie or TV credit; movies carry `title`, TV shows carry `name`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonCredit {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub media_type: Option<String>,
}

impl PersonCredit {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or("Untitled")
    }
}

/// TMDB gender code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Female,
    Male,
    #[serde(rename = "N/A")]
    Unknown,
}

impl From<Option<u8>> for Gender {
    fn from(code: Option<u8>) -> Self {
        match code {
            Some(1) => Gender::Female,
            Some(2) => Gender::Male,
            _ => Gender::Unknown,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
            Gender::Unknown => write!(f, "N/A"),
        }
    }
}
