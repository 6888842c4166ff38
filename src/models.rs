use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Numeric for TMDB-sourced records, string for stored favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Number(n) => write!(f, "{}", n),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MovieId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<MovieId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl MovieRecord {
    pub fn key(&self) -> Option<String> {
        self.id
            .as_ref()
            .or(self.movie_id.as_ref())
            .map(|id| id.to_string())
    }

    /// `poster_path` wins over `poster_url`; empty strings count as absent.
    pub fn poster_ref(&self) -> Option<&str> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.poster_url.as_deref().filter(|p| !p.is_empty()))
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref().filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoritePayload {
    pub movie_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl FavoritePayload {
    pub fn from_record(movie: &MovieRecord) -> Option<Self> {
        Some(Self {
            movie_id: movie.key()?,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            vote_average: movie.vote_average,
            poster_path: movie.poster_path.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<MovieRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    // Validation errors carry an array here; only a string is shown.
    pub fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}
