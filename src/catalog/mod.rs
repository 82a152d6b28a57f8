use serde::{Deserialize, Serialize};

/// Read-only descriptive record from the fixed dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "imdbId")]
    pub imdb_id: String,
    pub title: String,
    pub year: i32,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// The static movie list served by `GET /movies`. Parsed once at startup
/// from the embedded dataset, never mutated.
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn load() -> Result<Self, CatalogError> {
        let movies: Vec<Movie> = serde_json::from_str(include_str!("movies.json"))?;
        Ok(Self { movies })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to parse movie dataset: {0}")]
    Parse(#[from] serde_json::Error),
}
