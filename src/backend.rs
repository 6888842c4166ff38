use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{ErrorBody, FavoritePayload, MovieRecord, SearchResponse};

#[async_trait]
pub trait MovieBackend: Send + Sync {
    async fn popular(&self) -> Result<Vec<MovieRecord>, ApiError>;
    async fn favorites(&self) -> Result<Vec<MovieRecord>, ApiError>;
    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError>;
    async fn add_favorite(&self, payload: &FavoritePayload) -> Result<(), ApiError>;
    async fn remove_favorite(&self, movie_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let user_agent = format!("cinefav/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let text = Self::send(self.client.get(&url)).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{url}: {e}")))
    }

    async fn send(req: RequestBuilder) -> Result<String, ApiError> {
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::into_detail);
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl MovieBackend for HttpBackend {
    async fn popular(&self) -> Result<Vec<MovieRecord>, ApiError> {
        self.get_json("/movies/popular/").await
    }

    async fn favorites(&self) -> Result<Vec<MovieRecord>, ApiError> {
        self.get_json("/movies/favorites/").await
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let path = format!("/movies/search/{}", urlencoding::encode(query));
        self.get_json(&path).await
    }

    async fn add_favorite(&self, payload: &FavoritePayload) -> Result<(), ApiError> {
        let url = self.url("/movies/favorites/");
        debug!(%url, movie_id = %payload.movie_id, "POST");
        Self::send(self.client.post(&url).json(payload)).await?;
        Ok(())
    }

    async fn remove_favorite(&self, movie_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!(
            "/movies/favorites/{}",
            urlencoding::encode(movie_id)
        ));
        debug!(%url, "DELETE");
        Self::send(self.client.delete(&url)).await?;
        Ok(())
    }
}
