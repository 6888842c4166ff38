use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::backend::MovieBackend;
use crate::models::MovieRecord;
use crate::render::{Area, Renderer, Surface};

/// Failures are logged and leave the area as it was. A response is only
/// rendered if no newer load of the same area has started since.
pub struct Loader {
    backend: Arc<dyn MovieBackend>,
    renderer: Renderer,
    surface: Arc<dyn Surface>,
    popular_gen: AtomicU64,
    favorites_gen: AtomicU64,
}

impl Loader {
    pub fn new(
        backend: Arc<dyn MovieBackend>,
        renderer: Renderer,
        surface: Arc<dyn Surface>,
    ) -> Self {
        Self {
            backend,
            renderer,
            surface,
            popular_gen: AtomicU64::new(0),
            favorites_gen: AtomicU64::new(0),
        }
    }

    pub async fn load_popular(&self) -> Option<Vec<MovieRecord>> {
        let generation = self.begin(Area::Popular);
        match self.backend.popular().await {
            Ok(movies) => self.apply(Area::Popular, generation, movies, true),
            Err(e) => {
                error!("Error loading popular movies: {}", e);
                None
            }
        }
    }

    pub async fn load_favorites(&self) -> Option<Vec<MovieRecord>> {
        let generation = self.begin(Area::Favorites);
        match self.backend.favorites().await {
            Ok(movies) => self.apply(Area::Favorites, generation, movies, false),
            Err(e) if e.is_not_found() => {
                debug!("No favorites stored yet");
                self.apply(Area::Favorites, generation, Vec::new(), false)
            }
            Err(e) => {
                error!("Error loading favorite movies: {}", e);
                None
            }
        }
    }

    pub async fn search(&self, query: &str) -> Option<Vec<MovieRecord>> {
        if query.is_empty() {
            return None;
        }
        let generation = self.begin(Area::Popular);
        match self.backend.search(query).await {
            Ok(response) => {
                info!(query, results = response.results.len(), "Search completed");
                self.apply(Area::Popular, generation, response.results, true)
            }
            Err(e) => {
                error!(query, "Error searching movies: {}", e);
                None
            }
        }
    }

    fn counter(&self, area: Area) -> &AtomicU64 {
        match area {
            Area::Popular => &self.popular_gen,
            Area::Favorites => &self.favorites_gen,
        }
    }

    fn begin(&self, area: Area) -> u64 {
        self.counter(area).fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(
        &self,
        area: Area,
        generation: u64,
        movies: Vec<MovieRecord>,
        is_search_result: bool,
    ) -> Option<Vec<MovieRecord>> {
        if self.counter(area).load(Ordering::SeqCst) != generation {
            debug!(area = area.element_id(), generation, "Dropping stale response");
            return None;
        }
        self.renderer
            .render(self.surface.as_ref(), area, &movies, is_search_result);
        Some(movies)
    }
}
