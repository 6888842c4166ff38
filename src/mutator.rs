use std::sync::Arc;

use tracing::{error, info};

use crate::backend::MovieBackend;
use crate::error::ApiError;
use crate::loader::Loader;
use crate::models::{FavoritePayload, MovieRecord};
use crate::notify::{Notice, Notifier};

struct Messages {
    success: &'static str,
    fallback: &'static str,
    network: &'static str,
}

const ADD: Messages = Messages {
    success: "Movie added to favorites!",
    fallback: "Could not add to favorites",
    network: "Error adding movie to favorites",
};

const REMOVE: Messages = Messages {
    success: "Movie removed from favorites!",
    fallback: "Could not remove from favorites",
    network: "Error removing movie from favorites",
};

pub struct Mutator {
    backend: Arc<dyn MovieBackend>,
    loader: Arc<Loader>,
    notifier: Arc<dyn Notifier>,
}

impl Mutator {
    pub fn new(
        backend: Arc<dyn MovieBackend>,
        loader: Arc<Loader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            loader,
            notifier,
        }
    }

    pub async fn add_to_favorites(&self, movie: &MovieRecord) {
        let Some(payload) = FavoritePayload::from_record(movie) else {
            error!(title = %movie.title, "Cannot add movie without an identifier");
            self.notifier.notify(Notice::error(ADD.network));
            return;
        };
        info!(movie_id = %payload.movie_id, title = %payload.title, "Adding favorite");
        let result = self.backend.add_favorite(&payload).await;
        self.finish(result, &ADD).await;
    }

    pub async fn remove_from_favorites(&self, movie_id: &str) {
        info!(movie_id, "Removing favorite");
        let result = self.backend.remove_favorite(movie_id).await;
        self.finish(result, &REMOVE).await;
    }

    async fn finish(&self, result: Result<(), ApiError>, messages: &Messages) {
        let notice = match result {
            Ok(()) => {
                self.loader.load_favorites().await;
                Notice::success(messages.success)
            }
            Err(e) if e.is_transport() => {
                error!("{}: {}", messages.network, e);
                Notice::error(messages.network)
            }
            Err(e) => {
                let detail = e.detail().unwrap_or(messages.fallback);
                Notice::error(format!("Error: {}", detail))
            }
        };
        self.notifier.notify(notice);
    }
}
