use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};

use crate::models::MovieRecord;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_FALLBACK_IMAGE: &str = "/static/no-poster.jpg";
pub const NO_DATE: &str = "No date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    Popular,
    Favorites,
}

impl Area {
    pub const ALL: [Area; 2] = [Area::Popular, Area::Favorites];

    pub fn element_id(&self) -> &'static str {
        match self {
            Area::Popular => "popularMovies",
            Area::Favorites => "favoriteMovies",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub image_base_url: String,
    pub fallback_image: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
        }
    }
}

/// What a card's button does when activated. The record is captured here
/// rather than serialized into markup.
#[derive(Debug, Clone, PartialEq)]
pub enum CardAction {
    AddToFavorites(MovieRecord),
    RemoveFromFavorites(String),
}

impl CardAction {
    pub fn label(&self) -> &'static str {
        match self {
            CardAction::AddToFavorites(_) => "Add to Favorites",
            CardAction::RemoveFromFavorites(_) => "Remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub image_url: String,
    pub alt: String,
    pub title: String,
    pub release_date: String,
    pub action: CardAction,
}

pub trait Surface: Send + Sync {
    fn replace(&self, area: Area, cards: Vec<Card>);
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render(
        &self,
        surface: &dyn Surface,
        area: Area,
        movies: &[MovieRecord],
        is_search_result: bool,
    ) {
        surface.replace(area, self.cards(movies, is_search_result));
    }

    pub fn cards(&self, movies: &[MovieRecord], is_search_result: bool) -> Vec<Card> {
        movies
            .iter()
            .map(|movie| self.card(movie, is_search_result))
            .collect()
    }

    pub fn card(&self, movie: &MovieRecord, is_search_result: bool) -> Card {
        let action = if is_search_result {
            CardAction::AddToFavorites(movie.clone())
        } else {
            CardAction::RemoveFromFavorites(movie.key().unwrap_or_default())
        };
        Card {
            image_url: self.image_url(movie),
            alt: movie.title.clone(),
            title: movie.title.clone(),
            release_date: movie.release_date().unwrap_or(NO_DATE).to_string(),
            action,
        }
    }

    /// Poster references are prefixed as-is, whether relative (`poster_path`)
    /// or already absolute (`poster_url`).
    pub fn image_url(&self, movie: &MovieRecord) -> String {
        match movie.poster_ref() {
            Some(poster) => format!("{}{}", self.config.image_base_url, poster),
            None => self.config.fallback_image.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct HtmlSurface {
    areas: Mutex<HashMap<Area, Vec<Card>>>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Area, Vec<Card>>> {
        self.areas.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn cards(&self, area: Area) -> Vec<Card> {
        self.lock().get(&area).cloned().unwrap_or_default()
    }

    pub fn action(&self, area: Area, index: usize) -> Option<CardAction> {
        self.lock()
            .get(&area)
            .and_then(|cards| cards.get(index))
            .map(|card| card.action.clone())
    }

    pub fn area_html(&self, area: Area) -> String {
        let guard = self.lock();
        let mut out = String::new();
        for (index, card) in guard.get(&area).into_iter().flatten().enumerate() {
            write_card(&mut out, area, index, card);
        }
        out
    }

    pub fn page_html(&self) -> String {
        let mut out = String::new();
        for area in Area::ALL {
            let _ = writeln!(
                out,
                "<div id=\"{}\" class=\"movies-grid\">\n{}</div>",
                area.element_id(),
                self.area_html(area)
            );
        }
        out
    }
}

impl Surface for HtmlSurface {
    fn replace(&self, area: Area, cards: Vec<Card>) {
        self.lock().insert(area, cards);
    }
}

fn write_card(out: &mut String, area: Area, index: usize, card: &Card) {
    let _ = write!(
        out,
        concat!(
            "<div class=\"movie-card\">\n",
            "  <img src=\"{src}\" alt=\"{alt}\">\n",
            "  <div class=\"movie-info\">\n",
            "    <h3>{title}</h3>\n",
            "    <p>{date}</p>\n",
            "    <button class=\"favorite-btn\" data-area=\"{area}\" data-index=\"{index}\">{label}</button>\n",
            "  </div>\n",
            "</div>\n"
        ),
        src = escape_html(&card.image_url),
        alt = escape_html(&card.alt),
        title = escape_html(&card.title),
        date = escape_html(&card.release_date),
        area = area.element_id(),
        index = index,
        label = card.action.label(),
    );
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
