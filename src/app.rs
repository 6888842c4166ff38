use crate::backend::{HttpBackend, MovieBackend};
use crate::config::WidgetConfig;
use crate::loader::Loader;
use crate::mutator::Mutator;
use crate::notify::{ChannelNotifier, Notifier, Severity};
use crate::render::{Area, CardAction, HtmlSurface, RenderConfig, Renderer};
use anyhow::{anyhow, bail, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Widget {
    loader: Arc<Loader>,
    mutator: Mutator,
    surface: Arc<HtmlSurface>,
}

impl Widget {
    pub fn new(
        backend: Arc<dyn MovieBackend>,
        render_config: RenderConfig,
        surface: Arc<HtmlSurface>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let loader = Arc::new(Loader::new(
            backend.clone(),
            Renderer::new(render_config),
            surface.clone(),
        ));
        let mutator = Mutator::new(backend, loader.clone(), notifier);
        Self {
            loader,
            mutator,
            surface,
        }
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn mutator(&self) -> &Mutator {
        &self.mutator
    }

    pub async fn on_ready(&self) {
        tokio::join!(self.loader.load_popular(), self.loader.load_favorites());
    }

    pub async fn search(&self, query: &str) {
        self.loader.search(query).await;
    }

    pub async fn dispatch(&self, action: CardAction) {
        match action {
            CardAction::AddToFavorites(movie) => self.mutator.add_to_favorites(&movie).await,
            CardAction::RemoveFromFavorites(id) => self.mutator.remove_from_favorites(&id).await,
        }
    }

    pub async fn activate(&self, area: Area, index: usize) -> bool {
        match self.surface.action(area, index) {
            Some(action) => {
                self.dispatch(action).await;
                true
            }
            None => {
                warn!(area = area.element_id(), index, "No card to activate");
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Search(String),
    Add { index: usize, query: Option<String> },
    Remove(String),
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(cmd) = args.next() else {
            return Ok(Command::Show);
        };
        match cmd.as_str() {
            "show" => Ok(Command::Show),
            "search" => {
                let query = args.collect::<Vec<_>>().join(" ");
                Ok(Command::Search(query))
            }
            "add" => {
                let mut index = None;
                let mut query = None;
                while let Some(arg) = args.next() {
                    if arg == "--query" {
                        query = Some(args.next().ok_or_else(|| anyhow!("--query needs a value"))?);
                    } else {
                        index = Some(
                            arg.parse::<usize>()
                                .with_context(|| format!("invalid card index '{}'", arg))?,
                        );
                    }
                }
                let index = index.ok_or_else(|| anyhow!("add needs a card index"))?;
                Ok(Command::Add { index, query })
            }
            "remove" => {
                let id = args.next().ok_or_else(|| anyhow!("remove needs a movie id"))?;
                Ok(Command::Remove(id))
            }
            other => bail!(
                "unknown command '{}' (expected show, search, add or remove)",
                other
            ),
        }
    }
}

pub async fn run_cli(config: WidgetConfig, command: Command) -> Result<()> {
    info!("Using backend {}", config.api_base_url);
    let backend: Arc<dyn MovieBackend> = Arc::new(
        HttpBackend::new(&config.api_base_url).context("Failed to build HTTP client")?,
    );
    let (notifier, mut notices) = ChannelNotifier::new();
    let surface = Arc::new(HtmlSurface::new());
    let widget = Widget::new(
        backend,
        config.render_config(),
        surface.clone(),
        Arc::new(notifier),
    );

    widget.on_ready().await;
    match command {
        Command::Show => {}
        Command::Search(query) => widget.search(&query).await,
        Command::Add { index, query } => {
            if let Some(q) = query {
                widget.search(&q).await;
            }
            if !widget.activate(Area::Popular, index).await {
                bail!("no card at index {} in {}", index, Area::Popular.element_id());
            }
        }
        Command::Remove(id) => {
            widget
                .dispatch(CardAction::RemoveFromFavorites(id))
                .await
        }
    }

    while let Ok(notice) = notices.try_recv() {
        let tag = match notice.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        println!("[{}] {}", tag, notice.message);
    }
    print!("{}", surface.page_html());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(args(&[])).unwrap(), Command::Show);
        assert_eq!(
            Command::parse(args(&["search", "The", "Matrix"])).unwrap(),
            Command::Search("The Matrix".to_string())
        );
        assert_eq!(
            Command::parse(args(&["add", "2", "--query", "Alien"])).unwrap(),
            Command::Add {
                index: 2,
                query: Some("Alien".to_string())
            }
        );
        assert_eq!(
            Command::parse(args(&["remove", "603"])).unwrap(),
            Command::Remove("603".to_string())
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse(args(&["add"])).is_err());
        assert!(Command::parse(args(&["add", "x"])).is_err());
        assert!(Command::parse(args(&["remove"])).is_err());
        assert!(Command::parse(args(&["frobnicate"])).is_err());
    }
}
