//! Interactive console menu.
//!
//! The menu reads one line per prompt and never holds the catalog open
//! between actions: every action takes a fresh snapshot.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use reelshelf_core::{
    catalog::{validate_rating, MAX_RATING, MIN_RATING},
    config::WebsiteConfig,
    stats::{MovieFilter, SortOrder},
    ExternalCatalog, ExternalCatalogError, FuzzyMatcher, MovieStore, Snapshot, StoreError,
};

use crate::{report, site};

const CANCEL: &str = "q";

/// Everything an action needs.
pub struct AppContext {
    pub store: Arc<dyn MovieStore>,
    pub lookup: Option<Arc<dyn ExternalCatalog>>,
    pub matcher: FuzzyMatcher,
    pub website: WebsiteConfig,
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Catalog error: {0}")]
    Store(#[from] StoreError),

    /// Input reached end of file.
    #[error("Input closed")]
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortedByRating,
    SortedByYear,
    Filter,
    Website,
}

impl Action {
    const ALL: [(Action, &'static str); 12] = [
        (Action::Exit, "Exit"),
        (Action::List, "List movies"),
        (Action::Add, "Add movie"),
        (Action::Delete, "Delete movie"),
        (Action::Update, "Update movie"),
        (Action::Stats, "Stats"),
        (Action::Random, "Random movie"),
        (Action::Search, "Search movie"),
        (Action::SortedByRating, "Movies sorted by rating"),
        (Action::SortedByYear, "Movies sorted by year"),
        (Action::Filter, "Filter movies"),
        (Action::Website, "Generate website"),
    ];

    fn from_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.parse().ok()?;
        Self::ALL.get(index).map(|(action, _)| *action)
    }
}

/// Outcome of prompting for a title.
enum TitleInput {
    Title(String),
    Cancelled,
}

pub struct Menu<'a, R, W> {
    ctx: &'a AppContext,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(ctx: &'a AppContext, input: R, output: W) -> Self {
        Self { ctx, input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self) -> Result<(), MenuError> {
        match self.run_loop().await {
            Err(MenuError::InputClosed) => {
                debug!("Input closed, leaving menu");
                Ok(())
            }
            other => other,
        }
    }

    async fn run_loop(&mut self) -> Result<(), MenuError> {
        writeln!(self.output, "********** My Movies Database **********")?;
        writeln!(self.output)?;

        loop {
            self.show_menu()?;
            let action = self.read_action()?;

            if action == Action::Exit {
                writeln!(self.output, "Bye!")?;
                return Ok(());
            }

            // Store errors end the action, not the session
            match self.dispatch(action).await {
                Ok(()) => {}
                Err(MenuError::Store(e)) => {
                    warn!("Menu action {:?} failed: {}", action, e);
                    writeln!(self.output, "Error: {}", e)?;
                }
                Err(e) => return Err(e),
            }

            writeln!(self.output)?;
            self.prompt("Press enter to continue")?;
            writeln!(self.output)?;
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "Menu:")?;
        for (index, (_, label)) in Action::ALL.iter().enumerate() {
            writeln!(self.output, "{:>2}. {}", index, label)?;
        }
        writeln!(self.output)
    }

    fn read_action(&mut self) -> Result<Action, MenuError> {
        let prompt = format!("Enter choice (0-{}): ", Action::ALL.len() - 1);
        loop {
            let choice = self.prompt(&prompt)?;
            if choice.is_empty() {
                continue;
            }
            match Action::from_choice(&choice) {
                Some(action) => {
                    writeln!(self.output)?;
                    return Ok(action);
                }
                None => writeln!(self.output, "Please select a valid number for an action.")?,
            }
        }
    }

    async fn dispatch(&mut self, action: Action) -> Result<(), MenuError> {
        let snapshot = self.ctx.store.list_all()?;

        match action {
            Action::Exit => {}
            Action::List => report::write_list(&mut self.output, &snapshot)?,
            Action::Add => self.add_movie(&snapshot).await?,
            Action::Delete => self.delete_movie(&snapshot)?,
            Action::Update => self.update_rating(&snapshot)?,
            Action::Stats => report::write_stats(&mut self.output, &snapshot)?,
            Action::Random => report::write_random(&mut self.output, &snapshot)?,
            Action::Search => self.search(&snapshot)?,
            Action::SortedByRating => report::write_sorted_by_rating(&mut self.output, &snapshot)?,
            Action::SortedByYear => self.sorted_by_year(&snapshot)?,
            Action::Filter => self.filter(&snapshot)?,
            Action::Website => self.generate_website(&snapshot)?,
        }
        Ok(())
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// Print a prompt and read one trimmed line.
    fn prompt(&mut self, label: &str) -> Result<String, MenuError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MenuError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Prompt for a non-empty title, accepting `q` to cancel.
    ///
    /// `accept` returns an error message for titles that should be retried.
    fn prompt_title(
        &mut self,
        label: &str,
        accept: impl Fn(&str) -> Option<String>,
    ) -> Result<TitleInput, MenuError> {
        loop {
            let title = self.prompt(label)?;
            if title.is_empty() {
                writeln!(self.output, "Movie name cannot be empty. Please try again.")?;
            } else if title.eq_ignore_ascii_case(CANCEL) {
                writeln!(self.output)?;
                writeln!(self.output, "Action cancelled.")?;
                return Ok(TitleInput::Cancelled);
            } else if let Some(message) = accept(&title) {
                writeln!(self.output, "{}", message)?;
            } else {
                return Ok(TitleInput::Title(title));
            }
        }
    }

    fn prompt_existing_title(
        &mut self,
        label: &str,
        snapshot: &Snapshot,
    ) -> Result<TitleInput, MenuError> {
        self.prompt_title(label, |title| {
            (!snapshot.contains(title)).then(|| {
                format!(
                    "Cannot find the movie \"{}\" in the database. Please try again.",
                    title
                )
            })
        })
    }

    /// Prompt until the answer is blank or parses as `T`.
    fn prompt_optional<T: std::str::FromStr>(
        &mut self,
        label: &str,
        what: &str,
    ) -> Result<Option<T>, MenuError> {
        loop {
            let answer = self.prompt(label)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Invalid input: {} must be a number.", what)?,
            }
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    async fn add_movie(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        let title = match self.prompt_title(
            "Enter new movie name (or \"q\" to show the menu again): ",
            |title| {
                snapshot
                    .contains(title)
                    .then(|| format!("Movie \"{}\" is already in the database.", title))
            },
        )? {
            TitleInput::Title(title) => title,
            TitleInput::Cancelled => return Ok(()),
        };

        let Some(lookup) = self.ctx.lookup.as_ref() else {
            writeln!(self.output, "Error: OMDb API key not set.")?;
            return Ok(());
        };

        let metadata = match lookup.find_movie(&title).await {
            Ok(metadata) => metadata,
            Err(ExternalCatalogError::NotFound(_)) => {
                writeln!(self.output, "Data for movie \"{}\" not found.", title)?;
                return Ok(());
            }
            Err(ExternalCatalogError::HttpError(e)) => {
                warn!("OMDb request failed: {}", e);
                writeln!(self.output, "Error: OMDb API not reachable.")?;
                return Ok(());
            }
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };

        let movie = match metadata.to_movie() {
            Ok(movie) => movie,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };
        if metadata.rating().is_none() {
            writeln!(self.output, "Movie has no IMDb rating. Setting rating to 0.0")?;
        }

        match self.ctx.store.add(&movie) {
            Ok(()) => writeln!(
                self.output,
                "Movie \"{}\" (Year: {}, Rating: {:.1}) successfully added.",
                movie.title, movie.year, movie.rating
            )?,
            Err(StoreError::AlreadyExists(existing)) => writeln!(
                self.output,
                "Movie \"{}\" is already in the database.",
                existing
            )?,
            Err(StoreError::InvalidInput(message)) => {
                writeln!(self.output, "Cannot add movie: {}", message)?
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn delete_movie(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        let title = match self.prompt_existing_title(
            "Enter movie name to delete (or \"q\" to show the menu again): ",
            snapshot,
        )? {
            TitleInput::Title(title) => title,
            TitleInput::Cancelled => return Ok(()),
        };

        match self.ctx.store.delete(&title) {
            Ok(()) => writeln!(self.output, "Movie {} successfully deleted", title)?,
            Err(StoreError::NotFound(_)) => writeln!(
                self.output,
                "Cannot find the movie \"{}\" in the database.",
                title
            )?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn update_rating(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        let title = match self.prompt_existing_title(
            "Enter movie name (or \"q\" to show the menu again): ",
            snapshot,
        )? {
            TitleInput::Title(title) => title,
            TitleInput::Cancelled => return Ok(()),
        };

        let label = format!("Enter new rating ({}-{}): ", MIN_RATING, MAX_RATING);
        let rating = loop {
            let answer = self.prompt(&label)?;
            match answer.parse::<f64>() {
                Ok(rating) if validate_rating(rating).is_ok() => break rating,
                _ => writeln!(
                    self.output,
                    "Invalid input: Rating must be between {}-{}.",
                    MIN_RATING, MAX_RATING
                )?,
            }
        };

        match self.ctx.store.update_rating(&title, rating) {
            Ok(()) => writeln!(self.output, "Updated Movie {}.", title)?,
            Err(StoreError::NotFound(_)) => writeln!(
                self.output,
                "Cannot find the movie \"{}\" in the database.",
                title
            )?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn search(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        let query = match self.prompt_title(
            "Enter part of movie name (or \"q\" to show the menu again): ",
            |_| None,
        )? {
            TitleInput::Title(query) => query,
            TitleInput::Cancelled => return Ok(()),
        };

        report::write_search(&mut self.output, &self.ctx.matcher, &query, snapshot)?;
        Ok(())
    }

    fn sorted_by_year(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        let order = loop {
            let answer = self
                .prompt("Do you want to sort ascending (enter \"up\") or descending (enter \"down\")? ")?
                .to_lowercase();
            match answer.as_str() {
                "up" => break SortOrder::Ascending,
                "down" => break SortOrder::Descending,
                _ => writeln!(self.output, "Invalid input. Please enter \"up\" or \"down\".")?,
            }
        };

        report::write_sorted_by_year(&mut self.output, snapshot, order)?;
        Ok(())
    }

    fn filter(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        let filter = MovieFilter {
            min_rating: self.prompt_optional(
                "Enter minimum rating (leave blank for no min rating): ",
                "Rating",
            )?,
            start_year: self.prompt_optional(
                "Enter start year (leave blank for no start year): ",
                "Year",
            )?,
            end_year: self.prompt_optional(
                "Enter end year (leave blank for no end year): ",
                "Year",
            )?,
        };

        writeln!(self.output)?;
        report::write_filtered(&mut self.output, snapshot, &filter)?;
        Ok(())
    }

    fn generate_website(&mut self, snapshot: &Snapshot) -> Result<(), MenuError> {
        match site::generate(snapshot, &self.ctx.website) {
            Ok(path) => writeln!(
                self.output,
                "Website was generated successfully: {}",
                path.display()
            )?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }
}
