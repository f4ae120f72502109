use crate::app::movie::MovieSummary;
use crate::app::rating::{RatingClass, classify, format_rating};
use crate::app::tmdb::poster_url;

/// A movie ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub title: String,
    pub poster_url: Option<String>,
    pub rating_text: String,
    pub rating_class: RatingClass,
    pub overview: String,
}

impl MovieCard {
    pub fn from_summary(movie: &MovieSummary, image_base: &str) -> Self {
        Self {
            title: movie.title.clone(),
            poster_url: poster_url(image_base, movie.poster_path.as_deref()),
            rating_text: format_rating(movie.vote_average),
            rating_class: classify(movie.vote_average),
            overview: movie.overview.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerContent {
    /// Nothing searched yet
    Welcome,
    /// The last search came back empty
    NoMovies,
    Cards(Vec<MovieCard>),
}

/// The region whose whole content is replaced by each search.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    content: ContainerContent,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            content: ContainerContent::Welcome,
        }
    }
}

impl Container {
    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    pub fn cards(&self) -> &[MovieCard] {
        match &self.content {
            ContainerContent::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// Replaces everything with one card per movie, or the "no movies"
    /// placeholder when there are none. Returns the number of cards.
    pub fn render(&mut self, movies: &[MovieSummary], image_base: &str) -> usize {
        self.content = if movies.is_empty() {
            ContainerContent::NoMovies
        } else {
            ContainerContent::Cards(
                movies
                    .iter()
                    .map(|movie| MovieCard::from_summary(movie, image_base))
                    .collect(),
            )
        };
        self.cards().len()
    }

    pub fn clear(&mut self) {
        self.content = ContainerContent::Welcome;
    }
}
