#[allow(clippy::module_inception)]
mod app;
pub mod container;
pub mod errors;
pub mod movie;
pub mod rating;
pub mod tmdb;

pub use app::{App, SearchMessage, SubmitOutcome};
