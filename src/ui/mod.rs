mod footer;
mod header;
mod loading;
mod main_content;
mod movie_detail;
#[allow(clippy::module_inception)]
mod ui;

pub use ui::ui;
