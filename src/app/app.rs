use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Local};
use image::DynamicImage;
use ratatui::widgets::ListState;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use tracing::{debug, error, info, warn};

use crate::app::container::{Container, MovieCard};
use crate::app::errors::SearchError;
use crate::app::movie::MovieSummary;
use crate::app::tmdb::MovieSource;
use crate::config::Config;

/// Messages from background fetch threads back to the UI thread.
#[derive(Debug)]
pub enum SearchMessage {
    Results {
        request_id: u64,
        term: String,
        movies: Vec<MovieSummary>,
    },
    Failed {
        request_id: u64,
        term: String,
        error: SearchError,
    },
    Poster {
        url: String,
        image: DynamicImage,
    },
    PosterFailed {
        url: String,
        error: SearchError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input was blank, so the app was reset instead.
    Reloaded,
    Dispatched(u64),
}

/// One line of feedback for the footer.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
    pub at: DateTime<Local>,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            at: Local::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            at: Local::now(),
        }
    }
}

/// The search whose results are allowed to reach the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub request_id: u64,
    pub term: String,
}

pub struct App {
    pub container: Container,
    pub searching: bool,
    pub search_term: String,
    pub pending: Option<PendingSearch>,
    pub status: Option<Status>,
    pub placeholder_key: bool,
    pub selected_card_index: usize,
    pub list_state: ListState,
    pub picker: Option<Picker>,
    pub poster_url: Option<String>,
    pub loading_poster: bool,
    pub poster_protocol: Option<StatefulProtocol>,
    source: Arc<dyn MovieSource>,
    image_base_url: String,
    next_request_id: u64,
    sender: mpsc::Sender<SearchMessage>,
    receiver: mpsc::Receiver<SearchMessage>,
}

impl App {
    pub fn new(source: Arc<dyn MovieSource>, config: &Config) -> Self {
        let (sender, receiver) = mpsc::channel();
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            container: Container::default(),
            searching: false,
            search_term: String::new(),
            pending: None,
            status: None,
            placeholder_key: config.has_placeholder_key(),
            selected_card_index: 0,
            list_state,
            picker: None,
            poster_url: None,
            loading_poster: false,
            poster_protocol: None,
            source,
            image_base_url: config.image_base_url.clone(),
            next_request_id: 0,
            sender,
            receiver,
        }
    }

    /// Handles a press of Enter in the search field.
    ///
    /// A blank field resets the whole app. Anything else is searched for
    /// exactly as typed, and the field is cleared straight away without
    /// waiting for the response.
    pub fn submit_search(&mut self) -> SubmitOutcome {
        self.searching = false;

        if self.search_term.trim().is_empty() {
            self.reload();
            return SubmitOutcome::Reloaded;
        }

        let request_id = self.dispatch_search(self.search_term.clone());
        self.search_term.clear();
        SubmitOutcome::Dispatched(request_id)
    }

    /// Back to the start-up state. Any search still in flight is orphaned.
    pub fn reload(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.request_id, "Abandoning in-flight search");
        }
        info!("Reloading");

        self.container.clear();
        self.searching = false;
        self.search_term.clear();
        self.status = None;
        self.reset_selection();
        self.clear_poster();
    }

    /// Starts a search on a background thread and returns its request id.
    /// Only the most recently dispatched search may update the container.
    pub fn dispatch_search(&mut self, term: String) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;

        let superseded = self.pending.replace(PendingSearch {
            request_id,
            term: term.clone(),
        });
        if let Some(previous) = superseded {
            debug!(
                previous = previous.request_id,
                request_id, "Superseding in-flight search"
            );
        }
        info!(request_id, term = %term, "Dispatching search");

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let message = match source.search(&term) {
                Ok(movies) => SearchMessage::Results {
                    request_id,
                    term,
                    movies,
                },
                Err(error) => SearchMessage::Failed {
                    request_id,
                    term,
                    error,
                },
            };
            let _ = sender.send(message);
        });

        request_id
    }

    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    fn is_current(&self, request_id: u64) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.request_id == request_id)
    }

    /// Drains every message the background threads have sent so far.
    pub fn poll_messages(&mut self) -> usize {
        let messages: Vec<SearchMessage> = self.receiver.try_iter().collect();
        let count = messages.len();
        for message in messages {
            self.handle_message(message);
        }
        count
    }

    pub fn handle_message(&mut self, message: SearchMessage) {
        match message {
            SearchMessage::Results {
                request_id,
                term,
                movies,
            } => {
                if !self.is_current(request_id) {
                    debug!(request_id, "Discarding stale search results");
                    return;
                }
                self.pending = None;

                let count = self.container.render(&movies, &self.image_base_url);
                info!(request_id, term = %term, count, "Rendered search results");

                self.status = Some(Status::info(format!(
                    "{} result(s) for \"{}\"",
                    count, term
                )));
                self.reset_selection();
                self.request_selected_poster();
            }
            SearchMessage::Failed {
                request_id,
                term,
                error,
            } => {
                error!(request_id, term = %term, error = %error, "Search failed");
                if !self.is_current(request_id) {
                    return;
                }
                self.pending = None;
                self.status = Some(Status::error(format!(
                    "Search for \"{}\" failed: {}",
                    term, error
                )));
            }
            SearchMessage::Poster { url, image } => {
                if self.poster_url.as_deref() != Some(url.as_str()) {
                    debug!(%url, "Discarding poster for deselected card");
                    return;
                }
                self.loading_poster = false;
                self.poster_protocol = self
                    .picker
                    .as_ref()
                    .map(|picker| picker.new_resize_protocol(image));
            }
            SearchMessage::PosterFailed { url, error } => {
                warn!(%url, error = %error, "Poster download failed");
                if self.poster_url.as_deref() == Some(url.as_str()) {
                    self.loading_poster = false;
                    self.poster_protocol = None;
                }
            }
        }
    }

    pub fn selected_card(&self) -> Option<&MovieCard> {
        self.container.cards().get(self.selected_card_index)
    }

    pub fn next_card(&mut self) {
        let card_count = self.container.cards().len();
        if card_count == 0 {
            return;
        }

        self.selected_card_index = (self.selected_card_index + 1) % card_count;
        self.list_state.select(Some(self.selected_card_index));
        self.request_selected_poster();
    }

    pub fn previous_card(&mut self) {
        let card_count = self.container.cards().len();
        if card_count == 0 {
            return;
        }

        if self.selected_card_index == 0 {
            self.selected_card_index = card_count - 1;
        } else {
            self.selected_card_index -= 1;
        }
        self.list_state.select(Some(self.selected_card_index));
        self.request_selected_poster();
    }

    fn reset_selection(&mut self) {
        self.selected_card_index = 0;
        self.list_state.select(Some(0));
    }

    fn clear_poster(&mut self) {
        self.poster_url = None;
        self.loading_poster = false;
        self.poster_protocol = None;
    }

    /// Starts downloading the selected card's poster. Without an image
    /// picker the terminal can't draw it, so nothing is fetched.
    fn request_selected_poster(&mut self) {
        self.clear_poster();
        self.poster_url = self.selected_card().and_then(|card| card.poster_url.clone());

        let Some(url) = self.poster_url.clone() else {
            return;
        };
        if self.picker.is_none() {
            return;
        }

        self.loading_poster = true;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let message = match source.poster(&url) {
                Ok(image) => SearchMessage::Poster { url, image },
                Err(error) => SearchMessage::PosterFailed { url, error },
            };
            let _ = sender.send(message);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::container::ContainerContent;
    use crate::app::errors::Result;
    use crate::app::rating::RatingClass;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Reply {
        Movies(Vec<MovieSummary>),
        Fail,
    }

    struct MockSource {
        calls: Mutex<Vec<String>>,
        reply: Reply,
        gate: Option<Mutex<mpsc::Receiver<()>>>,
    }

    impl MockSource {
        fn new(reply: Reply) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply,
                gate: None,
            }
        }

        fn gated(reply: Reply) -> (Self, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            let mut source = Self::new(reply);
            source.gate = Some(Mutex::new(rx));
            (source, tx)
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MovieSource for MockSource {
        fn search(&self, term: &str) -> Result<Vec<MovieSummary>> {
            self.calls.lock().unwrap().push(term.to_string());
            if let Some(gate) = &self.gate {
                let _ = gate.lock().unwrap().recv();
            }
            match &self.reply {
                Reply::Movies(movies) => Ok(movies.clone()),
                Reply::Fail => Err(SearchError::InvalidResponseShape(
                    "missing field `results`".to_string(),
                )),
            }
        }

        fn poster(&self, url: &str) -> Result<DynamicImage> {
            Err(SearchError::Poster(format!("no poster for {url}")))
        }
    }

    fn movie(title: &str, vote: f64) -> MovieSummary {
        MovieSummary {
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", title.to_lowercase())),
            vote_average: vote,
            overview: "...".to_string(),
        }
    }

    fn batman_movies() -> Vec<MovieSummary> {
        vec![movie("Batman", 7.9), movie("Batman Returns", 6.9)]
    }

    fn wait_for_message(app: &mut App) {
        let message = app
            .receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("background search never answered");
        app.handle_message(message);
    }

    #[test]
    fn test_blank_submit_reloads_without_request() {
        let source = Arc::new(MockSource::new(Reply::Movies(batman_movies())));
        let mut app = App::new(source.clone(), &Config::default());
        app.container.render(&batman_movies(), "https://img");
        app.status = Some(Status::info("old"));
        app.search_term = "   \t ".to_string();

        assert_eq!(app.submit_search(), SubmitOutcome::Reloaded);

        assert_eq!(app.container.content(), &ContainerContent::Welcome);
        assert!(app.search_term.is_empty());
        assert!(app.status.is_none());
        assert!(!app.is_searching());
        assert!(source.calls().is_empty());
        assert!(app.receiver.try_recv().is_err());
    }

    #[test]
    fn test_submit_searches_raw_term_and_renders() {
        let source = Arc::new(MockSource::new(Reply::Movies(batman_movies())));
        let mut app = App::new(source.clone(), &Config::default());
        app.search_term = " batman ".to_string();

        let outcome = app.submit_search();
        assert_eq!(outcome, SubmitOutcome::Dispatched(1));
        assert!(app.search_term.is_empty());
        assert!(app.is_searching());

        wait_for_message(&mut app);

        assert_eq!(source.calls(), vec![" batman ".to_string()]);
        assert!(!app.is_searching());
        let cards = app.container.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "Batman");
        assert_eq!(cards[0].rating_class, RatingClass::Medium);
        assert_eq!(cards[1].rating_class, RatingClass::Medium);
        assert_eq!(app.selected_card().map(|c| c.title.as_str()), Some("Batman"));
        let status = app.status.clone().unwrap();
        assert!(!status.is_error);
        assert_eq!(status.message, "2 result(s) for \" batman \"");
    }

    #[test]
    fn test_input_clears_before_response_arrives() {
        let (source, release) = MockSource::gated(Reply::Movies(vec![movie("Heat", 8.3)]));
        let source = Arc::new(source);
        let mut app = App::new(source.clone(), &Config::default());
        app.search_term = "heat".to_string();

        app.submit_search();
        assert!(app.search_term.is_empty());
        assert_eq!(app.container.content(), &ContainerContent::Welcome);

        release.send(()).unwrap();
        wait_for_message(&mut app);

        assert_eq!(source.calls(), vec!["heat".to_string()]);
        assert_eq!(app.container.cards()[0].rating_class, RatingClass::High);
    }

    #[test]
    fn test_empty_results_render_placeholder() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());
        app.search_term = "zzzzqqq".to_string();

        app.submit_search();
        wait_for_message(&mut app);

        assert_eq!(app.container.content(), &ContainerContent::NoMovies);
        assert!(app.selected_card().is_none());
    }

    #[test]
    fn test_failure_leaves_container_untouched() {
        let source = Arc::new(MockSource::new(Reply::Fail));
        let mut app = App::new(source.clone(), &Config::default());
        app.container.render(&batman_movies(), "https://img");
        let before = app.container.clone();
        app.search_term = "batman".to_string();

        app.submit_search();
        wait_for_message(&mut app);

        assert_eq!(app.container, before);
        assert!(!app.is_searching());
        let status = app.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.message.contains("failed"));
        assert_eq!(source.calls().len(), 1);
    }

    #[test]
    fn test_only_latest_search_updates_container() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());

        let first = app.dispatch_search("alien".to_string());
        let second = app.dispatch_search("aliens".to_string());
        assert!(second > first);

        app.handle_message(SearchMessage::Results {
            request_id: second,
            term: "aliens".to_string(),
            movies: vec![movie("Aliens", 8.4)],
        });
        app.handle_message(SearchMessage::Results {
            request_id: first,
            term: "alien".to_string(),
            movies: vec![movie("Alien", 8.5), movie("Alien 3", 6.4)],
        });

        let titles: Vec<_> = app.container.cards().iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, vec!["Aliens".to_string()]);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn error_lines(&self) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .filter(|line| line.contains(" ERROR "))
                .count()
        }
    }

    /// Runs `f` with a thread-local subscriber and returns what it logged.
    fn with_captured_log<F: FnOnce()>(f: F) -> CapturedLog {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        log
    }

    #[test]
    fn test_current_failure_logs_one_error() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());
        app.container.render(&batman_movies(), "https://img");
        let before = app.container.clone();
        let request_id = app.dispatch_search("batman".to_string());

        let log = with_captured_log(|| {
            app.handle_message(SearchMessage::Failed {
                request_id,
                term: "batman".to_string(),
                error: SearchError::InvalidResponseShape("missing field `results`".to_string()),
            });
        });

        assert_eq!(log.error_lines(), 1);
        assert_eq!(app.container, before);
    }

    #[test]
    fn test_results_log_no_errors() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());
        let stale = app.dispatch_search("alien".to_string());
        let current = app.dispatch_search("aliens".to_string());

        let log = with_captured_log(|| {
            app.handle_message(SearchMessage::Results {
                request_id: current,
                term: "aliens".to_string(),
                movies: vec![movie("Aliens", 8.4)],
            });
            app.handle_message(SearchMessage::Results {
                request_id: stale,
                term: "alien".to_string(),
                movies: vec![movie("Alien", 8.5)],
            });
        });

        assert_eq!(log.error_lines(), 0);
        assert_eq!(app.container.cards().len(), 1);
    }

    #[test]
    fn test_stale_failure_does_not_touch_status() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());

        let first = app.dispatch_search("a".to_string());
        let second = app.dispatch_search("b".to_string());
        app.handle_message(SearchMessage::Failed {
            request_id: first,
            term: "a".to_string(),
            error: SearchError::InvalidResponseShape("x".to_string()),
        });

        assert!(app.status.is_none());
        assert_eq!(app.pending.as_ref().map(|p| p.request_id), Some(second));
    }

    #[test]
    fn test_reload_orphans_in_flight_search() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());

        let request_id = app.dispatch_search("batman".to_string());
        app.reload();
        app.handle_message(SearchMessage::Results {
            request_id,
            term: "batman".to_string(),
            movies: batman_movies(),
        });

        assert_eq!(app.container.content(), &ContainerContent::Welcome);
    }

    #[test]
    fn test_selection_wraps_around() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());
        app.next_card();
        assert_eq!(app.selected_card_index, 0);

        let request_id = app.dispatch_search("x".to_string());
        app.handle_message(SearchMessage::Results {
            request_id,
            term: "x".to_string(),
            movies: vec![movie("A", 1.0), movie("B", 2.0), movie("C", 3.0)],
        });

        app.previous_card();
        assert_eq!(app.selected_card_index, 2);
        assert_eq!(app.list_state.selected(), Some(2));
        app.next_card();
        assert_eq!(app.selected_card_index, 0);
        app.next_card();
        assert_eq!(app.selected_card().map(|c| c.title.as_str()), Some("B"));
    }

    #[test]
    fn test_posters_not_fetched_without_picker() {
        let source = Arc::new(MockSource::new(Reply::Movies(Vec::new())));
        let mut app = App::new(source, &Config::default());

        let request_id = app.dispatch_search("x".to_string());
        app.handle_message(SearchMessage::Results {
            request_id,
            term: "x".to_string(),
            movies: vec![movie("Heat", 8.3)],
        });

        assert_eq!(
            app.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/heat.jpg")
        );
        assert!(!app.loading_poster);

        app.handle_message(SearchMessage::PosterFailed {
            url: "https://image.tmdb.org/t/p/w500/heat.jpg".to_string(),
            error: SearchError::Poster("404".to_string()),
        });
        assert!(app.poster_protocol.is_none());
    }
}
