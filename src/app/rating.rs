use ratatui::style::Color;

/// Category of a vote average, used to color the rating badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingClass {
    High,
    Medium,
    Low,
}

impl RatingClass {
    pub fn label(self) -> &'static str {
        match self {
            RatingClass::High => "high",
            RatingClass::Medium => "medium",
            RatingClass::Low => "low",
        }
    }

    pub fn color(self) -> Color {
        match self {
            RatingClass::High => Color::Green,
            RatingClass::Medium => Color::Yellow,
            RatingClass::Low => Color::Red,
        }
    }
}

/// Buckets a vote average. Both thresholds are closed lower bounds, and
/// anything failing both comparisons (NaN included) is `Low`.
pub fn classify(vote: f64) -> RatingClass {
    if vote >= 8.0 {
        RatingClass::High
    } else if vote >= 5.0 {
        RatingClass::Medium
    } else {
        RatingClass::Low
    }
}

/// Badge text: the vote average to one decimal place.
pub fn format_rating(vote: f64) -> String {
    format!("{:.1}", vote)
}
