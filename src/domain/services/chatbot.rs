use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use chrono::{Local, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::domain::models::chat::ChatMessage;
use crate::domain::ports::{ChatRepository, CinemaFilter, CinemaRepository, MovieRepository, SessionFilter, SessionRepository};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Farewell,
    MovieRecommendation,
    NearbyCinemas,
    PriceInfo,
    SessionTimes,
    BookingHelp,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::MovieRecommendation => "movie_recommendation",
            Intent::NearbyCinemas => "nearby_cinemas",
            Intent::PriceInfo => "price_info",
            Intent::SessionTimes => "session_times",
            Intent::BookingHelp => "booking_help",
            Intent::Fallback => "fallback",
        }
    }
}

static GREETING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(hello|hi|hey|good (morning|afternoon|evening))\b").unwrap());
static FAREWELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(bye|goodbye|see you|thanks,? bye)\b").unwrap());
static RECOMMEND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(recommend|suggest|what.{0,20}watch|popular movie)\b").unwrap());
static CINEMAS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(cinema|theater|theatre|nearby|closest|where)\b").unwrap());
static PRICES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(price|cost|how much|fee|discount)\b").unwrap());
static SESSIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(session|showtime|screening|what time|today'?s)\b").unwrap());
static BOOKING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(book|booking|reserve|reservation|cancel|refund|ticket)\b").unwrap());

/// Keyword dispatch, first match wins. Order matters: booking phrasing often
/// contains "ticket"/"price" words, so the more specific intents go first.
pub fn classify(message: &str) -> Intent {
    if FAREWELL.is_match(message) {
        Intent::Farewell
    } else if GREETING.is_match(message) {
        Intent::Greeting
    } else if RECOMMEND.is_match(message) {
        Intent::MovieRecommendation
    } else if SESSIONS.is_match(message) {
        Intent::SessionTimes
    } else if PRICES.is_match(message) {
        Intent::PriceInfo
    } else if CINEMAS.is_match(message) {
        Intent::NearbyCinemas
    } else if BOOKING.is_match(message) {
        Intent::BookingHelp
    } else {
        Intent::Fallback
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub intent: String,
    pub suggestions: Vec<String>,
    pub follow_up: Option<String>,
    pub data: Option<serde_json::Value>,
}

pub struct ChatbotService {
    movies: Arc<dyn MovieRepository>,
    cinemas: Arc<dyn CinemaRepository>,
    sessions: Arc<dyn SessionRepository>,
    chats: Arc<dyn ChatRepository>,
}

impl ChatbotService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        cinemas: Arc<dyn CinemaRepository>,
        sessions: Arc<dyn SessionRepository>,
        chats: Arc<dyn ChatRepository>,
    ) -> Self {
        Self { movies, cinemas, sessions, chats }
    }

    pub async fn respond(&self, user_id: Option<String>, message: &str) -> Result<ChatReply, AppError> {
        let intent = classify(message);
        debug!(intent = intent.as_str(), "Chatbot classified message");

        let reply = match intent {
            Intent::Greeting => ChatReply {
                response: "Hello! Welcome to the cinema assistant. How can I help you today?".into(),
                intent: intent.as_str().into(),
                suggestions: vec![
                    "Recommend a movie".into(),
                    "Show nearby cinemas".into(),
                    "Current ticket prices".into(),
                ],
                follow_up: Some("What would you like to know?".into()),
                data: None,
            },
            Intent::Farewell => ChatReply {
                response: "Thanks for stopping by. Enjoy the movie!".into(),
                intent: intent.as_str().into(),
                suggestions: vec![],
                follow_up: None,
                data: None,
            },
            Intent::MovieRecommendation => self.recommend_movies(intent).await?,
            Intent::NearbyCinemas => self.list_cinemas(intent).await?,
            Intent::PriceInfo => self.price_info(intent).await?,
            Intent::SessionTimes => self.session_times(intent).await?,
            Intent::BookingHelp => ChatReply {
                response: "To book, pick a session, choose your seats and confirm; you'll get an 8-character booking code and a QR ticket. \
                           Bookings can be cancelled up to 2 hours before the session starts."
                    .into(),
                intent: intent.as_str().into(),
                suggestions: vec![
                    "Today's sessions".into(),
                    "How do I cancel?".into(),
                    "Ticket prices".into(),
                ],
                follow_up: None,
                data: None,
            },
            Intent::Fallback => ChatReply {
                response: "I did not quite get that. I can recommend movies, find cinemas, list session times or explain booking.".into(),
                intent: intent.as_str().into(),
                suggestions: vec![
                    "Recommend a movie".into(),
                    "Show nearby cinemas".into(),
                    "Session times".into(),
                    "Ticket prices".into(),
                ],
                follow_up: Some("Try one of the options above.".into()),
                data: None,
            },
        };

        let record = ChatMessage::new(user_id, message.to_string(), reply.response.clone(), reply.intent.clone());
        self.chats.create(&record).await?;

        Ok(reply)
    }

    async fn recommend_movies(&self, intent: Intent) -> Result<ChatReply, AppError> {
        let movies = self.movies.list_popular(5).await?;
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();

        let response = if titles.is_empty() {
            "Nothing is trending right now, but new releases land every week.".to_string()
        } else {
            format!("Currently popular: {}.", titles.join(", "))
        };

        Ok(ChatReply {
            response,
            intent: intent.as_str().into(),
            suggestions: vec!["Session times for these".into(), "Show nearby cinemas".into()],
            follow_up: Some("Want session times for any of them?".into()),
            data: Some(json!({ "movies": movies })),
        })
    }

    async fn list_cinemas(&self, intent: Intent) -> Result<ChatReply, AppError> {
        let filter = CinemaFilter { page: 1, limit: 5, ..Default::default() };
        let (cinemas, _) = self.cinemas.list(&filter).await?;

        let lines: Vec<String> = cinemas
            .iter()
            .map(|c| format!("{} ({}, {})", c.name, c.district, c.city))
            .collect();

        let response = if lines.is_empty() {
            "No cinemas are registered yet.".to_string()
        } else {
            format!("Here are some cinemas: {}.", lines.join("; "))
        };

        Ok(ChatReply {
            response,
            intent: intent.as_str().into(),
            suggestions: vec!["Movies showing there".into(), "Ticket prices".into()],
            follow_up: None,
            data: Some(json!({ "cinemas": cinemas })),
        })
    }

    async fn price_info(&self, intent: Intent) -> Result<ChatReply, AppError> {
        let filter = SessionFilter {
            date: Some(Local::now().date_naive()),
            page: 1,
            limit: 50,
            ..Default::default()
        };
        let (sessions, _) = self.sessions.list(&filter).await?;

        let response = match (
            sessions.iter().map(|s| s.standard_price).min(),
            sessions.iter().map(|s| s.vip_price).max(),
        ) {
            (Some(min), Some(max)) => format!(
                "Today's tickets range from {:.2} (standard) up to {:.2} (VIP). Student, 65+ age and Wednesday discounts apply at checkout.",
                min as f64 / 100.0,
                max as f64 / 100.0
            ),
            _ => "There are no sessions scheduled today, so no prices to show.".to_string(),
        };

        Ok(ChatReply {
            response,
            intent: intent.as_str().into(),
            suggestions: vec!["Today's sessions".into(), "Discounted tickets".into()],
            follow_up: None,
            data: None,
        })
    }

    async fn session_times(&self, intent: Intent) -> Result<ChatReply, AppError> {
        let filter = SessionFilter {
            date: Some(Local::now().date_naive()),
            page: 1,
            limit: 10,
            ..Default::default()
        };
        let (sessions, _) = self.sessions.list(&filter).await?;

        // One title lookup per distinct movie.
        let mut titles: HashMap<String, String> = HashMap::new();
        for session in &sessions {
            if titles.contains_key(&session.movie_id) {
                continue;
            }
            if let Some(movie) = self.movies.find_by_id(&session.movie_id).await? {
                titles.insert(session.movie_id.clone(), movie.title);
            }
        }

        let lines: Vec<String> = sessions
            .iter()
            .map(|s| {
                let title = titles.get(&s.movie_id).map(String::as_str).unwrap_or("Unknown movie");
                format!("{} at {}", title, s.start_time.format("%H:%M"))
            })
            .collect();

        let response = if lines.is_empty() {
            "There are no sessions scheduled for today.".to_string()
        } else {
            format!("Today's sessions: {}.", lines.join("; "))
        };

        Ok(ChatReply {
            response,
            intent: intent.as_str().into(),
            suggestions: vec!["Book a ticket".into(), "Ticket prices".into()],
            follow_up: None,
            data: Some(json!({ "sessions": sessions, "generated_at": Utc::now() })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_phrasings() {
        assert_eq!(classify("Hello there"), Intent::Greeting);
        assert_eq!(classify("ok bye"), Intent::Farewell);
        assert_eq!(classify("can you recommend something to watch"), Intent::MovieRecommendation);
        assert_eq!(classify("which cinema is closest to me"), Intent::NearbyCinemas);
        assert_eq!(classify("how much is a ticket"), Intent::PriceInfo);
        assert_eq!(classify("what time is the screening"), Intent::SessionTimes);
        assert_eq!(classify("how do I cancel my booking"), Intent::BookingHelp);
        assert_eq!(classify("lorem ipsum"), Intent::Fallback);
    }

    #[test]
    fn farewell_wins_over_greeting() {
        assert_eq!(classify("hi, actually never mind, bye"), Intent::Farewell);
    }
}
