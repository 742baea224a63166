use std::sync::{Arc, Mutex};
use std::time::Duration;

use askama::Template;
use serde::Serialize;

use crate::lock;
use crate::site::SiteProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Error,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Success => "success",
            FeedbackKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    /// Plain text; line breaks separate individual messages.
    pub text: String,
    pub dismiss_after: Option<Duration>,
    pub scroll_into_view: bool,
}

#[derive(Template)]
#[template(path = "feedback.html")]
struct FeedbackTemplate<'a> {
    kind: &'a str,
    lines: Vec<&'a str>,
}

impl FeedbackMessage {
    pub fn success(profile: &SiteProfile) -> Self {
        Self {
            kind: FeedbackKind::Success,
            text: profile.success_text.to_string(),
            dismiss_after: profile.success_dismiss,
            scroll_into_view: profile.scroll_into_view,
        }
    }

    pub fn error(profile: &SiteProfile, text: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            text: text.into(),
            dismiss_after: profile.error_dismiss,
            scroll_into_view: profile.scroll_into_view,
        }
    }

    /// Error message listing every violated rule, one per line.
    pub fn validation(profile: &SiteProfile, errors: &[String]) -> Self {
        Self::error(profile, errors.join("\n"))
    }

    pub fn render_html(&self) -> String {
        let template = FeedbackTemplate {
            kind: self.kind.as_str(),
            lines: self.text.lines().collect(),
        };
        template.render().unwrap_or_default()
    }
}

/// Where the controller shows its outcome messages.
pub trait FeedbackSurface: Send + Sync {
    fn show(&self, message: FeedbackMessage);
}

/// Holds at most one visible message and removes it when its timer elapses.
///
/// A timer only clears the message it was scheduled for: showing a new
/// message bumps the generation, so timers of replaced messages do nothing.
#[derive(Clone)]
pub struct FeedbackBoard {
    inner: Arc<Mutex<Board>>,
    auto_dismiss: bool,
}

#[derive(Default)]
struct Board {
    generation: u64,
    current: Option<FeedbackMessage>,
}

impl Default for FeedbackBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackBoard {
    pub fn new() -> Self {
        Self {
            inner: Arc::default(),
            auto_dismiss: true,
        }
    }

    /// A board that keeps its message until replaced; dismiss delays are
    /// left to whoever renders it.
    pub fn without_timers() -> Self {
        Self {
            auto_dismiss: false,
            ..Self::new()
        }
    }

    pub fn current(&self) -> Option<FeedbackMessage> {
        lock(&self.inner).current.clone()
    }

    pub fn dismiss(&self) {
        let mut board = lock(&self.inner);
        board.generation += 1;
        board.current = None;
    }
}

impl FeedbackSurface for FeedbackBoard {
    fn show(&self, message: FeedbackMessage) {
        let delay = message.dismiss_after;
        let generation = {
            let mut board = lock(&self.inner);
            board.generation += 1;
            board.current = Some(message);
            board.generation
        };

        let Some(delay) = delay.filter(|_| self.auto_dismiss) else {
            return;
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No runtime available, feedback message will not auto-dismiss");
            return;
        };

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut board = lock(&inner);
            if board.generation == generation {
                board.current = None;
            }
        });
    }
}
