//! Transient user-visible messages.

use std::time::Duration;

use jiff::Timestamp;
use serde::Serialize;
use ts_rs::TS;

/// How long a notice stays on screen after being posted.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    /// Hex text color for messages in this tone.
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Success => "#008000",
            Tone::Warning => "#FFA500",
            Tone::Error => "#FF0000",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Notice {
    pub title: Option<String>,
    pub text: String,
    pub tone: Tone,
    #[ts(type = "string")]
    pub posted_at: Timestamp,
}

impl Notice {
    pub fn new(tone: Tone, text: impl Into<String>, posted_at: Timestamp) -> Self {
        Self {
            title: None,
            text: text.into(),
            tone,
            posted_at,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn expires_at(&self) -> Timestamp {
        self.posted_at
            .checked_add(NOTICE_TTL)
            .unwrap_or(Timestamp::MAX)
    }

    pub fn is_visible_at(&self, now: Timestamp) -> bool {
        now < self.expires_at()
    }
}

/// Holds at most one notice. Posting replaces the previous notice and
/// restarts the timer.
#[derive(Debug, Clone, Default)]
pub struct NoticeSlot {
    current: Option<Notice>,
}

impl NoticeSlot {
    pub fn post(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    pub fn post_now(&mut self, tone: Tone, text: impl Into<String>) {
        self.post(Notice::new(tone, text, Timestamp::now()));
    }

    /// The current notice, if it has not expired by `now`.
    pub fn visible_at(&self, now: Timestamp) -> Option<&Notice> {
        self.current.as_ref().filter(|n| n.is_visible_at(now))
    }

    /// Drop the notice once it has expired. Returns true if one was cleared.
    pub fn expire(&mut self, now: Timestamp) -> bool {
        match &self.current {
            Some(notice) if !notice.is_visible_at(now) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The last notice posted, regardless of expiry.
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
