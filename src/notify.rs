//! Transient user-facing notifications ("toasts").

use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::error::{CropError, Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => Level::Warning,
            Severity::Error => Level::Error,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub level: Level,
    pub title: Option<String>,
    pub description: String,
    created: Instant,
}

impl Toast {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created)
    }
}

pub struct Notifications {
    toasts: Vec<Toast>,
    lifetime: Duration,
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, level: Level, title: Option<&str>, description: impl Into<String>) {
        let description = description.into();
        match level {
            Level::Info => info!("{}{}", prefix(title), description),
            Level::Warning => warn!("{}{}", prefix(title), description),
            Level::Error => error!("{}{}", prefix(title), description),
        }
        self.toasts.push(Toast {
            level,
            title: title.map(str::to_string),
            description,
            created: Instant::now(),
        });
    }

    pub fn info(&mut self, description: impl Into<String>) {
        self.push(Level::Info, None, description);
    }

    /// Warnings show only the message; errors get `title` as a heading.
    pub fn report(&mut self, title: &str, err: &CropError) {
        let level = Level::from(err.severity());
        let title = (level == Level::Error).then_some(title);
        self.push(level, title, err.to_string());
    }

    /// Drop toasts older than the configured lifetime.
    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.toasts.retain(|toast| toast.age(now) < lifetime);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.toasts.len() {
            self.toasts.remove(index);
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

fn prefix(title: Option<&str>) -> String {
    title.map(|t| format!("{}: ", t)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_becomes_an_untitled_warning() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        notifications.report("Error Loading Image", &CropError::InvalidInput);

        let toast = &notifications.toasts()[0];
        assert_eq!(toast.level, Level::Warning);
        assert_eq!(toast.title, None);
        assert_eq!(toast.description, "Not a valid image");
    }

    #[test]
    fn errors_keep_their_title_and_message() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        notifications.report("Error Saving Crop", &CropError::NoImage);

        let toast = &notifications.toasts()[0];
        assert_eq!(toast.level, Level::Error);
        assert_eq!(toast.title.as_deref(), Some("Error Saving Crop"));
        assert_eq!(toast.description, "no image loaded");
    }

    #[test]
    fn old_toasts_expire() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        notifications.info("Saved");
        notifications.expire(Instant::now());
        assert!(!notifications.is_empty());

        notifications.expire(Instant::now() + Duration::from_secs(5));
        assert!(notifications.is_empty());
    }

    #[test]
    fn dismiss_ignores_stale_indices() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        notifications.info("a");
        notifications.dismiss(3);
        assert_eq!(notifications.toasts().len(), 1);
        notifications.dismiss(0);
        assert!(notifications.is_empty());
    }
}
