//! Status signals emitted by the layout controller.
//!
//! A status is a coarse, informational summary of the last thing that
//! happened to the layout. Observers only ever care about the latest value.

use std::fmt;
use std::str::FromStr;
use tokio::sync::watch;

/// Layout status vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutStatus {
    /// No grid engine attached yet.
    #[default]
    NotInitialized,
    /// Engine attached and initial content shown.
    Ready,
    /// The engine reported an add, remove or in-place change.
    Changed,
    /// A widget was inserted by the add command.
    AddedWidget,
    /// The current arrangement was persisted.
    Saved,
    /// The persisted arrangement was applied.
    Loaded,
    /// Nothing valid was persisted; the default arrangement was applied.
    LoadedDefault,
    /// Persisted arrangement cleared and default applied.
    Reset,
}

impl LayoutStatus {
    /// All variants, in lifecycle order.
    pub const ALL: [LayoutStatus; 8] = [
        LayoutStatus::NotInitialized,
        LayoutStatus::Ready,
        LayoutStatus::Changed,
        LayoutStatus::AddedWidget,
        LayoutStatus::Saved,
        LayoutStatus::Loaded,
        LayoutStatus::LoadedDefault,
        LayoutStatus::Reset,
    ];

    /// The signal's wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutStatus::NotInitialized => "not initialized",
            LayoutStatus::Ready => "ready",
            LayoutStatus::Changed => "changed",
            LayoutStatus::AddedWidget => "added widget",
            LayoutStatus::Saved => "saved",
            LayoutStatus::Loaded => "loaded",
            LayoutStatus::LoadedDefault => "loaded default",
            LayoutStatus::Reset => "reset",
        }
    }
}

impl fmt::Display for LayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing LayoutStatus from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid layout status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for LayoutStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Receiver of status signals.
///
/// Called synchronously from inside the command that produced the signal.
/// There is no buffering: an observer that needs history must keep it.
pub trait StatusObserver: Send + Sync {
    /// Called with the new status.
    fn status_changed(&self, status: LayoutStatus);
}

impl<F> StatusObserver for F
where
    F: Fn(LayoutStatus) + Send + Sync,
{
    fn status_changed(&self, status: LayoutStatus) {
        self(status)
    }
}

/// Observer that publishes into a `watch` channel, so any number of readers
/// can poll the latest status.
pub fn watch_observer(tx: watch::Sender<LayoutStatus>) -> impl StatusObserver {
    move |status: LayoutStatus| {
        tx.send_replace(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_display_uses_wire_strings() {
        assert_eq!(LayoutStatus::NotInitialized.to_string(), "not initialized");
        assert_eq!(LayoutStatus::AddedWidget.to_string(), "added widget");
        assert_eq!(LayoutStatus::LoadedDefault.to_string(), "loaded default");
    }

    #[test]
    fn test_parse_roundtrips_every_variant() {
        for status in LayoutStatus::ALL {
            let parsed: LayoutStatus = status.to_string().parse().expect("should parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("Ready".parse::<LayoutStatus>().is_err());
        assert!("loaded-default".parse::<LayoutStatus>().is_err());
        let err = "bogus".parse::<LayoutStatus>().expect_err("should fail");
        assert_eq!(err.to_string(), "invalid layout status: bogus");
    }

    #[test]
    fn test_default_is_not_initialized() {
        assert_eq!(LayoutStatus::default(), LayoutStatus::NotInitialized);
    }

    #[test]
    fn test_closure_observer_receives_status() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = move |status: LayoutStatus| {
            sink.lock().expect("lock").push(status);
        };
        observer.status_changed(LayoutStatus::Ready);
        observer.status_changed(LayoutStatus::Saved);
        assert_eq!(
            *seen.lock().expect("lock"),
            vec![LayoutStatus::Ready, LayoutStatus::Saved]
        );
    }

    #[test]
    fn test_watch_observer_keeps_latest_value() {
        let (tx, rx) = watch::channel(LayoutStatus::default());
        let observer = watch_observer(tx);
        observer.status_changed(LayoutStatus::Ready);
        observer.status_changed(LayoutStatus::Changed);
        assert_eq!(*rx.borrow(), LayoutStatus::Changed);
    }

    #[test]
    fn test_watch_observer_reaches_late_subscriber() {
        let (tx, rx) = watch::channel(LayoutStatus::default());
        let mut late = tx.subscribe();
        drop(rx);
        let observer = watch_observer(tx);
        observer.status_changed(LayoutStatus::Reset);
        assert!(late.has_changed().expect("sender alive"));
        assert_eq!(*late.borrow_and_update(), LayoutStatus::Reset);
    }
}
