//! Progress spinner shown on stderr while a request is in flight.

use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::time::Duration;

/// A running spinner. Stopped and erased when dropped, so every exit path of
/// the caller clears it.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start spinning with a message. Nothing is drawn when stderr is not a
    /// terminal.
    pub fn start(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = if atty::is(atty::Stream::Stderr) {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
