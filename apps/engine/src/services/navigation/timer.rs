//! Play timer: counts real elapsed play time, exactly once per article.
//!
//! The clock starts only after the very first article's content finishes
//! loading, pauses while any later navigation is loading, resumes when the
//! load completes, and stops permanently when the game is won. Dropped and
//! debounced navigation events never reach these methods, so they can
//! neither pause nor double-count.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Default)]
pub struct PlayTimer {
    accumulated: Duration,
    running_since: Option<Instant>,
    started: bool,
    stopped: bool,
}

impl PlayTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A content load began; pause the clock. Before the first load
    /// completes there is nothing to pause.
    pub fn load_started(&mut self) {
        if self.stopped {
            return;
        }
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// A content load ended (successfully or not). Starts the clock on the
    /// first call, resumes it on every later one. Idempotent while running.
    pub fn load_finished(&mut self) {
        if self.stopped {
            return;
        }
        self.started = true;
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Stop permanently; later loads no longer move the clock.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Total play time so far: everything after the first load completed,
    /// minus loading pauses.
    pub fn elapsed(&self) -> Duration {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        self.accumulated + running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    #[tokio::test(start_paused = true)]
    async fn does_not_count_before_first_load_completes() {
        let mut timer = PlayTimer::new();
        timer.load_started();
        advance(Duration::from_secs(5)).await;
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.load_finished();
        advance(Duration::from_secs(10)).await;
        assert_eq!(timer.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_during_loads_and_resumes_after() {
        let mut timer = PlayTimer::new();
        timer.load_finished(); // first article loaded
        advance(Duration::from_secs(10)).await;

        timer.load_started(); // second navigation loading
        advance(Duration::from_secs(3)).await;
        timer.load_finished();
        advance(Duration::from_secs(2)).await;

        // 10s + 2s of play; the 3s load pause is excluded.
        assert_eq!(timer.elapsed(), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_load_finished_does_not_double_count() {
        let mut timer = PlayTimer::new();
        timer.load_finished();
        advance(Duration::from_secs(4)).await;
        timer.load_finished();
        advance(Duration::from_secs(4)).await;
        assert_eq!(timer.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_permanent() {
        let mut timer = PlayTimer::new();
        timer.load_finished();
        advance(Duration::from_secs(7)).await;
        timer.stop();
        advance(Duration::from_secs(30)).await;
        assert_eq!(timer.elapsed(), Duration::from_secs(7));

        timer.load_started();
        timer.load_finished();
        advance(Duration::from_secs(5)).await;
        assert_eq!(timer.elapsed(), Duration::from_secs(7));
        assert!(timer.is_stopped());
    }
}
