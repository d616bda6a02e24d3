use std::fmt;
use std::time::Duration;

use tracing::debug;

use super::condition::{Always, Condition};
use super::executor::Next;

mod options;

pub use self::options::{attempts, delay, on_retry, retry_if, units, RetryOption};

/// Observer invoked after every failed attempt with the zero-based attempt
/// index and the error of that attempt.
pub type OnRetry<'a, E> = Box<dyn FnMut(u32, &E) + Send + 'a>;

/// Retry configuration.
///
/// Implements `Default`, which allows 10 attempts with a delay of
/// 100 milliseconds between them, observes nothing and retries on every error.
///
/// The configuration is consumed by the loop that runs it, so every retried
/// operation owns its own copy of the policy.
///
/// # Example
///
/// ```rust
/// # use std::time::Duration;
/// # use fixed_retry::Config;
/// #
/// # fn main() {
/// let mut calls = 0;
/// let result = Config::default()
///     .with_attempts(3)
///     .with_delay(5)
///     .with_units(Duration::from_millis(1))
///     .retry(|| {
///         calls += 1;
///         if calls < 2 { Err("not yet") } else { Ok(calls) }
///     });
///
/// assert_eq!(result.unwrap(), 2);
/// # }
/// ```
pub struct Config<'a, E> {
    attempts: u32,
    delay: u32,
    units: Duration,
    on_retry: OnRetry<'a, E>,
    retry_if: Box<dyn Condition<E> + Send + 'a>,
}

impl<'a, E> Default for Config<'a, E> {
    fn default() -> Config<'a, E> {
        Config {
            attempts: 10,
            delay: 100,
            units: Duration::from_millis(1),
            on_retry: Box::new(|_: u32, _: &E| {}),
            retry_if: Box::new(Always),
        }
    }
}

impl<'a, E> fmt::Debug for Config<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("attempts", &self.attempts)
            .field("delay", &self.delay)
            .field("units", &self.units)
            .finish()
    }
}

impl<'a, E> Config<'a, E> {
    /// Builds a configuration by applying `options` to the defaults, in order.
    ///
    /// Later options override earlier ones touching the same field. Values are
    /// taken as given; an attempt budget of 0 still runs the operation once.
    pub fn from_options<I>(options: I) -> Config<'a, E>
    where
        I: IntoIterator<Item = RetryOption<'a, E>>,
    {
        options
            .into_iter()
            .fold(Config::default(), |mut config, option| {
                option.apply(&mut config);
                config
            })
    }

    /// Sets the maximum number of times the operation is invoked.
    ///
    /// By default the operation is attempted 10 times.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the delay magnitude, measured in [`units`](Config::with_units).
    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the unit the delay is measured in.
    ///
    /// By default the unit is one millisecond.
    pub fn with_units(mut self, units: Duration) -> Self {
        self.units = units;
        self
    }

    /// Sets the observer called after each failed attempt.
    pub fn with_on_retry<F>(mut self, on_retry: F) -> Self
    where
        F: FnMut(u32, &E) + Send + 'a,
    {
        self.on_retry = Box::new(on_retry);
        self
    }

    /// Sets the condition deciding whether another attempt is made.
    pub fn with_retry_if<C>(mut self, condition: C) -> Self
    where
        C: Condition<E> + Send + 'a,
    {
        self.retry_if = Box::new(condition);
        self
    }

    /// The attempt budget.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The delay magnitude.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// The unit of the delay.
    pub fn units(&self) -> Duration {
        self.units
    }

    /// The time slept between two attempts, `units * delay`.
    pub fn delay_duration(&self) -> Duration {
        self.units.saturating_mul(self.delay)
    }

    // The first attempt always runs, so a budget of 0 behaves like 1 here.
    fn is_last_attempt(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) >= self.attempts
    }

    pub(crate) fn should_run(&self, attempt: u32) -> bool {
        attempt == 0 || attempt < self.attempts
    }

    /// Records a failed attempt and decides what happens next.
    pub(crate) fn after_failure(&mut self, attempt: u32, error: &E) -> Next {
        (self.on_retry)(attempt, error);
        debug!(attempt, attempts = self.attempts, "attempt failed");

        if !self.retry_if.should_retry(error) {
            debug!(attempt, "retry condition declined, giving up");
            return Next::Stop;
        }
        if self.is_last_attempt(attempt) {
            debug!(attempts = self.attempts, "attempt budget exhausted");
            return Next::Stop;
        }
        Next::Retry(self.delay_duration())
    }

    pub(crate) fn set_on_retry(&mut self, on_retry: OnRetry<'a, E>) {
        self.on_retry = on_retry;
    }

    pub(crate) fn set_retry_if(&mut self, retry_if: Box<dyn Condition<E> + Send + 'a>) {
        self.retry_if = retry_if;
    }

    pub(crate) fn set_attempts(&mut self, attempts: u32) {
        self.attempts = attempts;
    }

    pub(crate) fn set_delay(&mut self, delay: u32) {
        self.delay = delay;
    }

    pub(crate) fn set_units(&mut self, units: Duration) {
        self.units = units;
    }
}
