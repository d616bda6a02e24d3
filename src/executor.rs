use std::thread;
use std::time::Duration;

use tracing::trace;

use super::action::Action;
use super::config::{Config, RetryOption};
use super::error::Error;

/// What the loop does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    /// Wait for the given duration, then attempt again.
    Retry(Duration),
    /// Give up and report the collected errors.
    Stop,
}

/// Runs `action` until it succeeds, using the defaults overridden by `options`.
///
/// Blocks the calling thread, including while waiting between attempts.
/// Returns the item of the first successful attempt, or every error observed
/// when the attempt budget runs out or the retry condition gives up.
///
/// # Example
///
/// ```rust
/// use fixed_retry::{attempts, delay, retry};
///
/// let mut calls = 0;
/// let result = retry(
///     || {
///         calls += 1;
///         Err::<(), _>(format!("failure {}", calls))
///     },
///     vec![attempts(3), delay(0)],
/// );
///
/// let err = result.unwrap_err();
/// assert_eq!(err.len(), 3);
/// assert_eq!(err.to_string(), "failure 3");
/// ```
pub fn retry<'a, A, I>(action: A, options: I) -> Result<A::Item, Error<A::Error>>
where
    A: Action,
    I: IntoIterator<Item = RetryOption<'a, A::Error>>,
{
    Config::from_options(options).retry(action)
}

impl<'a, E> Config<'a, E> {
    /// Run the given action, retrying on failure according to this configuration.
    ///
    /// The first attempt always runs, even with an attempt budget of 0.
    pub fn retry<A>(mut self, mut action: A) -> Result<A::Item, Error<E>>
    where
        A: Action<Error = E>,
    {
        let mut errors = Vec::new();
        let mut attempt = 0;

        while self.should_run(attempt) {
            let err = match action.run() {
                Ok(item) => return Ok(item),
                Err(err) => err,
            };
            let next = self.after_failure(attempt, &err);
            errors.push(err);

            match next {
                Next::Stop => break,
                Next::Retry(delay) => sleep(delay),
            }
            attempt += 1;
        }

        Err(Error::new(errors))
    }
}

fn sleep(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    trace!(?delay, "waiting before next attempt");
    thread::sleep(delay);
}
