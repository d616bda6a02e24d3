use std::fmt;
use std::time::Duration;

use super::Config;
use crate::condition::Condition;

/// A mutator applied to a [`Config`] before the first attempt.
///
/// Options are applied in the order they are given, so a later option
/// overrides an earlier one for the same field.
pub struct RetryOption<'a, E>(Box<dyn FnOnce(&mut Config<'a, E>) + Send + 'a>);

impl<'a, E> RetryOption<'a, E> {
    /// Wraps an arbitrary mutator.
    pub fn new<F>(f: F) -> RetryOption<'a, E>
    where
        F: FnOnce(&mut Config<'a, E>) + Send + 'a,
    {
        RetryOption(Box::new(f))
    }

    /// Applies this option to `config`.
    pub fn apply(self, config: &mut Config<'a, E>) {
        (self.0)(config)
    }
}

impl<'a, E> fmt::Debug for RetryOption<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RetryOption").finish()
    }
}

/// Sets the attempt budget.
pub fn attempts<'a, E>(attempts: u32) -> RetryOption<'a, E> {
    RetryOption::new(move |config: &mut Config<'a, E>| config.set_attempts(attempts))
}

/// Sets the delay magnitude between attempts.
pub fn delay<'a, E>(delay: u32) -> RetryOption<'a, E> {
    RetryOption::new(move |config: &mut Config<'a, E>| config.set_delay(delay))
}

/// Sets the unit of the delay, e.g. `Duration::from_secs(1)`.
pub fn units<'a, E>(units: Duration) -> RetryOption<'a, E> {
    RetryOption::new(move |config: &mut Config<'a, E>| config.set_units(units))
}

/// Sets the observer called after each failed attempt.
pub fn on_retry<'a, E, F>(on_retry: F) -> RetryOption<'a, E>
where
    F: FnMut(u32, &E) + Send + 'a,
{
    RetryOption::new(move |config: &mut Config<'a, E>| config.set_on_retry(Box::new(on_retry)))
}

/// Sets the condition deciding whether another attempt is made.
pub fn retry_if<'a, E, C>(condition: C) -> RetryOption<'a, E>
where
    C: Condition<E> + Send + 'a,
{
    RetryOption::new(move |config: &mut Config<'a, E>| config.set_retry_if(Box::new(condition)))
}
