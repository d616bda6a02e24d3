use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::ready;
use futures_timer::Delay;
use tracing::trace;

use super::action::AsyncAction;
use super::config::{Config, RetryOption};
use super::error::Error;
use super::executor::Next;

enum RetryState<A>
where
    A: AsyncAction,
{
    Starting,
    Running(Pin<Box<A::Future>>),
    Sleeping(Delay),
}

/// Future that drives multiple attempts at an action under a [`Config`].
///
/// Follows the same rules as [`Config::retry`] but waits between attempts
/// with a timer instead of blocking the thread. The action is first run
/// when the future is first polled.
pub struct RetryFuture<'a, A>
where
    A: AsyncAction,
{
    config: Config<'a, A::Error>,
    action: A,
    state: RetryState<A>,
    attempt: u32,
    errors: Vec<A::Error>,
}

// Neither the action nor the collected errors are ever pinned.
impl<'a, A> Unpin for RetryFuture<'a, A> where A: AsyncAction {}

/// Runs the asynchronous `action` until it succeeds, using the defaults
/// overridden by `options`.
///
/// # Example
///
/// ```rust
/// # use futures::executor::block_on;
/// use fixed_retry::{attempts, delay, retry_async};
///
/// let mut calls = 0;
/// let future = retry_async(
///     || {
///         calls += 1;
///         let n = calls;
///         async move { if n < 2 { Err("not yet") } else { Ok(n) } }
///     },
///     vec![attempts(3), delay(1)],
/// );
///
/// assert_eq!(block_on(future).unwrap(), 2);
/// ```
pub fn retry_async<'a, A, I>(action: A, options: I) -> RetryFuture<'a, A>
where
    A: AsyncAction,
    I: IntoIterator<Item = RetryOption<'a, A::Error>>,
{
    Config::from_options(options).retry_future(action)
}

impl<'a, E> Config<'a, E> {
    /// Run the given asynchronous action, retrying on failure according to
    /// this configuration.
    pub fn retry_future<A>(self, action: A) -> RetryFuture<'a, A>
    where
        A: AsyncAction<Error = E>,
    {
        RetryFuture {
            config: self,
            state: RetryState::Starting,
            action,
            attempt: 0,
            errors: Vec::new(),
        }
    }
}

impl<'a, A: AsyncAction> RetryFuture<'a, A> {
    fn run(&mut self) {
        self.state = RetryState::Running(Box::pin(self.action.run()));
    }

    fn attempt(&mut self) {
        self.attempt += 1;
        self.run();
    }

    fn fail(&mut self, err: A::Error) -> Option<Error<A::Error>> {
        let next = self.config.after_failure(self.attempt, &err);
        self.errors.push(err);

        match next {
            Next::Stop => Some(Error::new(mem::take(&mut self.errors))),
            Next::Retry(delay) if delay.is_zero() => {
                self.attempt();
                None
            }
            Next::Retry(delay) => {
                trace!(?delay, "waiting before next attempt");
                self.state = RetryState::Sleeping(Delay::new(delay));
                None
            }
        }
    }
}

impl<'a, A: AsyncAction> fmt::Debug for RetryFuture<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RetryFuture")
            .field("config", &self.config)
            .field("attempt", &self.attempt)
            .finish()
    }
}

impl<'a, A: AsyncAction> Future for RetryFuture<'a, A> {
    type Output = Result<A::Item, Error<A::Error>>;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                RetryState::Starting => this.run(),
                RetryState::Running(future) => match ready!(future.as_mut().poll(ctx)) {
                    Ok(item) => return Poll::Ready(Ok(item)),
                    Err(err) => {
                        if let Some(errors) = this.fail(err) {
                            return Poll::Ready(Err(errors));
                        }
                    }
                },
                RetryState::Sleeping(delay) => {
                    ready!(Pin::new(delay).poll(ctx));
                    this.attempt();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use futures::executor::block_on;
    use futures::future::{self, Either};

    use super::retry_async;
    use crate::config::{attempts, delay, on_retry, retry_if, units, Config};

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn retry_future_is_send() {
        let mut failures = 0;
        assert_send(retry_async(
            || future::ready(Err::<(), u32>(1)),
            vec![
                attempts(3),
                on_retry(|_, _: &u32| failures += 1),
                retry_if(|e: &u32| *e > 0),
            ],
        ));
        assert_eq!(failures, 0);
    }

    #[test]
    fn action_is_not_run_until_polled() {
        let mut num_calls = 0;
        {
            let _fut = retry_async(
                || {
                    num_calls += 1;
                    future::ready(Ok::<(), u32>(()))
                },
                vec![attempts(1)],
            );
        }
        assert_eq!(num_calls, 0);

        let res = block_on(retry_async(
            || {
                num_calls += 1;
                future::ready(Ok::<(), u32>(()))
            },
            vec![attempts(1)],
        ));
        assert_eq!(res, Ok(()));
        assert_eq!(num_calls, 1);
    }

    #[test]
    fn attempts_just_once() {
        let mut num_calls = 0;
        let res = {
            let fut = retry_async(
                || {
                    num_calls += 1;
                    async { Err::<(), u64>(42) }
                },
                vec![attempts(1), delay(100)],
            );
            block_on(fut)
        };

        assert_eq!(res.unwrap_err().into_errors(), vec![42]);
        assert_eq!(num_calls, 1);
    }

    #[test]
    fn attempts_until_budget_exhausted() {
        let mut num_calls = 0;
        let mut seen = Vec::new();
        let res = {
            let fut = retry_async(
                || {
                    num_calls += 1;
                    future::ready(Err::<(), _>(["a", "b", "c"][num_calls - 1]))
                },
                vec![
                    attempts(3),
                    delay(1),
                    on_retry(|n, e: &&str| seen.push((n, *e))),
                ],
            );
            block_on(fut)
        };

        let err = res.unwrap_err();
        assert_eq!(err.to_string(), "c");
        assert_eq!(num_calls, 3);
        assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn attempts_until_success() {
        let mut num_calls = 0;
        let res = {
            let fut = Config::default().with_delay(1).retry_future(|| {
                num_calls += 1;
                if num_calls < 4 {
                    Either::Left(async { Err::<(), u64>(42) })
                } else {
                    Either::Right(async { Ok::<(), u64>(()) })
                }
            });
            block_on(fut)
        };

        assert_eq!(res, Ok(()));
        assert_eq!(num_calls, 4);
    }

    #[test]
    fn attempts_retry_only_if_given_condition_is_true() {
        let mut num_calls = 0;
        let res = {
            let action = || {
                num_calls += 1;
                async move { Err::<(), u64>(num_calls) }
            };
            let fut = retry_async(
                action,
                vec![attempts(5), delay(0), retry_if(|e: &u64| *e < 3)],
            );
            block_on(fut)
        };

        assert_eq!(res.unwrap_err().into_errors(), vec![1, 2, 3]);
        assert_eq!(num_calls, 3);
    }

    #[test]
    fn zero_attempts_still_runs_once_without_waiting() {
        let started = Instant::now();
        let mut num_calls = 0;
        let res = block_on(retry_async(
            || {
                num_calls += 1;
                future::ready(Err::<(), _>("boom"))
            },
            vec![attempts(0), units(Duration::from_secs(3600))],
        ));

        assert_eq!(res.unwrap_err().len(), 1);
        assert_eq!(num_calls, 1);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[test]
    fn waits_between_attempts() {
        let started = Instant::now();
        let res = block_on(retry_async(
            || future::ready(Err::<(), _>("boom")),
            vec![attempts(3), delay(20)],
        ));

        assert_eq!(res.unwrap_err().len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
