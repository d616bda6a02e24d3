//! This library repeatedly runs a fallible operation until it succeeds,
//! a retry condition gives up, or an attempt budget runs out.
//!
//! Attempts are separated by a fixed delay, and every failure is kept in an
//! aggregated [`Error`] that displays as the most recent one.
//!
//! # Installation
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fixed-retry = "0.1"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use fixed_retry::{attempts, delay, on_retry, retry, units};
//!
//! fn fetch() -> Result<u64, String> {
//!     // do some real-world stuff here...
//!     Ok(42)
//! }
//!
//! fn main() {
//!     let result = retry(
//!         fetch,
//!         vec![
//!             attempts(3),
//!             delay(10),
//!             units(Duration::from_millis(1)),
//!             on_retry(|n, err: &String| eprintln!("attempt {} failed: {}", n, err)),
//!         ],
//!     );
//!
//!     assert_eq!(result, Ok(42));
//! }
//! ```
//!
//! The same rules drive asynchronous operations through [`retry_async`],
//! which waits between attempts with a timer instead of blocking the thread.

extern crate futures;
extern crate futures_timer;

mod action;
mod condition;
/// Retry configuration and the options that build it.
pub mod config;
mod error;
mod executor;
mod future;

pub use action::{Action, AsyncAction};
pub use condition::{Always, Condition};
pub use config::{attempts, delay, on_retry, retry_if, units, Config, RetryOption};
pub use error::Error;
pub use executor::retry;
pub use future::{retry_async, RetryFuture};
