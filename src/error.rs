use std::error;
use std::fmt;
use std::slice;
use std::vec;

/// Every error observed while retrying an operation, oldest first.
///
/// Returned when the attempt budget runs out or the retry condition gives
/// up. Displays as the most recent error; the full history is available
/// through [`errors`](Error::errors) and iteration.
///
/// The executors never return an empty `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error<E> {
    errors: Vec<E>,
}

impl<E> Error<E> {
    pub(crate) fn new(errors: Vec<E>) -> Error<E> {
        Error { errors }
    }

    /// All errors, in the order the attempts failed.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// The error of the final attempt.
    pub fn last(&self) -> Option<&E> {
        self.errors.last()
    }

    /// Number of failed attempts.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no attempt has failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the errors, oldest first.
    pub fn iter(&self) -> slice::Iter<'_, E> {
        self.errors.iter()
    }

    /// Extracts all errors.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    /// Extracts the error of the final attempt, discarding the others.
    pub fn into_last(mut self) -> Option<E> {
        self.errors.pop()
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.errors.last() {
            Some(last) => fmt::Display::fmt(last, f),
            None => Ok(()),
        }
    }
}

impl<E: error::Error> error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.errors.last().and_then(|last| last.source())
    }
}

impl<E> IntoIterator for Error<E> {
    type Item = E;
    type IntoIter = vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a Error<E> {
    type Item = &'a E;
    type IntoIter = slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
