use std::future::Future;

/// An action can be run multiple times and either succeeds or fails.
pub trait Action {
    /// The item produced on success.
    type Item;
    /// The error produced on failure.
    type Error;

    /// Run this action once.
    fn run(&mut self) -> Result<Self::Item, Self::Error>;
}

impl<I, E, F: FnMut() -> Result<I, E>> Action for F {
    type Item = I;
    type Error = E;

    fn run(&mut self) -> Result<I, E> {
        self()
    }
}

/// An action that can be run multiple times and produces a future.
pub trait AsyncAction {
    /// The future that this action produces.
    type Future: Future<Output = Result<Self::Item, Self::Error>>;
    /// The item that the future may resolve with.
    type Item;
    /// The error that the future may resolve with.
    type Error;

    /// Run this action, returning a future.
    fn run(&mut self) -> Self::Future;
}

impl<I, E, T: Future<Output = Result<I, E>>, F: FnMut() -> T> AsyncAction for F {
    type Item = I;
    type Error = E;
    type Future = T;

    fn run(&mut self) -> Self::Future {
        self()
    }
}
