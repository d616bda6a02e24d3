/// Specifies under which conditions a retry is attempted.
pub trait Condition<E> {
    /// Determine whether to retry based on the previous error.
    fn should_retry(&mut self, error: &E) -> bool;
}

impl<E, F: FnMut(&E) -> bool> Condition<E> for F {
    fn should_retry(&mut self, error: &E) -> bool {
        self(error)
    }
}

/// Retries on every error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl<E> Condition<E> for Always {
    fn should_retry(&mut self, _: &E) -> bool {
        true
    }
}
