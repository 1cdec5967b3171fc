use std::error::Error;

pub(crate) trait ResultExtension<T, E: Error> {
    /// Unwraps the value, panicking with the message of the error itself rather than its debug
    /// representation. Used where the standard library would panic too, such as indexing.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    #[track_caller]
    fn throw(self) -> T {
        self.unwrap_or_else(|error| panic!("{error}"))
    }
}
