//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// The same abstraction describes commands, queries and repository
/// operations: the `Args` type parameter is the operation being executed.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
