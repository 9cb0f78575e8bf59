//! Operations executed by a [`Handler`].
//!
//! Services execute their commands and queries as [`Handler`]s, while
//! databases execute the storage operations defined here.

use std::{future::Future, marker::PhantomData};

/// Asynchronous executor of `Args`.
pub trait Handler<Args = ()> {
    /// Output of a successful execution.
    type Ok;

    /// Error of a failed execution.
    type Err;

    /// Executes the provided `Args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

/// Persists a new entity.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites an existing entity.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes the selected entities.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads the selected entities or their projection.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Reads the selected entities, locking them until the transaction ends.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Opens a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// [`Handler`] running inside the transaction opened by [`Transact`].
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commits the transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Key of type `B` selecting a `W`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selecting a `W` by the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the key of this [`By`].
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
