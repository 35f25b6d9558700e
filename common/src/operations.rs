//! Operations a [`Handler`] may be asked to execute.
//!
//! Each operation wraps the value it's applied to, so a single [`Handler`]
//! implements as many of them as it supports: `Insert<Vehicle>`,
//! `Select<By<Option<Vehicle>, vehicle::Id>>`, `Lock<By<..>>`, etc.

use std::marker::PhantomData;

use crate::Handler;

/// Stores a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites a stored value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes a stored value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads a stored value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Reads a stored value and locks it for writing until the end of the
/// current transaction.
///
/// Concurrent transactions locking the same value wait for each other, so the
/// value they read is never outdated by the time they write it.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Atomically increments a stored counter and returns its new value.
#[derive(Clone, Copy, Debug)]
pub struct Increment<T>(pub T);

/// Starts a long-running value, like a background task.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Performs a single run of a value, like an iteration of a background task.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Opens a transaction.
///
/// Everything executed on the [`Transacted`] value is discarded unless it's
/// finished with a [`Commit`].
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// [`Handler`] of a [`Transact`]ed value.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commits a [`Transact`]ed value.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W`hat by the provided `B` value.
///
/// `W` only determines the result type, so `By<Option<Vehicle>, vehicle::Id>`
/// and `By<Vec<Repair>, vehicle::Id>` are different selectors of the same
/// value.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// What is selected.
    _what: PhantomData<W>,

    /// Value selecting by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector of the provided value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps the value of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
