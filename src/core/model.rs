//! Identity-carrying state handles.
//!
//! Change detection in a session is identity based: a transition that hands
//! back the same `Model` instance is a no-op, while a freshly built `Model` is
//! an update even when it is value-equal to the previous one.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, immutable handle to an application state value.
///
/// Cloning a `Model` is cheap and preserves identity. Build a new state with
/// [`Model::new`]; keep the current one with `model.clone()`.
///
/// `PartialEq` compares the wrapped values. Sessions never use it to decide
/// whether to emit; they use [`Model::same_as`].
///
/// # Example
///
/// ```rust
/// use state_actuator::core::Model;
///
/// let a = Model::new(1);
/// let b = a.clone();
/// let c = Model::new(1);
///
/// assert!(a.same_as(&b));
/// assert!(!a.same_as(&c));
/// assert_eq!(a, c);
/// ```
pub struct Model<S>(Arc<S>);

impl<S> Model<S> {
    /// Wrap a freshly produced state value in a new identity.
    pub fn new(state: S) -> Self {
        Self(Arc::new(state))
    }

    /// True when both handles point at the same state instance.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the underlying value.
    pub fn get(&self) -> &S {
        &self.0
    }

    /// Shared pointer to the underlying value.
    pub fn into_arc(self) -> Arc<S> {
        self.0
    }
}

impl<S> Clone for Model<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S> Deref for Model<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S> AsRef<S> for Model<S> {
    fn as_ref(&self) -> &S {
        &self.0
    }
}

impl<S> From<S> for Model<S> {
    fn from(state: S) -> Self {
        Self::new(state)
    }
}

impl<S: PartialEq> PartialEq for Model<S> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other) || *self.0 == *other.0
    }
}

impl<S: Eq> Eq for Model<S> {}

impl<S: fmt::Debug> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Model").field(&*self.0).finish()
    }
}

impl<S: Serialize> Serialize for Model<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.0.serialize(serializer)
    }
}
