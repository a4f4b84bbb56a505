//! Side effects on every emitted state.
//!
//! [`Subscribed`] decorates a stream of session emissions and runs a callback
//! for each successful state before handing it on unchanged. Errors pass
//! through without invoking the callback.
//!
//! Sessions install the definition's [`Stateful::subscriptions`] this way;
//! consumers can stack their own hooks with [`SubscriptionExt`].
//!
//! [`Stateful::subscriptions`]: crate::core::Stateful::subscriptions

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::core::Model;

/// Stream adapter that calls `hook` once per emitted state.
pub struct Subscribed<St, F> {
    inner: St,
    hook: F,
}

impl<St, F> Subscribed<St, F> {
    pub fn new(inner: St, hook: F) -> Self {
        Self { inner, hook }
    }

    pub fn get_ref(&self) -> &St {
        &self.inner
    }

    pub fn into_inner(self) -> St {
        self.inner
    }
}

impl<St, F, S, E> Stream for Subscribed<St, F>
where
    St: Stream<Item = Result<Model<S>, E>> + Unpin,
    F: FnMut(&Model<S>) + Unpin,
{
    type Item = Result<Model<S>, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let item = futures::ready!(this.inner.poll_next_unpin(cx));
        if let Some(Ok(model)) = &item {
            (this.hook)(model);
        }
        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Adds [`with_subscriptions`](SubscriptionExt::with_subscriptions) to state streams.
pub trait SubscriptionExt<S, E>: Stream<Item = Result<Model<S>, E>> + Sized {
    /// Run `hook` for every state this stream yields.
    fn with_subscriptions<F>(self, hook: F) -> Subscribed<Self, F>
    where
        F: FnMut(&Model<S>),
    {
        Subscribed::new(self, hook)
    }
}

impl<St, S, E> SubscriptionExt<S, E> for St where St: Stream<Item = Result<Model<S>, E>> + Sized {}
