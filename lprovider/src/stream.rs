//! Text fragment stream contracts and in-memory stream utilities.
//!
//! ```rust
//! use lprovider::{BoxedTextStream, VecTextStream};
//!
//! let stream = VecTextStream::from_fragments(["Hel", "lo"]);
//! let _boxed: BoxedTextStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::ProviderError;

/// Provider stream contract.
///
/// Invariants for consumers:
/// - Fragments are emitted in arrival order; concatenating them yields the full reply.
/// - An `Err` item ends the logical reply even if the stream is polled again.
/// - Once the stream yields `None`, it must not yield additional items.
pub trait TextFragmentStream: Stream<Item = Result<String, ProviderError>> + Send {}

impl<T> TextFragmentStream for T where T: Stream<Item = Result<String, ProviderError>> + Send {}

pub type BoxedTextStream<'a> = Pin<Box<dyn TextFragmentStream + 'a>>;

#[derive(Debug)]
pub struct VecTextStream {
    items: VecDeque<Result<String, ProviderError>>,
}

impl VecTextStream {
    pub fn new(items: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fragments.into_iter().map(|item| Ok(item.into())).collect())
    }
}

impl Stream for VecTextStream {
    type Item = Result<String, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<String, ProviderError>>> {
        Poll::Ready(self.items.pop_front())
    }
}
