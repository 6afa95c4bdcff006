//! Chain of responsibility threading `request` and `close` calls through ordered handlers.

mod next;

pub use next::Next;

use std::iter::FromIterator;

use crate::{
    common::{Connection, Request},
    Context, Result,
};

/// Element of a [Chain].
///
/// Each call receives exclusive ownership of the request or connection, along with
/// [Next], the remainder of the chain after this element. Delegating consumes `next`,
/// so an element forwards a call at most once. Returning without delegating
/// short-circuits the chain: no element further down runs for that call.
pub trait Handler: std::fmt::Debug + Send + Sync {
    /// Handle a connection request.
    ///
    /// Elements may mutate `request` before delegating and mutate the returned
    /// [Connection] on the way back up. Errors from `next` must be returned without
    /// mutating anything further.
    fn request(&self, ctx: &Context, request: Request, next: Next<'_>) -> Result<Connection>;

    /// Handle a connection close, mirroring [Handler::request].
    fn close(&self, ctx: &Context, connection: Connection, next: Next<'_>) -> Result<()>;
}

#[derive(Debug, Default)]
/// Ordered, fixed list of [Handler]s.
///
/// A chain is a [Handler] itself: nested in another chain, it runs its own elements
/// and then continues with the outer remainder.
pub struct Chain {
    handlers: Vec<Box<dyn Handler>>,
}

impl Chain {
    /// Chain running `handlers` in order.
    pub fn new(handlers: Vec<Box<dyn Handler>>) -> Self {
        Self { handlers }
    }

    // === Options ===

    /// Append an element at the end of the chain.
    pub fn with(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    // === Getters ===

    /// Number of elements, nested chains counting as one.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if the chain has no elements.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    // === Public Methods ===

    /// Run a request through every element, in order.
    pub fn request(&self, ctx: &Context, request: Request) -> Result<Connection> {
        Next::new(&self.handlers).request(ctx, request)
    }

    /// Run a close through every element, in order.
    pub fn close(&self, ctx: &Context, connection: Connection) -> Result<()> {
        Next::new(&self.handlers).close(ctx, connection)
    }
}

impl FromIterator<Box<dyn Handler>> for Chain {
    fn from_iter<I: IntoIterator<Item = Box<dyn Handler>>>(iter: I) -> Self {
        Chain::new(iter.into_iter().collect())
    }
}

impl Handler for Chain {
    fn request(&self, ctx: &Context, request: Request, next: Next<'_>) -> Result<Connection> {
        Next::chained(&self.handlers, &next).request(ctx, request)
    }

    fn close(&self, ctx: &Context, connection: Connection, next: Next<'_>) -> Result<()> {
        Next::chained(&self.handlers, &next).close(ctx, connection)
    }
}
