//! The remainder of a chain, as seen by the element currently running.

use std::fmt::{self, Debug, Formatter};

use tracing::debug;

use crate::{
    common::{Connection, Request},
    Context, Result,
};

use super::Handler;

#[derive(Clone, Copy)]
/// Elements after the one currently running, plus the outer remainder when the
/// current chain is nested inside another.
pub struct Next<'a> {
    handlers: &'a [Box<dyn Handler>],
    tail: Option<&'a Next<'a>>,
}

impl<'a> Next<'a> {
    /// Remainder made of `handlers` only.
    pub fn new(handlers: &'a [Box<dyn Handler>]) -> Self {
        Self {
            handlers,
            tail: None,
        }
    }

    /// Remainder made of `handlers`, followed by `tail` once they are exhausted.
    pub fn chained(handlers: &'a [Box<dyn Handler>], tail: &'a Next<'a>) -> Self {
        Self {
            handlers,
            tail: Some(tail),
        }
    }

    /// Returns `true` if no element is left, in this chain or any enclosing one.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.tail.map_or(true, |tail| tail.is_empty())
    }

    /// Pass the request to the next element.
    ///
    /// At the end of the chain the request's connection is returned as is.
    pub fn request(self, ctx: &Context, request: Request) -> Result<Connection> {
        check(ctx)?;

        let connection = match self.handlers.split_first() {
            Some((handler, rest)) => handler.request(
                ctx,
                request,
                Next {
                    handlers: rest,
                    tail: self.tail,
                },
            )?,
            None => match self.tail {
                Some(tail) => tail.request(ctx, request)?,
                None => request.connection.unwrap_or_default(),
            },
        };

        // Canceled while in flight: drop the result so no caller post-processes it.
        check(ctx)?;

        Ok(connection)
    }

    /// Pass the close to the next element.
    pub fn close(self, ctx: &Context, connection: Connection) -> Result<()> {
        check(ctx)?;

        match self.handlers.split_first() {
            Some((handler, rest)) => handler.close(
                ctx,
                connection,
                Next {
                    handlers: rest,
                    tail: self.tail,
                },
            )?,
            None => {
                if let Some(tail) = self.tail {
                    tail.close(ctx, connection)?;
                }
            }
        };

        check(ctx)
    }
}

fn check(ctx: &Context) -> Result<()> {
    ctx.err().map_err(|error| {
        debug!(?error, deadline = ?ctx.deadline(), "Context done, not delegating");
        error
    })
}

impl Debug for Next<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("handlers", &self.handlers)
            .field("tail", &self.tail)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{chain::Chain, Error};

    #[derive(Debug)]
    struct Pass;

    impl Handler for Pass {
        fn request(&self, ctx: &Context, request: Request, next: Next<'_>) -> Result<Connection> {
            next.request(ctx, request)
        }

        fn close(&self, ctx: &Context, connection: Connection, next: Next<'_>) -> Result<()> {
            next.close(ctx, connection)
        }
    }

    #[derive(Debug)]
    struct AssertLast;

    impl Handler for AssertLast {
        fn request(&self, ctx: &Context, request: Request, next: Next<'_>) -> Result<Connection> {
            assert!(next.is_empty());
            next.request(ctx, request)
        }

        fn close(&self, ctx: &Context, connection: Connection, next: Next<'_>) -> Result<()> {
            assert!(next.is_empty());
            next.close(ctx, connection)
        }
    }

    #[derive(Debug)]
    struct CancelDownstream;

    impl Handler for CancelDownstream {
        fn request(&self, ctx: &Context, request: Request, _next: Next<'_>) -> Result<Connection> {
            ctx.cancel();
            Ok(request.connection.unwrap_or_default())
        }

        fn close(&self, ctx: &Context, _connection: Connection, _next: Next<'_>) -> Result<()> {
            ctx.cancel();
            Ok(())
        }
    }

    #[test]
    fn last_element_sees_empty_remainder() {
        assert!(Next::new(&[]).is_empty());

        let chain = Chain::default().with(Pass).with(AssertLast);
        assert!(chain.request(&Context::new(), Request::default()).is_ok());
        assert!(chain.close(&Context::new(), Connection::default()).is_ok());

        // Nested: the inner chain hands over to the outer remainder.
        let outer = Chain::default()
            .with(Chain::default().with(Pass))
            .with(AssertLast);
        assert!(outer.request(&Context::new(), Request::default()).is_ok());
    }

    #[test]
    fn cancel_during_delegation_discards_result() {
        let chain = Chain::default().with(Pass).with(CancelDownstream);

        let ctx = Context::new();
        let result = chain.request(&ctx, Request::default());
        assert!(matches!(result, Err(Error::Cancelled)));

        let ctx = Context::new();
        let result = chain.close(&ctx, Connection::default());
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
