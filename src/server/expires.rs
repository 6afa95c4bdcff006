//! Lease renewal for the hop calling into this one.

use std::time::Duration;

use tracing::trace;

use crate::{
    chain::{Handler, Next},
    common::{Connection, Request, Timestamp},
    Context, Result,
};

use super::DEFAULT_EXPIRES_TTL;

#[derive(Debug, Clone)]
/// Server side element renewing the lease of the previous path segment.
///
/// Every `request` and `close` sets `expires = now + ttl` on the segment right before
/// `Path::index`, overwriting whatever was there. The current segment is left for the
/// next hop inward to stamp. A zero `ttl` disables stamping altogether.
pub struct ExpiresServer {
    ttl: Duration,
}

impl ExpiresServer {
    /// Element granting `ttl` leases. `Duration::ZERO` disables it.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Lease granted on every call.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn set_expires(&self, connection: &mut Connection) {
        if self.ttl == Duration::from_secs(0) {
            return;
        }

        if let Some(prev) = connection.path_mut().prev_segment_mut() {
            let expires = Timestamp::after(self.ttl);
            trace!(id = %prev.id, hop = %prev.name, ?expires, "Renewed lease");

            prev.expires = Some(expires);
        }
    }
}

impl Default for ExpiresServer {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRES_TTL)
    }
}

impl Handler for ExpiresServer {
    fn request(&self, ctx: &Context, mut request: Request, next: Next<'_>) -> Result<Connection> {
        let connection = request.connection_mut();
        connection.path_mut();

        self.set_expires(connection);

        next.request(ctx, request)
    }

    fn close(&self, ctx: &Context, mut connection: Connection, next: Next<'_>) -> Result<()> {
        connection.path_mut();

        self.set_expires(&mut connection);

        next.close(ctx, connection)
    }
}
