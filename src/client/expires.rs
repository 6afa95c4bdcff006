//! Fallback lease for paths no server side element stamped.

use std::time::Duration;

use crate::{
    chain::{Handler, Next},
    common::{Connection, Request},
    Context, Result,
};

use super::{ensure_previous_expires, DEFAULT_FALLBACK_LEASE};

#[derive(Debug, Clone)]
/// Client side element making sure the last path segment always carries a lease.
///
/// Only fills in a missing `expires`, before delegating and again on the returned
/// connection. It never renews an existing lease.
pub struct ExpiresClient {
    lease: Duration,
}

impl ExpiresClient {
    /// Uses [DEFAULT_FALLBACK_LEASE].
    pub fn new() -> Self {
        Self::with_lease(DEFAULT_FALLBACK_LEASE)
    }

    pub fn with_lease(lease: Duration) -> Self {
        Self { lease }
    }

    pub fn lease(&self) -> Duration {
        self.lease
    }
}

impl Default for ExpiresClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ExpiresClient {
    fn request(&self, ctx: &Context, mut request: Request, next: Next<'_>) -> Result<Connection> {
        if let Some(path) = request.connection.as_mut().and_then(|c| c.path.as_mut()) {
            ensure_previous_expires(path, self.lease);
        }

        let mut connection = next.request(ctx, request)?;

        if let Some(path) = connection.path.as_mut() {
            ensure_previous_expires(path, self.lease);
        }

        Ok(connection)
    }

    fn close(&self, ctx: &Context, mut connection: Connection, next: Next<'_>) -> Result<()> {
        if let Some(path) = connection.path.as_mut() {
            ensure_previous_expires(path, self.lease);
        }

        next.close(ctx, connection)
    }
}
