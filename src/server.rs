//! Chain elements for the side receiving requests (inbound).

mod expires;

pub use expires::ExpiresServer;

use std::time::Duration;

/// Lease granted by [ExpiresServer::default].
pub const DEFAULT_EXPIRES_TTL: Duration = Duration::from_secs(10 * 60);
