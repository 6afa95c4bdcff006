//! Chain elements for the side issuing requests (outbound).

mod expires;
mod updatepath;

pub use expires::ExpiresClient;
pub use updatepath::{update_path, UpdatePathClient};

use std::time::Duration;

use tracing::trace;

use crate::common::{Path, Timestamp};

/// Lease given to the last path segment when no hop has stamped it yet.
pub const DEFAULT_FALLBACK_LEASE: Duration = Duration::from_secs(60);

/// Sets `expires` on the last path segment to `now + lease`, unless it is already set.
///
/// An empty path is left alone.
pub fn ensure_previous_expires(path: &mut Path, lease: Duration) {
    if let Some(segment) = path.last_segment_mut() {
        if segment.expires.is_none() {
            let expires = Timestamp::after(lease);
            trace!(id = %segment.id, hop = %segment.name, ?expires, "Fallback lease");

            segment.expires = Some(expires);
        }
    }
}
