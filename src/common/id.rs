//! Path segment identifier
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};

/// The size of generated segment ids in bytes.
pub const SEGMENT_ID_SIZE: usize = 16;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of one hop's portion of a connection.
///
/// Ids minted by this crate are [SEGMENT_ID_SIZE] random bytes rendered as lowercase hex,
/// but any string received from another hop is accepted as is.
pub struct SegmentId(String);

impl SegmentId {
    /// Generate a fresh random id.
    pub fn random() -> SegmentId {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; SEGMENT_ID_SIZE] = rng.gen();

        SegmentId(random_bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SegmentId {
    fn from(id: String) -> Self {
        SegmentId(id)
    }
}

impl From<&str> for SegmentId {
    fn from(id: &str) -> Self {
        SegmentId(id.to_string())
    }
}

impl Display for SegmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for SegmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({})", self.0)
    }
}
