//! Ordered record of the hops a connection traversed.

use serde::{Deserialize, Serialize};

use super::{SegmentId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One hop's reservation within a [Path].
pub struct PathSegment {
    pub id: SegmentId,
    /// Label of the hop, supplied by the handler that created the segment.
    pub name: String,
    /// Lease expiration, `None` until some hop stamps it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<Timestamp>,
}

impl PathSegment {
    /// Create a segment with a freshly generated id and no lease.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SegmentId::random(),
            name: name.into(),
            expires: None,
        }
    }

    /// Returns `true` if the lease is set and lies strictly before `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        matches!(self.expires, Some(expires) if expires < now)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Path of a connection and the position of the current hop within it.
pub struct Path {
    #[serde(default)]
    pub segments: Vec<PathSegment>,
    #[serde(default)]
    pub index: u32,
}

impl Path {
    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segment at the current `index`, if in range.
    pub fn current_segment(&self) -> Option<&PathSegment> {
        self.segments.get(self.index as usize)
    }

    /// Segment right before the current `index`, i.e. the hop that called into this one.
    pub fn prev_segment(&self) -> Option<&PathSegment> {
        let index = (self.index as usize).checked_sub(1)?;
        self.segments.get(index)
    }

    /// Mutable [Path::prev_segment].
    pub fn prev_segment_mut(&mut self) -> Option<&mut PathSegment> {
        let index = (self.index as usize).checked_sub(1)?;
        self.segments.get_mut(index)
    }

    /// Last segment, regardless of `index`.
    pub fn last_segment_mut(&mut self) -> Option<&mut PathSegment> {
        self.segments.last_mut()
    }

    /// Segments whose lease has run out at `now`.
    pub fn expired_segments(&self, now: Timestamp) -> impl Iterator<Item = &PathSegment> {
        self.segments
            .iter()
            .filter(move |segment| segment.is_expired_at(now))
    }
}
