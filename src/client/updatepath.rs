//! Keeps this hop's segment in the connection path.

use std::convert::TryFrom;

use tracing::debug;

use crate::{
    chain::{Handler, Next},
    common::{Connection, PathSegment, Request},
    Context, Error, Result,
};

use super::{ensure_previous_expires, DEFAULT_FALLBACK_LEASE};

#[derive(Debug, Clone)]
/// Client side element that owns one segment of the connection path.
///
/// On the way out it selects (or appends) the segment named after this hop and points
/// `Path::index` at it. On the way back it restores `Connection::id` and `Path::index`
/// to that segment, whatever the elements further down did with them.
pub struct UpdatePathClient {
    name: String,
}

impl UpdatePathClient {
    /// `name` is stamped on the segment owned by this hop.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Handler for UpdatePathClient {
    fn request(&self, ctx: &Context, mut request: Request, next: Next<'_>) -> Result<Connection> {
        let connection = request.connection_mut();
        ensure_previous_expires(connection.path_mut(), DEFAULT_FALLBACK_LEASE);

        let index = update_path(connection, &self.name)?;

        let mut connection = next.request(ctx, request)?;

        let path = connection.path_mut();
        ensure_previous_expires(path, DEFAULT_FALLBACK_LEASE);

        let len = path.len();
        let id = path
            .segments
            .get(index as usize)
            .map(|segment| segment.id.clone())
            .ok_or(Error::IndexOutOfRange { index, len })?;
        path.index = index;
        connection.id = Some(id);

        Ok(connection)
    }

    fn close(&self, ctx: &Context, mut connection: Connection, next: Next<'_>) -> Result<()> {
        ensure_previous_expires(connection.path_mut(), DEFAULT_FALLBACK_LEASE);

        update_path(&mut connection, &self.name)?;

        ensure_previous_expires(connection.path_mut(), DEFAULT_FALLBACK_LEASE);

        next.close(ctx, connection)
    }
}

/// Point `Path::index` at the segment named `name`, creating it if needed.
///
/// Returns the index of that segment, also assigning its id to `Connection::id`.
///
/// - An empty path gets a first segment.
/// - The segment at `index` already named `name` is reused.
/// - The first segment after `index` named `name` is reused, advancing `index`.
/// - Otherwise a new segment is appended at the end and `index` points at it.
///
/// Existing segments are never removed or reordered.
///
/// Fails if `index` is out of range of a non empty path.
pub fn update_path(connection: &mut Connection, name: &str) -> Result<u32> {
    let path = connection.path_mut();

    if path.is_empty() {
        let segment = PathSegment::new(name);
        debug!(hop = %name, id = %segment.id, "First path segment");

        path.segments.push(segment);
        path.index = 0;
    } else {
        let index = path.index as usize;
        let len = path.len();

        if index >= len {
            return Err(Error::IndexOutOfRange {
                index: path.index,
                len,
            });
        }

        if path.segments[index].name != name {
            let found = path.segments[index + 1..]
                .iter()
                .position(|segment| segment.name == name)
                .map(|offset| index + 1 + offset);
            let selected = found.unwrap_or(len);

            let current = path.index;
            let selected_index = u32::try_from(selected).map_err(|_| Error::IndexOutOfRange {
                index: current,
                len,
            })?;

            if found.is_none() {
                let segment = PathSegment::new(name);
                debug!(hop = %name, id = %segment.id, index = selected, "New path segment");

                path.segments.push(segment);
            }

            path.index = selected_index;
        }
    }

    let index = path.index;
    let id = path.segments[index as usize].id.clone();
    connection.id = Some(id);

    Ok(index)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        chain::Chain,
        common::{Path, SegmentId, Timestamp},
    };

    fn path(names: &[&str], index: u32) -> Path {
        Path {
            segments: names
                .iter()
                .map(|name| PathSegment {
                    id: SegmentId::from(format!("{}-id", name)),
                    name: name.to_string(),
                    expires: None,
                })
                .collect(),
            index,
        }
    }

    fn names(path: &Path) -> Vec<&str> {
        path.segments.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn first_segment() {
        let mut connection = Connection::default();

        let index = update_path(&mut connection, "nsc").unwrap();

        let path = connection.path.as_ref().unwrap();
        assert_eq!(index, 0);
        assert_eq!(names(path), vec!["nsc"]);
        assert_eq!(connection.id.as_ref(), Some(&path.segments[0].id));
    }

    #[test]
    fn reuse_current_segment() {
        let mut connection = Connection::new(path(&["a", "b"], 1));

        let index = update_path(&mut connection, "b").unwrap();

        assert_eq!(index, 1);
        assert_eq!(connection.id, Some(SegmentId::from("b-id")));
        assert_eq!(names(connection.path.as_ref().unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn reuse_next_segment() {
        let mut connection = Connection::new(path(&["a", "b", "c"], 0));

        let index = update_path(&mut connection, "b").unwrap();

        let path = connection.path.as_ref().unwrap();
        assert_eq!(index, 1);
        assert_eq!(path.index, 1);
        assert_eq!(connection.id, Some(SegmentId::from("b-id")));
        assert_eq!(names(path), vec!["a", "b", "c"]);
    }

    #[test]
    fn append_segment() {
        let mut connection = Connection::new(path(&["a"], 0));

        let index = update_path(&mut connection, "b").unwrap();

        let path = connection.path.as_ref().unwrap();
        assert_eq!(index, 1);
        assert_eq!(names(path), vec!["a", "b"]);
        assert_eq!(path.segments[0].id, SegmentId::from("a-id"));
        assert_eq!(connection.id.as_ref(), Some(&path.segments[1].id));
    }

    #[test]
    fn unrelated_segments_are_kept() {
        let mut connection = Connection::new(path(&["a", "b", "c"], 0));

        let index = update_path(&mut connection, "x").unwrap();

        let path = connection.path.as_mut().unwrap();
        assert_eq!(index, 3);
        assert_eq!(names(path), vec!["a", "b", "c", "x"]);
        assert_eq!(path.segments[1].id, SegmentId::from("b-id"));
        assert_eq!(path.segments[2].id, SegmentId::from("c-id"));

        // Back at the first hop, the same name finds its segment again.
        let id = path.segments[3].id.clone();
        path.index = 0;

        let index = update_path(&mut connection, "x").unwrap();

        assert_eq!(index, 3);
        assert_eq!(connection.id, Some(id));
        assert_eq!(connection.path.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn index_out_of_range() {
        let mut connection = Connection::new(path(&["a", "b"], 2));

        let result = update_path(&mut connection, "c");

        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(names(connection.path.as_ref().unwrap()), vec!["a", "b"]);
    }

    #[derive(Debug)]
    struct Downstream;

    impl Handler for Downstream {
        fn request(&self, _ctx: &Context, request: Request, _next: Next<'_>) -> Result<Connection> {
            let mut connection = request.connection.unwrap_or_default();
            let path = connection.path_mut();
            path.segments.push(PathSegment::new("forwarder"));
            path.index = 1;
            connection.id = Some(SegmentId::from("forwarder-id"));

            Ok(connection)
        }

        fn close(&self, _ctx: &Context, _connection: Connection, _next: Next<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn request_restores_own_identity() {
        let chain = Chain::default()
            .with(UpdatePathClient::new("nsc"))
            .with(Downstream);

        let connection = chain.request(&Context::new(), Request::default()).unwrap();

        let path = connection.path.as_ref().unwrap();
        assert_eq!(names(path), vec!["nsc", "forwarder"]);
        assert_eq!(path.index, 0);
        assert_eq!(connection.id.as_ref(), Some(&path.segments[0].id));
        // Fallback stamped on the last segment on the way back.
        assert!(path.segments[1].expires.is_some());
    }

    #[derive(Debug)]
    struct Truncate;

    impl Handler for Truncate {
        fn request(&self, _ctx: &Context, _request: Request, _next: Next<'_>) -> Result<Connection> {
            Ok(Connection::default())
        }

        fn close(&self, _ctx: &Context, _connection: Connection, _next: Next<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn truncated_return_is_an_error() {
        let chain = Chain::default()
            .with(UpdatePathClient::new("nsc"))
            .with(Truncate);

        let result = chain.request(&Context::new(), Request::default());

        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[derive(Debug, Default)]
    struct Capture(std::sync::Mutex<Option<Connection>>);

    impl Handler for std::sync::Arc<Capture> {
        fn request(&self, _ctx: &Context, request: Request, _next: Next<'_>) -> Result<Connection> {
            Ok(request.connection.unwrap_or_default())
        }

        fn close(&self, _ctx: &Context, connection: Connection, _next: Next<'_>) -> Result<()> {
            *self.0.lock().expect("capture lock") = Some(connection);
            Ok(())
        }
    }

    #[test]
    fn close_stamps_before_and_after() {
        let capture = std::sync::Arc::new(Capture::default());
        let chain = Chain::default()
            .with(UpdatePathClient::new("b"))
            .with(capture.clone());

        let set = Timestamp {
            seconds: 7,
            nanos: 0,
        };
        let mut existing = path(&["a"], 0);
        existing.segments[0].expires = Some(set);

        chain
            .close(&Context::new(), Connection::new(existing))
            .unwrap();

        let closed = capture.0.lock().expect("capture lock").take().unwrap();
        let path = closed.path.as_ref().unwrap();
        assert_eq!(names(path), vec!["a", "b"]);
        assert_eq!(path.index, 1);
        // Existing lease kept, new segment stamped after the update.
        assert_eq!(path.segments[0].expires, Some(set));
        assert!(path.segments[1].expires.is_some());
        assert_eq!(closed.id.as_ref(), Some(&path.segments[1].id));
    }

    #[test]
    fn close_keeps_unrelated_segments() {
        let capture = std::sync::Arc::new(Capture::default());
        let chain = Chain::default()
            .with(UpdatePathClient::new("x"))
            .with(capture.clone());

        chain
            .close(&Context::new(), Connection::new(path(&["a", "b", "c"], 0)))
            .unwrap();

        let closed = capture.0.lock().expect("capture lock").take().unwrap();
        let path = closed.path.as_ref().unwrap();
        assert_eq!(names(path), vec!["a", "b", "c", "x"]);
        assert_eq!(path.index, 3);
        assert_eq!(path.segments[1].id, SegmentId::from("b-id"));
        assert_eq!(path.segments[2].id, SegmentId::from("c-id"));
    }

    #[test]
    fn close_rejects_out_of_range_index() {
        let chain = Chain::default().with(UpdatePathClient::new("a"));

        let result = chain.close(&Context::new(), Connection::new(path(&["a", "b"], 5)));

        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 5, len: 2 })
        ));
    }
}
