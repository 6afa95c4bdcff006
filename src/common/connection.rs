//! Connection and request messages handed from one chain element to the next.

use serde::{Deserialize, Serialize};

use super::{Path, SegmentId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One logical end-to-end network service instance.
pub struct Connection {
    /// Id of the segment owned by the hop that last processed this connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SegmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
}

impl Connection {
    pub fn new(path: Path) -> Self {
        Self {
            id: None,
            path: Some(path),
        }
    }

    /// Returns the path, inserting an empty one first if it is missing.
    pub fn path_mut(&mut self) -> &mut Path {
        self.path.get_or_insert_with(Path::default)
    }

    #[cfg(feature = "codec")]
    /// Encode into bencode bytes.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_bencode::to_bytes(self)?)
    }

    #[cfg(feature = "codec")]
    /// Decode from bencode bytes.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> crate::Result<Connection> {
        Ok(serde_bencode::from_bytes(bytes.as_ref())?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Request to establish or refresh a [Connection].
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
}

impl Request {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection: Some(connection),
        }
    }

    /// Returns the connection, inserting an empty one first if it is missing.
    pub fn connection_mut(&mut self) -> &mut Connection {
        self.connection.get_or_insert_with(Connection::default)
    }
}

impl From<Connection> for Request {
    fn from(connection: Connection) -> Self {
        Request::new(connection)
    }
}
