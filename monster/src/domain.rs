use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod response {
    use super::Movie;
    use bytes::Bytes;

    #[derive(Clone, Debug)]
    pub struct LookupResponse {
        pub movie: Movie,
        /// Serialized JSON, written verbatim to the HTTP body
        pub body: Bytes,
        pub from_cache: bool,
    }

    impl LookupResponse {
        pub fn new(movie: Movie, body: Bytes, from_cache: bool) -> Self {
            Self {
                movie,
                body,
                from_cache,
            }
        }
    }

    #[derive(Clone, Debug)]
    pub struct PosterResponse {
        pub file_name: String,
        pub bytes_written: u64,
    }

    impl PosterResponse {
        pub fn new(file_name: impl Into<String>, bytes_written: u64) -> Self {
            Self {
                file_name: file_name.into(),
                bytes_written,
            }
        }
    }
}

/// Movie metadata as returned by the upstream API.
///
/// The whole object is kept as-is, so serialization writes back exactly
/// the fields upstream sent. Only `poster_path` is interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Movie {
    pub details: Map<String, Value>,
}

impl Movie {
    pub fn from_slice(body: &[u8]) -> shared::Result<Self> {
        let movie: Movie =
            serde_json::from_slice(body).map_err(|e| shared::Error::Decode(e.to_string()))?;
        match movie.details.get("poster_path") {
            None | Some(Value::Null) | Some(Value::String(_)) => Ok(movie),
            Some(other) => Err(shared::Error::Decode(format!(
                "poster_path must be a string, got {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> shared::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| shared::Error::Encode(e.to_string()))
    }

    /// Poster path, if the upstream sent a non-empty one
    pub fn poster_path(&self) -> Option<&str> {
        self.details
            .get("poster_path")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Local file name for the poster: the poster path minus its leading separator.
    pub fn poster_file_name(&self) -> Option<&str> {
        let path = self.poster_path()?;
        let first = path.chars().next()?;
        let name = &path[first.len_utf8()..];
        (!name.is_empty()).then_some(name)
    }
}
