//! Serialization of fitted model parameters.
//!
//! Fitted estimators expose their learned state as plain parameter structs
//! (`Vec<f64>`, `ndarray` arrays, tree node tables). Those structs are turned
//! into bytes here, without coupling estimators to a particular format.

use std::error::Error;
use std::path::Path;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data, never caches or
/// thread pools.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Write serialized parameters to `path`.
pub(crate) fn save_params<P: SerializableParams>(
    params: &P,
    path: impl AsRef<Path>,
) -> std::io::Result<()> {
    let bytes = params.to_bytes().map_err(std::io::Error::other)?;
    std::fs::write(path, bytes)
}

/// Read parameters previously written by [`save_params`].
pub(crate) fn load_params<P: SerializableParams>(path: impl AsRef<Path>) -> crate::Result<P> {
    let bytes = std::fs::read(path)?;
    P::from_bytes(&bytes).map_err(|e| crate::Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Params {
        weights: Vec<f64>,
        label: f64,
    }

    #[test]
    fn test_blanket_impl_bytes() {
        let params = Params {
            weights: vec![0.5, -1.5],
            label: 1.0,
        };
        let bytes = params.to_bytes().unwrap();
        assert_eq!(Params::from_bytes(&bytes).unwrap(), params);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.bin");
        let params = Params {
            weights: vec![1.0, 2.0, 3.0],
            label: 0.0,
        };
        save_params(&params, &path).unwrap();
        let loaded: Params = load_params(&path).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, [0xffu8; 3]).unwrap();
        let result: crate::Result<Params> = load_params(&path);
        assert!(matches!(result, Err(crate::Error::Serialization(_))));
    }
}
