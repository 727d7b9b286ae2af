//! Artifact file format.
//!
//! Fitted encoders, scalers and classifiers are persisted as plain parameter
//! structs wrapped in a small typed envelope:
//!
//! ```text
//! { header: { kind, format_version }, params }
//! ```
//!
//! Two encodings are supported and picked from the file extension:
//! `.json` files hold the envelope as JSON, everything else is bincode behind
//! the 4-byte magic `IPLA`. The header is decoded before the parameters, so a
//! scaler file dropped into the classifier slot fails with a clear
//! [`LoadFailure::WrongKind`] instead of a garbled decode.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactLoadError, LoadFailure, PredictorError};

/// Magic prefix of bincode artifact files.
pub const MAGIC: [u8; 4] = *b"IPLA";

/// Envelope format version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors contain only plain data (`Vec<f64>`, strings, scalars), never
/// `ndarray` buffers.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Which slot of the artifact store a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Encoder,
    Scaler,
    Classifier,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Encoder => write!(f, "encoder"),
            ArtifactKind::Scaler => write!(f, "scaler"),
            ArtifactKind::Classifier => write!(f, "classifier"),
        }
    }
}

/// On-disk encoding of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Bincode,
    Json,
}

impl ArtifactFormat {
    /// `.json` (any case) selects JSON; every other extension is bincode.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Bincode,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ArtifactHeader {
    kind: ArtifactKind,
    format_version: u32,
}

#[derive(Serialize, Deserialize)]
struct BinaryEnvelope {
    header: ArtifactHeader,
    payload: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct JsonEnvelope<P> {
    header: ArtifactHeader,
    params: P,
}

/// Encode `params` as an artifact of the given kind.
pub fn encode_artifact<P: Serialize + DeserializeOwned>(
    kind: ArtifactKind,
    params: &P,
    format: ArtifactFormat,
) -> Result<Vec<u8>, PredictorError> {
    let header = ArtifactHeader {
        kind,
        format_version: FORMAT_VERSION,
    };
    match format {
        ArtifactFormat::Bincode => {
            let envelope = BinaryEnvelope {
                header,
                payload: params.to_bytes()?,
            };
            let mut bytes = MAGIC.to_vec();
            bytes.extend(bincode::serialize(&envelope)?);
            Ok(bytes)
        }
        ArtifactFormat::Json => {
            let envelope = JsonEnvelope { header, params };
            Ok(serde_json::to_vec_pretty(&envelope)?)
        }
    }
}

/// Decode artifact bytes, checking magic, kind and version before the params.
pub fn decode_artifact<P: Serialize + DeserializeOwned>(
    kind: ArtifactKind,
    bytes: &[u8],
    format: ArtifactFormat,
) -> Result<P, LoadFailure> {
    match format {
        ArtifactFormat::Bincode => {
            let body = bytes.strip_prefix(&MAGIC[..]).ok_or(LoadFailure::BadMagic)?;
            let envelope: BinaryEnvelope =
                bincode::deserialize(body).map_err(|e| LoadFailure::Corrupt(e.to_string()))?;
            check_header(kind, envelope.header)?;
            P::from_bytes(&envelope.payload).map_err(|e| LoadFailure::Corrupt(e.to_string()))
        }
        ArtifactFormat::Json => {
            let envelope: JsonEnvelope<serde_json::Value> =
                serde_json::from_slice(bytes).map_err(|e| LoadFailure::Corrupt(e.to_string()))?;
            check_header(kind, envelope.header)?;
            serde_json::from_value(envelope.params).map_err(|e| LoadFailure::Corrupt(e.to_string()))
        }
    }
}

fn check_header(expected: ArtifactKind, header: ArtifactHeader) -> Result<(), LoadFailure> {
    if header.kind != expected {
        return Err(LoadFailure::WrongKind {
            expected,
            found: header.kind,
        });
    }
    if header.format_version != FORMAT_VERSION {
        return Err(LoadFailure::UnsupportedVersion {
            found: header.format_version,
            supported: FORMAT_VERSION,
        });
    }
    Ok(())
}

/// Write an artifact file; the format follows the extension of `path`.
pub fn write_artifact<P: Serialize + DeserializeOwned>(
    path: impl AsRef<Path>,
    kind: ArtifactKind,
    params: &P,
) -> Result<(), PredictorError> {
    let path = path.as_ref();
    let bytes = encode_artifact(kind, params, ArtifactFormat::from_path(path))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read an artifact file into its parameter struct.
pub fn read_artifact<P: Serialize + DeserializeOwned>(
    path: impl AsRef<Path>,
    kind: ArtifactKind,
) -> Result<P, ArtifactLoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::NotFound {
            LoadFailure::Missing
        } else {
            LoadFailure::Io(e)
        };
        ArtifactLoadError::new(kind, path, reason)
    })?;
    decode_artifact(kind, &bytes, ArtifactFormat::from_path(path))
        .map_err(|reason| ArtifactLoadError::new(kind, path, reason))
}
