#[cfg(feature = "stl-io")]
pub mod stl;

#[cfg(feature = "stl-io")]
pub use stl::MeshStats;

/// Generic I/O and format‑conversion errors.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    MalformedInput(String),
    EmptyMesh,
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),
            MalformedInput(msg) => write!(f, "Input is malformed: {msg}"),
            EmptyMesh => write!(f, "The mesh has no triangles"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}
