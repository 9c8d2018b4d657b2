/// Data layer: discovery, container backends, and the dataset model.
///
/// Architecture:
/// ```text
///   working directory
///        │
///        ▼
///   ┌──────────┐
///   │ discover │  first entry whose name contains the marker
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  .h5 / .parquet → Box<dyn Container>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ Container │  dataset names, shape per name
///   └───────────┘
/// ```

pub mod discover;
#[cfg(feature = "hdf5")]
pub mod h5;
pub mod loader;
pub mod model;
