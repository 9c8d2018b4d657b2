use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// ContainerFormat – which backend opened the file
// ---------------------------------------------------------------------------

/// On-disk container formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Hdf5,
    Parquet,
}

impl ContainerFormat {
    /// Pick a format from a file extension (without the dot).
    ///
    /// Workload files are HDF5 unless they say otherwise, so unknown and
    /// missing extensions fall back to [`ContainerFormat::Hdf5`].
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("parquet" | "pq") => ContainerFormat::Parquet,
            _ => ContainerFormat::Hdf5,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerFormat::Hdf5 => write!(f, "hdf5"),
            ContainerFormat::Parquet => write!(f, "parquet"),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetEntry – one top-level dataset
// ---------------------------------------------------------------------------

/// A named top-level dataset and its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetEntry {
    pub name: String,
    /// Dimension sizes, outermost first.
    pub shape: Vec<usize>,
}

impl DatasetEntry {
    pub fn new(name: impl Into<String>, shape: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Length along the first axis, `None` for scalars.
    pub fn leading_dim(&self) -> Option<usize> {
        self.shape.first().copied()
    }

    /// Shape rendered like a tuple: `(300, 10)`, `(5,)`, `()`.
    pub fn shape_string(&self) -> String {
        match self.shape.as_slice() {
            [] => "()".to_string(),
            [n] => format!("({n},)"),
            dims => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                format!("({})", parts.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemberKind – what a top-level name refers to
// ---------------------------------------------------------------------------

/// Kind of object behind a top-level member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Dataset,
    Group,
    /// A datatype committed to the file under its own name.
    NamedDatatype,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Dataset => write!(f, "dataset"),
            MemberKind::Group => write!(f, "group"),
            MemberKind::NamedDatatype => write!(f, "named datatype"),
        }
    }
}

// ---------------------------------------------------------------------------
// Container – read-only view of an opened file
// ---------------------------------------------------------------------------

/// An opened container file exposing its top-level members.
///
/// Kinds and shapes are fetched one name at a time so a caller that stops
/// early never touches the remaining members. Dropping the value releases
/// the file.
pub trait Container {
    fn format(&self) -> ContainerFormat;

    /// Names of every top-level member (datasets, groups, named datatypes),
    /// in the container's own order.
    fn member_names(&self) -> anyhow::Result<Vec<String>>;

    /// Kind of the member `name`, following links.
    fn member_kind(&self, name: &str) -> anyhow::Result<MemberKind>;

    /// Shape of the dataset `name`.
    fn shape(&self, name: &str) -> anyhow::Result<Vec<usize>>;
}
