use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Container, ContainerFormat, MemberKind};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Open a workload file as a [`Container`].  Dispatch by extension.
///
/// Supported formats:
/// * `.h5` / `.hdf5` / anything else – HDF5, members of the root group
/// * `.parquet` / `.pq`              – Parquet, one dataset per column
pub fn open_container(path: &Path) -> Result<Box<dyn Container>> {
    let ext = path.extension().and_then(|e| e.to_str());

    match ContainerFormat::from_extension(ext) {
        ContainerFormat::Hdf5 => open_hdf5(path),
        ContainerFormat::Parquet => Ok(Box::new(ParquetContainer::open(path)?)),
    }
}

#[cfg(feature = "hdf5")]
fn open_hdf5(path: &Path) -> Result<Box<dyn Container>> {
    Ok(Box::new(super::h5::Hdf5Container::open(path)?))
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(path: &Path) -> Result<Box<dyn Container>> {
    bail!(
        "{} looks like an HDF5 file but this build has no HDF5 support (enable the `hdf5` feature)",
        path.display()
    )
}

// ---------------------------------------------------------------------------
// Parquet backend
// ---------------------------------------------------------------------------

/// Parquet file viewed as a container: each column is a dataset.
///
/// Shapes come from the footer alone:
/// - plain columns:            `[num_rows]`
/// - `FixedSizeList<_, n>`:    `[num_rows, n]`
///
/// Works with files written by **Pandas**, **Polars** and arrow-rs.
pub struct ParquetContainer {
    columns: Vec<(String, Vec<usize>)>,
}

impl ParquetContainer {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).context("opening parquet file")?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .context("reading parquet metadata")?;

        let num_rows = builder.metadata().file_metadata().num_rows();
        let num_rows = usize::try_from(num_rows)
            .with_context(|| format!("negative row count {num_rows} in parquet footer"))?;

        let columns = builder
            .schema()
            .fields()
            .iter()
            .map(|field| {
                let shape = match field.data_type() {
                    DataType::FixedSizeList(_, size) => vec![num_rows, *size as usize],
                    _ => vec![num_rows],
                };
                (field.name().clone(), shape)
            })
            .collect();

        Ok(Self { columns })
    }

    fn column(&self, name: &str) -> Result<&[usize]> {
        match self.columns.iter().find(|(col, _)| col == name) {
            Some((_, shape)) => Ok(shape),
            None => bail!("no column named '{name}'"),
        }
    }
}

impl Container for ParquetContainer {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Parquet
    }

    fn member_names(&self) -> Result<Vec<String>> {
        Ok(self.columns.iter().map(|(name, _)| name.clone()).collect())
    }

    fn member_kind(&self, name: &str) -> Result<MemberKind> {
        self.column(name).map(|_| MemberKind::Dataset)
    }

    fn shape(&self, name: &str) -> Result<Vec<usize>> {
        self.column(name).map(<[usize]>::to_vec)
    }
}
