use std::path::Path;

use anyhow::{Context, Result};
use hdf5::LocationType;

use super::model::{Container, ContainerFormat, MemberKind};

/// HDF5 file opened read-only. The handle is closed when this is dropped.
pub struct Hdf5Container {
    file: hdf5::File,
}

impl Hdf5Container {
    pub fn open(path: &Path) -> Result<Self> {
        let file = hdf5::File::open(path)
            .with_context(|| format!("opening {} as HDF5", path.display()))?;
        Ok(Self { file })
    }
}

fn member_kind_of(loc_type: LocationType) -> MemberKind {
    match loc_type {
        LocationType::Dataset => MemberKind::Dataset,
        LocationType::Group => MemberKind::Group,
        LocationType::NamedDatatype => MemberKind::NamedDatatype,
    }
}

impl Container for Hdf5Container {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Hdf5
    }

    /// Link names of the root group, soft and hard links alike.
    fn member_names(&self) -> Result<Vec<String>> {
        self.file.member_names().context("listing root group members")
    }

    fn member_kind(&self, name: &str) -> Result<MemberKind> {
        let info = self
            .file
            .loc_info_by_name(name)
            .with_context(|| format!("resolving member '{name}'"))?;
        Ok(member_kind_of(info.loc_type))
    }

    fn shape(&self, name: &str) -> Result<Vec<usize>> {
        let ds = self
            .file
            .dataset(name)
            .with_context(|| format!("opening dataset '{name}'"))?;
        Ok(ds.shape())
    }
}
