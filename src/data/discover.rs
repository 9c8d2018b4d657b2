use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::CheckError;

/// First name containing `marker`, in the order `names` yields them.
///
/// Names are compared lossily so a non-UTF-8 name can still match an ASCII
/// marker.
pub fn first_matching<I>(names: I, marker: &str) -> Option<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    names
        .into_iter()
        .find(|name| name.to_string_lossy().contains(marker))
}

/// Find the workload file in `dir`: the first entry (in `read_dir` order,
/// which is not sorted) whose name contains `marker`.
///
/// Entries are not filtered by type; a matching directory is returned and
/// fails later when it is opened.
pub fn find_workload_file(dir: &Path, marker: &str) -> Result<PathBuf, CheckError> {
    let list_err = |source| CheckError::ListDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        names.push(entry.map_err(list_err)?.file_name());
    }
    log::debug!("{} entries in {}", names.len(), dir.display());

    match first_matching(names, marker) {
        Some(name) => {
            let path = dir.join(name);
            log::debug!("selected workload file {}", path.display());
            Ok(path)
        }
        None => Err(CheckError::NoWorkloadFile {
            dir: dir.to_path_buf(),
            marker: marker.to_string(),
        }),
    }
}
