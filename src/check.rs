//! The leading-dimension rule and the end-to-end check.
//!
//! ```text
//!  dir ─discover─▶ path ─loader─▶ Container ─check_container─▶ Verdict
//! ```
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::CheckConfig;
use crate::data::discover::find_workload_file;
use crate::data::loader::open_container;
use crate::data::model::{Container, DatasetEntry, MemberKind};
use crate::error::CheckError;
use crate::report::CheckReport;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Result of a check that ran to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    /// Datasets whose leading dimension is below the threshold. Holds one
    /// entry unless the check was exhaustive.
    Fail { short: Vec<DatasetEntry> },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail { .. } => 1,
        }
    }
}

/// Datasets read so far and the decision reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub datasets: Vec<DatasetEntry>,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// Check every top-level member of `container` against `min_leading_dim`.
///
/// Members are visited in container order. The first short dataset ends
/// the check unless `exhaustive` is set. A member that is not a dataset, or
/// a scalar dataset, is an error wherever it appears before that point.
/// Members nested below the top level are never looked at. `path` is only
/// used in errors.
pub fn check_container(
    container: &dyn Container,
    path: &Path,
    min_leading_dim: usize,
    exhaustive: bool,
) -> Result<Outcome, CheckError> {
    let names = container
        .member_names()
        .map_err(|e| CheckError::unreadable(path, e))?;

    let mut datasets = Vec::with_capacity(names.len());
    let mut short = Vec::new();

    for name in names {
        let kind = container
            .member_kind(&name)
            .map_err(|e| CheckError::unreadable(path, e))?;
        if kind != MemberKind::Dataset {
            return Err(CheckError::NotADataset {
                path: path.to_path_buf(),
                member: name,
                kind,
            });
        }

        let shape = container
            .shape(&name)
            .map_err(|e| CheckError::unreadable(path, e))?;
        let entry = DatasetEntry::new(name, shape);

        let Some(leading) = entry.leading_dim() else {
            return Err(CheckError::ScalarDataset {
                path: path.to_path_buf(),
                dataset: entry.name,
            });
        };
        log::debug!("{}: shape {}", entry.name, entry.shape_string());

        let too_short = leading < min_leading_dim;
        datasets.push(entry.clone());

        if too_short {
            log::info!(
                "dataset '{}' has leading dimension {leading} < {min_leading_dim}",
                entry.name
            );
            short.push(entry);
            if !exhaustive {
                break;
            }
        }
    }

    let verdict = if short.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail { short }
    };
    Ok(Outcome { datasets, verdict })
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

/// Everything needed for one run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Explicit file; when `None` the file is discovered in `dir`.
    pub path: Option<PathBuf>,
    pub dir: PathBuf,
    pub config: CheckConfig,
    pub exhaustive: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            path: None,
            dir: PathBuf::from("."),
            config: CheckConfig::default(),
            exhaustive: false,
        }
    }
}

/// Locate, open and check one workload file.
pub fn run(options: &CheckOptions) -> Result<CheckReport, CheckError> {
    let path = match &options.path {
        Some(path) => path.clone(),
        None => find_workload_file(&options.dir, &options.config.marker)?,
    };
    log::debug!("checking {}", path.display());

    let container = open_container(&path).map_err(|e| CheckError::unreadable(&path, e))?;
    let format = container.format();
    let outcome = check_container(
        container.as_ref(),
        &path,
        options.config.min_leading_dim,
        options.exhaustive,
    )?;
    drop(container);

    Ok(CheckReport {
        file: path,
        format,
        min_leading_dim: options.config.min_leading_dim,
        datasets: outcome.datasets,
        verdict: outcome.verdict,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::bail;

    use super::*;
    use crate::data::model::ContainerFormat;

    /// In-memory container that records which shapes were asked for.
    struct FakeContainer {
        datasets: Vec<(&'static str, Vec<usize>)>,
        others: Vec<(&'static str, MemberKind)>,
        reads: RefCell<Vec<String>>,
    }

    impl FakeContainer {
        fn new(datasets: Vec<(&'static str, Vec<usize>)>) -> Self {
            Self {
                datasets,
                others: Vec::new(),
                reads: RefCell::new(Vec::new()),
            }
        }

        /// Add a non-dataset member after the datasets.
        fn with_member(mut self, name: &'static str, kind: MemberKind) -> Self {
            self.others.push((name, kind));
            self
        }
    }

    impl Container for FakeContainer {
        fn format(&self) -> ContainerFormat {
            ContainerFormat::Hdf5
        }

        fn member_names(&self) -> anyhow::Result<Vec<String>> {
            let datasets = self.datasets.iter().map(|(n, _)| n.to_string());
            let others = self.others.iter().map(|(n, _)| n.to_string());
            Ok(datasets.chain(others).collect())
        }

        fn member_kind(&self, name: &str) -> anyhow::Result<MemberKind> {
            if self.datasets.iter().any(|(n, _)| *n == name) {
                return Ok(MemberKind::Dataset);
            }
            match self.others.iter().find(|(n, _)| *n == name) {
                Some((_, kind)) => Ok(*kind),
                None => bail!("no member {name}"),
            }
        }

        fn shape(&self, name: &str) -> anyhow::Result<Vec<usize>> {
            self.reads.borrow_mut().push(name.to_string());
            match self.datasets.iter().find(|(n, _)| *n == name) {
                Some((_, shape)) => Ok(shape.clone()),
                None => bail!("no dataset {name}"),
            }
        }
    }

    struct BrokenContainer;

    impl Container for BrokenContainer {
        fn format(&self) -> ContainerFormat {
            ContainerFormat::Hdf5
        }

        fn member_names(&self) -> anyhow::Result<Vec<String>> {
            Ok(vec!["x".to_string()])
        }

        fn member_kind(&self, _name: &str) -> anyhow::Result<MemberKind> {
            Ok(MemberKind::Dataset)
        }

        fn shape(&self, _name: &str) -> anyhow::Result<Vec<usize>> {
            bail!("truncated object header")
        }
    }

    fn check(container: &dyn Container, exhaustive: bool) -> Result<Outcome, CheckError> {
        check_container(container, Path::new("run1.workload.h5"), 256, exhaustive)
    }

    #[test]
    fn all_long_enough_passes() {
        let c = FakeContainer::new(vec![("x", vec![300, 10]), ("y", vec![256])]);
        let outcome = check(&c, false).unwrap();
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert_eq!(outcome.datasets.len(), 2);
    }

    #[test]
    fn empty_container_passes() {
        let c = FakeContainer::new(vec![]);
        assert!(check(&c, false).unwrap().verdict.is_pass());
    }

    #[test]
    fn one_short_dataset_fails() {
        let c = FakeContainer::new(vec![("x", vec![300, 10]), ("y", vec![10, 10])]);
        let outcome = check(&c, false).unwrap();
        assert_eq!(
            outcome.verdict,
            Verdict::Fail {
                short: vec![DatasetEntry::new("y", vec![10, 10])]
            }
        );
        assert_eq!(outcome.verdict.exit_code(), 1);
    }

    #[test]
    fn threshold_is_inclusive() {
        let c = FakeContainer::new(vec![("edge", vec![256]), ("under", vec![255])]);
        let outcome = check(&c, true).unwrap();
        assert_eq!(
            outcome.verdict,
            Verdict::Fail {
                short: vec![DatasetEntry::new("under", vec![255])]
            }
        );
    }

    #[test]
    fn first_short_dataset_stops_the_scan() {
        let c = FakeContainer::new(vec![
            ("a", vec![1]),
            ("b", vec![]),
            ("c", vec![1000]),
        ]);
        let outcome = check(&c, false).unwrap();
        assert_eq!(outcome.verdict.exit_code(), 1);
        assert_eq!(*c.reads.borrow(), vec!["a"]);
    }

    #[test]
    fn exhaustive_collects_every_short_dataset() {
        let c = FakeContainer::new(vec![
            ("a", vec![1]),
            ("b", vec![512]),
            ("c", vec![2, 2]),
        ]);
        let outcome = check(&c, true).unwrap();
        match outcome.verdict {
            Verdict::Fail { short } => {
                let names: Vec<_> = short.iter().map(|d| d.name.as_str()).collect();
                assert_eq!(names, vec!["a", "c"]);
            }
            Verdict::Pass => panic!("expected failure"),
        }
        assert_eq!(outcome.datasets.len(), 3);
    }

    #[test]
    fn scalar_dataset_is_an_input_error() {
        let c = FakeContainer::new(vec![("x", vec![300]), ("s", vec![])]);
        let err = check(&c, false).unwrap_err();
        match err {
            CheckError::ScalarDataset { dataset, .. } => assert_eq!(dataset, "s"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn top_level_group_is_an_input_error() {
        let c = FakeContainer::new(vec![("x", vec![300, 10])])
            .with_member("meta", MemberKind::Group);
        match check(&c, false).unwrap_err() {
            CheckError::NotADataset { member, kind, .. } => {
                assert_eq!(member, "meta");
                assert_eq!(kind, MemberKind::Group);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn named_datatype_is_an_input_error_even_when_exhaustive() {
        let c = FakeContainer::new(vec![("x", vec![1])])
            .with_member("dtype", MemberKind::NamedDatatype);
        let err = check(&c, true).unwrap_err();
        assert!(matches!(
            err,
            CheckError::NotADataset {
                kind: MemberKind::NamedDatatype,
                ..
            }
        ));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn short_dataset_before_a_group_still_fails() {
        let c = FakeContainer::new(vec![("x", vec![10])]).with_member("meta", MemberKind::Group);
        assert_eq!(check(&c, false).unwrap().verdict.exit_code(), 1);
    }

    #[test]
    fn shape_read_failure_is_unreadable() {
        let err = check(&BrokenContainer, false).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn run_without_workload_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = CheckOptions {
            dir: dir.path().to_path_buf(),
            ..CheckOptions::default()
        };
        let err = run(&options).unwrap_err();
        assert!(matches!(err, CheckError::NoWorkloadFile { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn run_on_garbage_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run1.workload.parquet"), b"garbage").unwrap();
        let options = CheckOptions {
            dir: dir.path().to_path_buf(),
            ..CheckOptions::default()
        };
        assert!(matches!(
            run(&options).unwrap_err(),
            CheckError::Unreadable { .. }
        ));
    }
}
