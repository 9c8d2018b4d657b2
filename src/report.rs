use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::check::Verdict;
use crate::data::model::{ContainerFormat, DatasetEntry};

// ---------------------------------------------------------------------------
// CheckReport – what one run looked at and decided
// ---------------------------------------------------------------------------

/// Summary of a finished check. Only datasets that were actually read are
/// listed, so a short-circuited failure stops at the first short dataset.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub file: PathBuf,
    pub format: ContainerFormat,
    pub min_leading_dim: usize,
    pub datasets: Vec<DatasetEntry>,
    pub verdict: Verdict,
}

/// Output format for `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl CheckReport {
    pub fn exit_code(&self) -> u8 {
        self.verdict.exit_code()
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => {
                let mut out = serde_json::to_string_pretty(self).context("serializing report")?;
                out.push('\n');
                Ok(out)
            }
            ReportFormat::Csv => self.to_csv(),
        }
    }

    fn is_ok(&self, entry: &DatasetEntry) -> bool {
        entry
            .leading_dim()
            .is_some_and(|n| n >= self.min_leading_dim)
    }

    fn to_text(&self) -> String {
        let mut out = format!(
            "{} ({}), min leading dim {}\n",
            self.file.display(),
            self.format,
            self.min_leading_dim
        );

        let width = self.datasets.iter().map(|d| d.name.len()).max().unwrap_or(0);
        for entry in &self.datasets {
            let mark = if self.is_ok(entry) { "ok" } else { "short" };
            out.push_str(&format!(
                "  {:<width$}  {:<16} {mark}\n",
                entry.name,
                entry.shape_string()
            ));
        }

        match &self.verdict {
            Verdict::Pass => {
                out.push_str(&format!("PASS: {} dataset(s) checked\n", self.datasets.len()))
            }
            Verdict::Fail { short } => out.push_str(&format!(
                "FAIL: {} dataset(s) below {}\n",
                short.len(),
                self.min_leading_dim
            )),
        }
        out
    }

    /// Columns: `name,shape,leading_dim,ok`.
    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["name", "shape", "leading_dim", "ok"])
            .context("writing CSV header")?;

        for entry in &self.datasets {
            let leading = entry.leading_dim().map(|n| n.to_string()).unwrap_or_default();
            writer
                .write_record([
                    entry.name.as_str(),
                    entry.shape_string().as_str(),
                    leading.as_str(),
                    if self.is_ok(entry) { "true" } else { "false" },
                ])
                .with_context(|| format!("writing CSV row for '{}'", entry.name))?;
        }

        let bytes = writer.into_inner().context("flushing CSV")?;
        String::from_utf8(bytes).context("CSV output is not UTF-8")
    }
}
