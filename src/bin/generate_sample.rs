//! Writes sample workload files for trying out `workload-check`.
//!
//! Usage: `generate_sample [OUT_DIR] [ROWS]` (defaults: `.` and 1024).
//! Pass fewer than 256 rows to produce files that fail the check.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, FixedSizeListBuilder, Float64Array, Int64Builder};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Number of hardware counters sampled per step.
const COUNTERS: usize = 8;

/// Deterministic noise source for simulated profiles (splitmix64).
struct ProfileNoise {
    state: u64,
}

impl ProfileNoise {
    /// Seed from the run length so equal-sized samples are reproducible.
    fn for_run(rows: usize) -> Self {
        Self {
            state: 0x5EED_0000_0000_0000 ^ rows as u64,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Normal sample via Box-Muller.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let unit = |n: u64| (n >> 11) as f64 / (1u64 << 53) as f64;
        let u1 = unit(self.next_u64()).max(1e-15);
        let u2 = unit(self.next_u64());
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One simulated profiling run: per-step wall time and counter readings.
struct Profile {
    step_time_ms: Vec<f64>,
    counters: Vec<[i64; COUNTERS]>,
}

fn simulate(rows: usize, rng: &mut ProfileNoise) -> Profile {
    let step_time_ms = (0..rows)
        .map(|_| rng.gauss(12.5, 0.8).max(0.0))
        .collect();
    let counters = (0..rows)
        .map(|_| {
            let mut row = [0i64; COUNTERS];
            for (i, slot) in row.iter_mut().enumerate() {
                *slot = (rng.next_u64() % (1000 * (i as u64 + 1))) as i64;
            }
            row
        })
        .collect();
    Profile {
        step_time_ms,
        counters,
    }
}

fn write_parquet(path: &Path, profile: &Profile) -> Result<()> {
    let times: ArrayRef = Arc::new(Float64Array::from(profile.step_time_ms.clone()));

    let mut counters = FixedSizeListBuilder::new(Int64Builder::new(), COUNTERS as i32);
    for row in &profile.counters {
        counters.values().append_slice(row);
        counters.append(true);
    }
    let counters: ArrayRef = Arc::new(counters.finish());

    let schema = Arc::new(Schema::new(vec![
        Field::new("step_time_ms", times.data_type().clone(), false),
        Field::new("counters", counters.data_type().clone(), true),
    ]));
    let batch = RecordBatch::try_new(schema.clone(), vec![times, counters])
        .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(feature = "hdf5")]
fn write_hdf5(path: &Path, profile: &Profile) -> Result<()> {
    let rows = profile.step_time_ms.len();
    let file = hdf5::File::create(path).with_context(|| format!("creating {}", path.display()))?;

    let times = file
        .new_dataset::<f64>()
        .shape(rows)
        .create("step_time_ms")
        .context("creating step_time_ms")?;
    times
        .write_raw(profile.step_time_ms.as_slice())
        .context("writing step_time_ms")?;

    let flat: Vec<i64> = profile.counters.iter().flatten().copied().collect();
    let counters = file
        .new_dataset::<i64>()
        .shape((rows, COUNTERS))
        .create("counters")
        .context("creating counters")?;
    counters
        .write_raw(flat.as_slice())
        .context("writing counters")?;

    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out_dir = args.next().unwrap_or_else(|| ".".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 1024,
    };

    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = ProfileNoise::for_run(rows);
    let profile = simulate(rows, &mut rng);

    let parquet_path = out_dir.join("sample.workload.parquet");
    write_parquet(&parquet_path, &profile)?;
    println!("Wrote {} rows to {}", rows, parquet_path.display());

    #[cfg(feature = "hdf5")]
    {
        let h5_path = out_dir.join("sample.workload.h5");
        write_hdf5(&h5_path, &profile)?;
        println!("Wrote {} rows to {}", rows, h5_path.display());
    }

    Ok(())
}
