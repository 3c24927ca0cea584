//! Writing records and snapshots, and driving a complete run.

use std::{
    fs::File,
    io::{ BufWriter, Write },
    path::Path,
};
use ndarray as nd;
use tracing::{ info, warn };
use crate::{
    config::Config,
    diagnostics::{ NormMonitor, Record },
    error::BoxResult,
    mkdir,
    simulation::Simulation,
    write_npz,
};

/// Name of the text output file, one [`Record`] per line.
pub const RECORDS_FILE: &str = "avs.dat";

/// Name of the `.npz` snapshot file.
pub const SNAPSHOT_FILE: &str = "data.npz";

/// Line-oriented writer for [`Record`]s, optionally keeping every record
/// written in memory.
#[derive(Debug)]
pub struct RecordWriter<W>
where W: Write
{
    out: BufWriter<W>,
    history: Option<Vec<Record>>,
    count: usize,
}

impl<W> RecordWriter<W>
where W: Write
{
    /// Create a new `RecordWriter`.
    pub fn new(out: W) -> Self {
        Self { out: BufWriter::new(out), history: None, count: 0 }
    }

    /// Also keep all written records in memory.
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.history = keep.then(Vec::new);
        self
    }

    /// Write a single record as a line.
    pub fn write(&mut self, record: &Record) -> BoxResult<()> {
        writeln!(self.out, "{}", record)?;
        if let Some(history) = self.history.as_mut() {
            history.push(*record);
        }
        self.count += 1;
        Ok(())
    }

    /// Number of records written.
    pub fn count(&self) -> usize { self.count }

    /// Records written so far, if kept.
    pub fn history(&self) -> Option<&[Record]> { self.history.as_deref() }

    /// Flush and return the underlying sink.
    pub fn finish(self) -> BoxResult<W> {
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

/// Outcome of a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    /// Integrator steps taken.
    pub steps: usize,
    /// Records written.
    pub records: usize,
    /// First record written.
    pub first: Option<Record>,
    /// Last record written.
    pub last: Option<Record>,
    /// The record that tripped the norm monitor, if the run was cut short.
    pub diverged: Option<Record>,
}

/// Run `sim` to its horizon, writing every record to `writer`.
///
/// If `norm_tolerance` is given, records are checked against the norm of the
/// first one and the run stops after writing the first record that fails.
pub fn drive<W>(
    sim: &mut Simulation,
    writer: &mut RecordWriter<W>,
    norm_tolerance: Option<f64>,
) -> BoxResult<Summary>
where W: Write
{
    let horizon = sim.params().horizon;
    let start = writer.count();
    let mut monitor: Option<NormMonitor> = None;
    let mut first: Option<Record> = None;
    let mut last: Option<Record> = None;
    let mut diverged: Option<Record> = None;
    let mut decile: usize = 0;
    for record in sim.records() {
        writer.write(&record)?;
        if first.is_none() {
            first = Some(record);
            if let Some(tol) = norm_tolerance {
                monitor = Some(NormMonitor::new(record.norm, tol)?);
            }
        }
        last = Some(record);
        if let Some(err) = monitor.and_then(|mon| mon.check(&record).err()) {
            warn!("{}; stopping", err);
            diverged = Some(record);
            break;
        }
        let progress = (10.0 * record.time / horizon) as usize;
        if progress > decile {
            decile = progress;
            info!(
                "t = {:.4}: norm = {:.9}, <x> = {:.6}, E = {:.6}",
                record.time, record.norm, record.avg_position, record.energy,
            );
        }
    }
    Ok(Summary {
        steps: sim.steps_taken(),
        records: writer.count() - start,
        first,
        last,
        diverged,
    })
}

/// Write the grid, the current state of `sim`, and the columns of `records`
/// to a `.npz` file.
pub fn write_snapshot<P>(path: P, sim: &Simulation, records: &[Record])
    -> BoxResult<()>
where P: AsRef<Path>
{
    let column = |f: fn(&Record) -> f64| -> nd::Array1<f64> {
        records.iter().map(f).collect()
    };
    write_npz!(
        path.as_ref(),
        arrays: {
            "x" => sim.grid().positions(),
            "psi_re" => sim.state().re(),
            "psi_im" => sim.state().im(),
            "time" => &column(|r| r.time),
            "norm" => &column(|r| r.norm),
            "avg_position" => &column(|r| r.avg_position),
            "energy" => &column(|r| r.energy),
        }
    );
    Ok(())
}

/// Run a complete simulation as described by `config`, writing
/// [`RECORDS_FILE`] and, if requested, [`SNAPSHOT_FILE`] to the configured
/// output directory.
pub fn run(config: &Config) -> BoxResult<Summary> {
    config.validate()?;
    let outdir = config.run.outdir.clone();
    mkdir!(outdir);
    let mut sim = Simulation::from_config(config)?;
    info!("{}", sim.params());
    let mut writer
        = RecordWriter::new(File::create(outdir.join(RECORDS_FILE))?)
        .keep_history(config.run.snapshot);
    let summary = drive(&mut sim, &mut writer, config.run.norm_tolerance)?;
    if let Some(history) = writer.history() {
        write_snapshot(outdir.join(SNAPSHOT_FILE), &sim, history)?;
    }
    writer.finish()?;
    info!(
        "wrote {} records over {} steps to {}",
        summary.records,
        summary.steps,
        outdir.display(),
    );
    Ok(summary)
}
