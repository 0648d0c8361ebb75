use std::sync::atomic::{AtomicBool, Ordering};

use crate::catalog::format::{Format, FormatKey};
use crate::export::budget::{ExportOpts, ExportOutcome, export_within_budget};
use crate::export::sink::ArtifactSink;
use crate::export::surface::{Codec, RenderSurface};
use crate::foundation::error::{CreativeError, CreativeResult};
use crate::foundation::math::kib_rounded;
use crate::layer::model::Layer;

/// One batch request: which formats to export, from which layers, and what to show afterwards.
#[derive(Clone, Copy, Debug)]
pub struct ExportJob<'a> {
    /// Formats in export order.
    pub formats: &'a [Format],
    /// Layers shown on every format.
    pub layers: &'a [Layer],
    /// Format re-presented once the batch ends, successful or not.
    pub restore_to: Format,
    /// Requested codec; lossless may fall back to lossy per format.
    pub codec: Codec,
    /// Budget, naming and ladder.
    pub opts: &'a ExportOpts,
}

/// Result of exporting one format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatExport {
    /// Exported format.
    pub format: FormatKey,
    /// Artifact name as delivered to the sink.
    pub file_name: String,
    /// Bytes, codec and quality.
    pub outcome: ExportOutcome,
    /// Human-readable size line, e.g. `SQUARE_1_1: 412 KB OK q=0.86`.
    pub summary: String,
}

/// Per-format outcomes of a batch, in export order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    /// One entry per exported format.
    pub entries: Vec<FormatExport>,
    /// Budget the batch ran against.
    pub byte_budget: usize,
}

impl ExportReport {
    /// Summary lines in export order.
    pub fn summary_lines(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.summary.as_str()).collect()
    }

    /// Whether every artifact fits the budget.
    pub fn all_within_budget(&self) -> bool {
        self.entries
            .iter()
            .all(|e| !e.outcome.is_over(self.byte_budget))
    }

    /// Entry for `format`, if it was exported.
    pub fn get(&self, format: FormatKey) -> Option<&FormatExport> {
        self.entries.iter().find(|e| e.format == format)
    }
}

/// `<prefix>_<FORMAT_KEY>.<ext>`
pub fn artifact_name(prefix: &str, format: FormatKey, codec: Codec) -> String {
    format!("{prefix}_{format}.{}", codec.extension())
}

/// `<FORMAT_KEY>: <KB> KB <OK|OVER>[ q=<quality>]`
pub fn summary_line(format: FormatKey, outcome: &ExportOutcome, byte_budget: usize) -> String {
    let verdict = if outcome.is_over(byte_budget) {
        "OVER"
    } else {
        "OK"
    };
    let mut line = format!("{format}: {} KB {verdict}", kib_rounded(outcome.len()));
    if let Some(q) = outcome.quality {
        line.push_str(&format!(" q={q}"));
    }
    line
}

/// Runs export batches one at a time.
///
/// A second batch started while one is running is rejected with [`CreativeError::Busy`].
#[derive(Debug, Default)]
pub struct Exporter {
    busy: AtomicBool,
}

/// Exclusive claim on an [`Exporter`]; dropping it frees the exporter.
///
/// Callers that must lock other state for the batch take the permit first, so a concurrent
/// request is turned away instead of queueing behind those locks.
#[derive(Debug)]
#[must_use = "the exporter is released as soon as the permit is dropped"]
pub struct BatchPermit<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BatchPermit<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Exporter {
    /// Idle exporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a batch is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the exporter without waiting; `Busy` if a batch holds it.
    pub fn try_begin(&self) -> CreativeResult<BatchPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::warn!("export rejected: a batch is already running");
                CreativeError::Busy
            })?;
        Ok(BatchPermit { flag: &self.busy })
    }

    /// Export every format of `job` within budget and deliver the artifacts to `sink`.
    ///
    /// Shorthand for [`Exporter::try_begin`] followed by [`BatchPermit::run`].
    pub fn export_all_formats(
        &self,
        job: &ExportJob<'_>,
        surface: &mut dyn RenderSurface,
        sink: &mut dyn ArtifactSink,
    ) -> CreativeResult<ExportReport> {
        self.try_begin()?.run(job, surface, sink)
    }
}

impl BatchPermit<'_> {
    /// Run `job`, releasing the exporter when done.
    ///
    /// Formats run in order; each is presented, awaited and encoded before the next. The first
    /// error aborts the batch. Whatever happens, `job.restore_to` is presented again before
    /// returning.
    #[tracing::instrument(
        skip_all,
        fields(formats = job.formats.len(), codec = %job.codec, byte_budget = job.opts.byte_budget)
    )]
    pub fn run(
        self,
        job: &ExportJob<'_>,
        surface: &mut dyn RenderSurface,
        sink: &mut dyn ArtifactSink,
    ) -> CreativeResult<ExportReport> {
        job.opts.validate()?;

        let result = run_batch(job, surface, sink);
        let restored = surface.present(&job.restore_to, job.layers);

        match (result, restored) {
            (Ok(report), Ok(_)) => Ok(report),
            (Ok(_), Err(restore_err)) => Err(restore_err),
            (Err(err), Ok(_)) => Err(err),
            (Err(err), Err(restore_err)) => {
                tracing::warn!(
                    error = %restore_err,
                    format = %job.restore_to.key,
                    "could not restore format after failed batch"
                );
                Err(err)
            }
        }
    }
}

fn run_batch(
    job: &ExportJob<'_>,
    surface: &mut dyn RenderSurface,
    sink: &mut dyn ArtifactSink,
) -> CreativeResult<ExportReport> {
    let byte_budget = job.opts.byte_budget;
    let mut entries = Vec::with_capacity(job.formats.len());

    for format in job.formats {
        let ready = surface.present(format, job.layers)?;
        let outcome =
            export_within_budget(surface, &ready, job.codec, byte_budget, &job.opts.ladder)?;

        let file_name = artifact_name(&job.opts.file_prefix, format.key, outcome.codec);
        sink.deliver(&file_name, &outcome.bytes)?;

        let summary = summary_line(format.key, &outcome, byte_budget);
        tracing::info!(artifact = %file_name, bytes = outcome.len(), "{summary}");
        entries.push(FormatExport {
            format: format.key,
            file_name,
            outcome,
            summary,
        });
    }

    Ok(ExportReport {
        entries,
        byte_budget,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/batch.rs"]
mod tests;
