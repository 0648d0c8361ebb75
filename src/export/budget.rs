use crate::export::surface::{Codec, Quality, RenderSurface, SurfaceReady};
use crate::foundation::error::{CreativeError, CreativeResult};

/// Descending JPEG quality steps tried until an encode fits the budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QualityLadder {
    /// First quality tried.
    pub start: Quality,
    /// Decrement between attempts.
    pub step: Quality,
    /// Lowest quality; the last resort encode always uses it.
    pub floor: Quality,
}

impl Default for QualityLadder {
    fn default() -> Self {
        Self {
            start: Quality::saturating(92),
            step: Quality::saturating(6),
            floor: Quality::saturating(20),
        }
    }
}

impl QualityLadder {
    /// Reject ladders that would not terminate or could never reach their floor.
    pub fn validate(&self) -> CreativeResult<()> {
        if self.step.hundredths() == 0 {
            return Err(CreativeError::validation("quality ladder step must be positive"));
        }
        if self.floor.hundredths() == 0 {
            return Err(CreativeError::validation("quality ladder floor must be positive"));
        }
        if self.floor > self.start {
            return Err(CreativeError::validation(format!(
                "quality ladder floor {} is above its start {}",
                self.floor, self.start
            )));
        }
        Ok(())
    }

    /// Qualities visited before the last resort, highest first.
    pub fn steps(&self) -> impl Iterator<Item = Quality> + '_ {
        std::iter::successors(Some(self.start), move |q| q.checked_sub(self.step))
            .take_while(move |q| *q >= self.floor)
    }
}

/// Export settings shared by every format in a batch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOpts {
    /// Largest acceptable artifact in bytes.
    pub byte_budget: usize,
    /// Artifact name prefix.
    pub file_prefix: String,
    /// Lossy fallback ladder.
    pub ladder: QualityLadder,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            byte_budget: 500 * 1024,
            file_prefix: "BrandCanvasAI".to_string(),
            ladder: QualityLadder::default(),
        }
    }
}

impl ExportOpts {
    /// Validate the ladder and the file prefix.
    pub fn validate(&self) -> CreativeResult<()> {
        self.ladder.validate()?;
        if self.file_prefix.is_empty()
            || self
                .file_prefix
                .chars()
                .any(|c| std::path::is_separator(c) || c.is_control())
        {
            return Err(CreativeError::validation(format!(
                "file prefix '{}' is not a plain file name",
                self.file_prefix
            )));
        }
        Ok(())
    }
}

/// Encoded bytes plus how they were produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Encoded artifact.
    pub bytes: Vec<u8>,
    /// Codec actually used; may differ from the requested one after a fallback.
    pub codec: Codec,
    /// Quality of lossy outcomes.
    pub quality: Option<Quality>,
}

impl ExportOutcome {
    /// Artifact size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the artifact exceeds `byte_budget`.
    pub fn is_over(&self, byte_budget: usize) -> bool {
        self.bytes.len() > byte_budget
    }
}

/// Encode the presented surface, trading quality for size until it fits `byte_budget`.
///
/// A lossless request is tried once at full fidelity and quietly falls back to the lossy ladder
/// when too large. The ladder walks down from `start`; when every step misses, one final encode at
/// `floor` is returned even if it is still over budget. Errors only come from the surface.
#[tracing::instrument(skip(surface, ladder), fields(format = %ready.format()))]
pub fn export_within_budget(
    surface: &mut dyn RenderSurface,
    ready: &SurfaceReady,
    requested: Codec,
    byte_budget: usize,
    ladder: &QualityLadder,
) -> CreativeResult<ExportOutcome> {
    ladder.validate()?;
    if requested.is_lossless() {
        let bytes = surface.encode(ready, &ready.request(requested, None))?;
        if bytes.len() <= byte_budget {
            return Ok(ExportOutcome {
                bytes,
                codec: requested,
                quality: None,
            });
        }
        tracing::debug!(
            bytes = bytes.len(),
            byte_budget,
            "lossless encode over budget, falling back to jpeg"
        );
    }

    for quality in ladder.steps() {
        let bytes = surface.encode(ready, &ready.request(Codec::Jpeg, Some(quality)))?;
        tracing::debug!(%quality, bytes = bytes.len(), byte_budget, "quality step");
        if bytes.len() <= byte_budget {
            return Ok(ExportOutcome {
                bytes,
                codec: Codec::Jpeg,
                quality: Some(quality),
            });
        }
    }

    let bytes = surface.encode(ready, &ready.request(Codec::Jpeg, Some(ladder.floor)))?;
    tracing::debug!(quality = %ladder.floor, bytes = bytes.len(), "ladder exhausted");
    Ok(ExportOutcome {
        bytes,
        codec: Codec::Jpeg,
        quality: Some(ladder.floor),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/budget.rs"]
mod tests;
