// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word-level OCR extraction using the `ocrs` crate, a pure-Rust OCR engine
// backed by neural network models executed via `rten`.
//
// # Model Setup
//
// The engine requires two model files:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Models can be obtained by running the `ocrs-cli` tool once:
//   ```sh
//   cargo install ocrs-cli
//   ocrs some-image.png  # downloads models to ~/.cache/ocrs/
//   ```
//
// The default lookup directory is `$XDG_CACHE_HOME/ocrs` (typically
// `~/.cache/ocrs`).
//
// # Performance
//
// `ocrs` and `rten` must be compiled in release mode; debug builds are
// 10-100x slower. `rten` parallelises inference internally with rayon,
// which is why the batch layer caps `RAYON_NUM_THREADS` when running
// multiple workers.

use std::path::{Path, PathBuf};

use image::RgbImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use rten_imageproc::BoundingRect;
use schwaerz_core::{Result, SchwaerzError, Word};
use tracing::{debug, info, instrument};

/// Default directory for cached OCR model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`,
/// falling back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        // Last resort — current directory.
        PathBuf::from("ocrs-models")
    }
}

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Configuration for constructing a [`WordExtractor`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file (`.rten`).
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        let dir = default_model_dir();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }
}

impl OcrConfig {
    /// Create a config with an explicit model directory.
    ///
    /// Expects the directory to contain `text-detection.rten` and
    /// `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(SchwaerzError::Ocr(format!(
                    "OCR model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Extracts positioned words from rendered page images.
///
/// Wraps the `ocrs` engine. Model loading is the expensive step — each
/// batch worker constructs one extractor in its init phase and reuses it
/// for every page of every document it processes.
pub struct WordExtractor {
    engine: OcrEngine,
}

impl WordExtractor {
    /// Load models and initialise the engine.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            SchwaerzError::Ocr(format!(
                "failed to load detection model from {}: {}",
                config.detection_model_path.display(),
                err
            ))
        })?;
        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|err| {
                SchwaerzError::Ocr(format!(
                    "failed to load recognition model from {}: {}",
                    config.recognition_model_path.display(),
                    err
                ))
            })?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| SchwaerzError::Ocr(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Extract every recognised word from a rendered page, with its
    /// axis-aligned bounding box in image coordinates.
    ///
    /// Recognition runs per detected word rather than per line so that
    /// each word keeps its own box; the grouper needs word-level geometry
    /// to size redaction rectangles.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract_words(&self, image: &RgbImage) -> Result<Vec<Word>> {
        let source = ImageSource::from_bytes(image.as_raw(), image.dimensions())
            .map_err(|err| SchwaerzError::Ocr(format!("failed to create image source: {err}")))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| SchwaerzError::Ocr(format!("OCR preprocessing failed: {err}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| SchwaerzError::Ocr(format!("word detection failed: {err}")))?;

        // One single-rect "line" per detected word.
        let line_groups: Vec<Vec<_>> = word_rects.iter().map(|rect| vec![*rect]).collect();
        let texts = self
            .engine
            .recognize_text(&input, &line_groups)
            .map_err(|err| SchwaerzError::Ocr(format!("word recognition failed: {err}")))?;

        let mut words = Vec::with_capacity(word_rects.len());
        for (rect, line) in word_rects.iter().zip(texts) {
            let Some(line) = line else { continue };
            let text = line.to_string();
            if text.trim().is_empty() {
                continue;
            }
            let bounds = rect.bounding_rect();
            let corner = bounds.top_left();
            words.push(Word::new(
                text,
                corner.x as i32,
                corner.y as i32,
                bounds.width().ceil() as i32,
                bounds.height().ceil() as i32,
            ));
        }

        debug!(
            detected = word_rects.len(),
            recognized = words.len(),
            "page OCR complete"
        );
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_to_cache_dir() {
        let config = OcrConfig::default();
        let path = config.detection_model_path.to_string_lossy();
        assert!(
            path.ends_with(DETECTION_MODEL_FILENAME),
            "detection model path should end with {DETECTION_MODEL_FILENAME}, got {path}"
        );
    }

    #[test]
    fn config_from_dir() {
        let config = OcrConfig::from_dir("/tmp/my-models");
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn validate_missing_models() {
        let config = OcrConfig::from_dir("/nonexistent/path/ocr-models");
        assert!(config.validate().is_err());
    }
}
