// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization via pdfium.
//
// PDF page geometry is expressed in points (72 per inch); rendering at a
// DPI means scaling by dpi/72. The same scale is inverted during assembly
// so the output pages keep the input's physical dimensions.

use std::path::Path;

use image::RgbImage;
use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use schwaerz_core::{Result, SchwaerzError};
use tracing::{debug, instrument};

/// Renders PDF pages to RGB images at a requested resolution.
///
/// Holds one pdfium binding. Bindings are not shared across threads; each
/// batch worker constructs its own renderer in its init phase.
pub struct PageRenderer {
    pdfium: Pdfium,
}

impl PageRenderer {
    /// Bind to the pdfium library (bundled if compiled in, otherwise the
    /// system library).
    pub fn new() -> Result<Self> {
        Ok(Self {
            pdfium: Pdfium::default(),
        })
    }

    /// Render every page of `path` at `dpi`.
    ///
    /// Returns one RGB image per page, in page order. A document that
    /// cannot be opened is an [`SchwaerzError::Input`]; a page that fails
    /// to render is an [`SchwaerzError::Render`].
    #[instrument(skip(self), fields(path = %path.display(), dpi))]
    pub fn render_pages(&self, path: &Path, dpi: u32) -> Result<Vec<RgbImage>> {
        let document = self
            .pdfium
            .load_pdf_from_file(&path, None)
            .map_err(|err| {
                SchwaerzError::Input(format!("cannot open {}: {}", path.display(), err))
            })?;

        let config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let mut pages = Vec::with_capacity(document.pages().len() as usize);
        for (index, page) in document.pages().iter().enumerate() {
            let image = page
                .render_with_config(&config)
                .map_err(|err| {
                    SchwaerzError::Render(format!(
                        "page {} of {}: {}",
                        index + 1,
                        path.display(),
                        err
                    ))
                })?
                .as_image()
                .into_rgb8();
            debug!(
                page = index + 1,
                width = image.width(),
                height = image.height(),
                "page rendered"
            );
            pages.push(image);
        }
        Ok(pages)
    }
}
