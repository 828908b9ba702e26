// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembly from redacted page images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by
// constructing `PdfPage` structs containing `Vec<Op>` operation lists,
// then serialised via `PdfDocument::save()`.
//
// Each page image is placed full-bleed at the DPI it was rendered at, so
// a page that was W x H points on the way in is W x H points on the way
// out. Rebuilding pages as flat images is also what discards any hidden
// text layer the input carried.

use std::path::Path;

use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use schwaerz_core::Result;
use tracing::{debug, instrument};

/// Serialise redacted page images into a single PDF.
#[instrument(skip(pages, title), fields(pages = pages.len(), dpi))]
pub fn assemble_pdf(pages: Vec<RgbImage>, dpi: u32, title: &str) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(title);
    let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

    for image in pages {
        let (px_w, px_h) = image.dimensions();
        // pixels / dpi = inches; 25.4 mm per inch.
        let page_w_mm = px_w as f32 * 25.4 / dpi as f32;
        let page_h_mm = px_h as f32 * 25.4 / dpi as f32;

        let raw = RawImage {
            pixels: RawImageData::U8(image.into_raw()),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(dpi as f32),
                rotate: None,
            },
        }];
        pdf_pages.push(PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), ops));
        debug!(px_w, px_h, page_w_mm, page_h_mm, "page placed");
    }

    doc.with_pages(pdf_pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Assemble and write directly to `path`, creating parent directories.
pub fn write_pdf(path: &Path, pages: Vec<RgbImage>, dpi: u32, title: &str) -> Result<()> {
    let bytes = assemble_pdf(pages, dpi, title)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &bytes)?;
    Ok(())
}
