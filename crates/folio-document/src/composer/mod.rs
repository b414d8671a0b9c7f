// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page composer — owns the single in-memory page and moves finished pages to
// scratch files so memory stays bounded regardless of document length.
//
// Every page transition flushes the active page to its scratch slot first and
// then replaces the canvas wholesale. `save` stitches the scratch files back
// together in record order.

mod assemble;
mod scratch;

use std::path::{Path, PathBuf};

use folio_core::error::FolioError;
use folio_core::units::{self, Unit};
use folio_core::{
    BorderStyle, ComposerConfig, DEFAULT_FONT_SIZE, DocumentOptions, Fill, FontSource,
    LineOptions, Orientation, PageGeometry, PageLimits, PageSize, PageSpacing, RectangleOptions,
    Rgba, TextOptions,
};
use tracing::{debug, info, instrument};

use self::scratch::ScratchStore;
use crate::font::Font;
use crate::layout;
use crate::pdf::{PdfCanvas, SourceDocument, Stroke};

/// Stroke width used when a line or border gives none, in points.
const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Settings inherited from page to page unless overridden.
#[derive(Debug, Clone)]
struct PageSettings {
    unit: Unit,
    orientation: Orientation,
    font: Font,
    font_size: f64,
    font_color: Rgba,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            unit: Unit::default(),
            orientation: Orientation::default(),
            font: Font::default(),
            font_size: DEFAULT_FONT_SIZE,
            font_color: Rgba::black(),
        }
    }
}

impl PageSettings {
    /// Overlay `options`, each field falling back to the current value.
    fn apply(&self, options: &DocumentOptions) -> Result<Self, FolioError> {
        let font_size = options.font_size.unwrap_or(self.font_size);
        non_negative("font size", font_size)?;
        let font = match &options.font {
            Some(source) => Font::load(source.clone())?,
            None => self.font.clone(),
        };
        Ok(Self {
            unit: options.unit.unwrap_or(self.unit),
            orientation: options.orientation.unwrap_or(self.orientation),
            font,
            font_size,
            font_color: options.font_color.unwrap_or(self.font_color),
        })
    }
}

/// Builds a PDF one page at a time from unit-aware, margin-checked drawing
/// calls.
///
/// Exactly one page is held in memory. Completed pages live in scratch files
/// until [`Composer::save`] assembles them. Operations must be awaited one at
/// a time; `&mut self` enforces that per instance.
pub struct Composer {
    config: ComposerConfig,
    scratch: ScratchStore,
    /// The active page. Replaced, never patched, on every page transition.
    canvas: PdfCanvas,
    settings: PageSettings,
    geometry: PageGeometry,
    page_count: usize,
    /// 1-based index of the active page; 0 when the document has no pages.
    selected: usize,
}

impl Composer {
    // -- Construction ---------------------------------------------------------

    /// Start a one-page document with the default configuration.
    pub async fn create(options: DocumentOptions) -> Result<Self, FolioError> {
        Self::with_config(ComposerConfig::default(), options).await
    }

    /// Start a one-page document.
    #[instrument(skip_all)]
    pub async fn with_config(
        config: ComposerConfig,
        options: DocumentOptions,
    ) -> Result<Self, FolioError> {
        let settings = PageSettings::default().apply(&options)?;
        let spacing = spacing_points(options.page_spacing.unwrap_or_default(), settings.unit)?;
        let (width, height) = options
            .page_size
            .unwrap_or_default()
            .resolve_oriented(settings.unit, settings.orientation);

        let scratch = ScratchStore::open(config.resolved_scratch_dir()).await?;
        let mut canvas = PdfCanvas::new(&config.pdf_version);
        canvas.add_page(width, height)?;

        info!(
            unit = %settings.unit,
            width,
            height,
            prefix = scratch.prefix(),
            "Document created"
        );

        Ok(Self {
            config,
            scratch,
            canvas,
            settings,
            geometry: PageGeometry::new(width, height, spacing),
            page_count: 1,
            selected: 1,
        })
    }

    // -- Inspection -----------------------------------------------------------

    pub fn number_of_pages(&self) -> usize {
        self.page_count
    }

    /// 1-based index of the active page, or 0 if there is none.
    pub fn selected_page(&self) -> usize {
        self.selected
    }

    /// Width of the active page in the document unit.
    pub fn page_width(&self) -> f64 {
        units::from_points(self.settings.unit, self.geometry.width())
    }

    /// Height of the active page in the document unit.
    pub fn page_height(&self) -> f64 {
        units::from_points(self.settings.unit, self.geometry.height())
    }

    pub fn unit(&self) -> Unit {
        self.settings.unit
    }

    /// Drawable limits of the active page, in points.
    pub fn limits(&self) -> &PageLimits {
        self.geometry.limits()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Random file-name prefix of this instance's scratch files.
    pub fn scratch_prefix(&self) -> &str {
        self.scratch.prefix()
    }

    // -- Page settings --------------------------------------------------------

    /// Replace the margins of the active page. Values are in the document
    /// unit and are converted to points immediately.
    #[instrument(skip(self))]
    pub fn set_page_spacing(&mut self, spacing: PageSpacing) -> Result<(), FolioError> {
        let spacing = spacing_points(spacing, self.settings.unit)?;
        self.geometry = self.geometry.with_spacing(spacing);
        debug!(?spacing, limits = ?self.geometry.limits(), "Page spacing changed");
        Ok(())
    }

    /// Make `font` the default for subsequent text.
    #[instrument(skip_all)]
    pub fn set_page_font(&mut self, font: FontSource) -> Result<(), FolioError> {
        self.settings.font = Font::load(font)?;
        debug!(font = self.settings.font.key(), "Page font changed");
        Ok(())
    }

    /// Read a TrueType/OpenType file and validate it as a font.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn custom_font(&self, path: impl AsRef<Path>) -> Result<FontSource, FolioError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let font = Font::from_bytes(bytes)?;
        Ok(font.source().clone())
    }

    /// Load a font file and make it the default for subsequent text.
    pub async fn set_custom_font(&mut self, path: impl AsRef<Path>) -> Result<(), FolioError> {
        let source = self.custom_font(path).await?;
        self.set_page_font(source)
    }

    /// Line height of `font` at `size` points.
    pub fn height_at_size(&self, size: f64, font: &FontSource) -> Result<f64, FolioError> {
        non_negative("font size", size)?;
        Ok(Font::load(font.clone())?.height_at_size(size))
    }

    /// Width of `text` at `size` points, in `font` or the page font.
    pub fn width_of_text_at_size(
        &self,
        text: &str,
        size: f64,
        font: Option<&FontSource>,
    ) -> Result<f64, FolioError> {
        non_negative("font size", size)?;
        match font {
            Some(source) => Font::load(source.clone())?.width_of_text_at_size(text, size),
            None => self.settings.font.width_of_text_at_size(text, size),
        }
    }

    // -- Page lifecycle -------------------------------------------------------

    /// Finish the active page and start a new one at the end of the document.
    #[instrument(skip_all, fields(pages = self.page_count))]
    pub async fn add_page(&mut self, options: DocumentOptions) -> Result<(), FolioError> {
        let settings = self.settings.apply(&options)?;
        let spacing = match options.page_spacing {
            Some(spacing) => spacing_points(spacing, settings.unit)?,
            None => *self.geometry.spacing(),
        };
        let (width, height) = self.next_page_size(options.page_size, &settings);

        let mut canvas = PdfCanvas::new(&self.config.pdf_version);
        canvas.add_page(width, height)?;

        self.flush().await?;
        self.canvas = canvas;
        self.settings = settings;
        self.geometry = PageGeometry::new(width, height, spacing);
        self.page_count += 1;
        self.selected = self.page_count;

        info!(page = self.selected, width, height, "Page added");
        Ok(())
    }

    /// Make page `page` (1-based) the active page.
    #[instrument(skip(self), fields(from = self.selected))]
    pub async fn select_page(&mut self, page: usize) -> Result<(), FolioError> {
        if page == self.selected {
            return Ok(());
        }
        if page == 0 || page > self.page_count {
            return Err(FolioError::PageNotFound(page));
        }

        self.flush().await?;
        let bytes = self.scratch.load(page).await?;
        let source = SourceDocument::from_bytes(&bytes)?;
        self.activate(&source, first_page(&source, page)?)?;
        self.selected = page;

        info!(page, "Page selected");
        Ok(())
    }

    /// Replace the active page with a blank page of the same size.
    #[instrument(skip_all, fields(page = self.selected))]
    pub async fn clear_page(&mut self) -> Result<(), FolioError> {
        self.require_page()?;
        self.flush().await?;

        let mut canvas = PdfCanvas::new(&self.config.pdf_version);
        canvas.add_page(self.geometry.width(), self.geometry.height())?;
        self.canvas = canvas;

        info!("Page cleared");
        Ok(())
    }

    /// Delete page `page` (1-based). If it was the active page, the page now
    /// at that position (or the new last page) becomes active.
    #[instrument(skip(self), fields(selected = self.selected))]
    pub async fn remove_page(&mut self, page: usize) -> Result<(), FolioError> {
        self.flush().await?;
        self.scratch.remove(page).await?;
        self.page_count -= 1;

        if page < self.selected {
            self.selected -= 1;
        } else if page == self.selected {
            if self.page_count == 0 {
                self.canvas = PdfCanvas::new(&self.config.pdf_version);
                self.selected = 0;
            } else {
                let next = page.min(self.page_count);
                let bytes = self.scratch.load(next).await?;
                let source = SourceDocument::from_bytes(&bytes)?;
                self.activate(&source, first_page(&source, next)?)?;
                self.selected = next;
            }
        }

        info!(
            page,
            pages = self.page_count,
            selected = self.selected,
            "Page removed"
        );
        Ok(())
    }

    /// Append every page of the PDF at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load_pdf(&mut self, path: impl AsRef<Path>) -> Result<(), FolioError> {
        let path = path.as_ref();
        ensure_exists(path).await?;
        self.append_document(path).await
    }

    /// Append every page of each PDF in `paths`, in order. All paths are
    /// checked before anything is appended.
    #[instrument(skip_all, fields(files = paths.len()))]
    pub async fn merge_pdf<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), FolioError> {
        if paths.is_empty() {
            return Err(FolioError::EmptyFileList);
        }
        for path in paths {
            ensure_exists(path.as_ref()).await?;
        }
        for path in paths {
            self.append_document(path.as_ref()).await?;
        }
        Ok(())
    }

    /// Write the whole document to `path` and delete the scratch files.
    ///
    /// Scratch files are removed only after the output was written. On
    /// success the composer is left with no pages.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), pages = self.page_count))]
    pub async fn save(&mut self, path: impl AsRef<Path>) -> Result<(), FolioError> {
        let path = path.as_ref();
        let bytes = if self.scratch.is_empty() {
            if self.page_count == 0 {
                return Err(FolioError::NoPagesToSave);
            }
            assemble::single(&self.canvas.to_bytes()?, &self.config)?
        } else {
            self.flush().await?;
            debug!(scratch_pages = self.scratch.len(), "Assembling from scratch");
            assemble::assemble(self.scratch.paths(), &self.config).await?
        };

        tokio::fs::write(path, &bytes).await?;
        self.scratch.purge().await?;
        self.reset();

        info!(bytes = bytes.len(), "Document saved");
        Ok(())
    }

    /// Drop all pages and delete this instance's scratch files without
    /// writing anything.
    #[instrument(skip_all, fields(pages = self.page_count))]
    pub async fn discard(&mut self) -> Result<(), FolioError> {
        self.scratch.purge().await?;
        self.reset();
        info!("Document discarded");
        Ok(())
    }

    // -- Drawing --------------------------------------------------------------

    /// Draw a single line of text. `options.position` is the top-left of the
    /// text box (top-centre or top-right for other alignments).
    #[instrument(skip_all, fields(page = self.selected, text_len = text.len()))]
    pub fn write_text(&mut self, text: &str, options: &TextOptions) -> Result<(), FolioError> {
        self.require_page()?;
        let size = options.font_size.unwrap_or(self.settings.font_size);
        non_negative("font size", size)?;
        let font = match &options.font {
            Some(source) => Font::load(source.clone())?,
            None => self.settings.font.clone(),
        };

        let width = font.width_of_text_at_size(text, size)?;
        let height = font.height_at_size(size);
        let anchor = layout::normalize_text(
            &self.geometry,
            self.settings.unit,
            options.position,
            options.align,
            width,
            height,
        )?;

        let baseline = anchor.y - height + font.descent_at_size(size);
        let color = options.color.unwrap_or(self.settings.font_color);
        self.canvas
            .draw_text(&font, text, anchor.x, baseline, size, color)
    }

    /// Draw a straight line. Both endpoints must lie inside the limits.
    #[instrument(skip_all, fields(page = self.selected))]
    pub fn write_line(&mut self, options: &LineOptions) -> Result<(), FolioError> {
        self.require_page()?;
        let unit = self.settings.unit;
        let width = stroke_width(options.thickness, unit)?;
        let from = layout::normalize_point(&self.geometry, unit, options.start)?;
        let to = layout::normalize_point(&self.geometry, unit, options.end)?;

        let stroke = Stroke {
            color: options.color.unwrap_or_else(Rgba::black),
            width,
            dash: None,
        };
        self.canvas.draw_line((from.x, from.y), (to.x, to.y), &stroke)
    }

    /// Draw a rectangle from its top-left corner.
    #[instrument(skip_all, fields(page = self.selected))]
    pub fn write_rectangle(&mut self, options: &RectangleOptions) -> Result<(), FolioError> {
        self.require_page()?;
        let unit = self.settings.unit;
        non_negative("width", options.width)?;
        non_negative("height", options.height)?;
        let stroke = self.border(options)?;

        let width = units::to_points(unit, options.width);
        let height = units::to_points(unit, options.height);
        let anchor = layout::normalize_box(&self.geometry, unit, options.position, width, height)?;

        let fill = match options.fill {
            Fill::None => None,
            Fill::Color(color) => Some(color),
        };
        self.canvas.draw_rectangle(
            anchor.x,
            anchor.y - height,
            width,
            height,
            fill,
            stroke.as_ref(),
        )
    }

    // -- Helpers --------------------------------------------------------------

    /// Persist the active page into its scratch slot.
    async fn flush(&mut self) -> Result<(), FolioError> {
        if self.selected == 0 {
            return Ok(());
        }
        let bytes = self.canvas.to_bytes()?;
        self.scratch.store(self.selected, &bytes).await
    }

    /// Make page `page_number` of `source` the active page, adopting its size.
    fn activate(&mut self, source: &SourceDocument, page_number: u32) -> Result<(), FolioError> {
        let mut canvas = PdfCanvas::new(&self.config.pdf_version);
        canvas.copy_page_from(source, page_number)?;
        let (width, height) = canvas.page_size()?;
        self.canvas = canvas;
        self.geometry = self.geometry.with_size(width, height);
        debug!(width, height, "Active page replaced");
        Ok(())
    }

    async fn append_document(&mut self, path: &Path) -> Result<(), FolioError> {
        let bytes = tokio::fs::read(path).await?;
        let source = SourceDocument::from_bytes(&bytes)?;

        self.flush().await?;
        for page_number in source.page_numbers() {
            self.activate(&source, page_number)?;
            self.page_count += 1;
            self.selected = self.page_count;
            self.flush().await?;
        }

        info!(
            path = %path.display(),
            added = source.page_count(),
            pages = self.page_count,
            "PDF appended"
        );
        Ok(())
    }

    /// Size for the next page: explicit size, else the previous page's size
    /// re-oriented if the orientation was overridden.
    fn next_page_size(&self, page_size: Option<PageSize>, settings: &PageSettings) -> (f64, f64) {
        match page_size {
            Some(size) => size.resolve_oriented(settings.unit, settings.orientation),
            None => {
                let (width, height) = (self.geometry.width(), self.geometry.height());
                let (short, long) = (width.min(height), width.max(height));
                if settings.orientation == self.settings.orientation {
                    (width, height)
                } else if settings.orientation == Orientation::Landscape {
                    (long, short)
                } else {
                    (short, long)
                }
            }
        }
    }

    fn border(&self, options: &RectangleOptions) -> Result<Option<Stroke>, FolioError> {
        if options.border_color.is_none() && options.border_width.is_none() {
            return Ok(None);
        }
        let unit = self.settings.unit;
        let dash = match options.border_style {
            BorderStyle::Solid => None,
            BorderStyle::Dashed { dash, gap } => {
                non_negative("dash length", dash)?;
                non_negative("dash gap", gap)?;
                Some((units::to_points(unit, dash), units::to_points(unit, gap)))
            }
        };
        Ok(Some(Stroke {
            color: options.border_color.unwrap_or_else(Rgba::black),
            width: stroke_width(options.border_width, unit)?,
            dash,
        }))
    }

    fn require_page(&self) -> Result<(), FolioError> {
        if self.selected == 0 {
            return Err(FolioError::PageNotFound(0));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.canvas = PdfCanvas::new(&self.config.pdf_version);
        self.page_count = 0;
        self.selected = 0;
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), FolioError> {
    if !value.is_finite() {
        return Err(FolioError::NonFiniteValue { name, value });
    }
    if value < 0.0 {
        return Err(FolioError::NegativeValue { name, value });
    }
    Ok(())
}

fn spacing_points(spacing: PageSpacing, unit: Unit) -> Result<PageSpacing, FolioError> {
    for value in [spacing.top, spacing.bottom, spacing.left, spacing.right] {
        non_negative("page spacing", value)?;
    }
    Ok(spacing.to_points(unit))
}

fn stroke_width(thickness: Option<f64>, unit: Unit) -> Result<f64, FolioError> {
    match thickness {
        Some(value) => {
            non_negative("stroke width", value)?;
            Ok(units::to_points(unit, value))
        }
        None => Ok(DEFAULT_STROKE_WIDTH),
    }
}

fn first_page(source: &SourceDocument, page: usize) -> Result<u32, FolioError> {
    source
        .page_numbers()
        .first()
        .copied()
        .ok_or(FolioError::PageNotFound(page))
}

async fn ensure_exists(path: &Path) -> Result<(), FolioError> {
    if tokio::fs::try_exists(path).await? {
        Ok(())
    } else {
        Err(FolioError::SourceFileNotFound(PathBuf::from(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Alignment, PaperSize, Position, StandardFont};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> ComposerConfig {
        ComposerConfig {
            scratch_dir: Some(dir.path().join("scratch")),
            ..ComposerConfig::default()
        }
    }

    /// Square page of `side` points, in point units.
    fn square(side: f64) -> DocumentOptions {
        DocumentOptions::default()
            .with_unit(Unit::Point)
            .with_page_size(PageSize::Custom {
                line: side,
                column: side,
            })
    }

    async fn composer(dir: &TempDir, options: DocumentOptions) -> Composer {
        Composer::with_config(config(dir), options)
            .await
            .expect("create composer")
    }

    fn page_widths(path: &Path) -> Vec<f64> {
        let bytes = std::fs::read(path).expect("read output");
        let source = SourceDocument::from_bytes(&bytes).expect("parse output");
        source
            .page_numbers()
            .into_iter()
            .map(|n| source.page_size(n).expect("page size").0)
            .collect()
    }

    fn scratch_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path().join("scratch"))
            .expect("scratch dir")
            .count()
    }

    #[test]
    fn composer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Composer>();
    }

    #[tokio::test]
    async fn create_has_one_a4_page_in_millimetres() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = composer(&dir, DocumentOptions::default()).await;
        assert_eq!(doc.number_of_pages(), 1);
        assert_eq!(doc.selected_page(), 1);
        assert_eq!(doc.unit(), Unit::Millimeter);
        assert_eq!(doc.page_width(), 210.0);
        assert_eq!(doc.page_height(), 297.0);
    }

    #[tokio::test]
    async fn add_then_remove_first_page_keeps_second() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        doc.add_page(square(200.0)).await.expect("add page");
        assert_eq!(doc.number_of_pages(), 2);

        doc.remove_page(1).await.expect("remove page");
        assert_eq!(doc.number_of_pages(), 1);
        assert_eq!(doc.selected_page(), 1);
        assert_eq!(doc.page_width(), 200.0);

        let out = dir.path().join("out.pdf");
        doc.save(&out).await.expect("save");
        assert_eq!(page_widths(&out), vec![200.0]);
    }

    #[tokio::test]
    async fn merge_appends_pages_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        let mut source = composer(&dir, square(300.0)).await;
        source.save(&a).await.expect("save a");
        let mut source = composer(&dir, square(400.0)).await;
        source.save(&b).await.expect("save b");

        let mut doc = composer(&dir, square(100.0)).await;
        doc.merge_pdf(&[&a, &b]).await.expect("merge");
        assert_eq!(doc.number_of_pages(), 3);
        assert_eq!(doc.selected_page(), 3);
        assert_eq!(doc.page_width(), 400.0);

        let out = dir.path().join("merged.pdf");
        doc.save(&out).await.expect("save");
        assert_eq!(page_widths(&out), vec![100.0, 300.0, 400.0]);
        assert_eq!(scratch_files(&dir), 0);
    }

    #[tokio::test]
    async fn save_without_pages_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, DocumentOptions::default()).await;
        doc.remove_page(1).await.expect("remove only page");
        assert_eq!(doc.number_of_pages(), 0);

        let err = doc.save(dir.path().join("out.pdf")).await.unwrap_err();
        assert!(matches!(err, FolioError::NoPagesToSave));
    }

    #[tokio::test]
    async fn save_empties_the_composer_and_scratch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        doc.add_page(DocumentOptions::default()).await.expect("add page");
        assert_eq!(scratch_files(&dir), 1);

        let out = dir.path().join("out.pdf");
        doc.save(&out).await.expect("save");
        assert_eq!(page_widths(&out), vec![100.0, 100.0]);
        assert_eq!(scratch_files(&dir), 0);
        assert_eq!(doc.number_of_pages(), 0);

        let again = doc.save(&out).await.unwrap_err();
        assert!(matches!(again, FolioError::NoPagesToSave));
    }

    #[tokio::test]
    async fn scratch_files_use_instance_prefix() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, DocumentOptions::default()).await;
        doc.add_page(DocumentOptions::default()).await.expect("add page");

        let expected = dir
            .path()
            .join("scratch")
            .join(format!("{}.pdfpart1", doc.scratch_prefix()));
        assert!(expected.is_file());
    }

    #[tokio::test]
    async fn text_on_top_limit_is_accepted_and_one_point_above_is_not() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = square(300.0).with_page_spacing(PageSpacing::uniform(20.0));
        let mut doc = composer(&dir, options).await;
        assert_eq!(doc.limits().start_column, 280.0);

        doc.write_text("Total", &TextOptions::at(20.0, 20.0))
            .expect("on the limit");
        let err = doc
            .write_text("Total", &TextOptions::at(20.0, 19.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeColumn { .. }));
    }

    #[tokio::test]
    async fn text_width_is_checked_against_right_margin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        // "Hello" in Helvetica 10 is 22.78 pt wide.
        let err = doc
            .write_text("Hello", &TextOptions::at(80.0, 50.0).sized(10.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLineWithWidth { .. }));

        doc.write_text(
            "Hello",
            &TextOptions::at(100.0, 50.0)
                .sized(10.0)
                .aligned(Alignment::Right),
        )
        .expect("right aligned against the edge");
    }

    #[tokio::test]
    async fn negative_font_size_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        let err = doc
            .write_text("x", &TextOptions::at(10.0, 10.0).sized(-1.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::NegativeValue { name: "font size", .. }));
        assert!(doc.height_at_size(-2.0, &FontSource::default()).is_err());
        assert!(doc.width_of_text_at_size("x", -2.0, None).is_err());
    }

    #[tokio::test]
    async fn lines_and_rectangles_are_bounded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;

        doc.write_line(&LineOptions {
            start: Position::new(0.0, 0.0),
            end: Position::new(100.0, 100.0),
            thickness: Some(0.5),
            color: Some(Rgba::from_rgb8(200, 0, 0)),
        })
        .expect("diagonal line");

        let err = doc
            .write_line(&LineOptions {
                start: Position::new(0.0, 0.0),
                end: Position::new(101.0, 50.0),
                ..LineOptions::default()
            })
            .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLine { .. }));

        doc.write_rectangle(&RectangleOptions {
            position: Position::new(10.0, 10.0),
            width: 50.0,
            height: 50.0,
            fill: Fill::Color(Rgba::rgb(0.9, 0.9, 0.9).with_alpha(0.5)),
            border_width: Some(1.0),
            border_style: BorderStyle::Dashed { dash: 3.0, gap: 2.0 },
            ..RectangleOptions::default()
        })
        .expect("rectangle");

        let err = doc
            .write_rectangle(&RectangleOptions {
                position: Position::new(10.0, 60.0),
                width: 10.0,
                height: 50.0,
                ..RectangleOptions::default()
            })
            .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeColumnWithHeight { .. }));
    }

    #[tokio::test]
    async fn select_page_switches_and_validates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        doc.add_page(square(200.0)).await.expect("add 2");
        doc.add_page(square(300.0)).await.expect("add 3");

        doc.select_page(1).await.expect("select 1");
        assert_eq!(doc.selected_page(), 1);
        assert_eq!(doc.page_width(), 100.0);

        doc.select_page(1).await.expect("no-op");
        assert!(matches!(
            doc.select_page(9).await,
            Err(FolioError::PageNotFound(9))
        ));

        doc.write_text("edited", &TextOptions::at(10.0, 10.0))
            .expect("write on page 1");
        doc.select_page(3).await.expect("select 3");
        assert_eq!(doc.page_width(), 300.0);

        let out = dir.path().join("out.pdf");
        doc.save(&out).await.expect("save");
        assert_eq!(page_widths(&out), vec![100.0, 200.0, 300.0]);
    }

    #[tokio::test]
    async fn removing_selected_page_activates_neighbour() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        doc.add_page(square(200.0)).await.expect("add 2");
        doc.add_page(square(300.0)).await.expect("add 3");
        doc.select_page(2).await.expect("select 2");

        doc.remove_page(2).await.expect("remove 2");
        assert_eq!(doc.number_of_pages(), 2);
        assert_eq!(doc.selected_page(), 2);
        assert_eq!(doc.page_width(), 300.0);

        assert!(matches!(
            doc.remove_page(5).await,
            Err(FolioError::PageNotFound(5))
        ));
    }

    #[tokio::test]
    async fn clear_page_keeps_count_and_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(150.0)).await;
        doc.write_text("draft", &TextOptions::at(10.0, 10.0))
            .expect("write");
        doc.clear_page().await.expect("clear");
        assert_eq!(doc.number_of_pages(), 1);
        assert_eq!(doc.page_width(), 150.0);
    }

    #[tokio::test]
    async fn add_page_inherits_each_unset_option() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = DocumentOptions::default()
            .with_unit(Unit::Centimeter)
            .with_orientation(Orientation::Landscape)
            .with_page_size(PageSize::Paper(PaperSize::Letter))
            .with_page_spacing(PageSpacing::uniform(1.0));
        let mut doc = composer(&dir, options).await;
        let limits = *doc.limits();

        doc.add_page(DocumentOptions::default().with_font_size(12.0))
            .await
            .expect("add page");
        assert_eq!(doc.unit(), Unit::Centimeter);
        assert_eq!(doc.page_width(), 27.94);
        assert_eq!(*doc.limits(), limits);

        doc.add_page(DocumentOptions::default().with_orientation(Orientation::Portrait))
            .await
            .expect("add portrait page");
        assert_eq!(doc.page_width(), 21.59);
        assert_eq!(doc.number_of_pages(), 3);
    }

    #[tokio::test]
    async fn set_page_spacing_recomputes_limits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;
        doc.set_page_spacing(PageSpacing {
            top: 5.0,
            bottom: 6.0,
            left: 7.0,
            right: 8.0,
        })
        .expect("spacing");
        let limits = doc.limits();
        assert_eq!(limits.start_line, 7.0);
        assert_eq!(limits.end_line, 92.0);
        assert_eq!(limits.start_column, 95.0);
        assert_eq!(limits.end_column, 6.0);

        assert!(matches!(
            doc.set_page_spacing(PageSpacing::uniform(-1.0)),
            Err(FolioError::NegativeValue { .. })
        ));
    }

    #[tokio::test]
    async fn missing_sources_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, DocumentOptions::default()).await;
        let missing = dir.path().join("missing.pdf");

        assert!(matches!(
            doc.load_pdf(&missing).await,
            Err(FolioError::SourceFileNotFound(path)) if path == missing
        ));

        let empty: [PathBuf; 0] = [];
        assert!(matches!(
            doc.merge_pdf(&empty).await,
            Err(FolioError::EmptyFileList)
        ));

        let real = dir.path().join("real.pdf");
        let mut source = composer(&dir, DocumentOptions::default()).await;
        source.save(&real).await.expect("save source");
        assert!(doc.merge_pdf(&[&real, &missing]).await.is_err());
        assert_eq!(doc.number_of_pages(), 1);
    }

    #[tokio::test]
    async fn load_pdf_appends_every_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let two = dir.path().join("two.pdf");
        let mut source = composer(&dir, square(300.0)).await;
        source.add_page(square(400.0)).await.expect("add");
        source.save(&two).await.expect("save two");

        let mut doc = composer(&dir, square(100.0)).await;
        doc.load_pdf(&two).await.expect("load");
        assert_eq!(doc.number_of_pages(), 3);

        doc.write_text("stamp", &TextOptions::at(10.0, 10.0))
            .expect("draw on loaded page");
        let out = dir.path().join("out.pdf");
        doc.save(&out).await.expect("save");
        assert_eq!(page_widths(&out), vec![100.0, 300.0, 400.0]);
    }

    #[tokio::test]
    async fn page_font_can_be_changed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(200.0)).await;
        let helvetica = doc.width_of_text_at_size("iiii", 10.0, None).expect("measure");
        doc.set_page_font(StandardFont::Courier.into()).expect("set font");
        let courier = doc.width_of_text_at_size("iiii", 10.0, None).expect("measure");
        assert!((helvetica - 8.88).abs() < 1e-9);
        assert!((courier - 24.0).abs() < 1e-9);
        assert!((doc.height_at_size(10.0, &FontSource::default()).expect("height") - 9.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn invalid_custom_font_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, DocumentOptions::default()).await;
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").expect("write");
        assert!(matches!(
            doc.set_custom_font(&bogus).await,
            Err(FolioError::Font(_))
        ));
    }

    #[tokio::test]
    async fn drawing_after_save_needs_a_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, DocumentOptions::default()).await;
        doc.save(dir.path().join("out.pdf")).await.expect("save");
        assert!(matches!(
            doc.write_text("late", &TextOptions::at(10.0, 10.0)),
            Err(FolioError::PageNotFound(0))
        ));

        doc.add_page(DocumentOptions::default()).await.expect("start again");
        assert_eq!(doc.number_of_pages(), 1);
    }

    #[tokio::test]
    async fn centred_text_cannot_cross_right_margin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = square(100.0).with_page_spacing(PageSpacing::uniform(10.0));
        let mut doc = composer(&dir, options).await;

        let centred = TextOptions::at(90.0, 50.0)
            .sized(10.0)
            .aligned(Alignment::Center);
        assert!(matches!(
            doc.write_text("Hello", &centred),
            Err(FolioError::OutOfRangeLineWithWidth { .. })
        ));

        doc.write_text("Hello", &TextOptions::at(50.0, 50.0).sized(10.0).aligned(Alignment::Center))
            .expect("centred in the page");
    }

    #[tokio::test]
    async fn non_finite_input_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut doc = composer(&dir, square(100.0)).await;

        assert!(matches!(
            doc.write_text("x", &TextOptions::at(f64::NAN, f64::NAN)),
            Err(FolioError::NonFiniteValue { .. })
        ));
        assert!(matches!(
            doc.write_text("x", &TextOptions::at(10.0, 10.0).sized(f64::NAN)),
            Err(FolioError::NonFiniteValue { name: "font size", .. })
        ));
        assert!(matches!(
            doc.write_rectangle(&RectangleOptions {
                position: Position::new(f64::NAN, 10.0),
                width: f64::NAN,
                height: 10.0,
                ..RectangleOptions::default()
            }),
            Err(FolioError::NonFiniteValue { .. })
        ));
        assert!(matches!(
            doc.write_line(&LineOptions {
                start: Position::new(10.0, 10.0),
                end: Position::new(20.0, 20.0),
                thickness: Some(f64::INFINITY),
                ..LineOptions::default()
            }),
            Err(FolioError::NonFiniteValue { name: "stroke width", .. })
        ));
        assert!(doc.set_page_spacing(PageSpacing::uniform(f64::NAN)).is_err());
    }

    #[tokio::test]
    async fn custom_font_text_survives_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("Montserrat-Regular.ttf");
        let mut doc = composer(&dir, square(200.0)).await;

        let montserrat = doc.custom_font(&fixture).await.expect("load font");
        assert!(matches!(montserrat, FontSource::Custom(_)));
        let width = doc
            .width_of_text_at_size("Grüße", 10.0, Some(&montserrat))
            .expect("measure");
        assert!((width - 31.18).abs() < 1e-9);

        doc.set_custom_font(&fixture).await.expect("set font");
        doc.write_text("Grüße", &TextOptions::at(10.0, 10.0).sized(10.0))
            .expect("write with page font");
        doc.add_page(DocumentOptions::default()).await.expect("add page");
        doc.write_text("Straße", &TextOptions::at(10.0, 10.0).sized(12.0))
            .expect("font carries to the next page");

        let out = dir.path().join("fonts.pdf");
        doc.save(&out).await.expect("save");
        assert_eq!(page_widths(&out), vec![200.0, 200.0]);
    }
}
