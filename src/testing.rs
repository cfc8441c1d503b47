//! Test doubles for the host collaborators.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::doc::{DraftTaggedImage, ImageId, Tag, TaggedImage};
use crate::error::{Error, Result};
use crate::gallery::RenderParameters;
use crate::geometry::{CanvasParameters, Dimensions, Point};
use crate::services::{AnnotationInput, ImageDecoder, Timer, View};
use crate::store::{MemoryStore, TaggedImageStore};
use crate::surface::Surface;

/// Data URLs containing this marker fail to decode.
pub const CORRUPT_MARKER: &str = "corrupt";

/// Decoded image stand-in: remembers where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TestImage {
    pub source: String,
    pub size: Dimensions,
}

/// One recorded call on [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    ClearRect(CanvasParameters),
    DrawImage(String, CanvasParameters),
    BeginPath,
    ClosePath,
    Rect(CanvasParameters),
    Stroke,
    Fill,
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    Font(String),
    FillText(String, Point),
}

/// Surface that logs every call instead of drawing.
#[derive(Debug)]
pub struct RecordingSurface {
    pub size: Dimensions,
    pub display: Dimensions,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// A square canvas shown at its natural size.
    pub fn square(side: f64) -> Self {
        Self::scaled(Dimensions::new(side, side), Dimensions::new(side, side))
    }

    pub fn scaled(size: Dimensions, display: Dimensions) -> Self {
        Self { size, display, ops: Vec::new() }
    }

    /// Ops issued since the most recent full clear; everything if none.
    pub fn current_frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::ClearRect(_)))
            .map_or(0, |i| i + 1);
        &self.ops[start..]
    }

    pub fn clear_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::ClearRect(_))).count()
    }

    /// Rectangles in the current frame.
    pub fn frame_rects(&self) -> Vec<CanvasParameters> {
        self.current_frame()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Text drawn in the current frame.
    pub fn frame_texts(&self) -> Vec<String> {
        self.current_frame()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText(text, _) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Source of the image drawn in the current frame, if any.
    pub fn frame_image(&self) -> Option<String> {
        self.current_frame().iter().find_map(|op| match op {
            DrawOp::DrawImage(source, _) => Some(source.clone()),
            _ => None,
        })
    }

    pub fn frame_has_fill(&self) -> bool {
        self.current_frame().iter().any(|op| matches!(op, DrawOp::Fill))
    }
}

impl Surface for RecordingSurface {
    type Image = TestImage;

    fn size(&self) -> Dimensions {
        self.size
    }

    fn display_size(&self) -> Dimensions {
        self.display
    }

    fn clear_rect(&mut self, rect: CanvasParameters) {
        self.ops.push(DrawOp::ClearRect(rect));
    }

    fn draw_image(&mut self, image: &TestImage, at: CanvasParameters) -> Result<()> {
        self.ops.push(DrawOp::DrawImage(image.source.clone(), at));
        Ok(())
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn rect(&mut self, rect: CanvasParameters) {
        self.ops.push(DrawOp::Rect(rect));
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::StrokeStyle(color.to_owned()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::FillStyle(color.to_owned()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_owned()));
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<()> {
        self.ops.push(DrawOp::FillText(text.to_owned(), at));
        Ok(())
    }
}

/// Host double: scripted prompt answers, recorded sleeps and view renders.
#[derive(Debug)]
pub struct ScriptedHost {
    /// Natural size reported for every decoded image.
    pub natural: Cell<Dimensions>,
    answers: RefCell<VecDeque<Option<String>>>,
    pub prompts: RefCell<Vec<(String, String)>>,
    pub sleeps: RefCell<Vec<u32>>,
    pub browser_renders: RefCell<Vec<RenderParameters>>,
    pub tag_renders: RefCell<Vec<(Vec<Tag>, bool)>>,
    pub decodes: Cell<usize>,
    pub fail_view: Cell<bool>,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self {
            natural: Cell::new(Dimensions::new(400.0, 200.0)),
            answers: RefCell::new(VecDeque::new()),
            prompts: RefCell::new(Vec::new()),
            sleeps: RefCell::new(Vec::new()),
            browser_renders: RefCell::new(Vec::new()),
            tag_renders: RefCell::new(Vec::new()),
            decodes: Cell::new(0),
            fail_view: Cell::new(false),
        }
    }
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next prompt's answer; `None` cancels.
    pub fn answer(&self, text: Option<&str>) {
        self.answers.borrow_mut().push_back(text.map(str::to_owned));
    }

    pub fn last_browser_render(&self) -> Option<RenderParameters> {
        self.browser_renders.borrow().last().copied()
    }

    pub fn last_tag_render(&self) -> Option<(Vec<Tag>, bool)> {
        self.tag_renders.borrow().last().cloned()
    }
}

impl ImageDecoder for ScriptedHost {
    type Image = TestImage;

    async fn decode(&self, data_url: &str) -> Result<TestImage> {
        self.decodes.set(self.decodes.get() + 1);
        if data_url.contains(CORRUPT_MARKER) {
            return Err(Error::Decode(format!("cannot decode {data_url}")));
        }
        Ok(TestImage { source: data_url.to_owned(), size: self.natural.get() })
    }

    fn dimensions(&self, image: &TestImage) -> Dimensions {
        image.size
    }
}

impl AnnotationInput for ScriptedHost {
    async fn request_text(&self, message: &str, default: &str) -> Option<String> {
        self.prompts.borrow_mut().push((message.to_owned(), default.to_owned()));
        self.answers.borrow_mut().pop_front().flatten()
    }
}

impl Timer for ScriptedHost {
    async fn sleep(&self, ms: u32) {
        self.sleeps.borrow_mut().push(ms);
    }
}

impl View for ScriptedHost {
    fn render_image_browser(&self, params: &RenderParameters) -> Result<()> {
        if self.fail_view.get() {
            return Err(Error::Dom("view unavailable".to_owned()));
        }
        self.browser_renders.borrow_mut().push(*params);
        Ok(())
    }

    fn render_tags(&self, tags: &[Tag], enabled: bool) -> Result<()> {
        if self.fail_view.get() {
            return Err(Error::Dom("view unavailable".to_owned()));
        }
        self.tag_renders.borrow_mut().push((tags.to_vec(), enabled));
        Ok(())
    }
}

/// Memory store whose writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: Cell<bool>,
}

impl FlakyStore {
    fn check(&self) -> Result<()> {
        if self.fail_writes.get() {
            Err(Error::Storage("write rejected".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl TaggedImageStore for FlakyStore {
    async fn create(&self, draft: DraftTaggedImage) -> Result<ImageId> {
        self.check()?;
        self.inner.create(draft).await
    }

    async fn get_all(&self) -> Result<Vec<TaggedImage>> {
        self.inner.get_all().await
    }

    async fn get_one(&self, id: ImageId) -> Result<TaggedImage> {
        self.inner.get_one(id).await
    }

    async fn update_one(&self, record: TaggedImage, id: ImageId) -> Result<TaggedImage> {
        self.check()?;
        self.inner.update_one(record, id).await
    }

    async fn delete_one(&self, id: ImageId) -> Result<()> {
        self.check()?;
        self.inner.delete_one(id).await
    }

    fn current_id(&self) -> Option<ImageId> {
        self.inner.current_id()
    }

    fn set_current_id(&self, id: Option<ImageId>) {
        self.inner.set_current_id(id);
    }
}
