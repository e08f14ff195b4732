//! Scene layout and rendering for the game canvas
//!
//! Layout turns a `Presentation` into positioned elements; the renderer
//! rasterizes a layout with tiny-skia. Keeping the two apart lets hit
//! testing and geometry be checked without drawing anything.

use std::path::{Path, PathBuf};

use tiny_skia::{
    Color, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect as SkiaRect, Stroke,
    Transform,
};
use tracing::warn;

use crate::domain::core::Rect;
use crate::ui::animation::TwirlFrame;
use crate::ui::presentation::{
    ButtonStyle, CONGRATULATIONS_TEXT, Presentation, REPLAY_PROMPT_TEXT,
};
use crate::ui::text::TextPainter;

/// Fixed canvas size in pixels
pub const CANVAS_WIDTH: i32 = 576;
pub const CANVAS_HEIGHT: i32 = 576;
/// Side of the square number image region
pub const IMAGE_SIZE: i32 = 300;

const STATUS_ORIGIN: (f32, f32) = (50.0, 500.0);
const STATUS_FONT_SIZE: f32 = 26.0;
const PROMPT_FONT_SIZE: f32 = 18.0;
/// Gap between the top of the replay prompt and the primary button
const PROMPT_OFFSET: i32 = 28;
const CONGRATULATIONS_FONT_SIZE: f32 = 48.0;
const BUTTON_FONT_SIZE: f32 = 16.0;

fn primary_button_rect() -> Rect {
    Rect::new(180, 530, 180, 40)
}

fn exit_button_rect() -> Rect {
    Rect::new(380, 530, 120, 40)
}

fn gold() -> Color {
    Color::from_rgba8(255, 215, 0, 255)
}

fn canvas_fill() -> Color {
    Color::from_rgba8(18, 32, 74, 255)
}

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create pixmap for rendering")]
    PixmapCreationFailed,

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    ImageDecode { path: PathBuf, reason: String },
}

/// Clickable elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Primary,
    Exit,
}

/// Positioned single-line text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    /// Top of the line box
    pub y: f32,
    pub font_size: f32,
    pub color: Color,
}

/// Positioned button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayout {
    pub id: ButtonId,
    pub rect: Rect,
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// Pre-calculated geometry for one frame of the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub canvas: Rect,
    /// Region the number image is fitted into
    pub image_region: Rect,
    /// Whether the number image is drawn at all
    pub show_image: bool,
    pub status: Option<TextLabel>,
    pub replay_prompt: Option<TextLabel>,
    pub congratulations: Option<TextLabel>,
    pub buttons: Vec<ButtonLayout>,
}

impl SceneLayout {
    /// Lays out the canvas for a presentation
    ///
    /// `text` is only used to measure the centered congratulations line.
    pub fn from_presentation(presentation: &Presentation, text: &TextPainter) -> Self {
        let canvas = Rect::new(0, 0, CANVAS_WIDTH, CANVAS_HEIGHT);
        let primary_rect = primary_button_rect();

        let status = presentation.status.as_ref().map(|status| TextLabel {
            text: status.clone(),
            x: STATUS_ORIGIN.0,
            y: STATUS_ORIGIN.1,
            font_size: STATUS_FONT_SIZE,
            color: gold(),
        });

        let replay_prompt = presentation.show_replay_prompt.then(|| {
            let anchor = primary_rect.offset(0, -PROMPT_OFFSET);
            TextLabel {
                text: REPLAY_PROMPT_TEXT.to_string(),
                x: anchor.x as f32,
                y: anchor.y as f32,
                font_size: PROMPT_FONT_SIZE,
                color: gold(),
            }
        });

        let congratulations = presentation.show_congratulations.then(|| {
            let (w, h) = text.measure(CONGRATULATIONS_TEXT, CONGRATULATIONS_FONT_SIZE);
            let (cx, cy) = canvas.center();
            TextLabel {
                text: CONGRATULATIONS_TEXT.to_string(),
                x: cx - w / 2.0,
                y: cy - h / 2.0,
                font_size: CONGRATULATIONS_FONT_SIZE,
                color: gold(),
            }
        });

        let buttons = vec![
            ButtonLayout {
                id: ButtonId::Primary,
                rect: primary_rect,
                label: presentation.primary.label,
                style: presentation.primary.style,
            },
            ButtonLayout {
                id: ButtonId::Exit,
                rect: exit_button_rect(),
                label: presentation.exit.label,
                style: presentation.exit.style,
            },
        ];

        Self {
            canvas,
            image_region: Rect::centered_in(&canvas, IMAGE_SIZE, IMAGE_SIZE),
            show_image: presentation.is_counting(),
            status,
            replay_prompt,
            congratulations,
            buttons,
        }
    }

    /// Button under the given canvas point
    pub fn hit_test(&self, x: i32, y: i32) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains_point(x, y))
            .map(|button| button.id)
    }

    pub fn button(&self, id: ButtonId) -> Option<&ButtonLayout> {
        self.buttons.iter().find(|button| button.id == id)
    }
}

/// Decodes a PNG file into a pixmap
pub fn load_png(path: &Path) -> Result<Pixmap, RendererError> {
    let bytes = std::fs::read(path).map_err(|source| RendererError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Pixmap::decode_png(&bytes).map_err(|e| RendererError::ImageDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn load_logged(path: Option<&Path>) -> Option<Pixmap> {
    let path = path?;
    match load_png(path) {
        Ok(pixmap) => Some(pixmap),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

/// Canvas renderer holding decoded images and the font
pub struct SceneRenderer {
    text: TextPainter,
    background: Option<Pixmap>,
    /// Path last requested for the number image and its decoded pixels
    number_image: Option<(PathBuf, Option<Pixmap>)>,
}

impl SceneRenderer {
    pub fn new(text: TextPainter) -> Self {
        Self {
            text,
            background: None,
            number_image: None,
        }
    }

    pub fn text(&self) -> &TextPainter {
        &self.text
    }

    pub fn set_background(&mut self, path: Option<&Path>) {
        self.background = load_logged(path);
    }

    /// Switches the number image, decoding only when the path changes
    pub fn set_number_image(&mut self, path: Option<&Path>) {
        match path {
            None => self.number_image = None,
            Some(path) => {
                let unchanged = self
                    .number_image
                    .as_ref()
                    .is_some_and(|(current, _)| current == path);
                if !unchanged {
                    self.number_image = Some((path.to_path_buf(), load_logged(Some(path))));
                }
            }
        }
    }

    pub fn has_number_image(&self) -> bool {
        matches!(self.number_image, Some((_, Some(_))))
    }

    /// Renders a layout with the number image posed by `frame`
    pub fn render(&self, layout: &SceneLayout, frame: TwirlFrame) -> Result<Pixmap, RendererError> {
        let mut pixmap = Pixmap::new(layout.canvas.w as u32, layout.canvas.h as u32)
            .ok_or(RendererError::PixmapCreationFailed)?;
        pixmap.fill(canvas_fill());

        if let Some(background) = &self.background {
            let transform = Transform::from_scale(
                layout.canvas.w as f32 / background.width() as f32,
                layout.canvas.h as f32 / background.height() as f32,
            );
            pixmap.draw_pixmap(0, 0, background.as_ref(), &smooth_paint(), transform, None);
        }

        if layout.show_image {
            if let Some((_, Some(image))) = &self.number_image {
                self.render_number_image(&mut pixmap, image, layout.image_region, frame);
            }
        }

        if let Some(status) = &layout.status {
            self.render_label(&mut pixmap, status);
        }

        for button in &layout.buttons {
            self.render_button(&mut pixmap, button);
        }

        if let Some(prompt) = &layout.replay_prompt {
            self.render_label(&mut pixmap, prompt);
        }

        if let Some(congratulations) = &layout.congratulations {
            self.render_label(&mut pixmap, congratulations);
        }

        Ok(pixmap)
    }

    /// Fits the image into `region`, then rotates and scales it about the region center
    fn render_number_image(&self, pixmap: &mut Pixmap, image: &Pixmap, region: Rect, frame: TwirlFrame) {
        let (cx, cy) = region.center();
        let image_w = image.width() as f32;
        let image_h = image.height() as f32;
        let fit = (region.w as f32 / image_w).min(region.h as f32 / image_h);
        let scale = fit * frame.scale;

        let transform = Transform::from_translate(cx, cy)
            .pre_concat(Transform::from_rotate(frame.rotation_degrees))
            .pre_scale(scale, scale)
            .pre_translate(-image_w / 2.0, -image_h / 2.0);

        pixmap.draw_pixmap(0, 0, image.as_ref(), &smooth_paint(), transform, None);
    }

    fn render_label(&self, pixmap: &mut Pixmap, label: &TextLabel) {
        self.text
            .draw(pixmap, &label.text, label.x, label.y, label.font_size, label.color);
    }

    fn render_button(&self, pixmap: &mut Pixmap, button: &ButtonLayout) {
        let Some(rect) = to_skia_rect(&button.rect) else {
            return;
        };
        let (fill, border, text_color) = button_colors(button.style);

        let mut paint = Paint::default();
        paint.set_color(fill);
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);

        let path = PathBuilder::from_rect(rect);
        paint.set_color(border);
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

        let (text_w, text_h) = self.text.measure(button.label, BUTTON_FONT_SIZE);
        let (cx, cy) = button.rect.center();
        self.text.draw(
            pixmap,
            button.label,
            cx - text_w / 2.0,
            cy - text_h / 2.0,
            BUTTON_FONT_SIZE,
            text_color,
        );
    }
}

fn smooth_paint() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}

/// Fill, border and label colors for a button style
fn button_colors(style: ButtonStyle) -> (Color, Color, Color) {
    match style {
        ButtonStyle::Neutral => (
            Color::from_rgba8(236, 236, 236, 255),
            Color::from_rgba8(150, 150, 150, 255),
            Color::from_rgba8(33, 33, 33, 255),
        ),
        ButtonStyle::Affirmative => (
            Color::from_rgba8(0x2e, 0xcc, 0x71, 255),
            Color::from_rgba8(0x27, 0xae, 0x60, 255),
            Color::WHITE,
        ),
        ButtonStyle::SecondaryAffirmative => (
            Color::from_rgba8(0x34, 0x98, 0xdb, 255),
            Color::from_rgba8(0x29, 0x80, 0xb9, 255),
            Color::WHITE,
        ),
    }
}

fn to_skia_rect(rect: &Rect) -> Option<SkiaRect> {
    SkiaRect::from_xywh(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
}

/// Converts a premultiplied RGBA pixmap into top-down BGRA rows for GDI
pub fn pixmap_to_bgra(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0], px[3]])
        .collect()
}
