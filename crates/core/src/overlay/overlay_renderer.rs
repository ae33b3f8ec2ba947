use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, Point};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;

use crate::classification::zone_thresholds::ZoneThresholds;
use crate::overlay::frame_canvas::HorizontalFlip;
use crate::shared::bounding_region::BoundingRegion;

/// Gap in pixels between a guide line and its labels, and between the face
/// edge and the label anchor.
const LABEL_MARGIN: i32 = 3;

/// How far past the surface edges coordinates may reach after clamping.
/// Wider than the longest label so off-surface anchors keep their text clipped.
const CLAMP_MARGIN: i32 = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub face_color: Rgb888,
    pub guide_color: Rgb888,
    pub label_color: Rgb888,
    pub stroke_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            face_color: Rgb888::GREEN,
            guide_color: Rgb888::YELLOW,
            label_color: Rgb888::WHITE,
            stroke_width: 1,
        }
    }
}

/// Draws the face box and the zone guide lines for a debug overlay.
///
/// Each guide carries its boundary name (`"1|2"`) above the line and the
/// label of the zone below it underneath. With `mirrored` set, labels are
/// anchored at the face's right edge and their glyphs flipped, so they read
/// left-to-right from the box's left edge once the picture is mirrored.
#[derive(Clone, Debug)]
pub struct OverlayRenderer {
    thresholds: ZoneThresholds,
    mirrored: bool,
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(thresholds: ZoneThresholds, mirrored: bool) -> Self {
        Self::with_style(thresholds, mirrored, OverlayStyle::default())
    }

    pub fn with_style(thresholds: ZoneThresholds, mirrored: bool, style: OverlayStyle) -> Self {
        Self {
            thresholds,
            mirrored,
            style,
        }
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn render<D>(&self, surface: &mut D, face: Option<&BoundingRegion>) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let Some(face) = face else {
            return Ok(());
        };
        if face.is_degenerate() {
            log::debug!("Skipping overlay for degenerate face region");
            return Ok(());
        }

        let bounds = Bounds::around(&surface.bounding_box());
        let left = bounds.clamp_x(face.top_left.x);
        let right = bounds.clamp_x(face.bottom_right.x);
        let top = bounds.clamp_y(face.top_left.y);
        let bottom = bounds.clamp_y(face.bottom_right.y);

        Rectangle::with_corners(Point::new(left, top), Point::new(right, bottom))
            .into_styled(PrimitiveStyle::with_stroke(
                self.style.face_color,
                self.style.stroke_width,
            ))
            .draw(surface)?;

        let guide_style = PrimitiveStyle::with_stroke(self.style.guide_color, self.style.stroke_width);
        let anchor_x = if self.mirrored {
            right - LABEL_MARGIN
        } else {
            left + LABEL_MARGIN
        };

        for guide in self.thresholds.guides() {
            let row = bounds.clamp_y(face.row_at(guide.fraction));
            Line::new(Point::new(left, row), Point::new(right, row))
                .into_styled(guide_style)
                .draw(surface)?;

            let name = guide.name();
            self.draw_label(surface, &name, Point::new(anchor_x, row - LABEL_MARGIN), Baseline::Bottom)?;
            self.draw_label(
                surface,
                guide.below.label(),
                Point::new(anchor_x, row + LABEL_MARGIN),
                Baseline::Top,
            )?;
        }
        Ok(())
    }

    fn draw_label<D>(
        &self,
        surface: &mut D,
        text: &str,
        anchor: Point,
        baseline: Baseline,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let style = MonoTextStyle::new(&FONT_6X10, self.style.label_color);
        let text = Text::with_baseline(text, anchor, style, baseline);
        if self.mirrored {
            let mut flipped = HorizontalFlip::new(surface, anchor.x);
            text.draw(&mut flipped)?;
        } else {
            text.draw(surface)?;
        }
        Ok(())
    }
}

/// Pixel range a primitive may span: the surface grown by [`CLAMP_MARGIN`].
///
/// Keeps corner arithmetic inside `embedded-graphics` from overflowing for
/// regions far outside the frame.
struct Bounds {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl Bounds {
    fn around(area: &Rectangle) -> Self {
        let width = i32::try_from(area.size.width).unwrap_or(i32::MAX / 4);
        let height = i32::try_from(area.size.height).unwrap_or(i32::MAX / 4);
        Self {
            min_x: area.top_left.x.saturating_sub(CLAMP_MARGIN),
            max_x: area.top_left.x.saturating_add(width).saturating_add(CLAMP_MARGIN),
            min_y: area.top_left.y.saturating_sub(CLAMP_MARGIN),
            max_y: area.top_left.y.saturating_add(height).saturating_add(CLAMP_MARGIN),
        }
    }

    fn clamp_x(&self, x: f64) -> i32 {
        clamp_coordinate(x, self.min_x, self.max_x)
    }

    fn clamp_y(&self, y: f64) -> i32 {
        clamp_coordinate(y, self.min_y, self.max_y)
    }
}

fn clamp_coordinate(value: f64, min: i32, max: i32) -> i32 {
    value.round().clamp(f64::from(min), f64::from(max)) as i32
}
