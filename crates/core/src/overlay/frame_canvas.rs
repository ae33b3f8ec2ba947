//! `embedded-graphics` draw targets over [`Frame`]s.

use std::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, Point, Size};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::Pixel;

use crate::shared::frame::Frame;

/// Draws directly into a frame's RGB buffer. Off-frame pixels are clipped.
pub struct FrameCanvas<'a> {
    frame: &'a mut Frame,
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self { frame }
    }
}

impl Dimensions for FrameCanvas<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(self.frame.width(), self.frame.height()),
        )
    }
}

impl DrawTarget for FrameCanvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(pos, color) in pixels {
            if pos.x >= 0 && pos.y >= 0 {
                self.frame
                    .set_pixel(pos.x as u32, pos.y as u32, [color.r(), color.g(), color.b()]);
            }
        }
        Ok(())
    }
}

/// Mirrors everything drawn through it about the vertical line `x = axis_x`.
pub struct HorizontalFlip<'a, D> {
    inner: &'a mut D,
    axis_x: i32,
}

impl<'a, D> HorizontalFlip<'a, D> {
    pub fn new(inner: &'a mut D, axis_x: i32) -> Self {
        Self { inner, axis_x }
    }
}

impl<D: Dimensions> Dimensions for HorizontalFlip<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.inner.bounding_box()
    }
}

impl<D: DrawTarget> DrawTarget for HorizontalFlip<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let doubled_axis = self.axis_x.saturating_mul(2);
        self.inner.draw_iter(
            pixels
                .into_iter()
                .map(|Pixel(p, c)| Pixel(Point::new(doubled_axis.saturating_sub(p.x), p.y), c)),
        )
    }
}
