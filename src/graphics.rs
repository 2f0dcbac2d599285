//! Frame buffer for the 7-colour panel
//!
//! Pixels are addressed as (x, y) with x in `0..WIDTH` and y in `0..HEIGHT`. Depending on
//! how the panel is mounted, the buffer is turned by an [Orientation] before it is packed
//! and sent.

use alloc::vec::Vec;
use core::fmt;

use crate::array2d::Grid;
use crate::color::DisplayColor;
use crate::traits::PanelDriver;
use crate::uc8159::{HEIGHT, WIDTH};

#[cfg(feature = "graphics")]
use embedded_graphics_core::prelude::*;

/// Axis of a pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal, `0..WIDTH`
    X,
    /// Vertical, `0..HEIGHT`
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// A pixel coordinate outside the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    /// Offending axis
    pub axis: Axis,
    /// Offending value
    pub value: i32,
    /// Exclusive upper bound of the axis
    pub limit: u32,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be >= 0 and < {}, but was {}",
            self.axis, self.limit, self.value
        )
    }
}

/// How the panel is mounted
///
/// | horizontal_flip | vertical_flip | sent grid |
/// |---|---|---|
/// | false | false | as drawn, WIDTH x HEIGHT |
/// | true | false | turned, `out[r][c] = in[c][HEIGHT - 1 - r]`, HEIGHT x WIDTH |
/// | false | true | turned the other way, `out[r][c] = in[WIDTH - 1 - c][r]`, HEIGHT x WIDTH |
/// | true | true | upside down, `out[x][y] = in[WIDTH - 1 - x][HEIGHT - 1 - y]` |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    /// Flip along the horizontal mounting axis
    pub horizontal_flip: bool,
    /// Flip along the vertical mounting axis
    pub vertical_flip: bool,
}

impl Orientation {
    /// Orientation from both flags
    pub fn new(horizontal_flip: bool, vertical_flip: bool) -> Self {
        Orientation {
            horizontal_flip,
            vertical_flip,
        }
    }

    fn apply<T: Copy>(self, grid: &Grid<T>) -> Grid<T> {
        match (self.horizontal_flip, self.vertical_flip) {
            (false, false) => grid.clone(),
            (true, false) => grid.transpose().mirror_rows(),
            (false, true) => grid.transpose().mirror_columns(),
            (true, true) => grid.mirror_rows().mirror_columns(),
        }
    }
}

/// Full size frame buffer for the UC8159 panel
///
/// Every pixel starts out [DisplayColor::Black].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Indexed `[x][y]`
    pixels: Grid<DisplayColor>,
    orientation: Orientation,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new(Orientation::default())
    }
}

impl FrameBuffer {
    /// Creates a black frame buffer for a panel mounted with `orientation`
    pub fn new(orientation: Orientation) -> Self {
        FrameBuffer {
            pixels: Grid::new(WIDTH as usize, HEIGHT as usize, DisplayColor::Black),
            orientation,
        }
    }

    /// Orientation applied when rendering
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Sets the pixel at (`x`, `y`)
    pub fn set_pixel(&mut self, x: i32, y: i32, color: DisplayColor) -> Result<(), OutOfBounds> {
        let x = Self::check(Axis::X, x, WIDTH)?;
        let y = Self::check(Axis::Y, y, HEIGHT)?;
        self.pixels.set(x, y, color);
        Ok(())
    }

    fn check(axis: Axis, value: i32, limit: u32) -> Result<usize, OutOfBounds> {
        match usize::try_from(value) {
            Ok(v) if v < limit as usize => Ok(v),
            _ => Err(OutOfBounds { axis, value, limit }),
        }
    }

    /// Current pixels, indexed `[x][y]`
    pub fn pixels(&self) -> &Grid<DisplayColor> {
        &self.pixels
    }

    /// Sets every pixel to `color`
    pub fn fill(&mut self, color: DisplayColor) {
        self.pixels.fill(color);
    }

    /// Pixels in the order the panel expects them
    pub fn oriented(&self) -> Grid<DisplayColor> {
        self.orientation.apply(&self.pixels)
    }

    /// Packs the oriented pixels, two per byte with the first one in the high nibble
    pub fn render(&self) -> Vec<u8> {
        self.oriented()
            .flatten()
            .chunks(2)
            .map(|pair| {
                let second = pair.get(1).copied().unwrap_or_default();
                DisplayColor::colors_byte(pair[0], second)
            })
            .collect()
    }

    /// Renders the buffer and paints it on `driver`
    pub async fn show<D: PanelDriver>(&self, driver: &mut D) -> Result<(), D::Error> {
        let packed = self.render();
        driver.flush_buffer_to_display(&packed).await
    }
}

#[cfg(feature = "graphics")]
impl DrawTarget for FrameBuffer {
    type Color = DisplayColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // pixels outside the panel are clipped
            let _ = self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}

#[cfg(feature = "graphics")]
impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uc8159::BUFFER_LEN;
    use alloc::string::ToString;
    use alloc::vec;
    use embassy_futures::block_on;

    fn unpack(packed: &[u8], cols: usize) -> Grid<DisplayColor> {
        let cells: Vec<DisplayColor> = packed
            .iter()
            .flat_map(|&b| {
                let (hi, lo) = DisplayColor::split_byte(b).unwrap();
                [hi, lo]
            })
            .collect();
        let rows: Vec<&[DisplayColor]> = cells.chunks(cols).collect();
        Grid::from_rows(rows.as_slice()).unwrap()
    }

    fn positions(grid: &Grid<DisplayColor>, color: DisplayColor) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                if grid.get(r, c) == Some(color) {
                    found.push((r, c));
                }
            }
        }
        found
    }

    fn red_corner(orientation: Orientation) -> Vec<u8> {
        let mut display = FrameBuffer::new(orientation);
        display.set_pixel(0, 0, DisplayColor::Red).unwrap();
        display.render()
    }

    const W: usize = WIDTH as usize;
    const H: usize = HEIGHT as usize;

    #[test]
    fn set_pixel() {
        let mut display = FrameBuffer::default();
        assert_eq!(display.pixels().get(1, 1), Some(DisplayColor::Black));

        display.set_pixel(1, 1, DisplayColor::Orange).unwrap();

        assert_eq!(display.pixels().get(1, 1), Some(DisplayColor::Orange));
        assert_eq!(positions(display.pixels(), DisplayColor::Orange), vec![(1, 1)]);
    }

    #[test]
    fn set_pixel_corners() {
        let mut display = FrameBuffer::default();
        display.set_pixel(0, 0, DisplayColor::Green).unwrap();
        display.set_pixel(599, 447, DisplayColor::Green).unwrap();
        assert_eq!(
            positions(display.pixels(), DisplayColor::Green),
            vec![(0, 0), (599, 447)]
        );
    }

    #[test]
    fn set_pixel_out_of_bounds() {
        let mut display = FrameBuffer::default();
        for x in [-1, 600, 928] {
            let err = display.set_pixel(x, 0, DisplayColor::Black).unwrap_err();
            assert_eq!(
                err.to_string(),
                alloc::format!("x must be >= 0 and < 600, but was {x}")
            );
        }
        for y in [-1, 448, 928] {
            let err = display.set_pixel(0, y, DisplayColor::Black).unwrap_err();
            assert_eq!(err.axis, Axis::Y);
            assert_eq!(
                err.to_string(),
                alloc::format!("y must be >= 0 and < 448, but was {y}")
            );
        }
        assert_eq!(display, FrameBuffer::default());
    }

    #[test]
    fn render_identity() {
        let packed = red_corner(Orientation::default());

        assert_eq!(packed.len(), BUFFER_LEN);
        assert_eq!(packed[0], 0x40);
        assert!(packed[1..].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn render_horizontal_flip() {
        let packed = red_corner(Orientation::new(true, false));

        assert_eq!(packed.len(), BUFFER_LEN);
        let grid = unpack(&packed, W);
        assert_eq!((grid.rows(), grid.cols()), (H, W));
        assert_eq!(positions(&grid, DisplayColor::Red), vec![(H - 1, 0)]);
    }

    #[test]
    fn render_vertical_flip() {
        let packed = red_corner(Orientation::new(false, true));

        let grid = unpack(&packed, W);
        assert_eq!((grid.rows(), grid.cols()), (H, W));
        assert_eq!(positions(&grid, DisplayColor::Red), vec![(0, W - 1)]);
    }

    #[test]
    fn render_both_flips() {
        let packed = red_corner(Orientation::new(true, true));

        assert_eq!(*packed.last().unwrap(), 0x04);
        let grid = unpack(&packed, H);
        assert_eq!((grid.rows(), grid.cols()), (W, H));
        assert_eq!(positions(&grid, DisplayColor::Red), vec![(W - 1, H - 1)]);
    }

    #[test]
    fn orientation_formulas() {
        let mut display = FrameBuffer::new(Orientation::new(true, false));
        display.set_pixel(5, 7, DisplayColor::Blue).unwrap();
        // out[r][c] = in[c][H - 1 - r]
        assert_eq!(
            positions(&display.oriented(), DisplayColor::Blue),
            vec![(H - 1 - 7, 5)]
        );

        let mut display = FrameBuffer::new(Orientation::new(false, true));
        display.set_pixel(5, 7, DisplayColor::Blue).unwrap();
        // out[r][c] = in[W - 1 - c][r]
        assert_eq!(
            positions(&display.oriented(), DisplayColor::Blue),
            vec![(7, W - 1 - 5)]
        );
    }

    #[test]
    fn fill() {
        let mut display = FrameBuffer::default();
        display.fill(DisplayColor::Yellow);
        assert!(display.render().iter().all(|&b| b == 0x55));
    }

    struct RecordingPanel {
        frames: Vec<Vec<u8>>,
    }

    impl PanelDriver for RecordingPanel {
        type Error = ();

        fn width(&self) -> u32 {
            WIDTH
        }

        fn height(&self) -> u32 {
            HEIGHT
        }

        async fn flush_buffer_to_display(&mut self, buffer: &[u8]) -> Result<(), ()> {
            self.frames.push(buffer.to_vec());
            Ok(())
        }
    }

    #[test]
    fn show_flushes_rendered_frame() {
        let mut display = FrameBuffer::default();
        display.set_pixel(0, 0, DisplayColor::Red).unwrap();
        let mut panel = RecordingPanel { frames: Vec::new() };

        block_on(display.show(&mut panel)).unwrap();

        assert_eq!(panel.frames, vec![display.render()]);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn draw_target() {
        use embedded_graphics::{
            prelude::*,
            primitives::{Line, PrimitiveStyle},
        };

        let mut display = FrameBuffer::default();
        assert_eq!(display.size(), Size::new(600, 448));

        let _ = Line::new(Point::new(0, 0), Point::new(1, 0))
            .into_styled(PrimitiveStyle::with_stroke(DisplayColor::Red, 1))
            .draw(&mut display);
        // clipped
        let _ = Pixel(Point::new(-3, 700), DisplayColor::Red).draw(&mut display);

        assert_eq!(
            positions(display.pixels(), DisplayColor::Red),
            vec![(0, 0), (1, 0)]
        );
        let packed = display.render();
        assert_eq!(packed[0], 0x40);
        // (1, 0) is the first pixel of the second row
        assert_eq!(packed[H / 2], 0x40);
    }
}
