/// The scrolling starfield.
///
/// The playfield is `FIELD_SCALE` viewports wide.  Stars and planets are
/// scattered once per session; each render shows the viewport-wide slice
/// starting at the current scroll offset.  Row 0 is left to the HUD.

use std::io;

use rand::Rng;

use crate::entities::{Bounds, PLAY_TOP};
use crate::surface::{Surface, Tint};

pub const FIELD_SCALE: i32 = 3;

/// Fraction of cells holding a star.
pub const STAR_DENSITY: f64 = 0.005;
/// Fraction of cells holding a planet.
pub const PLANET_DENSITY: f64 = 0.0005;

const STAR_TINTS: [Tint; 4] = [Tint::White, Tint::Yellow, Tint::Magenta, Tint::Red];
const PLANET_TINTS: [Tint; 2] = [Tint::Blue, Tint::Green];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    pub row: i32,
    pub col: i32,
    pub glyph: char,
    pub tint: Tint,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Starfield {
    size: Bounds,
    marks: Vec<Mark>,
}

impl Starfield {
    /// A field `FIELD_SCALE` times wider than `viewport`.
    pub fn generate<R: Rng + ?Sized>(viewport: Bounds, rng: &mut R) -> Self {
        let size = Bounds::new(viewport.rows, viewport.cols * FIELD_SCALE);
        if size.rows <= PLAY_TOP || size.cols <= 0 {
            return Starfield::empty(size);
        }
        let area = f64::from(size.rows) * f64::from(size.cols);
        let stars = (area * STAR_DENSITY) as usize;
        let planets = (area * PLANET_DENSITY) as usize;

        let mut marks = Vec::with_capacity(stars + planets);
        for _ in 0..stars {
            marks.push(Mark {
                row: rng.gen_range(PLAY_TOP..size.rows),
                col: rng.gen_range(0..size.cols),
                glyph: '.',
                tint: STAR_TINTS[rng.gen_range(0..STAR_TINTS.len())],
            });
        }
        for i in 0..planets {
            marks.push(Mark {
                row: rng.gen_range(PLAY_TOP..size.rows),
                col: rng.gen_range(0..size.cols),
                glyph: if i % 2 == 0 { 'O' } else { 'o' },
                tint: PLANET_TINTS[rng.gen_range(0..PLANET_TINTS.len())],
            });
        }
        Starfield { size, marks }
    }

    pub fn empty(size: Bounds) -> Self {
        Starfield {
            size,
            marks: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.size.cols
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Draw the slice `[offset, offset + viewport.cols)` at screen column 0.
    pub fn render_viewport<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        offset: i32,
        viewport: Bounds,
    ) -> io::Result<()> {
        let visible = offset..offset + viewport.cols;
        for mark in self.marks.iter().filter(|m| visible.contains(&m.col)) {
            let mut buf = [0u8; 4];
            surface.move_print(mark.row, mark.col - offset, mark.glyph.encode_utf8(&mut buf), mark.tint)?;
        }
        Ok(())
    }
}
