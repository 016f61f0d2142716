/// Drawing surface abstraction.
///
/// The simulation never talks to the terminal directly: it prints glyph
/// strings at grid positions on a `Surface`.  `Canvas` is the in-memory
/// implementation, used both as an overlay layer (the HUD) and as a test
/// double that records frames and replays scripted keys.

use std::collections::VecDeque;
use std::io;

use crate::entities::Bounds;

// ── Colour tags ───────────────────────────────────────────────────────────────

/// Visual tag carried by sprites and character profiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tint {
    #[default]
    Default,
    White,
    Yellow,
    Magenta,
    Red,
    Blue,
    Green,
    Cyan,
}

impl Tint {
    /// Colour names as written in character profiles; unknown names fall
    /// back to the terminal default.
    pub fn from_name(name: &str) -> Tint {
        match name.trim().to_lowercase().as_str() {
            "white" => Tint::White,
            "yellow" => Tint::Yellow,
            "magenta" => Tint::Magenta,
            "red" => Tint::Red,
            "blue" => Tint::Blue,
            "green" => Tint::Green,
            "cyan" => Tint::Cyan,
            _ => Tint::Default,
        }
    }
}

// ── Surface contract ──────────────────────────────────────────────────────────

/// Everything the session loop needs from a display.
///
/// Blank (`' '`) cells are transparent: printing or overlaying them leaves
/// whatever is underneath.  Cells outside `dimensions()` are clipped.
pub trait Surface {
    fn clear(&mut self) -> io::Result<()>;

    fn move_print(&mut self, row: i32, col: i32, text: &str, tint: Tint) -> io::Result<()>;

    fn refresh(&mut self) -> io::Result<()>;

    fn dimensions(&self) -> Bounds;

    /// Non-blocking: `None` when no key is pending.
    fn next_key(&mut self) -> Option<char>;

    /// Copy every non-blank cell of `layer` onto this surface.
    fn overlay(&mut self, layer: &Canvas) -> io::Result<()> {
        for (row, line) in layer.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if cell.glyph != ' ' {
                    let mut buf = [0u8; 4];
                    self.move_print(row as i32, col as i32, cell.glyph.encode_utf8(&mut buf), cell.tint)?;
                }
            }
        }
        Ok(())
    }
}

// ── In-memory canvas ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub tint: Tint,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        tint: Tint::Default,
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    bounds: Bounds,
    cells: Vec<Vec<Cell>>,
    keys: VecDeque<char>,
    refreshes: usize,
}

impl Canvas {
    pub fn new(bounds: Bounds) -> Self {
        let rows = bounds.rows.max(0) as usize;
        let cols = bounds.cols.max(0) as usize;
        Canvas {
            bounds,
            cells: vec![vec![Cell::BLANK; cols]; rows],
            keys: VecDeque::new(),
            refreshes: 0,
        }
    }

    /// Queue keys returned, in order, by `next_key`.
    pub fn push_keys(&mut self, keys: &str) {
        self.keys.extend(keys.chars());
    }

    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        if !self.bounds.contains_cell(row, col) {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// One screen row as a plain string (trailing blanks kept).
    pub fn row_text(&self, row: i32) -> String {
        match usize::try_from(row).ok().and_then(|r| self.cells.get(r)) {
            Some(line) => line.iter().map(|c| c.glyph).collect(),
            None => String::new(),
        }
    }

    /// Whole frame, one line per row.
    pub fn text(&self) -> String {
        (0..self.bounds.rows)
            .map(|r| self.row_text(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|line| line.as_slice())
    }
}

impl Surface for Canvas {
    fn clear(&mut self) -> io::Result<()> {
        for line in &mut self.cells {
            line.fill(Cell::BLANK);
        }
        Ok(())
    }

    fn move_print(&mut self, row: i32, col: i32, text: &str, tint: Tint) -> io::Result<()> {
        for (i, glyph) in text.chars().enumerate() {
            let c = col + i as i32;
            if glyph == ' ' || !self.bounds.contains_cell(row, c) {
                continue;
            }
            self.cells[row as usize][c as usize] = Cell { glyph, tint };
        }
        Ok(())
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn dimensions(&self) -> Bounds {
        self.bounds
    }

    fn next_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }
}
