//! LCD display.
//!
//! The panel bus driver is not part of this crate; the display keeps a
//! text frame buffer in the panel's geometry that the bus layer flushes.

use crate::error::{GpioError, Result};
use std::sync::Mutex;

/// Column/row geometry of a character panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineGeometry {
    pub columns: usize,
    pub rows: usize,
}

/// The 20x4 panel Servus ships with.
pub const LINE_GEOMETRY_2004: LineGeometry = LineGeometry {
    columns: 20,
    rows: 4,
};

/// Character display with a text frame buffer.
pub struct Display {
    geometry: LineGeometry,
    frame: Mutex<Vec<String>>,
}

impl Display {
    pub fn new(geometry: LineGeometry) -> Self {
        Self {
            geometry,
            frame: Mutex::new(vec![String::new(); geometry.rows]),
        }
    }

    pub fn geometry(&self) -> LineGeometry {
        self.geometry
    }

    /// Put `text` on `row`, truncated to the panel width.
    pub fn show(&self, row: usize, text: &str) -> Result<()> {
        if row >= self.geometry.rows {
            return Err(GpioError::DisplayRow {
                row,
                rows: self.geometry.rows,
            });
        }

        let mut frame = self.frame.lock().unwrap();
        frame[row] = text.chars().take(self.geometry.columns).collect();
        Ok(())
    }

    /// Current frame buffer content, one string per row.
    pub fn frame(&self) -> Vec<String> {
        self.frame.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_truncates_to_width() {
        let display = Display::new(LINE_GEOMETRY_2004);
        display
            .show(0, "Servus Hausautomatisierung bereit")
            .unwrap();
        assert_eq!(display.frame()[0].chars().count(), 20);
    }

    #[test]
    fn test_show_row_out_of_range() {
        let display = Display::new(LINE_GEOMETRY_2004);
        assert!(matches!(
            display.show(4, "x"),
            Err(GpioError::DisplayRow { row: 4, rows: 4 })
        ));
    }
}
