//! Minimal ANSI terminal renderer for distance-model runs.
//!
//! Draws each lit fly as a green asterisk at its grid position and a
//! status line below the grid. The renderer consumes read-only
//! snapshots through the [`ObserverSink`] seam; the core never formats
//! or draws anything itself.

use std::io::Write as _;

use firefly_sync::ObserverSink;
use firefly_types::{GridPosition, SwarmSnapshot};

/// Snapshot renderer for an ANSI terminal.
///
/// Frames are throttled to every `stride` ticks so a 1 ms tick does not
/// flood the terminal. Write failures are ignored; rendering is best
/// effort and never disturbs the run.
pub struct TerminalRenderer {
    positions: Vec<GridPosition>,
    grid_rows: u32,
    stride: u64,
}

impl TerminalRenderer {
    /// Create a renderer for flies at the given positions.
    pub fn new(positions: Vec<GridPosition>, grid_rows: u32, stride: u64) -> Self {
        Self {
            positions,
            grid_rows,
            stride: stride.max(1),
        }
    }

    /// Build one frame: clear, lit flies, status line.
    fn frame(&self, snapshot: &SwarmSnapshot) -> String {
        let mut frame = String::from("\x1b[2J\x1b[H");
        for (fly, position) in self.positions.iter().enumerate() {
            if snapshot.lights.get(fly).copied().unwrap_or(false) {
                frame.push_str(&format!(
                    "\x1b[{};{}H\x1b[32m*\x1b[0m",
                    position.row, position.col
                ));
            }
        }

        let flies = snapshot.visibility.len();
        let total = flies.saturating_mul(flies).saturating_sub(flies);
        let visible = snapshot
            .visibility
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(j, cell)| i != *j && **cell)
                    .count()
            })
            .sum::<usize>();

        frame.push_str(&format!(
            "\x1b[{};1Htick {}  visible {visible}/{total}",
            self.grid_rows.saturating_add(1),
            snapshot.tick
        ));
        frame
    }
}

impl ObserverSink for TerminalRenderer {
    fn on_tick(&mut self, snapshot: &SwarmSnapshot) {
        if snapshot.tick.checked_rem(self.stride) != Some(0) {
            return;
        }
        let frame = self.frame(snapshot);
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(frame.as_bytes()).ok();
        stdout.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_places_only_lit_flies() {
        let renderer = TerminalRenderer::new(
            vec![GridPosition::new(2, 3), GridPosition::new(5, 7)],
            24,
            1,
        );
        let snapshot = SwarmSnapshot {
            tick: 40,
            lights: vec![true, false],
            visibility: vec![vec![false, true], vec![true, false]],
        };

        let frame = renderer.frame(&snapshot);
        assert!(frame.contains("\x1b[2;3H"));
        assert!(!frame.contains("\x1b[5;7H"));
        assert!(frame.contains("visible 2/2"));
        assert!(frame.contains("tick 40"));
    }

    #[test]
    fn status_line_sits_below_the_grid() {
        let renderer = TerminalRenderer::new(vec![GridPosition::new(1, 1)], 24, 1);
        let snapshot = SwarmSnapshot {
            tick: 0,
            lights: vec![false],
            visibility: Vec::new(),
        };

        let frame = renderer.frame(&snapshot);
        assert!(frame.contains("\x1b[25;1H"));
        assert!(frame.contains("visible 0/0"));
    }
}
