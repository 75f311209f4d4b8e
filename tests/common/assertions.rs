//! Assertion helpers for tests.

use pretty_assertions::assert_eq;

use viewfinder::sim::SimPanel;
use viewfinder::transport::command;

/// Assert every panel row equals `expected`
pub fn assert_rows_equal(panel: &SimPanel, width: usize, expected: &[u16]) {
    let screen = panel.screen();
    for (y, row) in screen.chunks(width).enumerate() {
        assert_eq!(row, expected, "row {y} differs");
    }
}

/// Assert the panel saw `frames` complete frames: each a window set through
/// blocking commands, followed by `rows` queued pixel transfers.
pub fn assert_frame_transactions(panel: &SimPanel, frames: usize, rows: usize) {
    let log = panel.transactions();
    let per_frame = 11 + rows;
    assert_eq!(
        log.len(),
        frames * per_frame,
        "expected {frames} frames of {per_frame} transactions"
    );
    for frame in log.chunks(per_frame) {
        assert_eq!(frame[0].opcode, Some(command::CASET), "frame must open with CASET");
        assert_eq!(frame[10].opcode, Some(command::RAMWR), "window must end with RAMWR");
        assert!(frame[..11].iter().all(|t| !t.queued));
        assert!(frame[11..].iter().all(|t| t.queued));
    }
    assert_eq!(panel.pixel_transactions(), frames * rows);
}
