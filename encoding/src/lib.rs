//! Board position → multi-channel image encoders.
//!
//! Each encoder is a pure function from a `shakmaty::Board` to a stack of
//! 8x8 byte planes, suitable as convolutional network input.

pub mod control;
pub mod pieces;

use shakmaty::Square;

/// A stack of N 8x8 byte planes. Row 0 is rank 8 (the board as White sees
/// it, top row first), columns are files a..h.
pub type Channels<const N: usize> = [[[u8; N]; 8]; 8];

/// 50% gray, the value of an empty square in every plane.
pub const MID: f32 = 255.0 / 2.0;

/// Converts a brightness to a byte, saturating instead of wrapping.
fn to_byte(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Image coordinates of a square.
fn row_col(square: Square) -> (usize, usize) {
    (7 - square.rank() as usize, square.file() as usize)
}

/// Concatenates the piece planes and the control plane along the channel
/// axis, preserving square alignment. Values are not transformed.
pub fn merge(pieces: &Channels<2>, control: &Channels<1>) -> Channels<3> {
    let mut merged = [[[0u8; 3]; 8]; 8];

    for row in 0..8 {
        for col in 0..8 {
            merged[row][col] = [
                pieces[row][col][0],
                pieces[row][col][1],
                control[row][col][0],
            ];
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Board;

    #[test]
    fn merge_preserves_channels() {
        let board = Board::default();
        let pieces = pieces::encode(&board);
        let control = control::encode(&board);
        let merged = merge(&pieces, &control);

        for row in 0..8 {
            for col in 0..8 {
                assert_eq!(merged[row][col][0], pieces[row][col][0]);
                assert_eq!(merged[row][col][1], pieces[row][col][1]);
                assert_eq!(merged[row][col][2], control[row][col][0]);
            }
        }
    }
}
