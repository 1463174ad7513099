use crate::{row_col, to_byte, Channels, MID};
use shakmaty::{Board, Color, Square};

/// Brightness shift per attacker. 7 keeps typical per-side attacker
/// counts inside the byte range; crowded squares clip instead of wrapping.
const PRESSURE_STEP: f32 = MID / 7.0;

/// Net attacking pressure on a square: the number of White pieces that
/// could capture onto it minus the Black count. Absolutely pinned
/// attackers are counted like any other; discounting them was tried
/// upstream and abandoned.
pub fn net_pressure(board: &Board, square: Square) -> i32 {
    let occupied = board.occupied();
    let white = board.attacks_to(square, Color::White, occupied).count() as i32;
    let black = board.attacks_to(square, Color::Black, occupied).count() as i32;
    white - black
}

/// Encodes the board-control plane: 50% gray, shifted up by White
/// pressure and down by Black pressure in steps of [`PRESSURE_STEP`].
pub fn encode(board: &Board) -> Channels<1> {
    let mut image = [[[MID as u8; 1]; 8]; 8];

    for square in Square::ALL {
        let (row, col) = row_col(square);
        let brightness = MID + net_pressure(board, square) as f32 * PRESSURE_STEP;
        image[row][col][0] = to_byte(brightness);
    }

    image
}
