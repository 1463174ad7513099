use crate::{row_col, to_byte, Channels, MID};
use shakmaty::{Board, Color, Role};

/// Brightness magnitude per role, from classic piece values. The king gets
/// a small fixed magnitude: its location is carried by the king plane, and
/// its move power sits just above a pawn.
fn role_magnitude(role: Role) -> f32 {
    match role {
        Role::Pawn => 26.0,
        Role::Knight => 77.0,
        Role::Bishop => 83.0,
        Role::Rook => 128.0,
        Role::Queen => 255.0,
        Role::King => 50.0,
    }
}

/// Promotion-proximity magnitude for a pawn, from its rank counted from
/// the pawn's own back rank (0..7). Stays near the base pawn value for
/// most of the board, then rises steeply toward queen brightness as the
/// pawn nears promotion. A linear ramp under-weights near-promotion
/// danger, hence the exponential.
fn pawn_magnitude(rank_from_home: f32) -> f32 {
    let curve = ((rank_from_home - 5.0) / 0.72).exp() / 2.0 + 1.0;
    curve / 10.0 * 255.0
}

/// Encodes a board into two planes.
///
/// Plane 0 marks the king squares: 255 for the White king, 0 for the
/// Black king, 50% gray elsewhere. It exists to give king location a
/// strong, unambiguous bias separate from piece values.
///
/// Plane 1 holds piece-value brightness: White pieces brighten from 50%
/// gray, Black pieces darken, magnitude growing with piece power. Pawns
/// use the promotion-proximity curve instead of their base value.
pub fn encode(board: &Board) -> Channels<2> {
    let mut image = [[[MID as u8; 2]; 8]; 8];

    for (square, piece) in board.clone().into_iter() {
        let (row, col) = row_col(square);

        let magnitude = if piece.role == Role::Pawn {
            let rank_from_home = match piece.color {
                Color::White => square.rank() as usize,
                Color::Black => 7 - square.rank() as usize,
            };
            pawn_magnitude(rank_from_home as f32)
        } else {
            role_magnitude(piece.role)
        };

        let brightness = match piece.color {
            Color::White => MID + magnitude / 2.0,
            Color::Black => MID - magnitude / 2.0,
        };

        image[row][col][1] = to_byte(brightness);
    }

    if let Some(square) = board.king_of(Color::White) {
        let (row, col) = row_col(square);
        image[row][col][0] = 255;
    }
    if let Some(square) = board.king_of(Color::Black) {
        let (row, col) = row_col(square);
        image[row][col][0] = 0;
    }

    image
}
