use crate::dataset::save_merged;
use crate::error::{DatagenError, Result};
use clap::Args;
use encoding::Channels;
use shakmaty::Board;
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderCommand {
    /// FEN of the position to render (the piece placement field alone works too)
    #[arg(long, value_name = "fen")]
    fen: String,

    /// Output PNG path
    #[arg(long, value_name = "output")]
    output: PathBuf,

    /// Also write the three channels side by side as a grayscale canvas
    #[arg(long, default_value = "false")]
    split: bool,
}

pub fn render(cmd: RenderCommand) -> Result<()> {
    let board = parse_board(&cmd.fen)?;

    let merged = encoding::merge(&encoding::pieces::encode(&board), &encoding::control::encode(&board));
    save_merged(&merged, &cmd.output)?;
    log::info!("wrote {}", cmd.output.display());

    if cmd.split {
        let path = cmd.output.with_extension("split.png");
        split_channels(&merged).save(&path)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

/// Only the piece placement matters to the encoders; any FEN suffix
/// (turn, castling, ...) is dropped
fn parse_board(fen: &str) -> Result<Board> {
    let placement = fen.split_whitespace().next().unwrap_or(fen);
    placement
        .parse()
        .map_err(|_| DatagenError::InvalidFen(fen.to_string()))
}

/// Lays the channels out side by side: kings | piece values | control
fn split_channels(merged: &Channels<3>) -> image::GrayImage {
    image::GrayImage::from_fn(24, 8, |x, y| {
        let channel = (x / 8) as usize;
        image::Luma([merged[y as usize][(x % 8) as usize][channel]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_and_bare_fens() {
        let full = parse_board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let bare = parse_board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();

        assert_eq!(full, bare);
        assert!(parse_board("not a position").is_err());
    }

    #[test]
    fn split_canvas_lays_channels_side_by_side() {
        let board = Board::default();
        let merged = encoding::merge(&encoding::pieces::encode(&board), &encoding::control::encode(&board));
        let canvas = split_channels(&merged);

        assert_eq!(canvas.dimensions(), (24, 8));
        // White king on e1 in the king channel, its value in the second pane
        assert_eq!(canvas.get_pixel(4, 7).0, [merged[7][4][0]]);
        assert_eq!(canvas.get_pixel(12, 7).0, [merged[7][4][1]]);
        assert_eq!(canvas.get_pixel(20, 7).0, [merged[7][4][2]]);
    }
}
