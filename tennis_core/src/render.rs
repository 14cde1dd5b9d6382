//! Mapping from court pixels to a character grid for text front ends.

use crate::types::{Config, Rect, Vec2, View};

pub const PADDLE_CHAR: char = '█';
pub const BALL_CHAR: char = '●';
pub const NET_CHAR: char = '┊';

/// Inclusive cell rectangle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Converts court coordinates into grid cells. Paddles keep the same cell
/// height wherever they are, and every cell lands inside the grid.
#[derive(Debug, Copy, Clone)]
pub struct RenderHelper {
    cols: usize,
    rows: usize,
    court_width: i32,
    court_height: i32,
    paddle_cols: usize,
    paddle_rows: usize,
}

impl RenderHelper {
    pub fn new(cols: usize, rows: usize, config: &Config) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let court_width = config.court_width.max(1);
        let court_height = config.court_height.max(1);

        let paddle_cols = scale_len(config.paddle_width, cols, court_width);
        let paddle_rows = scale_len(config.paddle_height, rows, court_height);

        RenderHelper {
            cols,
            rows,
            court_width,
            court_height,
            paddle_cols,
            paddle_rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Paddle height in rows
    pub fn paddle_rows(&self) -> usize {
        self.paddle_rows
    }

    fn col(&self, x: i32) -> usize {
        scale_pos(x, self.cols, self.court_width)
    }

    fn row(&self, y: i32) -> usize {
        scale_pos(y, self.rows, self.court_height)
    }

    /// Cell of the ball's center
    pub fn ball_cell(&self, pos: Vec2) -> (usize, usize) {
        (self.col(pos.x), self.row(pos.y))
    }

    /// Cells covered by a paddle rectangle
    pub fn paddle_rect(&self, rect: Rect) -> CellRect {
        let left = self.col(rect.x).min(self.cols - self.paddle_cols);
        let top = self.row(rect.y).min(self.rows - self.paddle_rows);
        CellRect {
            left,
            right: left + self.paddle_cols - 1,
            top,
            bottom: top + self.paddle_rows - 1,
        }
    }

    /// Rasterize a view into text lines: net, paddles, then ball on top
    pub fn frame_lines(&self, view: &View) -> Vec<String> {
        let mut grid = vec![vec![' '; self.cols]; self.rows];

        let net = self.cols / 2;
        for line in grid.iter_mut() {
            line[net] = NET_CHAR;
        }

        for rect in [view.player_paddle, view.ai_paddle] {
            let cells = self.paddle_rect(rect);
            for line in &mut grid[cells.top..=cells.bottom] {
                for cell in &mut line[cells.left..=cells.right] {
                    *cell = PADDLE_CHAR;
                }
            }
        }

        if !view.is_over {
            let (col, row) = self.ball_cell(view.ball_pos);
            grid[row][col] = BALL_CHAR;
        }

        grid.into_iter().map(|line| line.into_iter().collect()).collect()
    }
}

/// Map a coordinate in `0..extent` to a cell in `0..cells`
fn scale_pos(v: i32, cells: usize, extent: i32) -> usize {
    let v = v.clamp(0, extent - 1) as i64;
    (v * cells as i64 / extent as i64) as usize
}

/// Map a length to a cell count of at least one
fn scale_len(len: i32, cells: usize, extent: i32) -> usize {
    let scaled = (len.max(0) as i64 * cells as i64 + extent as i64 / 2) / extent as i64;
    (scaled as usize).clamp(1, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use crate::Game;

    #[test]
    fn test_paddle_height_consistency() {
        let config = Config::default();
        let helper = RenderHelper::new(80, 24, &config);

        let heights: Vec<usize> = (0..=config.paddle_max_y())
            .step_by(7)
            .map(|y| {
                let rect = helper.paddle_rect(Rect::new(50, y, 15, 100));
                rect.bottom - rect.top + 1
            })
            .collect();

        assert!(heights.iter().all(|&h| h == helper.paddle_rows()));
        assert_eq!(helper.paddle_rows(), 4);
    }

    #[test]
    fn test_paddle_boundaries() {
        let config = Config::default();
        let helper = RenderHelper::new(80, 24, &config);

        for y in [0, config.paddle_max_y()] {
            for side in [Side::Player, Side::Ai] {
                let rect = helper.paddle_rect(Rect::new(config.paddle_x(side), y, 15, 100));
                assert!(rect.top <= rect.bottom);
                assert!(rect.bottom < helper.rows());
                assert!(rect.right < helper.cols());
            }
        }
    }

    #[test]
    fn test_ball_cell_stays_in_grid() {
        let config = Config::default();
        let helper = RenderHelper::new(60, 20, &config);

        assert_eq!(helper.ball_cell(Vec2::new(400, 300)), (30, 10));
        assert_eq!(helper.ball_cell(Vec2::new(-7, -3)), (0, 0));
        assert_eq!(helper.ball_cell(Vec2::new(805, 604)), (59, 19));
    }

    #[test]
    fn test_tiny_grid() {
        let config = Config::default();
        let helper = RenderHelper::new(0, 0, &config);

        assert_eq!(helper.cols(), 1);
        assert_eq!(helper.rows(), 1);
        let rect = helper.paddle_rect(Rect::new(50, 250, 15, 100));
        assert_eq!(rect, CellRect { left: 0, right: 0, top: 0, bottom: 0 });
    }

    #[test]
    fn test_frame_lines() {
        let game = Game::new(Config::default());
        let helper = RenderHelper::new(40, 12, &game.config);

        let lines = helper.frame_lines(&game.view());

        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|l| l.chars().count() == 40));
        assert_eq!(lines[6].chars().nth(20), Some(BALL_CHAR));
        assert_eq!(lines[0].chars().nth(20), Some(NET_CHAR));
        let paddle_cells: usize = lines
            .iter()
            .map(|l| l.chars().filter(|&c| c == PADDLE_CHAR).count())
            .sum();
        assert_eq!(paddle_cells, 2 * helper.paddle_rows());
    }
}
