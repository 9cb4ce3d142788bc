use serde::{Deserialize, Serialize};

/// Configuration for the game board and pacing.
///
/// Geometry is kept in pixels (the board is conceptually a 600x400 window
/// of 20-pixel cells); everything downstream works in whole cells via the
/// derived accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width in pixels
    pub board_width: u32,
    /// Board height in pixels
    pub board_height: u32,
    /// Side length of one grid cell in pixels
    pub cell_size: u32,
    /// Thickness of the decorative border ring in pixels
    pub border_size: u32,
    /// Milliseconds per simulation tick
    pub tick_ms: u64,
    /// Round length in seconds before the countdown ends the game
    pub round_secs: u64,
    /// Initial length of the snake
    pub initial_snake_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 600,
            board_height: 400,
            cell_size: 20,
            border_size: 20,
            tick_ms: 250,
            round_secs: 60,
            initial_snake_length: 1,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom board size in pixels
    pub fn new(board_width: u32, board_height: u32) -> Self {
        Self {
            board_width,
            board_height,
            ..Default::default()
        }
    }

    /// Small board for tests (10x10 cells)
    pub fn compact() -> Self {
        Self::new(200, 200)
    }

    /// Board width in whole cells
    pub fn grid_width(&self) -> i32 {
        (self.board_width / self.cell_size) as i32
    }

    /// Board height in whole cells
    pub fn grid_height(&self) -> i32 {
        (self.board_height / self.cell_size) as i32
    }

    /// Border ring thickness in whole cells
    pub fn border_cells(&self) -> i32 {
        (self.border_size / self.cell_size) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.board_width, 600);
        assert_eq!(config.board_height, 400);
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.round_secs, 60);
        assert_eq!(config.initial_snake_length, 1);
    }

    #[test]
    fn test_derived_grid_geometry() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width(), 30);
        assert_eq!(config.grid_height(), 20);
        assert_eq!(config.border_cells(), 1);
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(400, 300);
        assert_eq!(config.grid_width(), 20);
        assert_eq!(config.grid_height(), 15);
    }

    #[test]
    fn test_compact_preset() {
        let config = GameConfig::compact();
        assert_eq!(config.grid_width(), 10);
        assert_eq!(config.grid_height(), 10);
    }
}
