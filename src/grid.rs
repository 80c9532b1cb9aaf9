//! Static wall map for the maze.

use crate::config::{MAZE_SIZE, TILE_SIZE};

/// 32x32 wall map stored as one bitmask per row, bit `x` set for a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: [u32; MAZE_SIZE],
}

impl OccupancyGrid {
    /// A grid without walls.
    pub const fn empty() -> Self {
        Self {
            rows: [0; MAZE_SIZE],
        }
    }

    /// Build a grid from ASCII rows, `#` marking a wall.
    pub const fn from_ascii(ascii: &[[u8; MAZE_SIZE]; MAZE_SIZE]) -> Self {
        let mut rows = [0u32; MAZE_SIZE];
        let mut y = 0;
        while y < MAZE_SIZE {
            let mut x = 0;
            while x < MAZE_SIZE {
                if ascii[y][x] == b'#' {
                    rows[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self { rows }
    }

    /// Copy of this grid with the cell at `(x, y)` turned into a wall.
    pub const fn with_wall(mut self, x: usize, y: usize) -> Self {
        self.rows[y] |= 1 << x;
        self
    }

    /// Whether the cell at column `x`, row `y` is a wall. Cells outside the
    /// grid are reported as free; callers check bounds with [`Self::cell`].
    #[inline]
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        x < MAZE_SIZE && y < MAZE_SIZE && self.rows[y] & (1 << x) != 0
    }

    /// Cell containing the world point, or `None` when outside the grid.
    ///
    /// Division truncates towards zero, so points within one tile left of or
    /// above the origin still map to column or row 0.
    #[inline]
    pub fn cell(wx: i32, wy: i32) -> Option<(usize, usize)> {
        let cx = wx / TILE_SIZE;
        let cy = wy / TILE_SIZE;
        let size = MAZE_SIZE as i32;
        if cx < 0 || cy < 0 || cx >= size || cy >= size {
            None
        } else {
            Some((cx as usize, cy as usize))
        }
    }

    /// Whether the world point lies in a wall cell.
    pub fn is_wall_at(&self, wx: i32, wy: i32) -> bool {
        match Self::cell(wx, wy) {
            Some((x, y)) => self.is_wall(x, y),
            None => false,
        }
    }
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        MAZE
    }
}

/// The maze shipped with the firmware.
pub const MAZE: OccupancyGrid = OccupancyGrid::from_ascii(&[
    *b"##########...#.#...#############",
    *b"#........#...#.#...#.....##....#",
    *b"#.###.##.#...#.#...#.###.##.##.#",
    *b"#.###.##.#...#.#...#.###....##.#",
    *b"#.###.##.#...#.#...#.######.##.#",
    *b"#.###.##.#####.#####.######.##.#",
    *b"#...........................##.#",
    *b"#.###.########.######.##.#####.#",
    *b"#.###.########.######.##.#####.#",
    *b"#.##.....##...........##....##.#",
    *b"#.##.###.##.######.##.##.##.##.#",
    *b"#.##.###.##.#....#.##.##.##.##.#",
    *b"#.....##.##.#....#.##.##.##.##.#",
    *b"#.###.##....#....#.##.##.##.##.#",
    *b"..###.#####.#....#.##....##.....",
    *b"#.###.#####.#....#.#####.#####.#",
    *b"#.###.#####.#....#.#####.#####.#",
    *b"#.###.##....#....#.##....##....#",
    *b"#.###.##.##.#....#.##.##.##.##.#",
    *b"#.....##.##.#....#.##.##.##.##.#",
    *b"#.##.###.##.#....#.##.##.##.##.#",
    *b"#.##.###.##.######.##.##.##.##.#",
    *b"#.##.....##...........##....##.#",
    *b"#.###.########.######.##.#####.#",
    *b"#.###.########.######.##.#####.#",
    *b"#...........................##.#",
    *b"#.###.##.#####.#####.######.##.#",
    *b"#.###.##.#...#.#...#.######.##.#",
    *b"#.###.##.#...#.#...#.###....##.#",
    *b"#.###.##.#...#.#...#.###.##.##.#",
    *b"#........#...#.#...#.....##....#",
    *b"##########...#.#...#############",
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_layout() {
        assert!(MAZE.is_wall(0, 0));
        assert!(!MAZE.is_wall(1, 1));
        assert!(!MAZE.is_wall(10, 0));
        // Row 14 is open at both ends
        assert!(!MAZE.is_wall(0, 14));
        assert!(!MAZE.is_wall(31, 14));
        assert!(MAZE.is_wall(31, 13));
    }

    #[test]
    fn test_cell_truncates_towards_zero() {
        assert_eq!(OccupancyGrid::cell(0, 0), Some((0, 0)));
        assert_eq!(OccupancyGrid::cell(-299, 10), Some((0, 0)));
        assert_eq!(OccupancyGrid::cell(-300, 10), None);
        assert_eq!(OccupancyGrid::cell(9599, 9599), Some((31, 31)));
        assert_eq!(OccupancyGrid::cell(9600, 0), None);
    }

    #[test]
    fn test_with_wall() {
        let grid = OccupancyGrid::empty().with_wall(3, 5);
        assert!(grid.is_wall(3, 5));
        assert!(!grid.is_wall(5, 3));
        assert!(grid.is_wall_at(3 * 300 + 1, 5 * 300 + 299));
        assert!(!grid.is_wall(40, 5));
    }
}
