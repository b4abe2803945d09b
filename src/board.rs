//! Board and game state for five-in-a-row.
//!
//! [`GameState`] is a value: [`GameState::place_move`] never touches `self` and hands back a new
//! state instead. Agents only ever receive clones, so nothing they do can reach the state owned by
//! the match runner.
//!
//! Win detection is local. After a stone is placed only the four lines through that cell are
//! scanned, which keeps each turn at `O(board_size)`.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, IllegalMoveError};

/// Number of aligned stones needed to win.
pub const WIN_LENGTH: usize = 5;
/// Smallest accepted board side length.
pub const MIN_BOARD_SIZE: usize = WIN_LENGTH;
/// Largest accepted board side length.
pub const MAX_BOARD_SIZE: usize = 25;
/// Board side length used when none is configured.
pub const DEFAULT_BOARD_SIZE: usize = 8;

/// Scan order for win detection: horizontal, vertical, diagonal down-right, diagonal down-left.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Colour of a stone, which is also the identity of a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stone {
    /// Plays first unless configured otherwise.
    Black,
    /// The other side.
    White,
}

impl Stone {
    /// The other side.
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Single character used in text boards.
    pub fn symbol(self) -> char {
        match self {
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

impl Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "BLACK"),
            Stone::White => write!(f, "WHITE"),
        }
    }
}

/// A `(row, col)` coordinate.
///
/// Signed so that out-of-range proposals coming from agents can be represented and reported.
/// Serialized as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    /// Row index, `0` is the top row.
    pub row: i32,
    /// Column index, `0` is the leftmost column.
    pub col: i32,
}

impl Position {
    /// Build a position.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for (i32, i32) {
    fn from(position: Position) -> Self {
        (position.row, position.col)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A committed placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Side that placed the stone.
    pub player: Stone,
    /// Where it was placed.
    pub position: Position,
}

/// Square board, side to move and the list of committed moves.
///
/// Invariant: the number of occupied cells equals `history().len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board_size: usize,
    cells: Vec<Option<Stone>>,
    current_player: Stone,
    history: Vec<Move>,
}

impl GameState {
    /// Empty board where Black moves first.
    pub fn new(board_size: usize) -> Result<Self, ConfigurationError> {
        Self::with_first_player(board_size, Stone::Black)
    }

    /// Empty board where `first_player` moves first.
    pub fn with_first_player(
        board_size: usize,
        first_player: Stone,
    ) -> Result<Self, ConfigurationError> {
        check_board_size(board_size)?;
        Ok(Self {
            board_size,
            cells: vec![None; board_size * board_size],
            current_player: first_player,
            history: Vec::new(),
        })
    }

    /// Side length.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Side expected to play next.
    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    /// Committed moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Most recent committed move.
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    fn index(&self, position: Position) -> Option<usize> {
        let size = self.board_size as i32;
        if (0..size).contains(&position.row) && (0..size).contains(&position.col) {
            Some(position.row as usize * self.board_size + position.col as usize)
        } else {
            None
        }
    }

    /// Stone at `position`, `None` when the cell is empty or off the board.
    pub fn stone_at(&self, position: Position) -> Option<Stone> {
        self.index(position).and_then(|i| self.cells[i])
    }

    /// True iff `position` is on the board and empty.
    pub fn is_valid_move(&self, position: Position) -> bool {
        self.index(position).is_some_and(|i| self.cells[i].is_none())
    }

    /// True iff no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.history.len() == self.cells.len()
    }

    /// Every empty cell in row-major order.
    pub fn legal_moves(&self) -> Vec<Position> {
        let size = self.board_size as i32;
        (0..size)
            .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
            .filter(|&p| self.is_valid_move(p))
            .collect()
    }

    /// Returns a new state with `player`'s stone on `position`, the move appended to the history
    /// and the turn handed to the opponent. `self` is left untouched.
    ///
    /// # Errors
    /// [`IllegalMoveError`] when `position` is off the board or occupied.
    pub fn place_move(&self, position: Position, player: Stone) -> Result<GameState, IllegalMoveError> {
        let Some(index) = self.index(position) else {
            return Err(IllegalMoveError::OutOfBounds {
                position,
                board_size: self.board_size,
            });
        };
        if self.cells[index].is_some() {
            return Err(IllegalMoveError::Occupied { position });
        }

        let mut next = self.clone();
        next.cells[index] = Some(player);
        next.history.push(Move { player, position });
        next.current_player = player.opponent();
        Ok(next)
    }

    /// Checks whether `player` owns a line of at least [`WIN_LENGTH`] stones through `position`.
    ///
    /// Returns the whole contiguous run of the first direction that qualifies, in
    /// [`DIRECTIONS`] order. The run starts at the end reached by walking against the direction
    /// vector.
    pub fn check_win(&self, position: Position, player: Stone) -> Option<Vec<Position>> {
        if self.stone_at(position) != Some(player) {
            return None;
        }

        DIRECTIONS.iter().find_map(|&(d_row, d_col)| {
            let backward = self.count_direction(position, -d_row, -d_col, player);
            let forward = self.count_direction(position, d_row, d_col, player);
            if backward + forward + 1 < WIN_LENGTH {
                return None;
            }
            let start = position.offset(-d_row * backward as i32, -d_col * backward as i32);
            let run = (0..=(backward + forward) as i32)
                .map(|i| start.offset(d_row * i, d_col * i))
                .collect();
            Some(run)
        })
    }

    fn count_direction(&self, from: Position, d_row: i32, d_col: i32, player: Stone) -> usize {
        let mut count = 0;
        let mut cursor = from.offset(d_row, d_col);
        while self.stone_at(cursor) == Some(player) {
            count += 1;
            cursor = cursor.offset(d_row, d_col);
        }
        count
    }

    /// Applies `moves` in order on top of `self`.
    ///
    /// # Errors
    /// The first [`IllegalMoveError`] encountered.
    pub fn replay<'a>(
        &self,
        moves: impl IntoIterator<Item = &'a Move>,
    ) -> Result<GameState, IllegalMoveError> {
        moves
            .into_iter()
            .try_fold(self.clone(), |state, m| state.place_move(m.position, m.player))
    }

    /// One string per row, `X` for black, `O` for white and `.` for empty.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.board_size)
            .map(|row| row.iter().map(|c| c.map_or('.', Stone::symbol)).collect())
            .collect()
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.board_size {
            write!(f, "{col:>3}")?;
        }
        writeln!(f)?;
        for (row, line) in self.rows().iter().enumerate() {
            write!(f, "{row:>3}")?;
            for c in line.chars() {
                write!(f, "{c:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(crate) fn check_board_size(board_size: usize) -> Result<(), ConfigurationError> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
        Ok(())
    } else {
        Err(ConfigurationError::BoardSize {
            size: board_size,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        })
    }
}
