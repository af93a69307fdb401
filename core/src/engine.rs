use core::num::Saturating;
use std::collections::VecDeque;

use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Lifecycle of a single game session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    Ready,
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Ready
    }
}

/// One game session: a generated mine layout, the player-visible grid, and
/// the counters driving the win condition. Constructed once per game and
/// discarded when the player starts a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: MineLayout,
    grid: Array2<Cell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    safe_cells_left: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        let safe_cells_left = layout.safe_cell_count();
        Self {
            layout,
            grid: Array2::default(size.to_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            safe_cells_left,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    /// Builds a fresh board for a named difficulty preset.
    pub fn from_preset(name: &str, seed: u64) -> Result<Self> {
        let difficulty: Difficulty = name.parse()?;
        Ok(Self::from_difficulty(difficulty, seed))
    }

    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(RandomMineGenerator::new(seed).generate(difficulty.config()))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// Mines not yet flagged. A display counter only: it goes negative when
    /// the player plants more flags than there are mines.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    /// Cells revealed so far, the exploded mine included on a lost game.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    /// Safe cells still hidden. The game is won when this reaches zero.
    pub fn safe_cells_left(&self) -> CellCount {
        self.safe_cells_left
    }

    pub fn cell_at(&self, pos: Coord2) -> Cell {
        self.grid[pos.to_index()]
    }

    pub fn has_mine_at(&self, pos: Coord2) -> bool {
        self.layout.contains_mine(pos)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Whether a click at `pos` could still change anything. Lets the
    /// presentation layer lock cells that are spent.
    pub fn can_interact_at(&self, pos: Coord2) -> bool {
        if self.state.is_finished() {
            return false;
        }

        match self.cell_at(pos) {
            Cell::Hidden | Cell::Flagged => true,
            Cell::Exploded => false,
            Cell::Revealed(0) => false,
            Cell::Revealed(count) => {
                let mut flagged_neighbors = 0;
                for neighbor in self.layout.iter_neighbors(pos) {
                    match self.grid[neighbor.to_index()] {
                        Cell::Flagged => flagged_neighbors += 1,
                        Cell::Hidden => return true,
                        Cell::Revealed(_) | Cell::Exploded => continue,
                    }
                }
                flagged_neighbors != count
            }
        }
    }

    pub fn can_chord_reveal_at(&self, pos: Coord2) -> bool {
        if self.state.is_finished() {
            return false;
        }

        if let Cell::Revealed(count) = self.cell_at(pos) {
            count == self.count_flagged_neighbors(pos)
        } else {
            false
        }
    }

    pub fn toggle_flag(&mut self, pos: Coord2) -> Result<FlagOutcome> {
        let pos = self.layout.validate_coords(pos)?;
        self.check_not_finished()?;

        Ok(match self.grid[pos.to_index()] {
            Cell::Hidden => {
                self.grid[pos.to_index()] = Cell::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Flagged
            }
            Cell::Flagged => {
                self.grid[pos.to_index()] = Cell::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Unflagged
            }
            Cell::Revealed(_) | Cell::Exploded => FlagOutcome::NoChange,
        })
    }

    /// Flags every hidden neighbor of a revealed number once the number
    /// matches its unrevealed-neighbor count.
    pub fn chord_flag(&mut self, pos: Coord2) -> Result<FlagOutcome> {
        let pos = self.layout.validate_coords(pos)?;
        self.check_not_finished()?;

        let Cell::Revealed(count) = self.grid[pos.to_index()] else {
            return Ok(FlagOutcome::NoChange);
        };

        if count != self.count_unrevealed_neighbors(pos) {
            return Ok(FlagOutcome::NoChange);
        }

        let hidden: SmallVec<[Coord2; 8]> = self
            .layout
            .iter_neighbors(pos)
            .filter(|&neighbor| matches!(self.grid[neighbor.to_index()], Cell::Hidden))
            .collect();

        let mut outcome = FlagOutcome::NoChange;
        for neighbor in hidden {
            self.grid[neighbor.to_index()] = Cell::Flagged;
            self.flagged_count += 1;
            outcome = FlagOutcome::Flagged;
        }

        Ok(outcome)
    }

    /// Reveals a hidden cell. Flagged and already-revealed cells are left
    /// untouched; a zero-adjacency reveal cascades through its region.
    pub fn reveal(&mut self, pos: Coord2) -> Result<RevealOutcome> {
        let pos = self.layout.validate_coords(pos)?;
        self.check_not_finished()?;

        Ok(self.reveal_single_cell(pos))
    }

    /// Opens every neighbor of a revealed number once its flagged-neighbor
    /// count matches the number. Falls back to a plain reveal otherwise.
    pub fn chord_reveal(&mut self, pos: Coord2) -> Result<RevealOutcome> {
        let pos = self.layout.validate_coords(pos)?;
        self.check_not_finished()?;

        Ok(match self.grid[pos.to_index()] {
            Cell::Revealed(count) if count == self.count_flagged_neighbors(pos) => self
                .layout
                .iter_neighbors(pos)
                .map(|neighbor| self.reveal_single_cell(neighbor))
                .reduce(core::ops::BitOr::bitor)
                .unwrap_or(RevealOutcome::NoChange),
            _ => self.reveal_single_cell(pos),
        })
    }

    fn reveal_single_cell(&mut self, pos: Coord2) -> RevealOutcome {
        let cell = self.grid[pos.to_index()];

        match (cell, self.layout.contains_mine(pos)) {
            (Cell::Hidden, true) => {
                self.grid[pos.to_index()] = Cell::Exploded;
                self.revealed_count += 1;
                self.triggered_mine = Some(pos);
                self.end_game(false);
                RevealOutcome::Lost
            }
            (Cell::Hidden, false) => {
                let adjacent_mines = self.layout.adjacent_mine_count(pos);
                self.grid[pos.to_index()] = Cell::Revealed(adjacent_mines);
                self.revealed_count += 1;
                self.safe_cells_left -= 1;
                log::debug!("Revealed cell at {:?}, adjacent mines: {}", pos, adjacent_mines);

                if adjacent_mines == 0 {
                    self.flood_reveal_from(pos);
                }

                if self.safe_cells_left == 0 {
                    self.end_game(true);
                    RevealOutcome::Won
                } else {
                    self.mark_started();
                    RevealOutcome::Revealed
                }
            }
            _ => RevealOutcome::NoChange,
        }
    }

    /// Worklist flood fill: a zero-adjacency reveal propagates to all 8
    /// neighbors and continues through further zero cells. Flagged cells are
    /// barriers and stay untouched; every cell is revealed at most once.
    fn flood_reveal_from(&mut self, start: Coord2) {
        let mut visited: HashSet<Coord2> = HashSet::from([start]);
        let mut frontier: VecDeque<Coord2> = self
            .layout
            .iter_neighbors(start)
            .filter(|&pos| matches!(self.grid[pos.to_index()], Cell::Hidden))
            .collect();
        log::trace!(
            "Starting flood fill from {:?}, initial frontier: {:?}",
            start,
            frontier
        );

        while let Some(pos) = frontier.pop_front() {
            if !visited.insert(pos) {
                continue;
            }

            // flagged cells stay barriers, revealed cells are already done
            if !matches!(self.grid[pos.to_index()], Cell::Hidden) {
                continue;
            }

            let adjacent_mines = self.layout.adjacent_mine_count(pos);
            self.grid[pos.to_index()] = Cell::Revealed(adjacent_mines);
            self.revealed_count += 1;
            self.safe_cells_left -= 1;
            log::trace!(
                "Flood revealed cell at {:?}, adjacent mines: {}",
                pos,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                frontier.extend(
                    self.layout
                        .iter_neighbors(pos)
                        .filter(|&neighbor| {
                            matches!(self.grid[neighbor.to_index()], Cell::Hidden)
                        })
                        .filter(|neighbor| !visited.contains(neighbor)),
                );
            }
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            self.state = GameState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
    }

    fn count_flagged_neighbors(&self, pos: Coord2) -> u8 {
        self.layout
            .iter_neighbors(pos)
            .filter(|&neighbor| self.grid[neighbor.to_index()].is_flagged())
            .count()
            .try_into()
            .unwrap()
    }

    fn count_unrevealed_neighbors(&self, pos: Coord2) -> u8 {
        self.layout
            .iter_neighbors(pos)
            .filter(|&neighbor| self.grid[neighbor.to_index()].is_unrevealed())
            .count()
            .try_into()
            .unwrap()
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
