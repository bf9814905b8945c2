use crate::{
    board::{BoardModel, CellPaint, CellPos},
    clock::{Clock, ClockState},
    config::GameConfig,
    grid::HexTile,
    notify::Subscribers,
    persist::{BoardState, LoadReport, SavedGame},
    timed,
    tile_type::{TileTypeId, TileTypeRegistry},
};
use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Which terrain, if any, clicking a cell will paint with
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileTypeSelection {
    /// Clicks toggle cell selection
    None,
    /// Clicks paint the cell with this terrain
    Selected(TileTypeId),
}

impl Default for TileTypeSelection {
    fn default() -> Self {
        Self::None
    }
}

/// Delivered to game subscribers after every turn, run state change, or bulk
/// update
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameChange {
    pub turn: u64,
    pub state: ClockState,
    pub tile_type: TileTypeSelection,
}

/// Life-like rule for the hex grid. Given a cell's current state and the
/// number of active neighbors it has, return the cell's next state.
pub fn next_state(active: bool, active_neighbors: usize) -> bool {
    match active_neighbors {
        2 | 4 => active,
        3 => true,
        _ => false,
    }
}

/// A game session: the board, the turn counter, and the clock that drives
/// the simulation. Also holds the tile types the user can paint with.
///
/// The host is responsible for time. It should call [GameModel::advance]
/// from its timer callback (or animation loop), and the model will run
/// however many ticks came due.
#[derive(Debug)]
pub struct GameModel {
    config: GameConfig,
    board: BoardModel,
    turn: u64,
    clock: Clock,
    tile_types: TileTypeRegistry,
    tile_type: TileTypeSelection,
    subscribers: Subscribers<GameChange>,
}

impl GameModel {
    /// Create a new session with an empty board. Fails if the config is
    /// invalid.
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid game config")?;
        info!("Creating {}x{} board", config.rows, config.cols);
        Ok(Self {
            config,
            board: BoardModel::new(config.rows, config.cols),
            turn: 0,
            clock: Clock::new(config.tick_interval()),
            tile_types: TileTypeRegistry::new(),
            tile_type: TileTypeSelection::None,
            subscribers: Subscribers::new(),
        })
    }

    /// Rebuild a session from a save. The clock always starts stopped.
    pub fn restore(saved: &SavedGame) -> anyhow::Result<(Self, LoadReport)> {
        let mut game = Self::new(saved.config)?;
        game.turn = saved.turn;
        let report = game.load_state(&saved.cells);
        Ok((game, report))
    }

    /// Snapshot this session so it can be restored later. Tile type images
    /// are stored separately, see [TileTypeRegistry::to_assets].
    pub fn save(&self) -> SavedGame {
        SavedGame {
            config: self.config,
            turn: self.turn,
            cells: self.export_state(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    /// Mutable access to the board, for direct edits. Cell and board
    /// subscribers still get notified, but game subscribers don't.
    pub fn board_mut(&mut self) -> &mut BoardModel {
        &mut self.board
    }

    /// Number of generations that have run since the board was created
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Subscribers to turn and run state changes
    pub fn subscribers(&self) -> &Subscribers<GameChange> {
        &self.subscribers
    }

    fn notify(&self) {
        self.subscribers.notify(&GameChange {
            turn: self.turn,
            state: self.clock.state(),
            tile_type: self.tile_type,
        });
    }

    // ===== Simulation =====

    /// Start running the simulation. Does nothing if it's already running.
    pub fn start(&mut self) {
        if self.clock.start() {
            info!("Simulation started at turn {}", self.turn);
            self.notify();
        }
    }

    /// Stop running the simulation. Once this returns, no more ticks will
    /// run until the next [GameModel::start].
    pub fn stop(&mut self) {
        if self.clock.stop() {
            info!("Simulation stopped at turn {}", self.turn);
            self.notify();
        }
    }

    /// Run one generation, but only if the simulation is running
    pub fn tick(&mut self) {
        if self.is_running() {
            self.step();
        }
    }

    /// Run one generation, regardless of whether the simulation is running.
    /// Every cell's next state is computed from the current generation
    /// before any cell is changed.
    pub fn step(&mut self) {
        let flipped = timed!("Tick", {
            let next: Vec<bool> = self
                .board
                .cells()
                .map(|cell| {
                    next_state(cell.is_active(), cell.active_neighbor_count())
                })
                .collect();
            self.board.commit_active(&next)
        });
        self.turn += 1;
        debug!("Turn {}: {} cell(s) changed", self.turn, flipped);
        self.notify();
    }

    /// Let time pass, running every tick that came due. Returns the number
    /// of ticks run. Does nothing while stopped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let due = self.clock.advance(elapsed);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    // ===== Editing =====

    /// Handle a click on a hex. With a tile type selected, this paints the
    /// cell with that terrain. Otherwise it toggles the cell's selection.
    /// Clicks that miss the board are ignored.
    pub fn click(&mut self, hex: Option<HexTile>) {
        let pos = match hex.and_then(|hex| self.board.cell_at_hex(hex)) {
            Some(cell) => cell.pos(),
            None => return,
        };
        match self.tile_type {
            TileTypeSelection::Selected(id) => {
                self.board.set_paint(pos, Some(CellPaint::Terrain(id)));
            }
            TileTypeSelection::None => {
                self.board.toggle_selected(pos);
            }
        }
    }

    /// Paint every selected cell with a flat color, then clear the selection
    pub fn paint_selection(&mut self, color: &str) {
        for pos in self.board.selection() {
            self.board
                .set_paint(pos, Some(CellPaint::Color(color.to_owned())));
        }
        self.board.clear_selection();
    }

    /// Activate every selected cell, optionally along with its neighbors,
    /// then clear the selection
    pub fn activate_selection(&mut self, with_neighbors: bool) {
        let selection: Vec<CellPos> = self.board.selection();
        for pos in selection {
            self.board.activate(pos, with_neighbors);
        }
        self.board.clear_selection();
    }

    // ===== Tile types =====

    pub fn tile_types(&self) -> &TileTypeRegistry {
        &self.tile_types
    }

    /// Replace the whole tile type registry, e.g. after loading assets. If
    /// the selected type doesn't exist in the new registry, the selection is
    /// reset.
    pub fn set_tile_types(&mut self, tile_types: TileTypeRegistry) {
        self.tile_types = tile_types;
        if let TileTypeSelection::Selected(id) = self.tile_type {
            if !self.tile_types.contains(id) {
                self.clear_tile_type();
            }
        }
    }

    /// Register a new tile type, returning its ID
    pub fn add_tile_type(
        &mut self,
        name: impl Into<String>,
        image: Vec<u8>,
    ) -> TileTypeId {
        self.tile_types.add(name, image)
    }

    /// Delete a tile type. If it was selected, the selection goes back to
    /// [TileTypeSelection::None]. Cells already painted with it keep their
    /// paint.
    pub fn remove_tile_type(&mut self, id: TileTypeId) -> bool {
        let removed = self.tile_types.remove(id).is_some();
        if removed && self.tile_type == TileTypeSelection::Selected(id) {
            self.clear_tile_type();
        }
        removed
    }

    pub fn tile_type(&self) -> TileTypeSelection {
        self.tile_type
    }

    /// Select a tile type to paint with. Unknown IDs are ignored.
    pub fn select_tile_type(&mut self, id: TileTypeId) {
        if !self.tile_types.contains(id) {
            warn!("Ignoring selection of unknown tile type {}", id);
            return;
        }
        self.set_tile_type(TileTypeSelection::Selected(id));
    }

    /// Select a tile type, or deselect it if it's already selected
    pub fn toggle_tile_type(&mut self, id: TileTypeId) {
        if self.tile_type == TileTypeSelection::Selected(id) {
            self.clear_tile_type();
        } else {
            self.select_tile_type(id);
        }
    }

    pub fn clear_tile_type(&mut self) {
        self.set_tile_type(TileTypeSelection::None);
    }

    fn set_tile_type(&mut self, tile_type: TileTypeSelection) {
        if self.tile_type != tile_type {
            self.tile_type = tile_type;
            self.notify();
        }
    }

    // ===== Persistence =====

    /// Capture every non-default cell
    pub fn export_state(&self) -> BoardState {
        BoardState::capture(&self.board)
    }

    /// Apply a saved board state. Bad entries are skipped and listed in the
    /// returned report.
    pub fn load_state(&mut self, state: &BoardState) -> LoadReport {
        let report = timed!("Loading board state", state.apply(&mut self.board));
        info!(
            "Loaded {} cell(s), skipped {}",
            report.applied.len(),
            report.skipped.len()
        );
        self.notify();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn game(rows: usize, cols: usize) -> GameModel {
        GameModel::new(GameConfig {
            rows,
            cols,
            tick_interval_ms: 100,
            ..Default::default()
        })
        .unwrap()
    }

    fn record_changes(game: &GameModel) -> Rc<RefCell<Vec<GameChange>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_clone = Rc::clone(&changes);
        game.subscribers().subscribe(move |change: &GameChange| {
            changes_clone.borrow_mut().push(*change)
        });
        changes
    }

    #[test]
    fn test_next_state() {
        for active in [false, true] {
            assert!(!next_state(active, 0));
            assert!(!next_state(active, 1));
            assert_eq!(next_state(active, 2), active);
            assert!(next_state(active, 3));
            assert_eq!(next_state(active, 4), active);
            assert!(!next_state(active, 5));
            assert!(!next_state(active, 6));
        }
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut game = game(3, 3);
        let changes = record_changes(&game);
        game.tick();
        assert_eq!(game.turn(), 0);
        assert!(changes.borrow().is_empty());

        game.start();
        game.start();
        game.tick();
        assert_eq!(game.turn(), 1);
        assert_eq!(
            *changes.borrow(),
            vec![
                GameChange {
                    turn: 0,
                    state: ClockState::Running,
                    tile_type: TileTypeSelection::None,
                },
                GameChange {
                    turn: 1,
                    state: ClockState::Running,
                    tile_type: TileTypeSelection::None,
                },
            ]
        );
    }

    #[test]
    fn test_step_while_stopped() {
        let mut game = game(3, 3);
        game.board_mut().set_active(CellPos::new(1, 1), true);
        game.step();
        assert_eq!(game.turn(), 1);
        // A lone cell dies
        assert!(!game.board().cell(CellPos::new(1, 1)).unwrap().is_active());
    }

    #[test]
    fn test_advance() {
        let mut game = game(2, 2);
        assert_eq!(game.advance(Duration::from_secs(1)), 0);
        game.start();
        assert_eq!(game.advance(Duration::from_millis(250)), 2);
        assert_eq!(game.turn(), 2);
        game.stop();
        assert_eq!(game.advance(Duration::from_secs(1)), 0);
        assert_eq!(game.turn(), 2);
    }

    #[test]
    fn test_click() {
        let mut game = game(3, 3);
        let hex = HexTile::new(1, 2);
        let pos = CellPos::from(hex);

        game.click(Some(hex));
        assert!(game.board().is_selected(pos));
        game.click(Some(hex));
        assert!(!game.board().is_selected(pos));
        // Misses are ignored
        game.click(None);
        game.click(Some(HexTile::new(10, 10)));

        let id = game.add_tile_type("grass", vec![1, 2, 3]);
        game.select_tile_type(id);
        game.click(Some(hex));
        assert!(!game.board().is_selected(pos));
        assert_eq!(
            game.board().cell(pos).unwrap().paint(),
            Some(&CellPaint::Terrain(id))
        );
    }

    #[test]
    fn test_tile_type_selection() {
        let mut game = game(1, 1);
        let grass = game.add_tile_type("grass", vec![]);
        let water = game.add_tile_type("water", vec![]);
        let changes = record_changes(&game);

        game.toggle_tile_type(grass);
        assert_eq!(game.tile_type(), TileTypeSelection::Selected(grass));
        game.toggle_tile_type(water);
        assert_eq!(game.tile_type(), TileTypeSelection::Selected(water));
        game.toggle_tile_type(water);
        assert_eq!(game.tile_type(), TileTypeSelection::None);
        assert_eq!(changes.borrow().len(), 3);

        // Unknown types can't be selected
        game.select_tile_type(TileTypeId::new(99).unwrap());
        assert_eq!(game.tile_type(), TileTypeSelection::None);

        game.select_tile_type(grass);
        assert!(game.remove_tile_type(grass));
        assert_eq!(game.tile_type(), TileTypeSelection::None);
        assert!(!game.remove_tile_type(grass));
    }

    #[test]
    fn test_edit_selection() {
        let mut game = game(3, 3);
        game.board_mut().set_selected(CellPos::new(0, 0), true);
        game.board_mut().set_selected(CellPos::new(2, 2), true);
        game.paint_selection("#ff0000");
        assert!(!game.board().has_selection());
        assert_eq!(game.export_state().len(), 2);

        game.board_mut().set_selected(CellPos::new(0, 0), true);
        game.activate_selection(true);
        let active: Vec<CellPos> = game
            .board()
            .cells()
            .filter(|cell| cell.is_active())
            .map(|cell| cell.pos())
            .collect();
        assert_eq!(
            active,
            vec![CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(1, 0)]
        );
    }

    #[test]
    fn test_save_restore() {
        let mut game = game(4, 4);
        game.board_mut().set_active(CellPos::new(1, 1), true);
        game.board_mut()
            .set_paint(CellPos::new(3, 0), Some(CellPaint::Color("blue".into())));
        game.step();
        let saved = game.save();
        assert_eq!(saved.turn, 1);

        let (restored, report) = GameModel::restore(&saved).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(restored.turn(), 1);
        assert!(!restored.is_running());
        assert_eq!(restored.export_state(), game.export_state());
    }
}
