//! The board: a fixed-size grid of hex cells, plus the selection set.
//!
//! All cells live in one flat vector owned by [BoardModel]. A cell is
//! referred to by its [CellPos], and read through a [CellRef], which is just
//! a borrowed view of the board pinned to one cell. That's what lets a cell
//! look up its own neighbors without owning (or being owned by) anything
//! else.

use crate::{
    grid::HexTile,
    notify::Subscribers,
    tile_type::TileTypeId,
};
use derive_more::Display;
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// The location of a cell on the board
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.row", "self.col")]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<HexTile> for CellPos {
    fn from(hex: HexTile) -> Self {
        Self::new(hex.row() as usize, hex.col() as usize)
    }
}

/// Something the user painted onto a cell in the editor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellPaint {
    /// A flat CSS color
    Color(String),
    /// A terrain image, see [TileTypeRegistry](crate::TileTypeRegistry)
    Terrain(TileTypeId),
}

/// The 6 neighbors of a cell. Neighbor offsets depend on whether the cell is
/// in an odd column, see [CellRef::neighbor].
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, EnumIter)]
pub enum CellDirection {
    N,
    S,
    EN,
    ES,
    WN,
    WS,
}

impl CellDirection {
    /// `(row, col)` offset to the neighbor in this direction, for a cell in
    /// an even (`odd == false`) or odd column
    pub fn offset(self, odd: bool) -> (i32, i32) {
        let odd_delta = if odd { 1 } else { 0 };
        match self {
            Self::N => (-1, 0),
            Self::S => (1, 0),
            Self::EN => (-1 + odd_delta, 1),
            Self::ES => (odd_delta, 1),
            Self::WN => (-1 + odd_delta, -1),
            Self::WS => (odd_delta, -1),
        }
    }
}

/// Snapshot of a cell's observable state, delivered to cell subscribers
/// whenever it changes
#[derive(Clone, Debug, PartialEq)]
pub struct CellChange {
    pub pos: CellPos,
    pub active: bool,
    pub selected: bool,
    pub paint: Option<CellPaint>,
}

/// Delivered to board subscribers whenever the selection changes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardChange {
    /// Number of selected cells after the change
    pub selected: usize,
}

/// Mutable state for one cell. Selection isn't stored here, it's owned by the
/// board.
#[derive(Debug)]
pub struct CellModel {
    pos: CellPos,
    active: bool,
    paint: Option<CellPaint>,
    subscribers: Subscribers<CellChange>,
}

impl CellModel {
    fn new(pos: CellPos) -> Self {
        Self {
            pos,
            active: false,
            paint: None,
            subscribers: Subscribers::new(),
        }
    }
}

/// A fixed-size grid of cells. The shape can't change after construction.
#[derive(Debug)]
pub struct BoardModel {
    rows: usize,
    cols: usize,
    /// Row-major
    cells: Vec<CellModel>,
    /// Linear indexes of all selected cells
    selection: FnvHashSet<usize>,
    subscribers: Subscribers<BoardChange>,
}

impl BoardModel {
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| CellModel::new(CellPos::new(row, col)))
            })
            .collect();
        Self {
            rows,
            cols,
            cells,
            selection: FnvHashSet::default(),
            subscribers: Subscribers::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Subscribers to selection changes
    pub fn subscribers(&self) -> &Subscribers<BoardChange> {
        &self.subscribers
    }

    fn index_of(&self, pos: CellPos) -> Option<usize> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    fn cell_ref(&self, index: usize) -> CellRef<'_> {
        CellRef { board: self, index }
    }

    /// Look up a cell by signed coordinates. Returns `None` for anything off
    /// the board, including negative coordinates.
    pub fn get_cell(&self, row: i32, col: i32) -> Option<CellRef<'_>> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.cell(CellPos::new(row, col))
    }

    pub fn cell(&self, pos: CellPos) -> Option<CellRef<'_>> {
        self.index_of(pos).map(|index| self.cell_ref(index))
    }

    /// Get the cell under a hexagon, if the hexagon is on the board
    pub fn cell_at_hex(&self, hex: HexTile) -> Option<CellRef<'_>> {
        self.cell(hex.into())
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellRef<'_>> {
        (0..self.cells.len()).map(move |index| self.cell_ref(index))
    }

    /// Notify a cell's subscribers of its current state
    fn notify_cell(&self, index: usize) {
        let cell = self.cell_ref(index);
        self.cells[index].subscribers.notify(&cell.change());
    }

    fn notify_board(&self) {
        self.subscribers.notify(&BoardChange {
            selected: self.selection.len(),
        });
    }

    // ===== Selection =====

    pub fn is_selected(&self, pos: CellPos) -> bool {
        self.index_of(pos)
            .map_or(false, |index| self.selection.contains(&index))
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// All selected cells, sorted by position
    pub fn selection(&self) -> Vec<CellPos> {
        let mut selection: Vec<CellPos> = self
            .selection
            .iter()
            .map(|index| self.cells[*index].pos)
            .collect();
        selection.sort_unstable();
        selection
    }

    /// Add or remove a cell from the selection. If membership actually
    /// changed, fire one cell notification and one board notification and
    /// return `true`. Otherwise (or if the cell isn't on the board) do
    /// nothing.
    pub fn set_selected(&mut self, pos: CellPos, selected: bool) -> bool {
        let index = match self.index_of(pos) {
            Some(index) => index,
            None => return false,
        };
        let changed = if selected {
            self.selection.insert(index)
        } else {
            self.selection.remove(&index)
        };
        if changed {
            self.notify_cell(index);
            self.notify_board();
        }
        changed
    }

    /// Flip a cell's selection membership
    pub fn toggle_selected(&mut self, pos: CellPos) -> bool {
        let selected = self.is_selected(pos);
        self.set_selected(pos, !selected)
    }

    /// Deselect everything. Each deselected cell gets a notification, then
    /// the board gets exactly one.
    pub fn clear_selection(&mut self) {
        let mut removed: Vec<usize> = self.selection.drain().collect();
        removed.sort_unstable();
        for index in removed {
            self.notify_cell(index);
        }
        self.notify_board();
    }

    // ===== Cell state =====

    /// Set a cell's active flag. Returns `true` (and notifies the cell) if
    /// the value changed.
    pub fn set_active(&mut self, pos: CellPos, active: bool) -> bool {
        match self.index_of(pos) {
            Some(index) if self.cells[index].active != active => {
                self.cells[index].active = active;
                self.notify_cell(index);
                true
            }
            _ => false,
        }
    }

    /// Activate a cell, and optionally all its neighbors too
    pub fn activate(&mut self, pos: CellPos, with_neighbors: bool) {
        let neighbors: Vec<CellPos> = match self.cell(pos) {
            Some(cell) if with_neighbors => {
                cell.neighbors().map(|neighbor| neighbor.pos()).collect()
            }
            Some(_) => Vec::new(),
            None => return,
        };
        self.set_active(pos, true);
        for neighbor in neighbors {
            self.set_active(neighbor, true);
        }
    }

    /// Set (or clear) a cell's paint. Returns `true` (and notifies the cell)
    /// if the value changed.
    pub fn set_paint(
        &mut self,
        pos: CellPos,
        paint: Option<CellPaint>,
    ) -> bool {
        match self.index_of(pos) {
            Some(index) if self.cells[index].paint != paint => {
                self.cells[index].paint = paint;
                self.notify_cell(index);
                true
            }
            _ => false,
        }
    }

    /// Overwrite every cell's active flag from a row-major buffer, then
    /// notify each cell that flipped. Returns the number of flipped cells.
    pub(crate) fn commit_active(&mut self, next: &[bool]) -> usize {
        assert_eq!(
            next.len(),
            self.cells.len(),
            "generation buffer doesn't match board size"
        );
        let flipped: Vec<usize> = self
            .cells
            .iter_mut()
            .zip(next)
            .enumerate()
            .filter_map(|(index, (cell, &active))| {
                if cell.active != active {
                    cell.active = active;
                    Some(index)
                } else {
                    None
                }
            })
            .collect();
        for &index in &flipped {
            self.notify_cell(index);
        }
        flipped.len()
    }
}

/// A borrowed view of one cell on a board
#[derive(Copy, Clone)]
pub struct CellRef<'a> {
    board: &'a BoardModel,
    index: usize,
}

impl<'a> CellRef<'a> {
    fn model(&self) -> &'a CellModel {
        &self.board.cells[self.index]
    }

    pub fn pos(&self) -> CellPos {
        self.model().pos
    }

    pub fn row(&self) -> usize {
        self.pos().row
    }

    pub fn col(&self) -> usize {
        self.pos().col
    }

    /// Address of the hexagon this cell occupies
    pub fn hex(&self) -> HexTile {
        let pos = self.pos();
        HexTile::new(pos.row as u32, pos.col as u32)
    }

    pub fn is_active(&self) -> bool {
        self.model().active
    }

    pub fn paint(&self) -> Option<&'a CellPaint> {
        self.model().paint.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.board.selection.contains(&self.index)
    }

    /// Is this cell in an odd column? Odd columns sit half a cell lower
    /// than even ones, which changes neighbor offsets.
    pub fn is_odd(&self) -> bool {
        self.col() % 2 == 1
    }

    /// Is this cell in the state that every cell starts in?
    pub fn is_default(&self) -> bool {
        let model = self.model();
        !model.active && model.paint.is_none()
    }

    pub fn subscribers(&self) -> &'a Subscribers<CellChange> {
        &self.model().subscribers
    }

    /// Snapshot this cell's observable state
    pub fn change(&self) -> CellChange {
        CellChange {
            pos: self.pos(),
            active: self.is_active(),
            selected: self.is_selected(),
            paint: self.paint().cloned(),
        }
    }

    /// Get the neighboring cell in the given direction. `None` if that
    /// neighbor would be off the board.
    pub fn neighbor(&self, direction: CellDirection) -> Option<CellRef<'a>> {
        let (row_offset, col_offset) = direction.offset(self.is_odd());
        let pos = self.pos();
        self.board.get_cell(
            pos.row as i32 + row_offset,
            pos.col as i32 + col_offset,
        )
    }

    /// All neighbors that exist on the board (up to 6)
    pub fn neighbors(&self) -> impl Iterator<Item = CellRef<'a>> {
        let cell = *self;
        CellDirection::iter().filter_map(move |dir| cell.neighbor(dir))
    }

    pub fn active_neighbor_count(&self) -> usize {
        self.neighbors()
            .filter(|neighbor| neighbor.is_active())
            .count()
    }
}

impl std::fmt::Debug for CellRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellRef")
            .field("pos", &self.pos())
            .field("active", &self.is_active())
            .field("selected", &self.is_selected())
            .field("paint", &self.paint())
            .finish()
    }
}
