//! The shape of persisted board data. The storage itself (local storage, a
//! file, whatever) is up to the host; this module only defines what gets
//! stored and how it maps back onto a board.
//!
//! ## Format
//!
//! A saved board is a sparse map from cell key to cell record. Only cells
//! that differ from the default state are written. The key is
//! `cell_<row>_<col>`, and the record has these optional fields (all absent
//! means default):
//!
//! ```json
//! {
//!   "cell_0_3": {"backgroundColor": "#ff0000"},
//!   "cell_2_1": {"tileType": 4, "active": true}
//! }
//! ```

use crate::{
    board::{BoardModel, CellPaint, CellPos, CellRef},
    config::GameConfig,
    tile_type::TileTypeId,
};
use anyhow::{anyhow, bail, Context};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Storage key for a single cell: `cell_<row>_<col>`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellKey(pub CellPos);

impl CellKey {
    const PREFIX: &'static str = "cell_";
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}_{}", Self::PREFIX, self.0.row, self.0.col)
    }
}

impl FromStr for CellKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| anyhow!("missing prefix {:?}", Self::PREFIX))?;
        let (row, col) = coords
            .split_once('_')
            .ok_or_else(|| anyhow!("expected <row>_<col>, got {:?}", coords))?;
        let row = parse_index(row).context("invalid row")?;
        let col = parse_index(col).context("invalid col")?;
        Ok(Self(CellPos::new(row, col)))
    }
}

/// Parse a plain decimal index. `usize::from_str` also takes a leading `+`
/// and leading zeros, which would let two keys name the same cell.
fn parse_index(s: &str) -> anyhow::Result<usize> {
    if s.is_empty()
        || !s.bytes().all(|b| b.is_ascii_digit())
        || (s.len() > 1 && s.starts_with('0'))
    {
        bail!("expected a plain decimal number, got {:?}", s);
    }
    s.parse().with_context(|| format!("invalid number {:?}", s))
}

/// Persisted attributes for a single cell. Absent fields mean default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<TileTypeId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub active: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl CellRecord {
    /// Build a record for a cell. Returns `None` for cells in the default
    /// state, since those don't get stored.
    pub fn from_cell(cell: CellRef<'_>) -> Option<Self> {
        if cell.is_default() {
            return None;
        }
        let (background_color, tile_type) = match cell.paint() {
            Some(CellPaint::Color(color)) => (Some(color.clone()), None),
            Some(CellPaint::Terrain(id)) => (None, Some(*id)),
            None => (None, None),
        };
        Some(Self {
            background_color,
            tile_type,
            active: cell.is_active(),
        })
    }

    /// The paint this record describes. If a (malformed) record has both a
    /// color and a terrain, the terrain wins.
    pub fn paint(&self) -> Option<CellPaint> {
        match (&self.tile_type, &self.background_color) {
            (Some(id), _) => Some(CellPaint::Terrain(*id)),
            (None, Some(color)) => Some(CellPaint::Color(color.clone())),
            (None, None) => None,
        }
    }
}

/// Outcome of applying a [BoardState] to a board
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Positions of all cells that were written to
    pub applied: Vec<CellPos>,
    /// Keys that couldn't be parsed or don't exist on the board
    pub skipped: Vec<String>,
}

/// A sparse snapshot of a board's non-default cells
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState {
    cells: BTreeMap<String, CellRecord>,
}

impl BoardState {
    /// Capture every non-default cell on the board
    pub fn capture(board: &BoardModel) -> Self {
        let cells = board
            .cells()
            .filter_map(|cell| {
                CellRecord::from_cell(cell)
                    .map(|record| (CellKey(cell.pos()).to_string(), record))
            })
            .collect();
        Self { cells }
    }

    /// Write every entry onto the board. Entries with a malformed key, or a
    /// key that's off the board, are skipped without aborting the load. Each
    /// written cell notifies its own subscribers if it changed.
    pub fn apply(&self, board: &mut BoardModel) -> LoadReport {
        let mut report = LoadReport::default();
        for (key, record) in &self.cells {
            let pos = match key.parse::<CellKey>() {
                Ok(CellKey(pos)) if board.cell(pos).is_some() => pos,
                Ok(CellKey(pos)) => {
                    warn!("Skipping saved cell {}, it's off the board", pos);
                    report.skipped.push(key.clone());
                    continue;
                }
                Err(err) => {
                    warn!("Skipping saved cell {:?}: {:#}", key, err);
                    report.skipped.push(key.clone());
                    continue;
                }
            };
            board.set_paint(pos, record.paint());
            board.set_active(pos, record.active);
            report.applied.push(pos);
        }
        report
    }

    pub fn insert(&mut self, key: impl Into<String>, record: CellRecord) {
        self.cells.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&CellRecord> {
        self.cells.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellRecord)> {
        self.cells.iter().map(|(key, record)| (key.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Deserialize a board state from JSON
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("error deserializing board state")
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        // Panic here indicates an internal bug in the data format
        serde_json::to_string(self).expect("error serializing board state")
    }
}

/// A full saved session: enough to rebuild a [GameModel](crate::GameModel)
/// exactly as it was.
///
/// ## Binary Format
/// Besides JSON, sessions can be saved in a compact binary format via
/// [SavedGame::to_bin] and reloaded via [SavedGame::from_bin]. Currently the
/// binary format is [CBOR](https://cbor.io/), but that is subject to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub config: GameConfig,
    pub turn: u64,
    pub cells: BoardState,
}

impl SavedGame {
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("error deserializing saved game")
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        // Panic here indicates an internal bug in the data format
        serde_json::to_string(self).expect("error serializing saved game")
    }

    #[cfg(feature = "bin")]
    pub fn from_bin(read: impl std::io::Read) -> anyhow::Result<Self> {
        serde_cbor::from_reader(read).context("error deserializing saved game")
    }

    #[cfg(feature = "bin")]
    pub fn to_bin(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Panic here indicates an internal bug in the data format
        serde_cbor::to_writer(&mut buffer, self)
            .expect("error serializing saved game");
        buffer
    }
}
