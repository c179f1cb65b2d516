use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Display, Formatter};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::errors::LoadError;
use crate::types::{Arc, Direction, GridCoord, SlotId, MAX_SLOT_LENGTH};
use crate::word_list::load_word_list;

/// A struct representing a word that can be chosen for a given slot.
#[derive(Debug, Clone)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: &str) -> Word {
        Word {
            string: string.to_string(),
            glyphs: string.chars().collect(),
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// A struct representing a crossing between one slot and another, referencing the other slot's id
/// and the location of the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// The pair of cell indexes `(index in first slot, index in second slot)` at which two crossing
/// slots must hold the same character.
pub type Overlap = (usize, usize);

/// A struct representing the static aspects of a slot in the grid.
///
/// Two slots are the same slot if they start in the same cell, face the same direction and have
/// the same length; the `id` is only a position in the owning `GridConfig`.
pub struct SlotConfig {
    pub id: SlotId,
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,

    /// One entry per cell of the slot, recording the slot crossing that cell, if any.
    pub crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>,
}

impl SlotConfig {
    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |cell_idx| cell_coord(self.start_cell, self.direction, cell_idx))
    }

    /// The ids of the slots crossing this one. Each id appears once.
    pub fn neighbors(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.crossings
            .iter()
            .flatten()
            .map(|crossing| crossing.other_slot_id)
    }

    /// Number of distinct slots crossing this one.
    pub fn degree(&self) -> usize {
        self.crossings.iter().flatten().count()
    }
}

impl PartialEq for SlotConfig {
    fn eq(&self, other: &Self) -> bool {
        self.start_cell == other.start_cell
            && self.direction == other.direction
            && self.length == other.length
    }
}

impl Eq for SlotConfig {}

impl Hash for SlotConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start_cell.hash(state);
        self.direction.hash(state);
        self.length.hash(state);
    }
}

impl Debug for SlotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotConfig")
            .field("id", &self.id)
            .field("start_cell", &self.start_cell)
            .field("direction", &self.direction)
            .field("length", &self.length)
            .field("crossings", &self.crossings)
            .finish()
    }
}

impl Display for SlotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {} : {}",
            self.start_cell.0, self.start_cell.1, self.direction, self.length
        )
    }
}

fn cell_coord(start_cell: GridCoord, direction: Direction, cell_idx: usize) -> GridCoord {
    match direction {
        Direction::Across => (start_cell.0, start_cell.1 + cell_idx),
        Direction::Down => (start_cell.0 + cell_idx, start_cell.1),
    }
}

/// An across or down entry in the input to `GridConfig::from_entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEntry {
    pub loc: GridCoord,
    pub len: usize,
    pub dir: Direction,
}

impl GridEntry {
    /// Generate the coords for each cell of this entry.
    fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.len).map(move |cell_idx| cell_coord(self.loc, self.dir, cell_idx))
    }
}

/// A struct representing the aspects of a grid that are static during filling: the slots, how
/// they cross, and the vocabulary.
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub slot_configs: Vec<SlotConfig>,
    pub words: Vec<Word>,

    /// Row-major set of the cells that can hold a letter.
    open_cells: BitSet,
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slot_configs", &self.slot_configs)
            .field("words", &format!("({} entries)", self.words.len()))
            .finish()
    }
}

impl GridConfig {
    /// Generate a GridConfig representing a grid with the specified entries. The grid's open cells
    /// are exactly the cells covered by the entries. Repeated words in `word_list` keep only their
    /// first occurrence, as `parse_word_list` does for files.
    pub fn from_entries<S: AsRef<str>>(
        word_list: &[S],
        entries: &[GridEntry],
    ) -> Result<GridConfig, LoadError> {
        let mut open_cells: Vec<GridCoord> = vec![];
        for entry in entries {
            open_cells.extend(entry.cell_coords());
        }

        let height = open_cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
        let width = open_cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);

        GridConfig::build(word_list, entries, width, height, open_cells)
    }

    /// Generate a GridConfig from a string template, with `_` representing open cells and
    /// anything else (whitespace included) representing blocks. Rows shorter than the widest one
    /// are padded with blocks. Every maximal run of two or more open cells, across or down,
    /// becomes a slot; slots are numbered in row-major order of their first cell, across before
    /// down. `word_list` is de-duplicated as in `from_entries`.
    pub fn from_template<S: AsRef<str>>(
        word_list: &[S],
        template: &str,
    ) -> Result<GridConfig, LoadError> {
        // Every line is a row, blank ones included; `lines` drops the `\r` of CRLF endings.
        let template: Vec<Vec<bool>> = template
            .lines()
            .map(|line| line.chars().map(|c| c == '_').collect())
            .collect();

        let height = template.len();
        let width = template.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(LoadError::EmptyTemplate);
        }

        let is_open = |(row, col): GridCoord| {
            template
                .get(row)
                .and_then(|line| line.get(col))
                .cloned()
                .unwrap_or(false)
        };

        let mut entries: Vec<GridEntry> = vec![];
        let mut open_cells: Vec<GridCoord> = vec![];

        for row in 0..height {
            for col in 0..width {
                if !is_open((row, col)) {
                    continue;
                }
                open_cells.push((row, col));

                for dir in [Direction::Across, Direction::Down] {
                    let starts_here = match dir {
                        Direction::Across => col == 0 || !is_open((row, col - 1)),
                        Direction::Down => row == 0 || !is_open((row - 1, col)),
                    };
                    if !starts_here {
                        continue;
                    }

                    let len = (0..)
                        .take_while(|&cell_idx| is_open(cell_coord((row, col), dir, cell_idx)))
                        .count();
                    if len > 1 {
                        entries.push(GridEntry { loc: (row, col), len, dir });
                    }
                }
            }
        }

        GridConfig::build(word_list, &entries, width, height, open_cells)
    }

    fn build<S: AsRef<str>>(
        word_list: &[S],
        entries: &[GridEntry],
        width: usize,
        height: usize,
        open_cells: Vec<GridCoord>,
    ) -> Result<GridConfig, LoadError> {
        // Slices passed straight to the constructors never went through `parse_word_list`.
        let mut seen_words: HashSet<&str> = HashSet::new();
        let words: Vec<Word> = word_list
            .iter()
            .map(|word| -> &str { word.as_ref() })
            .filter(|&word| seen_words.insert(word))
            .map(Word::new)
            .collect();

        let mut seen_entries: HashSet<(GridCoord, Direction, usize)> = HashSet::new();
        for entry in entries {
            if entry.len == 0 {
                return Err(LoadError::ZeroLengthEntry { loc: entry.loc, dir: entry.dir });
            }
            if !seen_entries.insert((entry.loc, entry.dir, entry.len)) {
                return Err(LoadError::DuplicateEntry {
                    loc: entry.loc,
                    dir: entry.dir,
                    len: entry.len,
                });
            }
        }

        // Build a map from cell location to entries involved, which we can then use to calculate
        // crossings. Each cell holds (entry index, cell index within entry).
        let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(usize, usize); 2]>> = HashMap::new();

        for (entry_idx, entry) in entries.iter().enumerate() {
            for (cell_idx, loc) in entry.cell_coords().enumerate() {
                let cell_entries = entries_by_loc.entry(loc).or_default();
                if cell_entries.len() == 2 {
                    return Err(LoadError::OvercrowdedCell(loc));
                }
                cell_entries.push((entry_idx, cell_idx));
            }
        }

        // Now we can build the actual slots.
        let mut slot_configs: Vec<SlotConfig> = Vec::with_capacity(entries.len());

        for (entry_idx, entry) in entries.iter().enumerate() {
            let crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]> = entry
                .cell_coords()
                .map(|loc| {
                    entries_by_loc[&loc]
                        .iter()
                        .find(|&&(other_entry_idx, _)| other_entry_idx != entry_idx)
                        .map(|&(other_slot_id, other_slot_cell)| Crossing {
                            other_slot_id,
                            other_slot_cell,
                        })
                })
                .collect();

            let mut crossed_slot_ids: HashSet<SlotId> = HashSet::new();
            for crossing in crossings.iter().flatten() {
                if !crossed_slot_ids.insert(crossing.other_slot_id) {
                    return Err(LoadError::RepeatedCrossing {
                        first: entry.loc,
                        second: entries[crossing.other_slot_id].loc,
                    });
                }
            }

            slot_configs.push(SlotConfig {
                id: entry_idx,
                start_cell: entry.loc,
                direction: entry.dir,
                length: entry.len,
                crossings,
            });
        }

        let mut open_cell_set = BitSet::with_capacity(width * height);
        for (row, col) in open_cells {
            open_cell_set.insert(row * width + col);
        }

        log::debug!(
            "Built {}x{} grid with {} slots and {} words",
            width,
            height,
            slot_configs.len(),
            words.len()
        );

        Ok(GridConfig {
            width,
            height,
            slot_configs,
            words,
            open_cells: open_cell_set,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slot_configs.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Can the given cell hold a letter?
    pub fn is_open(&self, (row, col): GridCoord) -> bool {
        row < self.height && col < self.width && self.open_cells.contains(row * self.width + col)
    }

    /// The cell indexes at which slots `x` and `y` cross, as `(index in x, index in y)`, or `None`
    /// if they don't share a cell.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<Overlap> {
        self.slot_configs[x]
            .crossings
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing)| match crossing {
                Some(crossing) if crossing.other_slot_id == y => {
                    Some((cell_idx, crossing.other_slot_cell))
                }
                _ => None,
            })
    }

    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.slot_configs[slot_id].neighbors()
    }

    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.slot_configs[slot_id].degree()
    }

    /// Every ordered pair of crossing slots in the grid.
    pub fn arcs(&self) -> Vec<Arc> {
        self.slot_configs
            .iter()
            .flat_map(|slot_config| {
                slot_config
                    .neighbors()
                    .map(move |neighbor_id| (slot_config.id, neighbor_id))
            })
            .collect()
    }
}

/// Read a grid template file and a word list file and combine them into a GridConfig.
pub fn load_grid_config<P: AsRef<Path>, Q: AsRef<Path>>(
    structure_path: P,
    words_path: Q,
) -> Result<GridConfig, LoadError> {
    let structure_path = structure_path.as_ref();
    let template = fs::read_to_string(structure_path).map_err(|source| LoadError::Io {
        path: structure_path.to_path_buf(),
        source,
    })?;
    let words = load_word_list(words_path)?;

    GridConfig::from_template(&words, &template)
}
