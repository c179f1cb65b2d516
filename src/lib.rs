//! Fill a crossword grid from a word list by treating it as a constraint satisfaction problem:
//! prune each slot's candidate words with node and arc consistency, then run a backtracking
//! search ordered by the minimum-remaining-values, degree and least-constraining-value
//! heuristics.

pub mod arc_consistency;
pub mod backtracking_search;
pub mod domains;
pub mod errors;
pub mod grid_config;
pub mod render;
pub mod types;
pub mod word_list;

pub use backtracking_search::{
    find_fill, find_fill_with_options, Assignment, FillFailure, FillOptions, FillSuccess, Solver,
    Statistics, ValueOrdering,
};
pub use errors::{LoadError, RenderError};
pub use grid_config::{load_grid_config, GridConfig, GridEntry};
pub use render::{draw_grid_image, load_font, render_grid, render_image};
pub use types::{Direction, MAX_SLOT_LENGTH};
