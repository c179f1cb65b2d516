use std::cmp::Reverse;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use instant::{Duration, Instant};
use smallvec::SmallVec;
use thiserror::Error;

use crate::arc_consistency::{
    enforce_arc_consistency, enforce_node_consistency, ArcConsistencyResult,
};
use crate::domains::Domains;
use crate::grid_config::{GridConfig, SlotConfig};
use crate::types::{Arc, Choice, SlotId, WordId, MAX_SLOT_LENGTH};

/// A partial or complete mapping from slots to the words chosen for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    word_ids: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a grid with the given number of slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            word_ids: vec![None; slot_count],
            assigned_count: 0,
        }
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.word_ids.get(slot_id).copied().flatten()
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.get(slot_id).is_some()
    }

    /// Put a word in a slot, returning the word it replaced, if any.
    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) -> Option<WordId> {
        let previous = self.word_ids[slot_id].replace(word_id);
        if previous.is_none() {
            self.assigned_count += 1;
        }
        previous
    }

    /// Clear a slot, returning the word it held, if any.
    pub fn remove(&mut self, slot_id: SlotId) -> Option<WordId> {
        let previous = self.word_ids[slot_id].take();
        if previous.is_some() {
            self.assigned_count -= 1;
        }
        previous
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// Does every slot have a word?
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.word_ids.len()
    }

    /// The assigned slots in ascending slot id order.
    pub fn choices(&self) -> impl Iterator<Item = Choice> + '_ {
        self.word_ids
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word_id)| word_id.map(|word_id| Choice { slot_id, word_id }))
    }

    /// The assigned slots paired with the text of their words.
    pub fn words<'a>(
        &'a self,
        config: &'a GridConfig,
    ) -> impl Iterator<Item = (&'a SlotConfig, &'a str)> + 'a {
        self.choices().map(move |choice| {
            (
                &config.slot_configs[choice.slot_id],
                config.words[choice.word_id].string.as_str(),
            )
        })
    }
}

/// Would putting `word_id` in `slot_id` break any constraint against the other slots in the
/// assignment? Checks the word's length, that no other slot holds the same word, and that every
/// assigned crossing slot agrees on the shared cell.
fn conflicts(
    config: &GridConfig,
    assignment: &Assignment,
    slot_id: SlotId,
    word_id: WordId,
) -> bool {
    let slot_config = &config.slot_configs[slot_id];
    let word = &config.words[word_id];

    if word.len() != slot_config.length {
        return true;
    }

    if assignment
        .choices()
        .any(|other| other.slot_id != slot_id && other.word_id == word_id)
    {
        return true;
    }

    slot_config
        .crossings
        .iter()
        .enumerate()
        .any(|(cell_idx, crossing)| match crossing {
            Some(crossing) => match assignment.get(crossing.other_slot_id) {
                Some(other_word_id) => {
                    word.glyphs.get(cell_idx)
                        != config.words[other_word_id]
                            .glyphs
                            .get(crossing.other_slot_cell)
                }
                None => false,
            },
            None => false,
        })
}

/// Is every word in the assignment the right length, used only once, and in agreement with the
/// words in the slots crossing it?
pub fn is_consistent(config: &GridConfig, assignment: &Assignment) -> bool {
    assignment
        .choices()
        .all(|choice| !conflicts(config, assignment, choice.slot_id, choice.word_id))
}

/// Pick the next slot to fill: the unassigned slot with the fewest remaining words, preferring
/// slots that cross more other slots. Any remaining tie goes to the lowest slot id. Returns `None`
/// once every slot is assigned.
pub fn select_unassigned_variable(
    config: &GridConfig,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<SlotId> {
    (0..config.slot_count())
        .filter(|&slot_id| !assignment.is_assigned(slot_id))
        .min_by_key(|&slot_id| {
            (
                domains.size(slot_id),
                Reverse(config.degree(slot_id)),
                slot_id,
            )
        })
}

/// Number of words in a slot's domain placing each glyph in a given cell.
type GlyphCounts = HashMap<char, usize>;

/// Order the words in a slot's domain so that the ones ruling out the fewest words from unassigned
/// crossing slots come first. Words that tie stay in ascending word id order.
pub fn order_domain_values(
    config: &GridConfig,
    domains: &Domains,
    slot_id: SlotId,
    assignment: &Assignment,
) -> Vec<WordId> {
    // For each unassigned crossing slot: the cell in our slot where it crosses, how many words it
    // has left, and how those words are spread over glyphs at the shared cell.
    let neighbor_glyph_counts: SmallVec<[(usize, usize, GlyphCounts); MAX_SLOT_LENGTH]> = config
        .slot_configs[slot_id]
        .crossings
        .iter()
        .enumerate()
        .filter_map(|(cell_idx, crossing)| {
            let crossing = crossing.as_ref()?;
            if assignment.is_assigned(crossing.other_slot_id) {
                return None;
            }

            let mut glyph_counts = GlyphCounts::new();
            for other_word_id in domains.iter(crossing.other_slot_id) {
                if let Some(&glyph) = config.words[other_word_id]
                    .glyphs
                    .get(crossing.other_slot_cell)
                {
                    *glyph_counts.entry(glyph).or_insert(0) += 1;
                }
            }

            Some((cell_idx, domains.size(crossing.other_slot_id), glyph_counts))
        })
        .collect();

    let mut values: Vec<WordId> = domains.iter(slot_id).collect();

    values.sort_by_cached_key(|&word_id| {
        let word = &config.words[word_id];

        neighbor_glyph_counts
            .iter()
            .map(|(cell_idx, option_count, glyph_counts)| {
                let compatible = word
                    .glyphs
                    .get(*cell_idx)
                    .and_then(|glyph| glyph_counts.get(glyph))
                    .copied()
                    .unwrap_or(0);
                option_count - compatible
            })
            .sum::<usize>()
    });

    values
}

/// How candidate words for a slot are ordered during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrdering {
    /// Least-constraining value first (see `order_domain_values`).
    LeastConstraining,
    /// Ascending word id, i.e. word list order.
    Vocabulary,
}

/// Settings for a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOptions {
    pub value_ordering: ValueOrdering,

    /// Re-establish arc consistency around each tentative choice, rejecting choices that empty a
    /// crossing slot's domain before descending into them.
    pub inference: bool,
}

impl Default for FillOptions {
    fn default() -> FillOptions {
        FillOptions {
            value_ordering: ValueOrdering::LeastConstraining,
            inference: false,
        }
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Slots selected for filling. Zero means propagation settled the grid without any search.
    pub states: u64,
    /// Consistent tentative choices that had to be undone.
    pub backtracks: u64,
    /// Arc consistency runs made during search.
    pub propagations: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// There's no way to fill the grid from the word list. Propagation and search report this the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no fill exists for this grid and word list")]
pub struct FillFailure;

/// Everything the search mutates.
#[derive(Debug)]
struct SearchState {
    assignment: Assignment,
    domains: Domains,
}

impl SearchState {
    fn new(config: &GridConfig) -> SearchState {
        SearchState {
            assignment: Assignment::new(config.slot_count()),
            domains: Domains::new(config),
        }
    }
}

/// A word placed in a slot for the duration of one branch of the search. Unless it's committed,
/// dropping it takes the word back out of the assignment and restores any domains pruned on its
/// behalf, however the branch is left.
struct TentativeChoice<'s> {
    state: &'s mut SearchState,
    slot_id: SlotId,
    saved_domains: Option<Domains>,
    committed: bool,
}

impl<'s> TentativeChoice<'s> {
    fn new(state: &'s mut SearchState, choice: Choice) -> TentativeChoice<'s> {
        state.assignment.insert(choice.slot_id, choice.word_id);

        TentativeChoice {
            state,
            slot_id: choice.slot_id,
            saved_domains: None,
            committed: false,
        }
    }

    /// Narrow the slot's domain to the chosen word and propagate the effects to the rest of the
    /// grid. Returns false if some slot runs out of words.
    fn propagate(&mut self, config: &GridConfig, word_id: WordId) -> bool {
        if self.saved_domains.is_none() {
            self.saved_domains = Some(self.state.domains.clone());
        }

        let slot_id = self.slot_id;
        self.state.domains.restrict_to(slot_id, word_id);

        let arcs: SmallVec<[Arc; MAX_SLOT_LENGTH]> = config
            .neighbors(slot_id)
            .map(|neighbor_id| (neighbor_id, slot_id))
            .collect();

        enforce_arc_consistency(config, &mut self.state.domains, Some(&arcs[..])).is_ok()
    }

    /// Keep the choice in place.
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for TentativeChoice<'_> {
    type Target = SearchState;

    fn deref(&self) -> &SearchState {
        self.state
    }
}

impl DerefMut for TentativeChoice<'_> {
    fn deref_mut(&mut self) -> &mut SearchState {
        self.state
    }
}

impl Drop for TentativeChoice<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        self.state.assignment.remove(self.slot_id);
        if let Some(saved_domains) = self.saved_domains.take() {
            self.state.domains = saved_domains;
        }
    }
}

/// The read-only inputs of a search, plus its running statistics.
struct SearchContext<'a> {
    config: &'a GridConfig,
    options: FillOptions,
    statistics: Statistics,
}

impl SearchContext<'_> {
    fn candidate_words(&self, state: &SearchState, slot_id: SlotId) -> Vec<WordId> {
        match self.options.value_ordering {
            ValueOrdering::LeastConstraining => {
                order_domain_values(self.config, &state.domains, slot_id, &state.assignment)
            }
            ValueOrdering::Vocabulary => state.domains.iter(slot_id).collect(),
        }
    }

    /// Depth-first search for a complete, consistent extension of the current assignment. On
    /// success the assignment holds the fill; on failure the state is left exactly as it was
    /// found.
    fn backtrack(&mut self, state: &mut SearchState) -> bool {
        let slot_id =
            match select_unassigned_variable(self.config, &state.domains, &state.assignment) {
                Some(slot_id) => slot_id,
                None => return true,
            };

        self.statistics.states += 1;
        log::trace!(
            "State {}: filling slot {} ({} of {} assigned, {} options)",
            self.statistics.states,
            self.config.slot_configs[slot_id],
            state.assignment.len(),
            self.config.slot_count(),
            state.domains.size(slot_id)
        );

        for word_id in self.candidate_words(state, slot_id) {
            let mut tentative = TentativeChoice::new(state, Choice { slot_id, word_id });

            if conflicts(self.config, &tentative.assignment, slot_id, word_id) {
                continue;
            }

            if self.options.inference {
                self.statistics.propagations += 1;
                if !tentative.propagate(self.config, word_id) {
                    continue;
                }
            }

            if self.backtrack(&mut tentative) {
                tentative.commit();
                return true;
            }

            self.statistics.backtracks += 1;
            log::trace!(
                "Backtracking {} from slot {}",
                self.config.words[word_id].string,
                self.config.slot_configs[slot_id]
            );
        }

        false
    }
}

/// Drives one grid through node consistency, arc consistency, and backtracking search. The
/// individual phases are exposed so callers can inspect the domains between them.
pub struct Solver<'a> {
    search: SearchContext<'a>,
    state: SearchState,
}

impl<'a> Solver<'a> {
    pub fn new(config: &'a GridConfig, options: FillOptions) -> Solver<'a> {
        Solver {
            search: SearchContext {
                config,
                options,
                statistics: Statistics::default(),
            },
            state: SearchState::new(config),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.state.domains
    }

    pub fn assignment(&self) -> &Assignment {
        &self.state.assignment
    }

    pub fn statistics(&self) -> &Statistics {
        &self.search.statistics
    }

    pub fn enforce_node_consistency(&mut self) {
        enforce_node_consistency(self.search.config, &mut self.state.domains);
    }

    pub fn enforce_arc_consistency(
        &mut self,
        initial_arcs: Option<&[Arc]>,
    ) -> ArcConsistencyResult {
        enforce_arc_consistency(self.search.config, &mut self.state.domains, initial_arcs)
    }

    /// Search for a valid fill, starting over from the full vocabulary.
    pub fn solve(&mut self) -> Result<FillSuccess, FillFailure> {
        let config = self.search.config;
        let start = Instant::now();

        self.state = SearchState::new(config);
        self.search.statistics = Statistics::default();

        log::info!(
            "Filling {} slots from {} words ({:?})",
            config.slot_count(),
            config.word_count(),
            self.search.options
        );

        self.enforce_node_consistency();
        log::debug!(
            "{} options remain after node consistency",
            self.state.domains.total_size()
        );

        if let Err(failure) = self.enforce_arc_consistency(None) {
            self.search.statistics.duration = start.elapsed();
            log::info!(
                "No fill: arc consistency emptied slot {}",
                config.slot_configs[failure.empty_slot_id]
            );
            return Err(FillFailure);
        }
        log::debug!(
            "{} options remain after arc consistency",
            self.state.domains.total_size()
        );

        let found = self.search.backtrack(&mut self.state);
        self.search.statistics.duration = start.elapsed();
        log::info!("Search finished: {:?}", self.search.statistics);

        if found {
            Ok(FillSuccess {
                statistics: self.search.statistics.clone(),
                assignment: self.state.assignment.clone(),
            })
        } else {
            Err(FillFailure)
        }
    }
}

/// Search for a valid fill for the given grid with the default options.
pub fn find_fill(config: &GridConfig) -> Result<FillSuccess, FillFailure> {
    find_fill_with_options(config, FillOptions::default())
}

pub fn find_fill_with_options(
    config: &GridConfig,
    options: FillOptions,
) -> Result<FillSuccess, FillFailure> {
    Solver::new(config, options).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::{load_grid_config, GridEntry};
    use crate::types::Direction::{Across, Down};

    fn load_structure0() -> GridConfig {
        load_grid_config(
            concat!(env!("CARGO_MANIFEST_DIR"), "/data/structure0.txt"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/data/words0.txt"),
        )
        .expect("Failed to load fixture grid")
    }

    /// Two length-3 slots crossing at their middle cells.
    fn crossing_grid(word_list: &[&str]) -> GridConfig {
        GridConfig::from_entries(
            word_list,
            &[
                GridEntry { loc: (1, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 1), len: 3, dir: Down },
            ],
        )
        .unwrap()
    }

    fn word_id(config: &GridConfig, word: &str) -> WordId {
        config.words.iter().position(|w| w.string == word).unwrap()
    }

    fn strings(config: &GridConfig, word_ids: &[WordId]) -> Vec<String> {
        word_ids
            .iter()
            .map(|&word_id| config.words[word_id].string.clone())
            .collect()
    }

    fn fill_strings(config: &GridConfig, assignment: &Assignment) -> Vec<String> {
        assignment
            .words(config)
            .map(|(_, word)| word.to_string())
            .collect()
    }

    fn assert_valid_fill(config: &GridConfig, assignment: &Assignment) {
        assert!(assignment.is_complete());
        assert!(is_consistent(config, assignment));
    }

    #[test]
    fn test_assignment_tracks_assigned_count() {
        let mut assignment = Assignment::new(3);
        assert!(assignment.is_empty());

        assert_eq!(assignment.insert(1, 7), None);
        assert_eq!(assignment.insert(1, 8), Some(7));
        assert_eq!(assignment.insert(2, 9), None);
        assert_eq!(assignment.len(), 2);
        assert!(!assignment.is_complete());

        assert_eq!(assignment.remove(1), Some(8));
        assert_eq!(assignment.remove(1), None);
        assert_eq!(
            assignment.choices().collect::<Vec<_>>(),
            vec![Choice { slot_id: 2, word_id: 9 }]
        );
        assert_eq!(assignment.get(0), None);
        assert_eq!(assignment.get(5), None);
    }

    #[test]
    fn test_consistency_checks() {
        let grid_config = crossing_grid(&["CAT", "TAN", "BIT", "DOGS"]);
        let cat = word_id(&grid_config, "CAT");
        let tan = word_id(&grid_config, "TAN");
        let bit = word_id(&grid_config, "BIT");
        let dogs = word_id(&grid_config, "DOGS");

        let mut assignment = Assignment::new(2);
        assert!(is_consistent(&grid_config, &assignment));

        assignment.insert(0, cat);
        assignment.insert(1, tan);
        assert!(is_consistent(&grid_config, &assignment));

        assignment.insert(1, bit);
        assert!(!is_consistent(&grid_config, &assignment), "crossing mismatch");

        assignment.insert(1, cat);
        assert!(!is_consistent(&grid_config, &assignment), "duplicate word");

        assignment.remove(1);
        assignment.insert(0, dogs);
        assert!(!is_consistent(&grid_config, &assignment), "length mismatch");
    }

    #[test]
    fn test_tentative_choice_is_undone_on_drop() {
        let grid_config = crossing_grid(&["CAT", "TAN"]);
        let mut state = SearchState::new(&grid_config);
        let domains_before = state.domains.clone();

        {
            let mut tentative = TentativeChoice::new(&mut state, Choice { slot_id: 0, word_id: 0 });
            assert!(tentative.assignment.is_assigned(0));
            assert!(tentative.propagate(&grid_config, 0));
            assert_eq!(tentative.domains.size(0), 1);
        }

        assert!(state.assignment.is_empty());
        assert_eq!(state.domains, domains_before);

        TentativeChoice::new(&mut state, Choice { slot_id: 1, word_id: 1 }).commit();
        assert_eq!(state.assignment.get(1), Some(1));
    }

    #[test]
    fn test_select_unassigned_variable_prefers_small_domains_then_degree() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);
        let mut assignment = Assignment::new(grid_config.slot_count());

        // Slots 1, 2 and 3 all have three options; 1 and 3 cross two slots each.
        assert_eq!(
            select_unassigned_variable(&grid_config, &domains, &assignment),
            Some(1)
        );

        assignment.insert(1, word_id(&grid_config, "SEVEN"));
        assert_eq!(
            select_unassigned_variable(&grid_config, &domains, &assignment),
            Some(3)
        );

        for slot_id in [0, 2, 3] {
            assignment.insert(slot_id, slot_id);
        }
        assert_eq!(
            select_unassigned_variable(&grid_config, &domains, &assignment),
            None
        );
    }

    #[test]
    fn test_order_domain_values_puts_least_constraining_first() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);
        let mut assignment = Assignment::new(grid_config.slot_count());

        // ONE rules out every word in slot 1; the others each rule out two.
        let ordered = order_domain_values(&grid_config, &domains, 0, &assignment);
        assert_eq!(strings(&grid_config, &ordered), vec!["TWO", "SIX", "TEN", "ONE"]);

        // Assigned neighbors don't count.
        assignment.insert(1, word_id(&grid_config, "THREE"));
        let ordered = order_domain_values(&grid_config, &domains, 0, &assignment);
        assert_eq!(strings(&grid_config, &ordered), vec!["ONE", "TWO", "SIX", "TEN"]);
    }

    #[test]
    fn test_find_fill_for_structure0() {
        let grid_config = load_structure0();

        let result = find_fill(&grid_config).expect("Failed to find a fill");

        assert_valid_fill(&grid_config, &result.assignment);
        assert_eq!(
            fill_strings(&grid_config, &result.assignment),
            vec!["SIX", "SEVEN", "FIVE", "NINE"]
        );
    }

    #[test]
    fn test_crossing_words_agree() {
        let grid_config = crossing_grid(&["CAT", "DOG", "BAT", "TAN", "TEN", "BIT"]);

        let result = find_fill(&grid_config).expect("Failed to find a fill");

        assert_valid_fill(&grid_config, &result.assignment);
        let words = fill_strings(&grid_config, &result.assignment);
        assert_eq!(words[0].as_bytes()[1], words[1].as_bytes()[1]);
        assert_ne!(words[0], words[1]);
        assert_eq!(words, vec!["CAT", "BAT"]);
    }

    #[test]
    fn test_single_slot_takes_any_matching_word() {
        let grid_config = GridConfig::from_template(&["DOGS", "CAT"], "___").unwrap();

        let result = find_fill(&grid_config).expect("Failed to find a fill");

        assert_eq!(fill_strings(&grid_config, &result.assignment), vec!["CAT"]);
    }

    #[test]
    fn test_grid_without_slots_is_trivially_filled() {
        let grid_config = GridConfig::from_template(&["CAT"], "_#_").unwrap();

        let result = find_fill(&grid_config).expect("Failed to find a fill");

        assert!(result.assignment.is_empty());
        assert_eq!(result.statistics.states, 0);
    }

    #[test]
    fn test_slot_without_matching_length_fails() {
        let grid_config = GridConfig::from_template(&["CAT", "DOG"], "____").unwrap();

        assert_eq!(find_fill(&grid_config).unwrap_err(), FillFailure);
        assert_eq!(find_fill(&grid_config).unwrap_err(), FillFailure);
    }

    #[test]
    fn test_arc_consistency_failure_skips_search() {
        let grid_config = GridConfig::from_entries(
            &["CAT", "DOOR"],
            &[
                GridEntry { loc: (1, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 1), len: 4, dir: Down },
            ],
        )
        .unwrap();
        let mut solver = Solver::new(&grid_config, FillOptions::default());

        assert_eq!(solver.solve().unwrap_err(), FillFailure);
        assert_eq!(solver.statistics().states, 0);
    }

    #[test]
    fn test_duplicate_words_are_rejected() {
        // Arc consistency is happy with ABC crossing itself, but a word can only be used once.
        let grid_config = crossing_grid(&["ABC"]);
        let mut solver = Solver::new(&grid_config, FillOptions::default());

        assert_eq!(solver.solve().unwrap_err(), FillFailure);
        assert!(solver.statistics().states > 0);
        assert!(solver.assignment().is_empty());

        let grid_config = crossing_grid(&["ABC", "XBZ"]);
        let result = find_fill(&grid_config).expect("Failed to find a fill");
        assert_eq!(fill_strings(&grid_config, &result.assignment), vec!["ABC", "XBZ"]);
    }

    #[test]
    fn test_solving_twice_gives_valid_fills() {
        let grid_config = crossing_grid(&["CAT", "DOG", "BAT", "TAN", "TEN", "BIT"]);
        let mut solver = Solver::new(&grid_config, FillOptions::default());

        let first = solver.solve().expect("Failed to find a fill");
        let second = solver.solve().expect("Failed to find a fill");

        assert_valid_fill(&grid_config, &first.assignment);
        assert_valid_fill(&grid_config, &second.assignment);
        assert_eq!(first.statistics.states, second.statistics.states);
    }

    #[test]
    fn test_vocabulary_ordering_still_finds_fills() {
        let options = FillOptions {
            value_ordering: ValueOrdering::Vocabulary,
            ..FillOptions::default()
        };

        let grid_config = load_structure0();
        let result = find_fill_with_options(&grid_config, options).expect("Failed to find a fill");
        assert_eq!(
            fill_strings(&grid_config, &result.assignment),
            vec!["SIX", "SEVEN", "FIVE", "NINE"]
        );

        let grid_config = crossing_grid(&["DOG", "TEN", "BIT", "CAT", "BAT", "TAN"]);
        let result = find_fill_with_options(&grid_config, options).expect("Failed to find a fill");
        assert_valid_fill(&grid_config, &result.assignment);
    }

    #[test]
    fn test_inference_finds_same_fill() {
        let options = FillOptions {
            inference: true,
            ..FillOptions::default()
        };
        let grid_config = load_structure0();

        let result = find_fill_with_options(&grid_config, options).expect("Failed to find a fill");

        assert_valid_fill(&grid_config, &result.assignment);
        assert_eq!(
            fill_strings(&grid_config, &result.assignment),
            vec!["SIX", "SEVEN", "FIVE", "NINE"]
        );
        assert!(result.statistics.propagations > 0);
    }

    #[test]
    fn test_inference_restores_domains_after_failure() {
        let options = FillOptions {
            inference: true,
            ..FillOptions::default()
        };
        let grid_config = crossing_grid(&["ABC"]);
        let mut solver = Solver::new(&grid_config, options);

        assert_eq!(solver.solve().unwrap_err(), FillFailure);

        let mut expected_domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut expected_domains);
        enforce_arc_consistency(&grid_config, &mut expected_domains, None).unwrap();

        assert_eq!(solver.domains(), &expected_domains);
        assert!(solver.assignment().is_empty());
    }

    #[test]
    fn test_solver_phases_can_be_run_separately() {
        let grid_config = load_structure0();
        let mut solver = Solver::new(&grid_config, FillOptions::default());

        assert_eq!(solver.domains().size(0), 10);
        solver.enforce_node_consistency();
        assert_eq!(solver.domains().size(0), 4);
        assert!(solver.enforce_arc_consistency(None).is_ok());
        assert_eq!(solver.domains().size(0), 1);
    }
}
