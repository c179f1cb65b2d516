use std::collections::{HashSet, VecDeque};

use crate::domains::Domains;
use crate::grid_config::GridConfig;
use crate::types::{Arc, SlotId, WordId};

/// Remove every word whose length doesn't match its slot's length. This is the only unary
/// constraint in the grid, so it only needs to happen once, before any propagation. An emptied
/// domain isn't reported here; propagation or search will run into it later.
pub fn enforce_node_consistency(config: &GridConfig, domains: &mut Domains) {
    for slot_config in &config.slot_configs {
        let mismatched: Vec<WordId> = domains
            .iter(slot_config.id)
            .filter(|&word_id| config.words[word_id].len() != slot_config.length)
            .collect();

        for word_id in mismatched {
            domains.remove(slot_config.id, word_id);
        }
    }
}

/// Make slot `x` arc-consistent with slot `y`: remove every word from `x`'s domain that has no
/// word in `y`'s domain agreeing with it at their shared cell. Returns whether anything was
/// removed. Slots that don't cross are trivially consistent.
pub fn revise(config: &GridConfig, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    let (x_cell, y_cell) = match config.overlap(x, y) {
        Some(overlap) => overlap,
        None => return false,
    };

    // Rather than comparing every pair of words, collect the glyphs `y` can still place in the
    // shared cell.
    let supported_glyphs: HashSet<char> = domains
        .iter(y)
        .filter_map(|word_id| config.words[word_id].glyphs.get(y_cell).copied())
        .collect();

    let unsupported: Vec<WordId> = domains
        .iter(x)
        .filter(|&word_id| {
            config.words[word_id]
                .glyphs
                .get(x_cell)
                .map(|glyph| !supported_glyphs.contains(glyph))
                .unwrap_or(true)
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(x, word_id);
    }

    !unsupported.is_empty()
}

/// Worklist of arcs waiting to be revised. An arc that is already waiting isn't enqueued twice.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<Arc>,
    queued: HashSet<Arc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
    where
        Items: IntoIterator<Item = Arc>,
    {
        let mut queue = ConsistencyQueue {
            queue: VecDeque::new(),
            queued: HashSet::new(),
        };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Results from a call to `enforce_arc_consistency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many arcs were revised.
    pub revisions: usize,
    /// How many calls to `revise` actually removed something.
    pub effective_revisions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The slot whose domain ran out of words.
    pub empty_slot_id: SlotId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Prune domains until every remaining word in every slot has a supporting word in each crossing
/// slot. Starts from `initial_arcs`, or from every arc in the grid if that's `None`.
///
/// Whenever revising `(x, y)` shrinks `x`'s domain, each other neighbor `z` of `x` may have lost
/// its support in `x`, so `(z, x)` goes back on the queue. We give up as soon as any domain is
/// emptied, since that proves there's no fill.
pub fn enforce_arc_consistency(
    config: &GridConfig,
    domains: &mut Domains,
    initial_arcs: Option<&[Arc]>,
) -> ArcConsistencyResult {
    let mut queue = match initial_arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(arcs.iter().copied()),
        None => ConsistencyQueue::with_initial_queue(config.arcs()),
    };

    let mut result = ArcConsistencySuccess {
        revisions: 0,
        effective_revisions: 0,
    };

    while let Some((x, y)) = queue.pop_front() {
        result.revisions += 1;

        if !revise(config, domains, x, y) {
            continue;
        }
        result.effective_revisions += 1;

        if domains.is_empty(x) {
            log::debug!(
                "Arc consistency emptied slot {} while revising against slot {}",
                config.slot_configs[x],
                config.slot_configs[y]
            );
            return Err(ArcConsistencyFailure { empty_slot_id: x });
        }

        for neighbor_id in config.neighbors(x) {
            if neighbor_id != y {
                queue.enqueue((neighbor_id, x));
            }
        }
    }

    Ok(result)
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

    fn domain_strings(config: &GridConfig, domains: &Domains, slot_id: SlotId) -> Vec<String> {
        domains
            .iter(slot_id)
            .map(|word_id| config.words[word_id].string.clone())
            .collect()
    }

    /// Every word left in `x` has a partner in `y` for every crossing pair.
    fn assert_arc_consistent(config: &GridConfig, domains: &Domains) {
        for (x, y) in config.arcs() {
            let (x_cell, y_cell) = config.overlap(x, y).unwrap();
            for word_id in domains.iter(x) {
                let glyph = config.words[word_id].glyphs[x_cell];
                assert!(
                    domains
                        .iter(y)
                        .any(|other_id| config.words[other_id].glyphs[y_cell] == glyph),
                    "{} has no support in slot {} for slot {}",
                    config.words[word_id].string,
                    config.slot_configs[y],
                    config.slot_configs[x],
                );
            }
        }
    }

    #[test]
    fn test_node_consistency_leaves_only_matching_lengths() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);

        enforce_node_consistency(&grid_config, &mut domains);

        for slot_config in &grid_config.slot_configs {
            assert!(domains
                .iter(slot_config.id)
                .all(|word_id| grid_config.words[word_id].len() == slot_config.length));
        }
        assert_eq!(
            domain_strings(&grid_config, &domains, 0),
            vec!["ONE", "TWO", "SIX", "TEN"]
        );
        assert_eq!(
            domain_strings(&grid_config, &domains, 1),
            vec!["THREE", "SEVEN", "EIGHT"]
        );
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);

        // Nothing in slot 1 starts with O.
        assert!(revise(&grid_config, &mut domains, 0, 1));
        assert_eq!(
            domain_strings(&grid_config, &domains, 0),
            vec!["TWO", "SIX", "TEN"]
        );
        assert!(!revise(&grid_config, &mut domains, 0, 1));

        // Slots 0 and 2 don't cross.
        assert!(!revise(&grid_config, &mut domains, 0, 2));
    }

    #[test]
    fn test_arc_consistency_reaches_fixed_point() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);

        let result = enforce_arc_consistency(&grid_config, &mut domains, None);

        assert!(result.is_ok());
        assert_arc_consistent(&grid_config, &domains);
        assert_eq!(domain_strings(&grid_config, &domains, 0), vec!["SIX"]);
        assert_eq!(domain_strings(&grid_config, &domains, 1), vec!["SEVEN"]);
        assert_eq!(
            domain_strings(&grid_config, &domains, 2),
            vec!["FIVE", "NINE"]
        );
        assert_eq!(domain_strings(&grid_config, &domains, 3), vec!["NINE"]);
    }

    #[test]
    fn test_arc_consistency_with_restricted_arcs() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);

        let result = enforce_arc_consistency(&grid_config, &mut domains, Some(&[(0, 1)]));

        // Revising (0, 1) only shrinks slot 0, and slot 0 has no other neighbors to requeue.
        assert_eq!(
            result,
            Ok(ArcConsistencySuccess { revisions: 1, effective_revisions: 1 })
        );
        assert_eq!(domains.size(0), 3);
        assert_eq!(domains.size(1), 3);
    }

    #[test]
    fn test_arc_consistency_with_no_arcs_does_nothing() {
        let grid_config = load_structure0();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);
        let before = domains.clone();

        let result = enforce_arc_consistency(&grid_config, &mut domains, Some(&[]));

        assert_eq!(result.map(|success| success.revisions), Ok(0));
        assert_eq!(domains, before);
    }

    #[test]
    fn test_arc_consistency_fails_on_empty_domain() {
        let grid_config = GridConfig::from_entries(
            &["CAT", "DOOR"],
            &[
                GridEntry { loc: (1, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 1), len: 4, dir: Down },
            ],
        )
        .unwrap();
        let mut domains = Domains::new(&grid_config);
        enforce_node_consistency(&grid_config, &mut domains);

        let result = enforce_arc_consistency(&grid_config, &mut domains, None);

        assert_eq!(result, Err(ArcConsistencyFailure { empty_slot_id: 0 }));
    }

    #[test]
    fn test_node_consistency_can_empty_a_domain() {
        let grid_config = GridConfig::from_template(&["CAT", "DOG"], "____").unwrap();
        let mut domains = Domains::new(&grid_config);

        enforce_node_consistency(&grid_config, &mut domains);

        assert!(domains.is_empty(0));
    }
}
