//! Expansion policy: decides which outgoing edges of a just-expanded
//! vertex are pushed onto the frontier.

use rand::seq::SliceRandom;
use rand::Rng;

use vcrawl_models::{Vertex, WorkItem};

/// Given a just-expanded vertex and a configured `random_walk_prob`,
/// decides which of its `related_ids` to enqueue as child [`WorkItem`]s.
///
/// RNG is injected rather than drawn from `rand::thread_rng()` so tests
/// can seed it and assert exact behavior.
pub struct Scheduler {
    random_walk_prob: f64,
    max_depth: u32,
}

impl Scheduler {
    pub fn new(random_walk_prob: f64, max_depth: u32) -> Self {
        Self {
            random_walk_prob,
            max_depth,
        }
    }

    /// Returns the child work items to push for `vertex`, already filtered
    /// for the `max_depth` drop rule.
    pub fn select_edges<R: Rng + ?Sized>(&self, vertex: &Vertex, rng: &mut R) -> Vec<WorkItem> {
        let child_depth = vertex.depth + 1;
        if child_depth > self.max_depth {
            return Vec::new();
        }

        let chosen_ids = self.choose_ids(&vertex.related_ids, rng);
        chosen_ids
            .into_iter()
            .map(|id| WorkItem::child(id, child_depth, vertex.id.clone()))
            .collect()
    }

    fn choose_ids<R: Rng + ?Sized>(&self, related_ids: &[String], rng: &mut R) -> Vec<String> {
        let n = related_ids.len();
        if n == 0 {
            return Vec::new();
        }

        let x: f64 = rng.gen_range(0.0..1.0);
        if x < self.random_walk_prob {
            let max_k = n.min(3);
            let k = rng.gen_range(1..=max_k);
            let mut pool: Vec<&String> = related_ids.iter().collect();
            pool.shuffle(rng);
            pool.into_iter().take(k).cloned().collect()
        } else {
            related_ids.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn vertex_with_edges(n: usize, depth: u32) -> Vertex {
        let related = (0..n).map(|i| format!("id-{i}")).collect();
        Vertex::new("root", related).with_position(depth, None)
    }

    #[test]
    fn random_walk_branch_selects_one_to_three_ids() {
        let scheduler = Scheduler::new(1.0, 50);
        let mut rng = SmallRng::seed_from_u64(42);
        let vertex = vertex_with_edges(10, 0);

        for _ in 0..100 {
            let items = scheduler.select_edges(&vertex, &mut rng);
            assert!(items.len() >= 1 && items.len() <= 3);
        }
    }

    #[test]
    fn breadth_branch_selects_all_ids() {
        let scheduler = Scheduler::new(0.0, 50);
        let mut rng = SmallRng::seed_from_u64(7);
        let vertex = vertex_with_edges(5, 0);

        let items = scheduler.select_edges(&vertex, &mut rng);
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn fewer_than_three_related_ids_caps_k_at_n() {
        let scheduler = Scheduler::new(1.0, 50);
        let mut rng = SmallRng::seed_from_u64(1);
        let vertex = vertex_with_edges(2, 0);

        for _ in 0..50 {
            let items = scheduler.select_edges(&vertex, &mut rng);
            assert!(items.len() <= 2);
        }
    }

    #[test]
    fn no_related_ids_yields_no_items() {
        let scheduler = Scheduler::new(1.0, 50);
        let mut rng = SmallRng::seed_from_u64(1);
        let vertex = vertex_with_edges(0, 0);
        assert!(scheduler.select_edges(&vertex, &mut rng).is_empty());
    }

    #[test]
    fn child_items_carry_incremented_depth_and_parent() {
        let scheduler = Scheduler::new(0.0, 50);
        let mut rng = SmallRng::seed_from_u64(1);
        let vertex = vertex_with_edges(3, 4);

        let items = scheduler.select_edges(&vertex, &mut rng);
        for item in &items {
            assert_eq!(item.depth, 5);
            assert_eq!(item.parent_id.as_deref(), Some("root"));
        }
    }

    #[test]
    fn items_exceeding_max_depth_are_dropped() {
        let scheduler = Scheduler::new(0.0, 5);
        let mut rng = SmallRng::seed_from_u64(1);
        let vertex = vertex_with_edges(3, 5);
        assert!(scheduler.select_edges(&vertex, &mut rng).is_empty());
    }

    #[test]
    fn selection_never_duplicates_an_id() {
        let scheduler = Scheduler::new(1.0, 50);
        let mut rng = SmallRng::seed_from_u64(99);
        let vertex = vertex_with_edges(10, 0);

        for _ in 0..50 {
            let items = scheduler.select_edges(&vertex, &mut rng);
            let ids: std::collections::HashSet<_> = items.iter().map(|i| &i.id).collect();
            assert_eq!(ids.len(), items.len());
        }
    }
}
