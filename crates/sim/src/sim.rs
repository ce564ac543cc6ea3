//! Stepwise insertion-sort simulation.

/// True iff the slice is sorted ascending (`values[k] >= values[k-1]` for
/// all `k >= 1`).
pub fn is_sorted(values: &[i64]) -> bool {
    values.windows(2).all(|pair| pair[1] >= pair[0])
}

/// One insertion sort, advanced an elementary step at a time.
///
/// Each [`step`](Self::step) performs either a single comparison-and-swap of
/// the inner loop or a single advance of the outer cursor, so a learner can
/// watch the algorithm one atomic move per click.
///
/// Invariant: `0 <= j <= i <= array.len()`, and `done` implies
/// `i >= array.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSim {
    array: Vec<i64>,
    i: usize,
    j: usize,
    sorting: bool,
    done: bool,
}

impl SortSim {
    /// Starts a simulation over the given working copy. The cursors start
    /// at `i = j = 1`; arrays of fewer than two elements are already done.
    pub fn new(array: Vec<i64>) -> Self {
        let done = array.len() <= 1;
        Self {
            array,
            i: 1,
            j: 1,
            sorting: !done,
            done,
        }
    }

    /// Performs one elementary step.
    ///
    /// If `j > 0` and `array[j] < array[j-1]`, those two positions are
    /// swapped and `j` decrements; otherwise the outer cursor advances and
    /// `j` resets to it. `done` becomes true exactly when `i` reaches the
    /// end of the array. Once done, further calls are no-ops by contract.
    pub fn step(&mut self) {
        if self.done {
            return;
        }
        if self.j > 0 && self.array[self.j] < self.array[self.j - 1] {
            self.array.swap(self.j, self.j - 1);
            self.j -= 1;
        } else {
            self.i += 1;
            self.j = self.i;
        }
        self.done = self.i >= self.array.len();
        self.sorting = !self.done;
    }

    /// Runs steps until the pass completes. Bounded by construction: each
    /// step either decrements `j` or advances `i`.
    pub fn run_to_completion(&mut self) {
        while !self.done {
            self.step();
        }
    }

    pub fn array(&self) -> &[i64] {
        &self.array
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    pub fn sorting(&self) -> bool {
        self.sorting
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Consumes the simulation, returning the working array.
    pub fn into_array(self) -> Vec<i64> {
        self.array
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trace_3_1_2_ends_sorted() {
        let mut sim = SortSim::new(vec![3, 1, 2]);
        assert_eq!((sim.i(), sim.j()), (1, 1));
        assert!(sim.sorting() && !sim.done());

        // array[1]=1 < array[0]=3: swap, j goes to 0.
        sim.step();
        assert_eq!(sim.array(), &[1, 3, 2]);
        assert_eq!((sim.i(), sim.j()), (1, 0));

        // j == 0: advance outer cursor.
        sim.step();
        assert_eq!(sim.array(), &[1, 3, 2]);
        assert_eq!((sim.i(), sim.j()), (2, 2));

        // array[2]=2 < array[1]=3: swap.
        sim.step();
        assert_eq!(sim.array(), &[1, 2, 3]);
        assert_eq!((sim.i(), sim.j()), (2, 1));

        // 2 >= 1: advance; i reaches the end.
        sim.step();
        assert!(sim.done());
        assert!(!sim.sorting());
        assert!(is_sorted(sim.array()));
    }

    #[test]
    fn short_arrays_are_done_immediately() {
        assert!(SortSim::new(vec![]).done());
        assert!(SortSim::new(vec![42]).done());
        let mut sim = SortSim::new(vec![7]);
        sim.step();
        assert_eq!(sim.array(), &[7]);
    }

    #[test]
    fn step_after_done_is_a_no_op() {
        let mut sim = SortSim::new(vec![2, 1]);
        sim.run_to_completion();
        let settled = sim.clone();
        sim.step();
        sim.step();
        assert_eq!(sim, settled);
    }

    #[test]
    fn is_sorted_accepts_duplicates() {
        assert!(is_sorted(&[1, 1, 2, 2]));
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[5]));
        assert!(!is_sorted(&[2, 1]));
    }

    proptest! {
        #[test]
        fn stepping_to_done_sorts_any_array(values in prop::collection::vec(-1000i64..1000, 0..48)) {
            let mut sim = SortSim::new(values.clone());
            sim.run_to_completion();
            prop_assert!(is_sorted(sim.array()));
            // Same multiset as the input.
            let mut expected = values;
            expected.sort_unstable();
            let mut actual = sim.into_array();
            actual.sort_unstable();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn done_state_is_a_fixed_point(values in prop::collection::vec(-100i64..100, 0..24)) {
            let mut sim = SortSim::new(values);
            sim.run_to_completion();
            let settled = sim.clone();
            sim.step();
            prop_assert_eq!(sim, settled);
        }

        #[test]
        fn cursor_invariant_holds_at_every_step(values in prop::collection::vec(-100i64..100, 2..24)) {
            let mut sim = SortSim::new(values);
            while !sim.done() {
                prop_assert!(sim.j() <= sim.i());
                prop_assert!(sim.i() <= sim.array().len());
                sim.step();
            }
            prop_assert!(sim.i() >= sim.array().len());
        }
    }
}
