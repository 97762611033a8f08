// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::VecDeque;

/// Source of uniformly distributed indices for the shuffle.
pub trait IndexPicker: Send {
    /// Returns an index chosen uniformly from `0..=upper`.
    fn pick(&mut self, upper: usize) -> usize;
}

/// Picks indices from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick(&mut self, upper: usize) -> usize {
        rand::random_range(0..=upper)
    }
}

/// Replays a fixed sequence of indices.
///
/// Each value is clamped to the requested bound. Once the script runs out
/// every pick returns `upper`, which leaves the remaining items in place.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    script: VecDeque<usize>,
}

impl ScriptedPicker {
    /// Creates a picker that replays `script`.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// A picker that never moves anything: the draw equals the ledger order.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }
}

impl IndexPicker for ScriptedPicker {
    fn pick(&mut self, upper: usize) -> usize {
        self.script.pop_front().map_or(upper, |i| i.min(upper))
    }
}

/// Shuffles `items` in place with the Fisher–Yates algorithm.
///
/// For `i` from `len - 1` down to 1, swaps item `i` with an item chosen
/// uniformly from `0..=i`.
pub fn fisher_yates<T>(items: &mut [T], picker: &mut dyn IndexPicker) {
    for i in (1..items.len()).rev() {
        let j: usize = picker.pick(i).min(i);
        items.swap(i, j);
    }
}
