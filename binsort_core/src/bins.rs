//! Per-category fill tracking: monotonic counters and one-shot full latches.

use crate::classifier::Category;
use crate::config::BinCfg;

/// Result of recording one accepted detection against a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillTransition {
    /// Counter incremented (or ignored because the bin was already full).
    None,
    /// This increment made the counter reach its max; the full latch was
    /// set by this call and must be reported exactly once.
    JustFilled,
}

/// Owned fill state for both bins.
///
/// Counters never decrease and saturate at their configured max; a latched
/// full flag is never cleared by this component. Resetting the latches is an
/// external maintenance action outside this process.
#[derive(Debug, Clone)]
pub struct BinState {
    wet_count: u32,
    dry_count: u32,
    wet_full: bool,
    dry_full: bool,
    max_wet: u32,
    max_dry: u32,
}

/// Point-in-time copy of the fill state for reporting.
#[derive(Debug, Clone, Copy)]
pub struct BinSnapshot {
    pub wet_count: u32,
    pub dry_count: u32,
    pub wet_full: bool,
    pub dry_full: bool,
}

impl BinState {
    pub fn new(cfg: &BinCfg) -> Self {
        Self {
            wet_count: 0,
            dry_count: 0,
            wet_full: false,
            dry_full: false,
            max_wet: cfg.max_wet_count,
            max_dry: cfg.max_dry_count,
        }
    }

    pub fn count(&self, category: Category) -> u32 {
        match category {
            Category::Wet => self.wet_count,
            Category::Dry => self.dry_count,
        }
    }

    pub fn is_full(&self, category: Category) -> bool {
        match category {
            Category::Wet => self.wet_full,
            Category::Dry => self.dry_full,
        }
    }

    pub fn both_full(&self) -> bool {
        self.wet_full && self.dry_full
    }

    /// Record one accepted detection.
    ///
    /// Increments the counter unless the bin is already full, then checks
    /// the limit, so the count can equal the max exactly at the moment the
    /// latch flips. Returns `JustFilled` only on that flip.
    pub fn record(&mut self, category: Category) -> FillTransition {
        if self.is_full(category) {
            return FillTransition::None;
        }
        match category {
            Category::Wet => {
                self.wet_count = self.wet_count.saturating_add(1);
                if self.wet_count >= self.max_wet {
                    self.wet_full = true;
                    return FillTransition::JustFilled;
                }
            }
            Category::Dry => {
                self.dry_count = self.dry_count.saturating_add(1);
                if self.dry_count >= self.max_dry {
                    self.dry_full = true;
                    return FillTransition::JustFilled;
                }
            }
        }
        FillTransition::None
    }

    pub fn snapshot(&self) -> BinSnapshot {
        BinSnapshot {
            wet_count: self.wet_count,
            dry_count: self.dry_count,
            wet_full: self.wet_full,
            dry_full: self.dry_full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_bins() -> BinState {
        BinState::new(&BinCfg {
            max_wet_count: 2,
            max_dry_count: 3,
        })
    }

    #[test]
    fn counts_start_at_zero_and_latches_clear() {
        let bins = small_bins();
        let snap = bins.snapshot();
        assert_eq!(snap.wet_count, 0);
        assert_eq!(snap.dry_count, 0);
        assert!(!snap.wet_full);
        assert!(!snap.dry_full);
    }

    #[test]
    fn just_filled_fires_exactly_once() {
        let mut bins = small_bins();
        assert_eq!(bins.record(Category::Wet), FillTransition::None);
        assert_eq!(bins.record(Category::Wet), FillTransition::JustFilled);
        // Further records are ignored: no increment, no second transition.
        assert_eq!(bins.record(Category::Wet), FillTransition::None);
        assert_eq!(bins.count(Category::Wet), 2);
        assert!(bins.is_full(Category::Wet));
    }

    #[test]
    fn categories_fill_independently() {
        let mut bins = small_bins();
        bins.record(Category::Wet);
        bins.record(Category::Wet);
        assert!(bins.is_full(Category::Wet));
        assert!(!bins.is_full(Category::Dry));
        assert!(!bins.both_full());

        bins.record(Category::Dry);
        bins.record(Category::Dry);
        assert_eq!(bins.record(Category::Dry), FillTransition::JustFilled);
        assert!(bins.both_full());
    }
}
