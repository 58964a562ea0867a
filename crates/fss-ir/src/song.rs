//! Module structure and order list types.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::pattern::Pattern;

/// Raw order byte for a skip marker.
pub const ORDER_SKIP: u8 = 254;
/// Raw order byte for the end-of-song marker.
pub const ORDER_END: u8 = 255;

/// An entry in the order list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderEntry {
    /// Play pattern with this index
    Pattern(u8),
    /// Skip marker (+++), continue to next
    Skip,
    /// End of song marker (---)
    End,
}

impl OrderEntry {
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            ORDER_SKIP => OrderEntry::Skip,
            ORDER_END => OrderEntry::End,
            idx => OrderEntry::Pattern(idx),
        }
    }
}

/// A loaded module: header values plus the decoded channel of every pattern.
#[derive(Clone, Debug)]
pub struct Module {
    /// Song title
    pub title: ArrayString<32>,
    /// Initial tempo in BPM
    pub initial_tempo: u8,
    /// Initial speed (ticks per row)
    pub initial_speed: u8,
    pub instrument_count: u16,
    pub sample_count: u16,
    /// Order list (song arrangement)
    pub order: Vec<OrderEntry>,
    /// Patterns indexed by pattern number
    pub patterns: Vec<Pattern>,
}

impl Module {
    /// Create an empty module with the given initial tempo and speed.
    pub fn new(title: &str, initial_tempo: u8, initial_speed: u8) -> Self {
        let mut module = Self {
            title: ArrayString::new(),
            initial_tempo,
            initial_speed,
            instrument_count: 0,
            sample_count: 0,
            order: Vec::new(),
            patterns: Vec::new(),
        };
        let _ = module.title.try_push_str(title);
        module
    }

    /// Pattern referenced by an order entry, if it exists.
    pub fn pattern(&self, index: u8) -> Option<&Pattern> {
        self.patterns.get(index as usize)
    }

    /// `(order index, pattern)` of every order that is actually played:
    /// skips removed, cut at the first end marker.
    pub fn played_orders(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.order
            .iter()
            .take_while(|entry| **entry != OrderEntry::End)
            .enumerate()
            .filter_map(|(order, entry)| match entry {
                OrderEntry::Pattern(idx) => Some((order, *idx)),
                _ => None,
            })
    }
}
