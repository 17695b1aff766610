//! An ordered set built on a single-threaded skip list.
//!
//! ```
//! use skiplist_rs::SkipList;
//!
//! let mut list: SkipList<i32> = [5, 1, 9, 3, 7].into_iter().collect();
//! assert_eq!(list.to_vec(), vec![1, 3, 5, 7, 9]);
//! assert_eq!(list.lower_bound(&4), Some(&5));
//! assert_eq!(list.upper_bound(&5), Some(&7));
//!
//! list.remove(&5);
//! assert!(!list.search(&5));
//! assert_eq!(list.closest_element(&5), Some(3));
//! ```
//!
//! Nodes live in an index-addressed arena owned by the list; lanes link slot
//! indices rather than pointers.

mod arena;
pub mod config;
pub mod error;
mod iter;
pub mod level;
mod skiplist;

pub use config::SkipListConfig;
pub use error::{Error, Result};
pub use iter::Iter;
pub use level::{GeometricLevel, LevelGenerator};
pub use skiplist::SkipList;

/// Keys with a notion of distance, needed by
/// [`SkipList::closest_element`]. Every other operation only needs `Ord`.
pub trait Numeric: Ord + Copy {
    /// Absolute difference between two keys.
    type Distance: Ord;

    /// Returned by [`SkipList::closest_element_or_max`] on an empty list.
    const MAX_VALUE: Self;

    fn distance(&self, other: &Self) -> Self::Distance;
}

macro_rules! impl_numeric {
    ($($t:ty => $d:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                type Distance = $d;

                const MAX_VALUE: Self = <$t>::MAX;

                fn distance(&self, other: &Self) -> $d {
                    self.abs_diff(*other)
                }
            }
        )*
    };
}

impl_numeric! {
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    i128 => u128,
    isize => usize,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    u128 => u128,
    usize => usize,
}
