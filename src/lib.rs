#![no_std]
#![warn(missing_docs)]

//! Growable containers over pluggable allocators.
//!
//! Every container owns a single contiguous buffer obtained from an
//! [`Allocator`]: the process heap by default, or an [`Arena`] carved out of
//! caller-provided memory. Buffers double when full; [`Vector`], [`Stack`]
//! and [`BinaryHeap`] also halve theirs once less than a quarter is in use.
//! [`FixedVector`] and [`FixedHashSet`] allocate once and never resize.
//!
//! Plain constructors and `push` treat allocation failure as fatal, like the
//! standard collections. The `try_` variants hand the failure back instead.
//!
//! ```
//! use growable::{BinaryHeap, Queue, Vector};
//!
//! let mut queue = Queue::with_capacity(1);
//! queue.push("Hello");
//! queue.push("World");
//! assert_eq!(queue.pop(), Some("Hello"));
//!
//! let mut vec = Vector::new();
//! vec.extend([3, 10, 1, 4].iter().copied());
//! vec.sort();
//! assert_eq!(vec, [1, 3, 4, 10]);
//!
//! let mut heap = BinaryHeap::from(vec);
//! assert_eq!(heap.pop(), Some(1));
//! ```

extern crate alloc;

pub mod allocator;
pub mod arena;
pub mod binary_heap;
pub mod cmp;
pub mod error;
pub mod fixed_vec;
pub mod hash;
pub mod hash_set;
pub mod queue;
pub mod sort;
pub mod stack;
pub mod vec;

mod storage;

pub use crate::allocator::{Allocator, Global};
pub use crate::arena::Arena;
pub use crate::binary_heap::BinaryHeap;
pub use crate::cmp::{Compare, Natural, Reverse};
pub use crate::error::{Error, Result};
pub use crate::fixed_vec::FixedVector;
pub use crate::hash_set::FixedHashSet;
pub use crate::queue::Queue;
pub use crate::stack::Stack;
pub use crate::vec::Vector;
