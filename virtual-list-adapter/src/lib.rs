//! Input plumbing for the `virtual-list` crate.
//!
//! `virtual-list` owns the selection model and the scroll window but knows nothing about
//! keyboards or pointers. This crate maps host input onto it:
//!
//! - [`SelectionController`]: arrow/Home/End/Page keys, Space and Ctrl+A, plus click handling
//!   with Shift ranges and Ctrl toggles, for single-column lists and grids
//!
//! This crate is intentionally framework-agnostic: hosts translate their native events into
//! [`KeyEvent`] and [`PointerEvent`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod key;

#[cfg(test)]
mod tests;

pub use controller::{Layout, SelectionController};
pub use key::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerKind};
