//! A headless virtualized list engine.
//!
//! For key and pointer selection controllers, see the `virtual-list-adapter` crate.
//!
//! This crate focuses on the algorithms needed to show very long, possibly variable-height
//! collections without materializing every row: lazily rebuilt prefix sums over row heights,
//! offset → index lookup, scroll windows with slack, and a range/multi selection model that
//! follows items through insertions and removals.
//!
//! It is UI-agnostic. A host framework is expected to provide:
//! - a [`RenderSurface`] that creates, measures, positions and destroys visual rows
//! - viewport geometry (scroll offset and client height)
//! - mutations through [`List::splice`] and selection edits through [`List::update_selection`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod collection;
mod error;
mod height_cache;
mod list;
mod observer;
mod options;
mod selection;
mod state;
mod surface;
mod types;


pub use anchor::ScrollAnchor;
pub use collection::{Collection, SpliceEvent, SpliceListener};
pub use error::ListError;
pub use height_cache::HeightCache;
pub use list::List;
pub use observer::ListenerId;
pub use options::ListOptions;
pub use selection::{
    SelectionChanged, SelectionDelta, SelectionListener, SelectionMode, SelectionModel,
    SelectionSnapshot,
};
pub use state::{ListState, ScrollState};
pub use surface::{RenderSurface, RowContext};
pub use types::{Align, RowState, Slot, ViewportWindow};
