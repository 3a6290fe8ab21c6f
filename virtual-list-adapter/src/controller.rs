use virtual_list::{List, RenderSurface};

use crate::{Key, KeyEvent, PointerButton, PointerEvent, PointerKind};

/// How items are arranged on screen, which decides what the arrow keys do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// One item per row; Left/Right are not handled.
    #[default]
    List,
    /// `columns` items per row; Up/Down move by a whole row.
    Grid { columns: usize },
}

impl Layout {
    pub fn columns(&self) -> usize {
        match *self {
            Layout::List => 1,
            Layout::Grid { columns } => columns.max(1),
        }
    }
}

/// Turns key and pointer events into selection edits on a [`List`].
///
/// The controller holds no per-list state: lead, anchor and membership all live in the list's
/// selection model, so one controller can serve any number of lists with the same layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionController {
    layout: Layout,
}

impl SelectionController {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// A controller whose layout matches the list's `columns_per_row`.
    pub fn for_list<T, S: RenderSurface<T>>(list: &List<T, S>) -> Self {
        let columns = list.columns_per_row();
        Self::new(if columns > 1 {
            Layout::Grid { columns }
        } else {
            Layout::List
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// The index one row below `index`, or the last index from a partial last row.
    pub fn index_below(&self, index: usize, len: usize) -> Option<usize> {
        let last = len.checked_sub(1)?;
        if index >= last {
            return None;
        }
        Some(index.saturating_add(self.layout.columns()).min(last))
    }

    /// The index one row above `index`, or 0 from the first row.
    pub fn index_above(&self, index: usize, len: usize) -> Option<usize> {
        if index == 0 || index >= len {
            return None;
        }
        Some(index.saturating_sub(self.layout.columns()))
    }

    pub fn index_before(&self, index: usize, len: usize) -> Option<usize> {
        match self.layout {
            Layout::List => None,
            Layout::Grid { .. } if index < len => index.checked_sub(1),
            Layout::Grid { .. } => None,
        }
    }

    pub fn index_after(&self, index: usize, len: usize) -> Option<usize> {
        match self.layout {
            Layout::List => None,
            Layout::Grid { .. } => {
                let next = index.checked_add(1)?;
                (next < len).then_some(next)
            }
        }
    }

    /// Where a navigation key moves the lead. Without a lead every key starts at the first
    /// index, except End.
    fn target_index<T, S: RenderSurface<T>>(
        &self,
        list: &List<T, S>,
        key: Key,
        lead: Option<usize>,
    ) -> Option<usize> {
        let len = list.len();
        let last = len.checked_sub(1)?;
        let Some(lead) = lead else {
            return match key {
                Key::End => Some(last),
                Key::Space | Key::Char(_) => None,
                _ => Some(0),
            };
        };
        match key {
            Key::Up => self.index_above(lead, len),
            Key::Down => self.index_below(lead, len),
            Key::Left => self.index_before(lead, len),
            Key::Right => self.index_after(lead, len),
            Key::Home => Some(0),
            Key::End => Some(last),
            Key::PageUp => list.index_page_before(lead),
            Key::PageDown => list.index_page_after(lead),
            Key::Space | Key::Char(_) => None,
        }
    }

    /// Applies a key press. Returns `true` if the event was consumed.
    ///
    /// - Ctrl+A selects everything (multiple mode only).
    /// - Space selects the lead if it is unselected; Ctrl+Space flips it.
    /// - Navigation keys move the lead. Shift selects the range from the anchor, Ctrl moves the
    ///   lead alone, and a plain key selects only the new lead and re-anchors there.
    ///
    /// The new lead is scrolled into view.
    pub fn handle_key<T, S: RenderSurface<T>>(
        &self,
        list: &mut List<T, S>,
        event: KeyEvent,
    ) -> bool {
        let m = event.modifiers;
        let multiple = list.selection().is_multiple();
        let lead = list.selection().lead_index();

        match event.key {
            Key::Char(c) => {
                if m.ctrl && c.eq_ignore_ascii_case(&'a') && multiple {
                    vtrace!("select all");
                    return list.update_selection(|sm| sm.select_all());
                }
                return false;
            }
            Key::Space => {
                let Some(lead) = lead else {
                    return false;
                };
                let selected = list.selection().is_selected(lead);
                if m.ctrl || !selected {
                    return list.update_selection(|sm| sm.set_selected(lead, !selected || !multiple));
                }
                return false;
            }
            _ => {}
        }

        let Some(target) = self.target_index(list, event.key, lead) else {
            return false;
        };
        vtrace!(key = ?event.key, ?lead, target, "navigation key");

        list.update_selection(|sm| {
            if m.shift {
                let anchor = sm.anchor_index();
                if multiple {
                    sm.clear();
                }
                match anchor {
                    Some(anchor) => {
                        sm.select_range(anchor, target);
                    }
                    None => {
                        sm.set_selected(target, true);
                        sm.set_anchor(Some(target));
                    }
                }
            } else if !m.ctrl {
                if multiple {
                    sm.clear();
                }
                sm.set_selected(target, true);
                sm.set_anchor(Some(target));
            }
            sm.set_lead(Some(target));
        });
        list.scroll_index_into_view(target);
        true
    }

    /// Applies a pointer event over `index` (`None` for empty space), including drag selection.
    /// Returns `true` if the selection changed.
    ///
    /// A plain primary press on an item runs the click rules below and then arms a drag gesture
    /// anchored there. Moves extend the gesture to the item under the pointer (scrolling it into
    /// view when it has no row). A press on an item that is already selected keeps the selection
    /// until the pointer moves to another item. The release ends the gesture; after a drag it
    /// leaves the dragged range selected instead of applying the click rules.
    pub fn handle_pointer<T, S: RenderSurface<T>>(
        &self,
        list: &mut List<T, S>,
        index: Option<usize>,
        event: PointerEvent,
    ) -> bool {
        let index = index.filter(|&i| i < list.len());
        match event.kind {
            PointerKind::Down => {
                let changed = self.handle_pointer_down_up(list, index, event);
                let m = event.modifiers;
                if let Some(index) = index.filter(|_| {
                    event.button == PointerButton::Primary && !m.shift && !m.ctrl
                }) {
                    vtrace!(index, "drag armed");
                    list.arm_drag_selection(index);
                }
                changed
            }
            PointerKind::Move => match index {
                Some(index) if list.is_dragging() => list.extend_drag_selection(index),
                _ => false,
            },
            PointerKind::Up => {
                let dragged = list.drag_extended();
                list.end_drag_selection();
                if dragged {
                    vtrace!("drag ended");
                    return false;
                }
                self.handle_pointer_down_up(list, index, event)
            }
        }
    }

    /// Applies a pointer press or release over `index` (`None` for empty space), without drag
    /// selection. Moves are ignored. Returns `true` if the event was consumed.
    ///
    /// - Ctrl toggles the item on release and makes it lead and anchor (multiple mode).
    /// - Shift selects from the anchor to the item on press.
    /// - A plain click selects only the item: unselected items on press, selected ones on
    ///   release, so a press on a selected item can start a drag without losing the selection.
    ///   A secondary-button click on a selected item leaves the selection alone.
    /// - Releasing over empty space without modifiers clears the selection but keeps lead and
    ///   anchor.
    pub fn handle_pointer_down_up<T, S: RenderSurface<T>>(
        &self,
        list: &mut List<T, S>,
        index: Option<usize>,
        event: PointerEvent,
    ) -> bool {
        if event.kind == PointerKind::Move {
            return false;
        }
        let index = index.filter(|&i| i < list.len());
        let is_down = event.is_down();
        let m = event.modifiers;

        list.update_selection(|sm| {
            let Some(index) = index else {
                if is_down || m.shift || m.ctrl {
                    return false;
                }
                let had_selection = sm.selected_count() > 0;
                sm.clear();
                return had_selection;
            };

            if sm.is_multiple() && m.ctrl && !m.shift {
                if is_down {
                    return false;
                }
                let selected = sm.is_selected(index);
                sm.set_selected(index, !selected);
                sm.set_lead(Some(index));
                sm.set_anchor(Some(index));
                return true;
            }

            if let Some(anchor) = sm.anchor_index().filter(|&a| m.shift && a != index) {
                if !is_down {
                    return false;
                }
                sm.clear();
                // In single mode this selects `index` alone and keeps the anchor.
                return sm.select_range(anchor, index);
            }

            let selected = sm.is_selected(index);
            let secondary = event.button == PointerButton::Secondary;
            if selected != is_down && !(selected && secondary) {
                return sm.set_selected_index(Some(index));
            }
            false
        })
    }
}
