use crate::*;

use alloc::vec::Vec;
use virtual_list::{List, ListOptions, RenderSurface, RowContext, SelectionMode, Slot};

/// Rows are just their item index; every row has the same height.
#[derive(Debug)]
struct Rows {
    height: u32,
}

impl RenderSurface<u32> for Rows {
    type Row = usize;

    fn create_row(&mut self, cx: RowContext<'_, u32>) -> usize {
        cx.index
    }

    fn measure(&mut self, _row: &usize) -> u32 {
        self.height
    }

    fn destroy_row(&mut self, _row: usize) {}

    fn position_row(&mut self, row: &mut usize, slot: Slot) {
        *row = slot.index;
    }

    fn set_filler_heights(&mut self, _before: u64, _after: u64) {}
}

fn list_with(n: u32, options: ListOptions) -> List<u32, Rows> {
    let mut list = List::new((0..n).collect::<Vec<_>>(), Rows { height: 10 }, options).unwrap();
    list.set_viewport_geometry(0, 50);
    list
}

fn list(n: u32) -> List<u32, Rows> {
    list_with(n, ListOptions::new(10))
}

fn selected(list: &List<u32, Rows>) -> Vec<usize> {
    list.selection().selected_indices().collect()
}

fn key(k: Key) -> KeyEvent {
    KeyEvent::new(k)
}

#[test]
fn plain_navigation_selects_the_new_lead() {
    let mut l = list(20);
    let c = SelectionController::for_list(&l);
    assert_eq!(c.layout(), Layout::List);

    // Without a lead, navigation starts at the first item.
    assert!(c.handle_key(&mut l, key(Key::Down)));
    assert_eq!(selected(&l), [0]);

    assert!(c.handle_key(&mut l, key(Key::Down)));
    assert!(c.handle_key(&mut l, key(Key::Down)));
    assert_eq!(selected(&l), [2]);
    assert_eq!(l.selection().lead_index(), Some(2));
    assert_eq!(l.selection().anchor_index(), Some(2));

    assert!(c.handle_key(&mut l, key(Key::Up)));
    assert_eq!(selected(&l), [1]);

    assert!(!c.handle_key(&mut l, key(Key::Left)));
    assert!(!c.handle_key(&mut l, key(Key::Right)));
    assert!(c.handle_key(&mut l, key(Key::Home)));
    assert!(!c.handle_key(&mut l, key(Key::Up)));
    assert_eq!(selected(&l), [0]);
}

#[test]
fn end_and_page_keys_scroll_the_lead_into_view() {
    let mut l = list(100);
    let c = SelectionController::for_list(&l);
    c.handle_key(&mut l, key(Key::Home));

    assert!(c.handle_key(&mut l, key(Key::PageDown)));
    assert_eq!(l.selection().lead_index(), Some(5));
    assert_eq!(l.scroll_top(), 10);

    assert!(c.handle_key(&mut l, key(Key::End)));
    assert_eq!(selected(&l), [99]);
    assert_eq!(l.scroll_top(), 950);
    assert!(!c.handle_key(&mut l, key(Key::Down)));

    assert!(c.handle_key(&mut l, key(Key::PageUp)));
    assert_eq!(l.selection().lead_index(), Some(94));
    assert_eq!(l.scroll_top(), 940);
}

#[test]
fn shift_extends_from_the_anchor() {
    let mut l = list(20);
    let c = SelectionController::for_list(&l);
    l.update_selection(|sm| sm.set_selected_index(Some(2)));

    let shift = |k| KeyEvent::with_modifiers(k, Modifiers::SHIFT);
    c.handle_key(&mut l, shift(Key::Down));
    c.handle_key(&mut l, shift(Key::Down));
    assert_eq!(selected(&l), [2, 3, 4]);
    assert_eq!(l.selection().anchor_index(), Some(2));
    assert_eq!(l.selection().lead_index(), Some(4));

    for _ in 0..3 {
        c.handle_key(&mut l, shift(Key::Up));
    }
    assert_eq!(selected(&l), [1, 2]);
    assert_eq!(l.selection().lead_index(), Some(1));
    assert_eq!(l.selection().anchor_index(), Some(2));
}

#[test]
fn ctrl_moves_the_lead_and_space_toggles_it() {
    let mut l = list(20);
    let c = SelectionController::for_list(&l);
    let ctrl = |k| KeyEvent::with_modifiers(k, Modifiers::CTRL);

    c.handle_key(&mut l, key(Key::Down));
    c.handle_key(&mut l, ctrl(Key::Down));
    assert_eq!(selected(&l), [0]);
    assert_eq!(l.selection().lead_index(), Some(1));
    assert_eq!(l.selection().anchor_index(), Some(0));

    assert!(c.handle_key(&mut l, ctrl(Key::Space)));
    assert_eq!(selected(&l), [0, 1]);
    assert!(c.handle_key(&mut l, ctrl(Key::Space)));
    assert_eq!(selected(&l), [0]);

    assert!(c.handle_key(&mut l, key(Key::Space)));
    assert_eq!(selected(&l), [0, 1]);
    // Space on a selected lead is left to the host.
    assert!(!c.handle_key(&mut l, key(Key::Space)));

    assert!(c.handle_key(&mut l, ctrl(Key::Char('a'))));
    assert_eq!(l.selection().selected_count(), 20);
    assert!(!c.handle_key(&mut l, key(Key::Char('a'))));
}

#[test]
fn single_mode_keeps_one_item_selected() {
    let mut l = list_with(
        20,
        ListOptions::new(10).with_selection_mode(SelectionMode::Single),
    );
    let c = SelectionController::for_list(&l);
    c.handle_key(&mut l, key(Key::Down));
    c.handle_key(&mut l, KeyEvent::with_modifiers(Key::Down, Modifiers::SHIFT));
    assert_eq!(selected(&l), [1]);
    assert_eq!(l.selection().anchor_index(), Some(0));

    assert!(!c.handle_key(&mut l, KeyEvent::with_modifiers(Key::Char('A'), Modifiers::CTRL)));
    assert_eq!(selected(&l), [1]);
}

#[test]
fn grid_navigation_moves_by_rows_and_columns() {
    let mut l = list_with(10, ListOptions::new(10).with_columns_per_row(3));
    let c = SelectionController::for_list(&l);
    assert_eq!(c.layout(), Layout::Grid { columns: 3 });

    assert_eq!(c.index_below(1, 10), Some(4));
    assert_eq!(c.index_below(7, 10), Some(9));
    assert_eq!(c.index_below(9, 10), None);
    assert_eq!(c.index_above(4, 10), Some(1));
    assert_eq!(c.index_above(1, 10), Some(0));
    assert_eq!(c.index_above(0, 10), None);
    assert_eq!(c.index_after(9, 10), None);
    assert_eq!(c.index_before(0, 10), None);

    l.update_selection(|sm| sm.set_selected_index(Some(4)));
    c.handle_key(&mut l, key(Key::Right));
    assert_eq!(selected(&l), [5]);
    c.handle_key(&mut l, key(Key::Down));
    assert_eq!(selected(&l), [8]);
    c.handle_key(&mut l, key(Key::Left));
    c.handle_key(&mut l, key(Key::Up));
    assert_eq!(selected(&l), [4]);
}

#[test]
fn clicks_follow_modifier_rules() {
    let mut l = list(20);
    let c = SelectionController::default();
    let click = |l: &mut List<u32, Rows>, index, m| {
        c.handle_pointer_down_up(l, index, PointerEvent::down(m));
        c.handle_pointer_down_up(l, index, PointerEvent::up(m));
    };

    assert!(c.handle_pointer_down_up(&mut l, Some(3), PointerEvent::down(Modifiers::NONE)));
    assert_eq!(selected(&l), [3]);
    assert_eq!(l.selection().anchor_index(), Some(3));

    // Shift acts on press; the release is ignored.
    assert!(c.handle_pointer_down_up(&mut l, Some(6), PointerEvent::down(Modifiers::SHIFT)));
    assert!(!c.handle_pointer_down_up(&mut l, Some(6), PointerEvent::up(Modifiers::SHIFT)));
    assert_eq!(selected(&l), [3, 4, 5, 6]);
    assert_eq!(l.selection().lead_index(), Some(6));
    assert_eq!(l.selection().anchor_index(), Some(3));

    // Ctrl acts on release.
    assert!(!c.handle_pointer_down_up(&mut l, Some(10), PointerEvent::down(Modifiers::CTRL)));
    assert!(c.handle_pointer_down_up(&mut l, Some(10), PointerEvent::up(Modifiers::CTRL)));
    click(&mut l, Some(4), Modifiers::CTRL);
    assert_eq!(selected(&l), [3, 5, 6, 10]);
    assert_eq!(l.selection().anchor_index(), Some(4));

    // A secondary click on a selected item keeps the selection for a context menu.
    let secondary = |e: PointerEvent| e.with_button(PointerButton::Secondary);
    assert!(!c.handle_pointer_down_up(&mut l, Some(5), secondary(PointerEvent::down(Modifiers::NONE))));
    assert!(!c.handle_pointer_down_up(&mut l, Some(5), secondary(PointerEvent::up(Modifiers::NONE))));
    assert_eq!(selected(&l), [3, 5, 6, 10]);

    // Pressing a selected item waits for the release before collapsing the selection.
    assert!(!c.handle_pointer_down_up(&mut l, Some(5), PointerEvent::down(Modifiers::NONE)));
    assert_eq!(selected(&l), [3, 5, 6, 10]);
    assert!(c.handle_pointer_down_up(&mut l, Some(5), PointerEvent::up(Modifiers::NONE)));
    assert_eq!(selected(&l), [5]);
}

#[test]
fn releasing_over_empty_space_clears_the_selection() {
    let mut l = list(20);
    let c = SelectionController::default();
    l.update_selection(|sm| sm.select_range(2, 5));

    assert!(!c.handle_pointer_down_up(&mut l, None, PointerEvent::down(Modifiers::NONE)));
    assert!(!c.handle_pointer_down_up(&mut l, None, PointerEvent::up(Modifiers::SHIFT)));
    assert_eq!(l.selection().selected_count(), 4);

    // Past the last item counts as empty space.
    assert!(c.handle_pointer_down_up(&mut l, Some(40), PointerEvent::up(Modifiers::NONE)));
    assert_eq!(l.selection().selected_count(), 0);
    assert_eq!(l.selection().lead_index(), Some(5));
    assert_eq!(l.selection().anchor_index(), Some(2));
}

#[test]
fn shift_click_in_single_mode_keeps_the_anchor() {
    let mut l = list_with(
        20,
        ListOptions::new(10).with_selection_mode(SelectionMode::Single),
    );
    let c = SelectionController::default();
    c.handle_pointer_down_up(&mut l, Some(2), PointerEvent::down(Modifiers::NONE));
    c.handle_pointer_down_up(&mut l, Some(7), PointerEvent::down(Modifiers::SHIFT));
    assert_eq!(selected(&l), [7]);
    assert_eq!(l.selection().anchor_index(), Some(2));
    assert_eq!(l.selection().lead_index(), Some(7));

    // Ctrl has no toggle meaning in single mode; it behaves like a plain click.
    assert!(c.handle_pointer_down_up(&mut l, Some(9), PointerEvent::down(Modifiers::CTRL)));
    assert_eq!(selected(&l), [9]);
}

#[test]
fn drag_extends_past_the_materialized_window() {
    let mut l = list(100);
    let c = SelectionController::for_list(&l);

    assert!(c.handle_pointer(&mut l, Some(2), PointerEvent::down(Modifiers::NONE)));
    assert!(l.is_dragging());
    assert!(!c.handle_pointer(&mut l, Some(2), PointerEvent::moved(Modifiers::NONE)));
    assert!(c.handle_pointer(&mut l, Some(4), PointerEvent::moved(Modifiers::NONE)));
    assert_eq!(selected(&l), [2, 3, 4]);

    // Item 40 has no row yet; the move scrolls it into view first.
    assert!(l.row(40).is_none());
    assert!(c.handle_pointer(&mut l, Some(40), PointerEvent::moved(Modifiers::NONE)));
    assert!(l.row(40).is_some());
    assert_eq!(l.scroll_top(), 360);
    assert_eq!(l.selection().selected_count(), 39);
    assert_eq!(l.selection().lead_index(), Some(40));
    assert_eq!(l.selection().anchor_index(), Some(2));

    // Releasing over empty space after a drag keeps the dragged range.
    assert!(!c.handle_pointer(&mut l, None, PointerEvent::moved(Modifiers::NONE)));
    assert!(!c.handle_pointer(&mut l, None, PointerEvent::up(Modifiers::NONE)));
    assert!(!l.is_dragging());
    assert_eq!(l.selection().selected_count(), 39);

    assert!(!c.handle_pointer(&mut l, Some(10), PointerEvent::moved(Modifiers::NONE)));
    assert_eq!(l.selection().selected_count(), 39);
}

#[test]
fn pressing_a_selected_item_keeps_the_selection_until_it_moves() {
    let mut l = list(20);
    let c = SelectionController::default();
    l.update_selection(|sm| sm.select_range(3, 6));

    assert!(!c.handle_pointer(&mut l, Some(5), PointerEvent::down(Modifiers::NONE)));
    assert_eq!(selected(&l), [3, 4, 5, 6]);
    assert!(c.handle_pointer(&mut l, Some(7), PointerEvent::moved(Modifiers::NONE)));
    assert_eq!(selected(&l), [5, 6, 7]);
    assert!(!c.handle_pointer(&mut l, Some(7), PointerEvent::up(Modifiers::NONE)));
    assert_eq!(selected(&l), [5, 6, 7]);

    // Without a move the release collapses to the pressed item, like a click.
    assert!(!c.handle_pointer(&mut l, Some(6), PointerEvent::down(Modifiers::NONE)));
    assert!(c.handle_pointer(&mut l, Some(6), PointerEvent::up(Modifiers::NONE)));
    assert_eq!(selected(&l), [6]);

    // Modified and secondary presses never start a gesture.
    c.handle_pointer(&mut l, Some(2), PointerEvent::down(Modifiers::SHIFT));
    assert!(!l.is_dragging());
    c.handle_pointer(&mut l, Some(2), PointerEvent::up(Modifiers::SHIFT));
    let secondary = PointerEvent::down(Modifiers::NONE).with_button(PointerButton::Secondary);
    c.handle_pointer(&mut l, Some(2), secondary);
    assert!(!l.is_dragging());
    assert!(!c.handle_pointer_down_up(&mut l, Some(9), PointerEvent::moved(Modifiers::NONE)));
}
