// Example: driving selection from key and pointer events.
use virtual_list::{List, ListOptions, RenderSurface, RowContext, RowState, Slot};
use virtual_list_adapter::{Key, KeyEvent, Modifiers, PointerEvent, SelectionController};

struct Console;

impl RenderSurface<&'static str> for Console {
    type Row = usize;

    fn create_row(&mut self, cx: RowContext<'_, &'static str>) -> usize {
        cx.index
    }

    fn measure(&mut self, _row: &usize) -> u32 {
        1
    }

    fn destroy_row(&mut self, _row: usize) {}

    fn position_row(&mut self, row: &mut usize, slot: Slot) {
        *row = slot.index;
    }

    fn set_filler_heights(&mut self, _before: u64, _after: u64) {}

    fn set_row_state(&mut self, row: &mut usize, state: RowState) {
        println!("row {row}: selected={} lead={}", state.selected, state.lead);
    }
}

fn main() {
    let items = vec!["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta"];
    let Ok(mut list) = List::new(items, Console, ListOptions::new(1)) else {
        return;
    };
    list.set_viewport_geometry(0, 4);
    let controller = SelectionController::for_list(&list);

    // Drag from "beta" to "delta", then release.
    controller.handle_pointer(&mut list, Some(1), PointerEvent::down(Modifiers::NONE));
    controller.handle_pointer(&mut list, Some(3), PointerEvent::moved(Modifiers::NONE));
    controller.handle_pointer(&mut list, Some(3), PointerEvent::up(Modifiers::NONE));
    println!("dragged={}", list.selection().selected_count());

    for _ in 0..4 {
        controller.handle_key(&mut list, KeyEvent::with_modifiers(Key::Down, Modifiers::SHIFT));
    }

    let selected: Vec<_> = list
        .selection()
        .selected_indices()
        .filter_map(|i| list.get(i))
        .collect();
    println!("selected={selected:?} scroll_top={}", list.scroll_top());
}
