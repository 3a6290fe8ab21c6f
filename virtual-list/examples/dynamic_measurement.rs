// Example: variable-height rows measured on demand, and content kept in place across inserts.
use virtual_list::{List, ListOptions, RenderSurface, RowContext, Slot};

/// Rows are as tall as their text is long (one line per 10 characters).
struct Paragraphs;

impl RenderSurface<String> for Paragraphs {
    type Row = usize;

    fn create_row(&mut self, cx: RowContext<'_, String>) -> usize {
        cx.item.len()
    }

    fn measure(&mut self, row: &usize) -> u32 {
        16 * (1 + *row as u32 / 10)
    }

    fn destroy_row(&mut self, _row: usize) {}

    fn position_row(&mut self, _row: &mut usize, _slot: Slot) {}

    fn set_filler_heights(&mut self, _before: u64, _after: u64) {}

    fn set_scroll_top(&mut self, scroll_top: u64) {
        println!("list moved scroll_top to {scroll_top}");
    }
}

fn main() {
    let items: Vec<String> = (0..500).map(|i| "x".repeat(i % 37)).collect();
    let options = ListOptions::new(16).with_fixed_height(false);
    let Ok(mut list) = List::new(items, Paragraphs, options) else {
        return;
    };

    list.set_viewport_geometry(2_000, 300);
    println!(
        "measured={} total={} window={:?}",
        list.height_cache().measured_count(),
        list.total_height(),
        list.window()
    );

    // Inserting above the viewport keeps the first visible item where it was.
    let first = list.window().first_visible;
    let older: Vec<String> = (0..20).map(|i| format!("older message {i}")).collect();
    if let Err(err) = list.splice(0, 0, older) {
        eprintln!("splice failed: {err}");
        return;
    }
    println!(
        "after prepend: scroll_top={} first_visible={} (was {first})",
        list.scroll_top(),
        list.window().first_visible
    );

    // Several mutations, one redraw.
    let before = list.redraw_count();
    list.batch_update(|list| {
        for i in 0..5 {
            list.push(format!("new {i}"));
        }
    });
    println!("redraws for 5 pushes: {}", list.redraw_count() - before);
}
