// Example: minimal fixed-height list and scroll-into-view.
use virtual_list::{List, ListOptions, RenderSurface, RowContext, Slot};

/// A surface whose rows are just labels; every row is 20px tall.
struct Labels;

impl RenderSurface<String> for Labels {
    type Row = String;

    fn create_row(&mut self, cx: RowContext<'_, String>) -> String {
        cx.item.clone()
    }

    fn measure(&mut self, _row: &String) -> u32 {
        20
    }

    fn destroy_row(&mut self, _row: String) {}

    fn position_row(&mut self, _row: &mut String, _slot: Slot) {}

    fn set_filler_heights(&mut self, before: u64, after: u64) {
        println!("fillers: before={before} after={after}");
    }

    fn recycle_row(&mut self, row: &mut String, cx: RowContext<'_, String>) -> bool {
        row.clone_from(cx.item);
        true
    }
}

fn main() {
    let items: Vec<String> = (0..1_000_000).map(|i| format!("item {i}")).collect();
    let mut list = match List::new(items, Labels, ListOptions::new(20)) {
        Ok(list) => list,
        Err(err) => {
            eprintln!("invalid options: {err}");
            return;
        }
    };
    list.set_viewport_geometry(123_456, 200);

    println!("total_height={}", list.total_height());
    println!("visible_range={:?}", list.visible_range());
    println!("window={:?}", list.window());
    println!(
        "first_row={:?}",
        list.materialized_indexes().next().and_then(|i| list.row(i))
    );

    let off = list.scroll_index_into_view(999_999);
    println!("after scroll_index_into_view: offset={off} window={:?}", list.window());
}
