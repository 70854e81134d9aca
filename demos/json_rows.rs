/// JSON Rows Example
///
/// This example demonstrates:
/// - Driving a grid from `serde_json` rows
/// - Loading grid options and a saved query state from JSON
/// - Restoring a view, then saving the updated state back out

use livegrid::{Column, ColumnKind, DataGrid, FilterOption, GridOptions, QueryState, RowKey, Schema};
use serde_json::{json, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== LiveGrid JSON Example ===\n");

    // 1. Rows as JSON objects, with a few gaps
    let rows: Vec<Value> = vec![
        json!({"sku": "A-100", "product": "Laptop", "category": "electronics", "price": 999.99, "updated": "2024-05-01T09:30:00Z"}),
        json!({"sku": "A-101", "product": "Mouse", "category": "electronics", "price": 29.99, "updated": "2024-04-18T14:00:00Z"}),
        json!({"sku": "F-200", "product": "Desk", "category": "furniture", "price": 299.99}),
        json!({"sku": "F-201", "product": "Chair", "category": "furniture", "price": "n/a", "updated": "2024-03-02 08:15:00"}),
        json!({"sku": "A-102", "product": "Monitor", "category": "electronics", "price": 399.99, "updated": "2024-05-20T18:45:12.5Z"}),
        json!({"sku": "K-300", "product": "Kettle", "category": "kitchen", "price": 49.5, "updated": "2023-12-24T07:00:00Z"}),
    ];
    println!("1. Loaded {} products\n", rows.len());

    // 2. Options and a previously saved query
    let options = GridOptions::from_json(r#"{"page_size": 4, "page_size_options": [4, 8]}"#)?;
    let saved = QueryState::from_json(
        r#"{
            "filters": {"category": ["electronics", "furniture"]},
            "sort": {"column": "price", "direction": "desc"},
            "selected": ["A-101"],
            "page": 7
        }"#,
    )?;

    let schema = Schema::new(vec![
        Column::new("sku", "SKU", ColumnKind::Text),
        Column::new("product", "Product", ColumnKind::Text),
        Column::new("category", "Category", ColumnKind::Select).filter_options(vec![
            FilterOption::new("Electronics", "electronics"),
            FilterOption::new("Furniture", "furniture"),
            FilterOption::new("Kitchen", "kitchen"),
        ]),
        Column::new("price", "Price", ColumnKind::Number),
        Column::new("updated", "Updated", ColumnKind::Date),
    ])?;

    let mut grid = DataGrid::new(rows, schema)
        .with_options(options)?
        .with_row_key(RowKey::field("sku"))
        .with_query(saved);

    // 3. Restored view; the stale page is clamped
    println!("2. Restored view:");
    let view = grid.view();
    for (row, id, selected) in view.iter() {
        println!(
            "   {} {:<6} {:<8} {}",
            if selected { "*" } else { " " },
            id,
            row["product"].as_str().unwrap_or(""),
            row["price"]
        );
    }
    println!("   page {} of {}, {}\n", view.page, view.total_pages, view.range_label());

    // 4. Re-sort by date and save
    println!("3. Sorting by last update...");
    grid.toggle_sort("updated")?;
    for row in grid.view().rows {
        println!("   {:<8} {}", row["product"].as_str().unwrap_or(""), row["updated"]);
    }

    println!("\n4. Saved state:");
    println!("   {}", grid.query().to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
