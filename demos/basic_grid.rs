/// Basic Grid Example
///
/// This example demonstrates:
/// - Declaring a column schema over plain Rust structs
/// - Searching, filtering and sorting
/// - Paging through results
/// - Selecting rows across pages and exporting them

use livegrid::{
    CellValue, Column, ColumnKind, DataGrid, ExportFormat, ExportScope, FilterValue, GridEvent, Row,
    RowKey, Schema, SelectScope,
};

struct Employee {
    id: u32,
    name: &'static str,
    department: &'static str,
    salary: f64,
    hired: &'static str,
    remote: bool,
}

impl Row for Employee {
    fn field(&self, name: &str) -> CellValue {
        match name {
            "id" => self.id.into(),
            "name" => self.name.into(),
            "department" => self.department.into(),
            "salary" => self.salary.into(),
            "hired" => self.hired.into(),
            "remote" => self.remote.into(),
            _ => CellValue::Null,
        }
    }
}

fn print_page(grid: &DataGrid<Employee>) {
    let view = grid.view();
    let columns = grid.visible_columns();
    let header: Vec<&str> = columns.iter().map(|c| c.title()).collect();
    println!("   {}", header.join(" | "));
    for (row, _, selected) in view.iter() {
        let cells: Vec<String> = columns.iter().map(|c| c.display(row)).collect();
        println!("   {} {}", if selected { "[x]" } else { "[ ]" }, cells.join(" | "));
    }
    println!("   page {} of {} ({})\n", view.page, view.total_pages, view.range_label());
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== LiveGrid Basic Example ===\n");

    // 1. Rows and schema
    println!("1. Creating grid...");
    let departments = ["Engineering", "Sales", "Support", "Finance"];
    let rows: Vec<Employee> = (1..=23)
        .map(|i| Employee {
            id: i,
            name: ["Ann", "bob", "Carla", "Dev", "eli", "Fay"][(i as usize) % 6],
            department: departments[(i as usize) % departments.len()],
            salary: 40_000.0 + (i as f64 * 1_750.0) % 30_000.0,
            hired: ["2019-03-01", "2021-11-15", "2018-07-30", "2023-01-09"][(i as usize) % 4],
            remote: i % 3 == 0,
        })
        .collect();

    let schema = Schema::new(vec![
        Column::new("id", "ID", ColumnKind::Number).width(60),
        Column::new("name", "Name", ColumnKind::Text),
        Column::new("department", "Department", ColumnKind::Select),
        Column::new("salary", "Salary", ColumnKind::Custom)
            .render(|v, _| format!("${:.0}", v.to_number()))
            .searchable(false),
        Column::new("hired", "Hired", ColumnKind::Date),
        Column::new("remote", "Remote", ColumnKind::Boolean).hidden(true),
    ])
    .unwrap();

    let mut grid = DataGrid::new(rows, schema).with_row_key(RowKey::field("id"));
    grid.on_event(|event| match event {
        GridEvent::Export { format } => println!("   -> export requested as {}", format),
        other => log::info!("grid event: {:?}", other),
    });
    println!("   {} rows, {} pages\n", grid.rows().len(), grid.total_pages());

    // 2. First page
    println!("2. Page 1:");
    print_page(&grid);

    // 3. Search
    println!("3. Searching for 'ann'...");
    grid.set_search("ann");
    print_page(&grid);
    grid.set_search("");

    // 4. Filter + sort
    println!("4. Engineering and Sales, highest salary first...");
    grid.set_filter("department", FilterValue::set(["Engineering", "Sales"])).unwrap();
    grid.toggle_sort("salary").unwrap();
    grid.toggle_sort("salary").unwrap();
    print_page(&grid);

    // 5. Selection across pages
    println!("5. Selecting everything that matches, then clearing the filter...");
    let added = grid.select_all(SelectScope::Filtered);
    println!("   selected {} rows", added);
    grid.clear_filters();
    grid.clear_sort();
    grid.set_page(2);
    print_page(&grid);

    // 6. Column visibility
    println!("6. Showing the Remote column, hiding Hired...");
    grid.toggle_column("remote").unwrap();
    grid.toggle_column("hired").unwrap();
    print_page(&grid);

    // 7. Export
    println!("7. Exporting selection...");
    let snapshot = grid.export(ExportFormat::Csv, ExportScope::Selected);
    println!("   {}: {} rows", snapshot.file_name("employees"), snapshot.len());
    println!("   {}", snapshot.headers.join(","));
    for row in snapshot.rows.iter().take(3) {
        println!("   {}", row.join(","));
    }

    println!("\n=== Example Complete ===");
}
