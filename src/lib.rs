/// LiveGrid - Headless Tabular Data Engine
///
/// A generic table engine behind data-grid UIs: free-text search, per-column
/// filters, single-column sort, pagination, row selection that survives
/// paging and filtering, and column visibility. Rows stay in the caller's
/// representation; columns describe how to project values out of them.
///
/// The derived view is a pure function of (rows, schema, query state), see
/// [`derive_view`]. [`DataGrid`] wraps that function with the state-keeping
/// setters a UI needs.

pub mod dates;
pub mod value;
pub mod error;
pub mod row;
pub mod column;
pub mod schema;
pub mod query;
pub mod pipeline;
pub mod selection;
pub mod config;
pub mod events;
pub mod export;
pub mod grid;

pub use value::CellValue;
pub use error::{GridError, Result};
pub use row::{Row, RowId, RowKey};
pub use column::{Align, Column, ColumnKey, ColumnKind, FilterOption};
pub use schema::Schema;
pub use query::{FilterValue, QueryState, SortDirection, SortState, DEFAULT_PAGE_SIZE};
pub use pipeline::{derive_view, paginate, DerivedView, PageWindow};
pub use selection::SelectionTracker;
pub use config::GridOptions;
pub use events::{ExportFormat, GridEvent, Listener};
pub use export::{ExportScope, ExportSnapshot};
pub use grid::{DataGrid, SelectScope};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn people() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Ann"}),
            json!({"id": 2, "name": "ann"}),
            json!({"id": 3, "name": "Bob"}),
        ]
    }

    fn people_schema() -> Schema<Value> {
        Schema::new(vec![
            Column::new("id", "ID", ColumnKind::Number),
            Column::new("name", "Name", ColumnKind::Text),
        ])
        .unwrap()
    }

    fn ids(view: &DerivedView<'_, Value>) -> Vec<i64> {
        view.rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut grid = DataGrid::new(people(), people_schema()).with_row_key(RowKey::field("id"));
        grid.set_search("ann");
        assert_eq!(ids(&grid.view()), vec![1, 2]);

        grid.set_search("  ANN ");
        assert_eq!(ids(&grid.view()), vec![1, 2]);
    }

    #[test]
    fn test_multi_select_filter() {
        let mut grid = DataGrid::new(people(), people_schema()).with_row_key(RowKey::field("id"));
        grid.set_filter("name", FilterValue::set(["Bob"])).unwrap();
        assert_eq!(ids(&grid.view()), vec![3]);
    }

    #[test]
    fn test_nan_keeps_its_slot() {
        let rows = vec![
            json!({"id": 1, "score": 5}),
            json!({"id": 2, "score": "NaN"}),
            json!({"id": 3, "score": 3}),
        ];
        let schema = Schema::new(vec![
            Column::new("id", "ID", ColumnKind::Number),
            Column::new("score", "Score", ColumnKind::Number),
        ])
        .unwrap();
        let mut grid = DataGrid::new(rows, schema);
        grid.toggle_sort("score").unwrap();
        assert_eq!(ids(&grid.view()), vec![3, 2, 1]);

        grid.toggle_sort("score").unwrap();
        assert_eq!(ids(&grid.view()), vec![1, 2, 3]);
    }

    #[test]
    fn test_twenty_five_rows_in_three_pages() {
        let rows: Vec<Value> = (1..=25).map(|i| json!({"id": i})).collect();
        let schema = Schema::new(vec![Column::new("id", "ID", ColumnKind::Number)]).unwrap();
        let mut grid = DataGrid::new(rows, schema);

        let view = grid.view();
        assert_eq!(view.total_pages, 3);
        assert_eq!(ids(&view), (1..=10).collect::<Vec<_>>());
        assert_eq!(view.range_label(), "1-10 of 25");

        grid.set_page(2);
        assert_eq!(ids(&grid.view()), (11..=20).collect::<Vec<_>>());

        grid.set_page(3);
        let view = grid.view();
        assert_eq!(ids(&view), (21..=25).collect::<Vec<_>>());
        assert!(!view.has_next_page());
        assert!(view.has_prev_page());
    }

    #[test]
    fn test_selection_persists_across_pages() {
        let rows: Vec<Value> = (1..=25).map(|i| json!({"id": i})).collect();
        let schema = Schema::new(vec![Column::new("id", "ID", ColumnKind::Number)]).unwrap();
        let mut grid = DataGrid::new(rows, schema).with_row_key(RowKey::field("id"));

        grid.toggle_row(RowId::from(2));
        grid.toggle_row(RowId::from(4));
        grid.next_page();
        grid.prev_page();

        let expected: Vec<RowId> = vec![RowId::from(2), RowId::from(4)];
        assert_eq!(grid.query().selected.ids().iter().cloned().collect::<Vec<_>>(), expected);
        let view = grid.view();
        let marked: Vec<&RowId> = view.iter().filter(|(_, _, s)| *s).map(|(_, id, _)| id).collect();
        assert_eq!(marked, vec![&RowId::from(2), &RowId::from(4)]);
    }

    #[test]
    fn test_selection_survives_filter_round_trip() {
        let mut grid = DataGrid::new(people(), people_schema()).with_row_key(RowKey::field("id"));
        grid.toggle_row(RowId::from(3));
        grid.set_search("ann");
        assert!(grid.view().selected.iter().all(|s| !s));
        grid.set_search("");
        assert!(grid.is_selected(&RowId::from(3)));
        assert!(grid.view().selected[2]);
    }

    #[test]
    fn test_filter_narrowing_clamps_page() {
        let rows: Vec<Value> = (1..=40)
            .map(|i| {
                let kind = if i <= 5 { "rare" } else { "common" };
                json!({"id": i, "kind": kind})
            })
            .collect();
        let schema = Schema::new(vec![
            Column::new("id", "ID", ColumnKind::Number),
            Column::new("kind", "Kind", ColumnKind::Select),
        ])
        .unwrap();
        let mut grid = DataGrid::new(rows, schema);
        assert_eq!(grid.set_page(4), 4);

        grid.set_filter("kind", FilterValue::set(["rare"])).unwrap();
        let view = grid.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.len(), 5);

        // a restored query with a stale page is clamped too
        let restored = QueryState::new().with_page(9);
        let view = derive_view(grid.rows(), grid.schema(), &restored, grid.row_key(), true);
        assert_eq!(view.page, 4);
        assert_eq!(view.len(), 10);
    }

    #[test]
    fn test_empty_result_is_a_view_state() {
        let mut grid = DataGrid::new(people(), people_schema());
        grid.set_search("zzz");
        let view = grid.view();
        assert!(view.is_empty());
        assert_eq!(view.total_filtered, 0);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.range_label(), "0 of 0");
    }

    #[test]
    fn test_query_state_restored_from_json() {
        let query = QueryState::from_json(
            r#"{"search": "a", "sort": {"column": "name", "direction": "desc"}, "selected": ["3"]}"#,
        )
        .unwrap();
        let grid = DataGrid::new(people(), people_schema())
            .with_row_key(RowKey::field("id"))
            .with_query(query);
        let view = grid.view();
        assert_eq!(ids(&view), vec![1, 2]);
        assert!(grid.is_selected(&RowId::Key("3".into())));
    }

    #[test]
    fn test_listener_sees_every_change() {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let mut grid = DataGrid::new(people(), people_schema());
        let sink = Rc::clone(&log);
        grid.on_event(move |event| {
            sink.borrow_mut().push(serde_json::to_value(event).unwrap()["type"].as_str().unwrap().to_string());
        });

        grid.set_search("b");
        grid.set_filter("name", FilterValue::text("o")).unwrap();
        grid.toggle_sort("id").unwrap();
        grid.select_all(SelectScope::Filtered);
        grid.export(ExportFormat::Csv, ExportScope::Selected);
        grid.clear_sort();

        assert_eq!(
            *log.borrow(),
            vec!["search", "filter", "sort", "row_select", "export", "sort"]
        );
    }

    #[test]
    fn test_accessor_and_custom_columns() {
        let rows = vec![
            json!({"first": "Ada", "last": "Lovelace", "born": "1815-12-10"}),
            json!({"first": "Alan", "last": "Turing", "born": "1912-06-23"}),
            json!({"first": "Grace", "last": "Hopper", "born": "1906-12-09"}),
        ];
        let schema = Schema::new(vec![
            Column::new("full", "Full name", ColumnKind::Text).accessor(|r: &Value| {
                format!("{} {}", r["first"].as_str().unwrap_or(""), r["last"].as_str().unwrap_or("")).into()
            }),
            Column::new("born", "Born", ColumnKind::Date),
            Column::new("badge", "Badge", ColumnKind::Custom)
                .field("last")
                .render(|v, _| format!("[{}]", v))
                .sortable(false)
                .searchable(false),
        ])
        .unwrap();

        let mut grid = DataGrid::new(rows, schema).with_row_key(RowKey::field("last"));
        grid.toggle_sort("born").unwrap();
        let names: Vec<String> = grid.view().rows.iter().map(|r| r["last"].as_str().unwrap().to_string()).collect();
        assert_eq!(names, vec!["Lovelace", "Hopper", "Turing"]);

        grid.set_search("ada l");
        assert_eq!(grid.view().total_filtered, 1);

        // rendered text is not searched for a non-searchable column
        grid.set_search("[turing]");
        assert_eq!(grid.view().total_filtered, 0);

        grid.set_search("");
        let snapshot = grid.export(ExportFormat::Json, ExportScope::Filtered);
        assert_eq!(snapshot.rows[0], vec!["Ada Lovelace", "1815-12-10", "[Lovelace]"]);
        assert!(matches!(grid.toggle_sort("badge"), Err(GridError::NotSortable(_))));
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    fn any_rows() -> impl Strategy<Value = Vec<Value>> {
        let name = prop::sample::select(vec!["Ann", "ann", "Bob", "bob", "Cy", "Dana", ""]);
        let team = prop::sample::select(vec!["red", "blue", "green"]);
        let score = prop_oneof![Just(None), (-20i64..20).prop_map(Some)];
        prop::collection::vec((name, team, score), 0..40).prop_map(|cells| {
            cells
                .into_iter()
                .enumerate()
                .map(|(i, (name, team, score))| {
                    json!({"id": i + 1, "name": name, "team": team, "score": score})
                })
                .collect()
        })
    }

    fn any_schema<T: Row>() -> Schema<T> {
        Schema::new(vec![
            Column::new("id", "ID", ColumnKind::Number).searchable(false),
            Column::new("name", "Name", ColumnKind::Text),
            Column::new("team", "Team", ColumnKind::Select),
            Column::new("score", "Score", ColumnKind::Number),
        ])
        .unwrap()
    }

    fn id_list<T: Row>(view: &DerivedView<'_, T>) -> Vec<i64> {
        view.rows.iter().filter_map(|r| r.field("id").as_i64()).collect()
    }

    fn unpaged(rows: &[Value], query: &QueryState) -> Vec<i64> {
        id_list(&derive_view(rows, &any_schema(), query, &RowKey::field("id"), false))
    }

    proptest! {
        #[test]
        fn prop_derive_is_idempotent(rows in any_rows(), search in "[a-dA-D]{0,2}", page in 0usize..6) {
            let query = QueryState::new()
                .with_search(search)
                .with_sort(SortState::descending("score"))
                .with_page(page);
            let schema = any_schema();
            let a = derive_view(&rows, &schema, &query, &RowKey::field("id"), true);
            let b = derive_view(&rows, &schema, &query, &RowKey::field("id"), true);
            prop_assert_eq!(&a.indices, &b.indices);
            prop_assert_eq!(&a.row_ids, &b.row_ids);
            prop_assert_eq!((a.page, a.total_pages, a.total_filtered), (b.page, b.total_pages, b.total_filtered));
        }

        #[test]
        fn prop_search_never_adds_rows(rows in any_rows(), search in "[a-zA-Z]{1,3}") {
            let all = unpaged(&rows, &QueryState::new());
            let some = unpaged(&rows, &QueryState::new().with_search(search));
            prop_assert!(some.len() <= all.len());
            prop_assert!(some.iter().all(|id| all.contains(id)));
        }

        #[test]
        fn prop_filters_compose_as_intersection(
            rows in any_rows(),
            team in prop::sample::select(vec!["red", "blue", "green"]),
            needle in "[abno]{1,2}",
        ) {
            let f1 = FilterValue::set([team]);
            let f2 = FilterValue::text(needle);
            let both = QueryState::new()
                .with_filter("team", f1.clone())
                .with_filter("name", f2.clone());
            let combined = unpaged(&rows, &both);

            let first = derive_view(&rows, &any_schema(), &QueryState::new().with_filter("team", f1), &RowKey::Index, false);
            let narrowed: Vec<&Value> = first.rows.clone();
            let second = derive_view(
                &narrowed,
                &any_schema::<&Value>(),
                &QueryState::new().with_filter("name", f2),
                &RowKey::Index,
                false,
            );
            prop_assert_eq!(combined, id_list(&second));
        }

        #[test]
        fn prop_sort_is_stable(rows in any_rows()) {
            let query = QueryState::new().with_sort(SortState::ascending("team"));
            let sorted = derive_view(&rows, &any_schema(), &query, &RowKey::Index, false);
            for pair in sorted.rows.windows(2) {
                if pair[0]["team"] == pair[1]["team"] {
                    prop_assert!(pair[0]["id"].as_i64() < pair[1]["id"].as_i64());
                }
            }
        }

        #[test]
        fn prop_direction_toggle_round_trips(rows in any_rows()) {
            let asc = unpaged(&rows, &QueryState::new().with_sort(SortState::ascending("score")));
            let desc_query = QueryState::new().with_sort(SortState::descending("score"));
            let desc = derive_view(&rows, &any_schema(), &desc_query, &RowKey::Index, false);
            let again = unpaged(&rows, &QueryState::new().with_sort(SortState::ascending("score")));
            prop_assert_eq!(&asc, &again);

            let scores: Vec<i64> = desc.rows.iter().filter_map(|r| r["score"].as_i64()).collect();
            prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        }

        #[test]
        fn prop_pages_cover_filtered_sequence(rows in any_rows(), page_size in 1usize..12) {
            let base = QueryState::new()
                .with_sort(SortState::ascending("name"))
                .with_page_size(page_size);
            let full = unpaged(&rows, &base);
            let schema = any_schema();
            let total_pages = derive_view(&rows, &schema, &base, &RowKey::Index, true).total_pages;

            let mut stitched = Vec::new();
            for page in 1..=total_pages {
                let query = base.clone().with_page(page);
                let view = derive_view(&rows, &schema, &query, &RowKey::Index, true);
                prop_assert!(view.len() <= page_size);
                stitched.extend(id_list(&view));
            }
            prop_assert_eq!(stitched, full);
        }
    }
}
