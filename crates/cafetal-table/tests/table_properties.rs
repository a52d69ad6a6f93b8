use cafetal_table::{ColumnDescriptor, JsonRecord, TableEngine, TableRow};
use proptest::prelude::*;
use serde_json::json;

fn build(codes: &[String], page_size: usize) -> TableEngine<JsonRecord> {
    let rows = codes
        .iter()
        .enumerate()
        .map(|(i, code)| JsonRecord::new(i.to_string(), json!({ "code": code })))
        .collect();
    TableEngine::builder()
        .column(ColumnDescriptor::field("code", "Código"))
        .search_key("code")
        .page_size(page_size)
        .build(rows)
        .unwrap()
}

proptest! {
    #[test]
    fn prop_page_rows_match_search_term(
        codes in prop::collection::vec("[a-cA-C]{0,4}", 0..40),
        term in "[a-cA-C]{0,2}",
        page_size in 1_usize..8,
        page in 0_usize..12,
    ) {
        let mut table = build(&codes, page_size);
        table.set_search_term(term.clone());
        table.set_page(page);

        let needle = term.to_lowercase();
        for row in table.page_rows() {
            let text = row.field_text("code").unwrap().to_lowercase();
            prop_assert!(text.contains(&needle));
        }
        if term.is_empty() {
            prop_assert_eq!(table.filtered_count(), codes.len());
        }
    }

    #[test]
    fn prop_total_pages_and_clamp(
        codes in prop::collection::vec("[a-c]{1,3}", 0..60),
        page_size in 1_usize..15,
        requests in prop::collection::vec(0_usize..20, 1..10),
    ) {
        let mut table = build(&codes, page_size);
        let n = table.filtered_count();
        let expected = std::cmp::max(1, n.div_ceil(page_size));
        prop_assert_eq!(table.total_pages(), expected);

        for request in requests {
            let page = table.set_page(request);
            prop_assert!(page >= 1 && page <= table.total_pages());
            if n > 0 {
                prop_assert!(!table.page_rows().is_empty());
            }
        }
    }

    #[test]
    fn prop_selection_is_subset_of_rows(
        codes in prop::collection::vec("[a-c]{1,3}", 1..30),
        toggles in prop::collection::vec(0_usize..40, 0..20),
        term in "[a-c]{0,2}",
    ) {
        let mut table = build(&codes, 5);
        table.set_search_term(term);
        for t in toggles {
            table.toggle_row_selection(&t.to_string());
        }
        table.set_page(3);

        let all: Vec<String> = (0..codes.len()).map(|i| i.to_string()).collect();
        for id in &table.state().selected_row_ids {
            prop_assert!(all.contains(id));
        }
        prop_assert_eq!(table.selected_rows().len(), table.state().selected_row_ids.len());
    }
}

#[test]
fn toggle_off_page_row_updates_membership() {
    let codes: Vec<String> = (0..30).map(|i| format!("c{i}")).collect();
    let mut table = build(&codes, 10);
    assert_eq!(table.state().current_page, 1);

    table.toggle_row_selection(&"25".to_string());
    assert!(table.is_selected(&"25".to_string()));
    assert!(table.page_rows().iter().all(|r| r.id() != "25"));
}
