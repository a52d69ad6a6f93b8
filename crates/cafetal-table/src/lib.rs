//! Cafetal Table Engine
//!
//! Client-side tabular data handling shared by every list screen.
//!
//! # Core Concepts
//!
//! - [`TableRow`]: what the engine needs from a record (identity + field text)
//! - [`ColumnDescriptor`]: key, header and render function for one column
//! - [`TableViewState`]: serializable search/page/selection/visibility state
//! - [`TableEngine`]: applies the state to a row collection
//!
//! # Example
//!
//! ```rust,ignore
//! use cafetal_table::{ColumnDescriptor, JsonRecord, TableEngine};
//!
//! let mut table = TableEngine::<JsonRecord>::builder()
//!     .column(ColumnDescriptor::field("code", "Código"))
//!     .column(ColumnDescriptor::field("status", "Estado"))
//!     .search_key("code")
//!     .page_size(10)
//!     .build(records)?;
//!
//! table.set_search_term("op-2024");
//! for row in table.page_rows() {
//!     // ...
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod column;
mod engine;
mod error;
mod row;
mod state;

pub use column::{ColumnDescriptor, ColumnSet, DisplayValue, RenderFn};
pub use engine::{ColumnToggle, RenderedRow, SelectionToggle, TableBuilder, TableEngine};
pub use error::TableError;
pub use row::{JsonRecord, TableRow};
pub use state::{clamp_page, total_pages, TableViewState, DEFAULT_PAGE_SIZE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    fn lots() -> Vec<JsonRecord> {
        vec![
            JsonRecord::new("1", json!({"lotCode": "LOT-001", "qty": 120})),
            JsonRecord::new("2", json!({"lotCode": "LOT-002", "qty": 80})),
            JsonRecord::new("3", json!({"lotCode": "MIX-003", "qty": 45})),
        ]
    }

    #[test]
    fn engine_with_json_records() {
        let mut table = TableEngine::builder()
            .column(ColumnDescriptor::field("lotCode", "Lote"))
            .column(ColumnDescriptor::field("qty", "Cantidad"))
            .search_key("lotCode")
            .page_size(2)
            .build(lots())
            .unwrap();

        assert_eq!(table.total_pages(), 2);
        table.set_search_term("lot");
        assert_eq!(table.filtered_count(), 2);
        assert_eq!(table.total_pages(), 1);

        let rendered = table.render_page();
        assert_eq!(rendered[0].cells[0].to_string(), "LOT-001");
        assert_eq!(rendered[1].cells[1].to_string(), "80");
    }

    #[test]
    fn state_roundtrips_through_json() {
        let mut table = TableEngine::builder()
            .column(ColumnDescriptor::field("lotCode", "Lote"))
            .search_key("lotCode")
            .page_size(1)
            .build(lots())
            .unwrap();
        table.set_page(3);
        table.toggle_row_selection(&"2".to_string());

        let saved = serde_json::to_string(table.state()).unwrap();
        let restored: TableViewState<String> = serde_json::from_str(&saved).unwrap();

        let mut other = TableEngine::builder()
            .column(ColumnDescriptor::field("lotCode", "Lote"))
            .search_key("lotCode")
            .build(lots())
            .unwrap();
        other.restore_state(restored);

        assert_eq!(other.state().current_page, 3);
        assert!(other.is_selected(&"2".to_string()));
    }
}
