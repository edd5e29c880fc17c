use super::*;
use crate::model::StainType;
use crate::model::seed::seed_inventory;
use crate::report::csv::{inventory_csv_string, read_inventory_csv};
use crate::report::json::render_history_json;
use crate::report::text::{
    render_history, render_inventory, render_panel_summary, render_selection_list,
};
use crate::session::{Session, StockPolicy};

fn session_with_history() -> Session {
    let mut s = Session::new(seed_inventory(), StockPolicy::Allow);
    s.login("alice").unwrap();
    s.select(1).unwrap();
    s.select(3).unwrap();
    s.execute_panel("Panel A", 8.0).unwrap();
    s
}

#[test]
fn test_format_decimal_keeps_fraction_digit() {
    assert_eq!(format_decimal(2.0), "2.0");
    assert_eq!(format_decimal(0.5), "0.5");
    assert_eq!(format_decimal(-1.0), "-1.0");
    assert_eq!(format_f64_2(0.8), "0.80");
}

#[test]
fn test_inventory_csv_header_and_rows() {
    let csv = inventory_csv_string(&seed_inventory()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "id,antigen,clone,metal,concentration,volumePerTest,stockVolume,alertThreshold,stainType"
    );
    assert_eq!(lines[1], "1,CD3,UCHT1,170Er,0.5,2.0,500.0,50.0,Extracellular");
    assert_eq!(lines[3], "3,CD8,SK1,146Nd,0.5,2.0,35.0,50.0,Intracellular");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_inventory_csv_empty_still_has_header() {
    let csv = inventory_csv_string(&[]).unwrap();
    assert_eq!(
        csv.trim_end(),
        "id,antigen,clone,metal,concentration,volumePerTest,stockVolume,alertThreshold,stainType"
    );
}

#[test]
fn test_exported_csv_reads_back() {
    let s = session_with_history();
    let csv = inventory_csv_string(s.inventory()).unwrap();
    let records = read_inventory_csv(csv.as_bytes()).unwrap();
    assert_eq!(records, s.inventory());
}

#[test]
fn test_read_csv_accepts_loose_stain_type() {
    let csv = "id,antigen,clone,metal,concentration,volumePerTest,stockVolume,alertThreshold,stainType\n\
               1,CD3,UCHT1,170Er,0.5,2.0,500.0,50.0,intracellular\n\
               2,CD4,RPA-T4,145Nd,0.5,2.0,500.0,50.0,ic\n\
               3,CD8,SK1,146Nd,0.5,2.0,35.0,50.0,EC\n";
    let records = read_inventory_csv(csv.as_bytes()).unwrap();
    let stains: Vec<StainType> = records.iter().map(|r| r.stain_type).collect();
    assert_eq!(
        stains,
        [StainType::Intracellular, StainType::Intracellular, StainType::Extracellular]
    );
}

#[test]
fn test_read_csv_rejects_bad_stain_type() {
    let csv = "id,antigen,clone,metal,concentration,volumePerTest,stockVolume,alertThreshold,stainType\n\
               1,CD3,UCHT1,170Er,0.5,2.0,500.0,50.0,Surface\n";
    assert!(read_inventory_csv(csv.as_bytes()).is_err());
}

#[test]
fn test_history_json_uses_record_keys() {
    let s = session_with_history();
    let json = render_history_json(s.history()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entry = &value[0];
    assert_eq!(entry["panelName"], "Panel A");
    assert_eq!(entry["user"], "alice");
    assert_eq!(entry["cellCount"], 8.0);
    assert!(entry["timestamp"].is_string());
    assert_eq!(entry["antibodies"][0]["antigen"], "CD3");
    assert_eq!(entry["antibodies"][0]["volumeUsed"], 4.0);
    assert_eq!(entry["antibodies"][1]["metal"], "146Nd");
}

#[test]
fn test_panel_summary_lists_volumes() {
    let mut s = Session::new(seed_inventory(), StockPolicy::Allow);
    s.select(3).unwrap();
    let text = render_panel_summary(&s, "ICS", 8.0);
    assert!(text.contains("Panel name: ICS"));
    assert!(text.contains("CD8 (146Nd) -> 0.80 µL"));

    s.clear_selection();
    assert!(render_panel_summary(&s, "", 4.0).contains("No antibodies selected"));
}

#[test]
fn test_selection_list_marks_selected() {
    let mut s = Session::new(seed_inventory(), StockPolicy::Allow);
    s.select(2).unwrap();
    let text = render_selection_list(&s, "cd");
    assert!(text.contains("[ ]   1  CD3 (170Er)"));
    assert!(text.contains("[x]   2  CD4 (145Nd)"));
    assert!(render_selection_list(&s, "zz").starts_with("No antibodies match"));
}

#[test]
fn test_inventory_table_flags_low_stock() {
    let s = Session::new(seed_inventory(), StockPolicy::Allow);
    let text = render_inventory(&s);
    let cd8 = text.lines().find(|l| l.contains("CD8")).unwrap();
    assert!(cd8.ends_with("LOW"));
    let cd3 = text.lines().find(|l| l.contains("CD3")).unwrap();
    assert!(!cd3.contains("LOW"));
}

#[test]
fn test_history_view_empty_and_filled() {
    let empty = Session::new(seed_inventory(), StockPolicy::Allow);
    assert_eq!(render_history(&empty), "No panels executed yet\n");
    let s = session_with_history();
    let text = render_history(&s);
    assert!(text.contains("Panel A  by alice  cells 8.00M"));
    assert!(text.contains("CD8 (146Nd) 0.80 µL"));
}

#[test]
fn test_table_pads_columns() {
    let rows = vec![vec!["1".to_string(), "long value".to_string()]];
    let text = render_table(&["id", "v"], &rows);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id  v");
    assert_eq!(lines[1], "--  ----------");
    assert_eq!(lines[2], "1   long value");
}
