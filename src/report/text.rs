use crate::model::AntibodyField;
use crate::model::volume::calculate_volume;
use crate::panels::LoadAudit;
use crate::report::{format_decimal, format_f64_2, render_table};
use crate::session::{HistoryEntry, Session};

pub fn render_selection_list(session: &Session, query: &str) -> String {
    let mut out = String::new();
    let hits = session.search(query);
    if hits.is_empty() {
        out.push_str(&format!("No antibodies match {:?}\n", query.trim()));
        return out;
    }
    for ab in hits {
        let mark = if session.is_selected(ab.id) { 'x' } else { ' ' };
        out.push_str(&format!("[{}] {:>3}  {}\n", mark, ab.id, ab.label()));
    }
    out
}

pub fn render_panel_summary(session: &Session, panel_name: &str, cell_count: f64) -> String {
    let mut out = String::new();
    let name = if panel_name.trim().is_empty() {
        "(unnamed)"
    } else {
        panel_name.trim()
    };
    out.push_str(&format!("Panel name: {}\n", name));
    out.push_str(&format!("Cell count (millions): {}\n", format_f64_2(cell_count)));
    out.push_str("Panel Summary\n");

    let records = session.selected_records();
    if records.is_empty() {
        out.push_str("  No antibodies selected\n");
        return out;
    }
    for ab in records {
        out.push_str(&format!(
            "  {} -> {} µL\n",
            ab.label(),
            format_f64_2(calculate_volume(ab, cell_count))
        ));
    }
    out
}

pub fn render_inventory(session: &Session) -> String {
    let mut headers: Vec<&str> = AntibodyField::all().iter().map(|f| f.name()).collect();
    headers.push("");
    let rows: Vec<Vec<String>> = session
        .inventory()
        .iter()
        .map(|ab| {
            vec![
                ab.id.to_string(),
                ab.antigen.clone(),
                ab.clone.clone(),
                ab.metal.clone(),
                format_decimal(ab.concentration),
                format_decimal(ab.volume_per_test),
                format_decimal(ab.stock_volume),
                format_decimal(ab.alert_threshold),
                ab.stain_type.to_string(),
                if ab.is_below_alert() {
                    "LOW".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();
    if rows.is_empty() {
        return "Inventory is empty\n".to_string();
    }
    render_table(&headers, &rows)
}

pub fn render_alerts(session: &Session) -> String {
    let alerts = session.low_stock_alerts();
    if alerts.is_empty() {
        return "All stock above alert thresholds\n".to_string();
    }
    let mut out = String::new();
    for a in alerts {
        out.push_str(&format!(
            "LOW {:>3}  {}  stock {} µL < alert {} µL\n",
            a.id,
            a.label,
            format_decimal(a.stock_volume),
            format_decimal(a.alert_threshold)
        ));
    }
    out
}

pub fn render_saved_panels(session: &Session) -> String {
    let panels = session.saved_panels();
    if panels.is_empty() {
        return "No saved panels\n".to_string();
    }
    let mut out = String::new();
    for p in panels {
        out.push_str(&format!(
            "#{} {} - created by {} at {} ({} antibodies)\n",
            p.id,
            p.name,
            p.created_by,
            p.created_at.format("%Y-%m-%d %H:%M:%S"),
            p.antibody_ids.len()
        ));
    }
    out
}

pub fn render_history(session: &Session) -> String {
    let history = session.history();
    if history.is_empty() {
        return "No panels executed yet\n".to_string();
    }
    let mut out = String::new();
    for entry in history {
        out.push_str(&render_history_entry(entry));
    }
    out
}

pub fn render_history_entry(entry: &HistoryEntry) -> String {
    let mut out = format!(
        "{}  {}  by {}  cells {}M  total {} µL\n",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.panel_name,
        entry.user,
        format_f64_2(entry.cell_count),
        format_f64_2(entry.total_volume())
    );
    for ab in &entry.antibodies {
        out.push_str(&format!(
            "  {} ({}) {} µL\n",
            ab.antigen,
            ab.metal,
            format_f64_2(ab.volume_used)
        ));
    }
    out
}

pub fn render_templates(session: &Session) -> String {
    let templates = session.templates();
    if templates.is_empty() {
        return "No templates\n".to_string();
    }
    let mut out = String::new();
    for (i, t) in templates.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({} antibodies)\n",
            i + 1,
            t.name,
            t.antibody_ids.len()
        ));
    }
    out
}

pub fn render_load_audit(audit: &LoadAudit) -> String {
    let mut out = format!(
        "Loaded {}: {} of {} antibodies\n",
        audit.source, audit.resolved, audit.requested
    );
    if !audit.missing.is_empty() {
        let ids: Vec<String> = audit.missing.iter().map(|id| id.to_string()).collect();
        out.push_str(&format!("Not in inventory: {}\n", ids.join(", ")));
    }
    out
}
