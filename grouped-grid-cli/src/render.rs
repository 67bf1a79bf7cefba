//! Text and JSON output of a grid

use std::io;
use std::io::Write;

use grouped_grid_lib::controller::GridStore;
use grouped_grid_lib::engine::ColumnDescriptor;
use grouped_grid_lib::footer::Footer;
use grouped_grid_lib::model::Group;
use grouped_grid_lib::model::Grouping;
use grouped_grid_lib::model::Record;
use grouped_grid_lib::resources::Resources;
use serde_json::json;

/// Pixels per character when mapping column widths to text.
const PIXELS_PER_CHAR: i32 = 8;
const MIN_CHARS: usize = 6;
const MAX_CHARS: usize = 32;

fn column_chars(column: &ColumnDescriptor) -> usize {
    ((column.min_width / PIXELS_PER_CHAR).max(0) as usize).clamp(MIN_CHARS, MAX_CHARS)
}

/// Display text of one cell: the formatted value when present.
fn cell_text(record: &Record, column: &str) -> String {
    record
        .get_formatted_value(column)
        .map(str::to_string)
        .unwrap_or_else(|| record.get_value(column).to_key_string())
}

/// Pads or truncates `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

// =============================================================================
// Text
// =============================================================================

pub fn write_text(
    out: &mut impl Write,
    store: &GridStore,
    footer: &Footer,
    resources: &dyn Resources,
) -> io::Result<()> {
    let columns = store.descriptors();
    let widths: Vec<usize> = columns.iter().map(column_chars).collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| fit(&header_text(c), *w))
        .collect();
    writeln!(out, "{}", header.join(" ").trim_end())?;
    writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1)))?;

    if store.rendered_ids().is_empty() {
        writeln!(out, "{}", resources.get_string("Label_NoRecords"))?;
    } else {
        match store.grouping() {
            Some(grouping) if !grouping.is_empty() => {
                for group in &grouping.groups {
                    write_group(out, store, grouping, group, &widths)?;
                }
            }
            _ => write_rows(out, store, store.rendered_ids(), &widths, 0)?,
        }
    }

    writeln!(out)?;
    match &footer.full_screen_label {
        Some(label) => writeln!(out, "{}  |  {}", footer.status(), label),
        None => writeln!(out, "{}", footer.status()),
    }
}

fn header_text(column: &ColumnDescriptor) -> String {
    let mut text = column.name.clone();
    if column.is_sorted {
        text.push(if column.is_sorted_descending { '↓' } else { '↑' });
    }
    if column.is_filtered {
        text.push('*');
    }
    text
}

fn write_group(
    out: &mut impl Write,
    store: &GridStore,
    grouping: &Grouping,
    group: &Group,
    widths: &[usize],
) -> io::Result<()> {
    let indent = "  ".repeat(group.level as usize);
    let marker = if group.is_collapsed { '▸' } else { '▾' };
    if group.has_highlight() {
        writeln!(out, "{}{} {} ({}) [{}]", indent, marker, group.name, group.count, group.color)?;
    } else {
        writeln!(out, "{}{} {} ({})", indent, marker, group.name, group.count)?;
    }
    if group.is_collapsed {
        return Ok(());
    }
    match &group.children {
        Some(children) if !children.is_empty() => {
            for child in children {
                write_group(out, store, grouping, child, widths)?;
            }
            Ok(())
        }
        _ => write_rows(out, store, grouping.ids_of(group), widths, group.level as usize + 1),
    }
}

fn write_rows(
    out: &mut impl Write,
    store: &GridStore,
    ids: &[String],
    widths: &[usize],
    depth: usize,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for id in ids {
        let Some(record) = store.record(id) else {
            log::warn!("rendered id '{}' has no record", id);
            continue;
        };
        let cells: Vec<String> = store
            .descriptors()
            .iter()
            .zip(widths)
            .map(|(c, w)| fit(&cell_text(record, &c.key), *w))
            .collect();
        writeln!(out, "{}{}", indent, cells.join(" ").trim_end())?;
    }
    Ok(())
}

// =============================================================================
// JSON
// =============================================================================

pub fn to_json(store: &GridStore, footer: &Footer) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = store
        .rendered_ids()
        .iter()
        .filter_map(|id| store.record(id))
        .map(|record| {
            let cells: serde_json::Map<String, serde_json::Value> = store
                .descriptors()
                .iter()
                .map(|c| (c.key.clone(), json!(cell_text(record, &c.key))))
                .collect();
            json!({ "id": record.record_id(), "cells": cells })
        })
        .collect();

    json!({
        "columns": store.descriptors(),
        "groups": store.grouping().map(|g| &g.groups),
        "rows": rows,
        "footer": {
            "rows": footer.rows,
            "selected": footer.selected,
            "page": footer.current_page,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use grouped_grid_lib::GridConfig;
    use grouped_grid_lib::GridController;
    use grouped_grid_lib::GridService;
    use grouped_grid_lib::host::StaticDataset;
    use grouped_grid_lib::host::StaticHost;
    use grouped_grid_lib::model::Column;
    use grouped_grid_lib::DatasetUpdate;

    use super::*;

    async fn grid(config: GridConfig) -> GridController<StaticHost, StaticDataset> {
        let service = GridService::new(Arc::new(StaticHost::new()), "incident");
        let mut grid = GridController::new(service, StaticDataset::default(), config).unwrap();
        grid.update(DatasetUpdate {
            columns: vec![
                Column::new("title", "Title", "SingleLine.Text").with_order(0).with_size(120),
                Column::new("region", "Region", "SingleLine.Text").with_order(1).with_size(80),
            ],
            records: vec![
                Record::new("incident", "1").set("title", "Printer jammed").set("region", "North"),
                Record::new("incident", "2").set("title", "VPN drops").set("region", "South"),
                Record::new("incident", "3").set("title", "Laptop battery").set("region", "North"),
            ],
            ..DatasetUpdate::default()
        })
        .await;
        grid
    }

    fn render(grid: &GridController<StaticHost, StaticDataset>) -> String {
        let mut out = Vec::new();
        write_text(&mut out, grid.store(), &grid.footer(), grid.resources()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 5), "abcd…");
    }

    #[tokio::test]
    async fn flat_rows_follow_first_column() {
        let text = render(&grid(GridConfig::default()).await);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Title"));
        assert!(lines[2].starts_with("Laptop battery"));
        assert!(lines[4].starts_with("VPN drops"));
        assert!(text.contains("Rows: 0  Selected: 0"));
    }

    #[tokio::test]
    async fn collapsed_groups_hide_rows() {
        let mut grid = grid(GridConfig {
            grouping_column: Some("region".to_string()),
            ..GridConfig::default()
        })
        .await;
        grid.toggle_collapse("South");

        let text = render(&grid);
        assert!(text.contains("▾ Region: North (2)"));
        assert!(text.contains("▸ Region: South (1)"));
        assert!(!text.contains("VPN drops"));
    }

    #[tokio::test]
    async fn json_lists_rows_in_group_order() {
        let grid = grid(GridConfig {
            grouping_column: Some("region".to_string()),
            ..GridConfig::default()
        })
        .await;
        let value = to_json(grid.store(), &grid.footer());
        let ids: Vec<&str> = value["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "3", "2"]);
        assert_eq!(value["groups"][0]["key"], "North");
        assert_eq!(value["columns"][1]["fieldName"], "region");
    }
}
