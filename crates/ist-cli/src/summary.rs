//! Terminal tables for command results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ist_model::{OutputField, variable_labels};
use ist_report::{FrequencyRow, GroupSummary, OVERALL_GROUP, WrittenFile};
use ist_transform::{NormalizeReport, UnmappedValueWarning};

/// Row accounting for one normalization run.
pub fn report_table(report: &NormalizeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Input"), Cell::new(report.input_rows)]);
    table.add_row(vec![
        Cell::new("Dropped: pilot phase (RATRIAL missing)"),
        count_cell(report.dropped_pilot_phase, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Dropped: outcome missing"),
        count_cell(report.dropped_missing_outcome, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Dropped: treatment missing"),
        count_cell(report.dropped_missing_treatment, Color::Yellow),
    ]);
    if report.kept_missing_treatment > 0 {
        table.add_row(vec![
            Cell::new("Kept without treatment"),
            count_cell(report.kept_missing_treatment, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Output")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.output_rows).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Unmapped values by field, or `None` when every value mapped.
pub fn unmapped_table(warnings: &[UnmappedValueWarning]) -> Option<Table> {
    if warnings.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.field),
            Cell::new(&warning.value),
            count_cell(warning.count, Color::Yellow),
        ]);
    }
    Some(table)
}

/// Baseline characteristics by treatment arm.
pub fn group_table(groups: &[GroupSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Treatment"),
        header_cell("N"),
        header_cell("Age mean"),
        header_cell("Age SD"),
        header_cell("Female %"),
        header_cell("Dead or dependent %"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for group in groups {
        let is_overall = group.group == OVERALL_GROUP;
        let name = if is_overall {
            Cell::new(&group.group)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&group.group)
        };
        table.add_row(vec![
            name,
            Cell::new(group.n),
            number_cell(group.age_mean),
            number_cell(group.age_sd),
            number_cell(group.female_pct),
            number_cell(group.poor_outcome_pct),
        ]);
    }
    table
}

/// Level counts for one categorical field.
pub fn frequency_view(field: OutputField, rows: &[FrequencyRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(field.as_str()),
        header_cell("Count"),
        header_cell("%"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.level),
            Cell::new(row.count),
            Cell::new(format!("{:.1}", row.percent)),
        ]);
    }
    table
}

/// Emitted variables and their labels.
pub fn labels_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Variable"), header_cell("Label")]);
    apply_table_style(&mut table);
    for label in variable_labels() {
        table.add_row(vec![Cell::new(label.variable), Cell::new(label.label)]);
    }
    table
}

/// Output paths with size and digest.
pub fn files_table(files: &[&WrittenFile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Bytes"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for file in files {
        table.add_row(vec![
            Cell::new(file.path.display()),
            Cell::new(file.bytes),
            dim_cell(&file.sha256),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.1}")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kept_row_only_listed_in_keep_mode() {
        let report = NormalizeReport {
            input_rows: 10,
            output_rows: 8,
            dropped_pilot_phase: 2,
            ..NormalizeReport::default()
        };
        assert_eq!(report_table(&report).row_count(), 5);

        let kept = NormalizeReport {
            kept_missing_treatment: 1,
            ..report
        };
        assert_eq!(report_table(&kept).row_count(), 6);
    }

    #[test]
    fn no_unmapped_table_when_everything_mapped() {
        assert!(unmapped_table(&[]).is_none());
    }

    #[test]
    fn labels_table_has_a_row_per_output_field() {
        assert_eq!(labels_table().row_count(), OutputField::ALL.len());
    }
}
