use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabclean_config::{SourceKind, describe_step};
use tabclean_model::format_run_timestamp;

use tabclean_cli::pipeline::{RunOutcome, SourcePlan, StepSummary};

pub fn print_run_summary(src_tag: &str, outcome: &RunOutcome) {
    println!("Source: {src_tag}");
    match outcome {
        RunOutcome::Skipped {
            last_artifact,
            last_update,
        } => {
            println!(
                "Up to date: last artifact {} ({})",
                last_artifact.display(),
                format_run_timestamp(last_update)
            );
        }
        RunOutcome::Processed {
            artifact,
            rows,
            columns,
            correction_errors,
            unclassified_columns,
            steps,
        } => {
            match artifact {
                Some(path) => println!("Artifact: {}", path.display()),
                None => println!("Artifact: not written (table save type)"),
            }
            println!("Rows: {rows}  Columns: {columns}");
            println!("{}", step_table(steps));
            if *correction_errors > 0 {
                println!("Correction errors: {correction_errors}");
            }
            if *unclassified_columns > 0 {
                println!("Columns without a data type: {unclassified_columns}");
            }
        }
    }
}

pub fn print_plan(plan: &SourcePlan) {
    println!("Configuration: {}", plan.config_path.display());
    let reader = if plan.corrected {
        "raw lines through the row corrector"
    } else {
        match plan.kind {
            SourceKind::File => "file",
            SourceKind::Query => "query",
        }
    };
    println!("Reads: {reader}");
    println!("Refresh: {}", plan.cadence);

    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Step")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, step) in plan.steps.iter().enumerate() {
        table.add_row(vec![Cell::new(index + 1), Cell::new(describe_step(step))]);
    }
    println!("{table}");
}

fn step_table(steps: &[StepSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Columns"),
        header_cell("Parse errors"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for step in steps {
        let errors = if step.parse_errors > 0 {
            Cell::new(step.parse_errors).fg(Color::Yellow)
        } else {
            Cell::new("-").add_attribute(Attribute::Dim)
        };
        table.add_row(vec![
            Cell::new(&step.description),
            Cell::new(step.columns),
            errors,
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
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
