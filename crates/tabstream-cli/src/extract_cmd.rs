use tabstream::{
    Flavor, ParsingReport, ReadOptions, Table, TableGrid, TableList, plot, read_pdf,
};
use tracing::{debug, warn};

use crate::cli::{Cli, OutputFormat};
use crate::shared::{fail, require_file};

pub fn run(cli: &Cli) -> Result<(), i32> {
    let path = cli.input_path();
    require_file(&path)?;
    let options = read_options(cli)?;

    let tables = read_pdf(&path, &options).map_err(|e| fail("failed to read tables", e))?;
    debug!(tables = tables.len(), "read {}", path.display());

    let selected: Vec<&Table> = if cli.all_tables {
        tables.iter().collect()
    } else {
        tables.first().into_iter().collect()
    };
    if selected.is_empty() {
        warn!(file = %path.display(), "no tables found");
    }

    match cli.format {
        OutputFormat::Text => write_text(cli, &tables, &selected),
        OutputFormat::Json => {
            save_plot(cli, &tables, selected.first().copied())?;
            println!("{}", render_json(&selected)?);
            Ok(())
        }
        OutputFormat::Csv => {
            save_plot(cli, &tables, selected.first().copied())?;
            print!("{}", render_csv(&selected));
            Ok(())
        }
    }
}

fn read_options(cli: &Cli) -> Result<ReadOptions, i32> {
    let flavor: Flavor = cli.flavor.parse().map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    Ok(ReadOptions {
        pages: cli.pages.clone(),
        flavor,
        table_areas: cli.areas.clone(),
        columns: cli.columns.clone(),
        strip_text: cli.strip.clone(),
        row_tol: cli.row_tol,
        ..ReadOptions::default()
    })
}

/// Report, plot, grid, then `pause`.
fn write_text(cli: &Cli, tables: &TableList, selected: &[&Table]) -> Result<(), i32> {
    if selected.is_empty() {
        println!("{}", ParsingReport::default());
        save_plot(cli, tables, None)?;
        println!("{}", TableGrid::empty());
    }
    for (i, table) in selected.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", table.parsing_report);
        if i == 0 {
            save_plot(cli, tables, Some(*table))?;
        }
        println!("{}", table.grid());
    }
    println!("pause");
    Ok(())
}

/// Build the debug plot of `table`; it is written only when `--plot` is set.
fn save_plot(cli: &Cli, tables: &TableList, table: Option<&Table>) -> Result<(), i32> {
    let Some((table, page)) = table.and_then(|t| tables.page_of(t).map(|p| (t, p))) else {
        if cli.plot.is_some() {
            warn!("no table found, plot not written");
        }
        return Ok(());
    };
    let svg = plot(table, page, cli.plot_kind.into());
    debug!(page = table.page, order = table.order, bytes = svg.len(), "built plot");

    if let Some(out) = &cli.plot {
        std::fs::write(out, svg)
            .map_err(|e| fail(&format!("failed to write plot {}", out.display()), e))?;
    }
    Ok(())
}

fn render_json(selected: &[&Table]) -> Result<String, i32> {
    let tables: Vec<serde_json::Value> = selected
        .iter()
        .map(|t| {
            let (rows, cols) = t.shape();
            serde_json::json!({
                "page": t.page,
                "order": t.order,
                "shape": [rows, cols],
                "parsing_report": t.parsing_report,
                "data": t.data(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "tables": tables }))
        .map_err(|e| fail("failed to serialize tables", e))
}

fn render_csv(selected: &[&Table]) -> String {
    let mut out = String::from("accuracy,whitespace,order,page\n");
    if selected.is_empty() {
        let r = ParsingReport::default();
        out.push_str(&report_record(&r));
    }
    for (i, table) in selected.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str("accuracy,whitespace,order,page\n");
        }
        out.push_str(&report_record(&table.parsing_report));
        out.push('\n');
        out.push_str(&table.to_csv());
    }
    out
}

fn report_record(r: &ParsingReport) -> String {
    format!("{},{},{},{}\n", r.accuracy, r.whitespace, r.order, r.page)
}
