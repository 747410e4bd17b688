//! `gz compare`: side-by-side attribute table for several ganzhi.
//!
//! Columns follow the order given on the command line. A name that cannot be
//! resolved still gets a column, filled with `-`.

use std::io::{self, Write};

use clap::Args;

use ganzhi_core::{
    Cell, CompareRow, ComparisonMatrix, ComparisonMatrixBuilder, DetailAggregator,
    validate_selection,
};

use crate::cmd::Context;
use crate::output::{fail, pad, render_mode};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Ganzhi names, in column order.
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

/// Execute `gz compare <name>...`.
///
/// # Errors
///
/// Returns an error if the selection breaks the configured limits, the
/// dataset fails to load, or output rendering fails.
pub fn run_compare(args: &CompareArgs, ctx: &Context) -> anyhow::Result<()> {
    let names: Vec<&str> = args.names.iter().map(|n| n.trim()).collect();
    let limits = ctx.config.project.compare.limits();
    validate_selection(&names, limits).map_err(|err| fail(ctx.output, &err))?;

    let catalog = ctx.catalog()?;
    let matrix = ComparisonMatrixBuilder::new().build(&names, &DetailAggregator::new(&catalog));

    render_mode(ctx.output, &matrix, render_text, render_pretty)
}

/// Rows with a display value; the action row is a UI slot with nothing to print.
fn printable_rows(matrix: &ComparisonMatrix) -> impl Iterator<Item = &CompareRow> {
    matrix
        .rows
        .iter()
        .filter(|row| !row.cells.iter().all(|c| matches!(c, Cell::Action)))
}

fn render_text(matrix: &ComparisonMatrix, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "field\t{}", matrix.columns.join("\t"))?;
    for row in printable_rows(matrix) {
        let cells: Vec<&str> = row.cells.iter().map(Cell::display).collect();
        writeln!(w, "{}\t{}", row.label, cells.join("\t"))?;
    }
    Ok(())
}

fn render_pretty(matrix: &ComparisonMatrix, w: &mut dyn Write) -> io::Result<()> {
    const LABEL_WIDTH: usize = 10;
    const CELL_WIDTH: usize = 10;

    write!(w, "{}", pad("", LABEL_WIDTH))?;
    for column in &matrix.columns {
        write!(w, "{}", pad(column, CELL_WIDTH))?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "{:-<width$}",
        "",
        width = LABEL_WIDTH + CELL_WIDTH * matrix.columns.len()
    )?;
    for row in printable_rows(matrix) {
        write!(w, "{}", pad(row.label, LABEL_WIDTH))?;
        for cell in &row.cells {
            write!(w, "{}", pad(cell.display(), CELL_WIDTH))?;
        }
        writeln!(w)?;
    }
    Ok(())
}
