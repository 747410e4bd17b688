//! `gz nayin`: browse the catalog by nayin.
//!
//! With no filter, prints the nayin groups in cycle order. `--name`,
//! `--status` and `--magnitude` narrow to a flat list of entries instead.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;

use ganzhi_core::browse::{Browser, NayinEntry, NayinGroup};
use ganzhi_core::model::{LifeStage, Magnitude};

use crate::cmd::{Context, parse_arg};
use crate::output::{Renderable, pad, render_list};

#[derive(Args, Debug)]
pub struct NayinArgs {
    /// Entries whose nayin name contains this text.
    #[arg(long)]
    pub name: Option<String>,

    /// Entries in this life-cycle stage (长生, 帝旺, … or birth, prime, …).
    #[arg(long)]
    pub status: Option<String>,

    /// Entries of this magnitude (盛大/小弱 or grand/small).
    #[arg(long)]
    pub magnitude: Option<String>,

    /// List the life-cycle stages present in the catalog.
    #[arg(long, conflicts_with_all = ["name", "status", "magnitude"])]
    pub statuses: bool,
}

impl NayinArgs {
    const fn has_filter(&self) -> bool {
        self.name.is_some() || self.status.is_some() || self.magnitude.is_some()
    }
}

impl Renderable for NayinGroup<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let members: Vec<&str> = self.members.iter().map(|m| m.ganzhi).collect();
        writeln!(
            w,
            "{} {} {}  {}",
            pad(self.name, 10),
            self.element,
            self.magnitude,
            members.join(" ")
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let members: Vec<&str> = self.members.iter().map(|m| m.ganzhi).collect();
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            self.name,
            self.element,
            self.magnitude,
            members.join(",")
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["nayin", "element", "magnitude", "members"]
    }
}

impl Renderable for NayinEntry<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {} {} {} {}",
            self.ganzhi,
            pad(&self.nayin.name, 10),
            self.nayin.element,
            pad(self.nayin.stage.label(), 4),
            self.nayin.magnitude
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            self.ganzhi, self.nayin.name, self.nayin.element, self.nayin.stage, self.nayin.magnitude
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ganzhi", "nayin", "element", "status", "magnitude"]
    }
}

#[derive(Debug, Serialize)]
struct StageRow {
    status: LifeStage,
}

impl Renderable for StageRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.status)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.status)
    }
}

/// Execute `gz nayin`.
///
/// # Errors
///
/// Returns an error if a filter value is invalid, the dataset fails to
/// load, or output fails.
pub fn run_nayin(args: &NayinArgs, ctx: &Context) -> anyhow::Result<()> {
    let status: Option<LifeStage> = args
        .status
        .as_deref()
        .map(|raw| parse_arg(ctx.output, raw))
        .transpose()?;
    let magnitude: Option<Magnitude> = args
        .magnitude
        .as_deref()
        .map(|raw| parse_arg(ctx.output, raw))
        .transpose()?;

    let catalog = ctx.catalog()?;
    let browser = Browser::new(&catalog);

    if args.statuses {
        let rows: Vec<StageRow> = browser
            .statuses()
            .into_iter()
            .map(|status| StageRow { status })
            .collect();
        return render_list(&rows, ctx.output);
    }

    if !args.has_filter() {
        return render_list(&browser.nayin_groups(), ctx.output);
    }

    let query = args.name.as_deref().unwrap_or("").trim();
    let base = match (status, magnitude) {
        (Some(stage), _) => browser.by_status(stage),
        (None, Some(m)) => browser.by_magnitude(m),
        (None, None) => browser.by_nayin_name(query),
    };
    let entries: Vec<NayinEntry<'_>> = base
        .into_iter()
        .filter(|e| e.nayin.name.contains(query))
        .filter(|e| magnitude.is_none_or(|m| e.nayin.magnitude == m))
        .collect();
    render_list(&entries, ctx.output)
}
