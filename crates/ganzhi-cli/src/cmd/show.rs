//! `gz show`: everything known about one ganzhi.

use std::io::{self, Write};

use clap::Args;

use ganzhi_core::{DetailAggregator, DetailView};

use crate::cmd::Context;
use crate::output::{fail, pad, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ganzhi name, e.g. 甲子.
    pub name: String,
}

/// Execute `gz show <name>`.
///
/// # Errors
///
/// Returns an error if the dataset fails to load, the name is unknown, the
/// entity's data is inconsistent, or output rendering fails.
pub fn run_show(args: &ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let catalog = ctx.catalog()?;
    let view = DetailAggregator::new(&catalog)
        .aggregate(args.name.trim())
        .map_err(|err| fail(ctx.output, &err))?;

    render_mode(ctx.output, &view, render_text, render_pretty)
}

fn render_text(view: &DetailView, w: &mut dyn Write) -> io::Result<()> {
    let e = &view.entity;
    let n = &view.nayin;
    writeln!(w, "name\t{}", e.name)?;
    writeln!(w, "stem\t{}\t{}", e.stem, e.stem_element)?;
    writeln!(w, "branch\t{}\t{}", e.branch, e.branch_element)?;
    writeln!(w, "polarity\t{}", e.polarity)?;
    writeln!(w, "direction\t{}", e.direction)?;
    writeln!(w, "season\t{}\t{}", e.season, e.month)?;
    writeln!(
        w,
        "nayin\t{}\t{}\t{}\t{}",
        n.name, n.element, n.stage, n.magnitude
    )?;
    for s in &view.symbolism {
        writeln!(w, "symbol\t{}\t{}\t{}", s.tier, s.category, s.content)?;
    }
    for a in &view.auspicious {
        writeln!(w, "shensha\t{}\t{}", a.name, a.fortune)?;
    }
    for p in &view.preferences {
        writeln!(
            w,
            "preference\t{}\t{}\t{}",
            p.preference, p.target_kind, p.target_value
        )?;
    }
    for r in &view.relations {
        writeln!(w, "relation\t{}\t{}", r.relation_type, r.other)?;
    }
    Ok(())
}

fn render_pretty(view: &DetailView, w: &mut dyn Write) -> io::Result<()> {
    let e = &view.entity;
    let n = &view.nayin;

    pretty_section(w, &format!("{}  (第 {} 位)", e.name, e.cycle_index + 1))?;
    pretty_kv(w, "天干", format!("{} ({})", e.stem, e.stem_element))?;
    pretty_kv(w, "地支", format!("{} ({})", e.branch, e.branch_element))?;
    pretty_kv(w, "阴阳", e.polarity.label())?;
    pretty_kv(w, "方位", e.direction.label())?;
    pretty_kv(w, "季节", format!("{} {}", e.season, e.month))?;
    writeln!(w)?;

    pretty_section(w, "纳音")?;
    pretty_kv(w, "名称", &n.name)?;
    pretty_kv(w, "五行", n.element.label())?;
    pretty_kv(w, "状态", n.stage.label())?;
    pretty_kv(w, "盛衰", n.magnitude.label())?;
    if let Some(note) = &n.stage_note {
        pretty_kv(w, "说明", note)?;
    }

    if !view.symbolism.is_empty() {
        writeln!(w)?;
        pretty_section(w, "象意")?;
        for s in &view.symbolism {
            writeln!(w, "[{}] {} {}", s.tier, pad(&s.category, 8), s.content)?;
            if let Some(desc) = &s.description {
                writeln!(w, "      {desc}")?;
            }
        }
    }

    if !view.auspicious.is_empty() {
        writeln!(w)?;
        pretty_section(w, "神煞")?;
        for a in &view.auspicious {
            let seated = if a.self_seated { " (自坐)" } else { "" };
            writeln!(w, "{} {}{seated}", a.fortune, a.name)?;
            if let Some(desc) = &a.description {
                writeln!(w, "   {desc}")?;
            }
        }
    }

    if !view.preferences.is_empty() {
        writeln!(w)?;
        pretty_section(w, "喜忌")?;
        for p in &view.preferences {
            writeln!(w, "{} {}: {}", p.preference, p.target_kind, p.target_value)?;
        }
    }

    if !view.relations.is_empty() {
        writeln!(w)?;
        pretty_section(w, "关系")?;
        for r in &view.relations {
            let arrow = if r.outgoing { "→" } else { "←" };
            write!(w, "{} {arrow} {}", pad(r.relation_type.label(), 8), r.other)?;
            match &r.remark {
                Some(remark) => writeln!(w, "  {remark}")?,
                None => writeln!(w)?,
            }
        }
    }
    Ok(())
}
