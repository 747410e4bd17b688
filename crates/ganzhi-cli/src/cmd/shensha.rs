//! `gz shensha`: auspicious entities (神煞) and the ganzhi carrying them.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;

use ganzhi_core::ErrorCode;
use ganzhi_core::browse::{Browser, Carrier};

use crate::cmd::Context;
use crate::output::{CliError, Renderable, render_error, render_list};

#[derive(Args, Debug)]
pub struct ShenshaArgs {
    /// Show the ganzhi carrying this entity; omit to list all entity names.
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct NameRow<'a> {
    name: &'a str,
}

impl Renderable for NameRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.name)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.name)
    }
}

impl Renderable for Carrier<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        if self.self_seated {
            writeln!(w, "{} (自坐)", self.ganzhi)
        } else {
            writeln!(w, "{}", self.ganzhi)
        }
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}", self.ganzhi, self.self_seated)
    }

    fn table_headers() -> &'static [&'static str] {
        &["ganzhi", "self_seated"]
    }
}

/// Execute `gz shensha [name]`.
///
/// # Errors
///
/// Returns an error if the dataset fails to load, the named entity is
/// carried by no ganzhi, or output fails.
pub fn run_shensha(args: &ShenshaArgs, ctx: &Context) -> anyhow::Result<()> {
    let catalog = ctx.catalog()?;
    let browser = Browser::new(&catalog);

    let Some(name) = args.name.as_deref().map(str::trim) else {
        let rows: Vec<NameRow<'_>> = browser
            .auspicious_names()
            .into_iter()
            .map(|name| NameRow { name })
            .collect();
        return render_list(&rows, ctx.output);
    };

    let carriers = browser.carriers_of(name);
    if carriers.is_empty() {
        render_error(
            ctx.output,
            &CliError::from_code(ErrorCode::EntityNotFound, format!("no ganzhi carries '{name}'"))
                .with_suggestion("run `gz shensha` to list known names"),
        )?;
        anyhow::bail!("no ganzhi carries '{name}'");
    }
    render_list(&carriers, ctx.output)
}
