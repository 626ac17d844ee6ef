use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use dashboard_layout::cli::{CliArgs, Command};
use dashboard_layout::config::DashboardConfig;
use dashboard_layout::model::DashboardModel;
use dashboard_layout::persistence::FileGateway;
use dashboard_layout::render::{outline, render_all, SummaryRenderer};
use dashboard_layout::runtime::Session;

fn main() -> Result<()> {
    dashboard_layout::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load_from(path),
        None => DashboardConfig::load(),
    };
    let gateway = match &args.layout {
        Some(path) => FileGateway::new(path),
        None => FileGateway::default_location()?,
    };
    let layout_path = gateway.path().to_path_buf();

    let mut session = Session::new(DashboardModel::from_config(config), Arc::new(gateway));
    session.load_blocking();
    if let Some(err) = &session.model().persistence.last_error {
        bail!("failed to load {}: {}", layout_path.display(), err);
    }

    let msg = args.command.to_msg().map_err(anyhow::Error::msg)?;
    if let Some(msg) = msg {
        session.dispatch(msg);
        if let Some(err) = &session.model().last_error {
            bail!("{}", err);
        }
        let saved = session
            .flush()
            .with_context(|| format!("failed to save {}", layout_path.display()))?;
        if !saved {
            eprintln!("layout unchanged");
        }
        print!("{}", outline(&session.model().layout));
        return Ok(());
    }

    match args.command {
        Command::Bindings => {
            for line in render_all(&session.model().layout, &SummaryRenderer) {
                println!("{}", line);
            }
        }
        Command::Check => {
            let layout = &session.model().layout;
            let report = layout.validate();
            for violation in &report.violations {
                println!("{}", violation);
            }
            if session.model().is_dirty() {
                println!("stored layout is not normalized");
            }
            if !report.is_structurally_sound() {
                bail!("{} violation(s) found", report.violations.len());
            }
            println!(
                "ok: {} panels, {} leaves",
                layout.ids().len(),
                layout.leaf_count()
            );
        }
        _ => print!("{}", outline(&session.model().layout)),
    }

    Ok(())
}
