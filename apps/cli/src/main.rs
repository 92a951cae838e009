#![deny(warnings)]

//! Headless CLI for the energy-audit desk: list projects, print energy
//! accounting and costs, import from an audit, render the charts to SVG.

mod offline;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use energy_charts::ToSvg;
use energy_client::{Backend, ClientConfig, HttpBackend};
use energy_core::{
    format_number, recent_first, sort_chronologically, Locale, PricedVector, Vector, YearStore,
};
use energy_runtime::{EnergyPage, EnergyView};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    offline: bool,
    command: Option<String>,
    project: Option<String>,
    year: Option<String>,
    out: Option<PathBuf>,
    json: bool,
    version: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Args {
    let mut parsed = Args::default();
    let mut it = args;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => parsed.config = it.next().map(PathBuf::from),
            "--offline" => parsed.offline = true,
            "--project" => parsed.project = it.next(),
            "--year" => parsed.year = it.next(),
            "--out" => parsed.out = it.next().map(PathBuf::from),
            "--json" => parsed.json = true,
            "--version" | "-V" => parsed.version = true,
            s if !s.starts_with('-') && parsed.command.is_none() => {
                parsed.command = Some(s.to_string())
            }
            _ => {}
        }
    }
    parsed
}

fn version_line() -> String {
    format!(
        "energy-cli {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHA"),
        env!("BUILD_DATE")
    )
}

const USAGE: &str = "usage: energy-cli [--config FILE] [--offline] \
<projects | energy --project ID [--json] | import --project ID --year Y | \
charts --project ID --out DIR | agenda | requests>";

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("missing {flag}\n{USAGE}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1));
    if args.version {
        println!("{}", version_line());
        return Ok(());
    }

    let cfg = ClientConfig::load(args.config.as_deref()).context("loading configuration")?;
    info!(command = ?args.command, offline = args.offline, api_url = %cfg.api_url, "starting CLI");

    let output = if args.offline {
        run(offline::demo_backend().await, &args, &cfg).await?
    } else {
        run(HttpBackend::from_config(&cfg), &args, &cfg).await?
    };
    print!("{output}");
    Ok(())
}

async fn run<B: Backend>(backend: B, args: &Args, cfg: &ClientConfig) -> Result<String> {
    let locale = cfg.locale;
    match args.command.as_deref() {
        Some("projects") => {
            let projects = recent_first(&backend.list_projects().await?);
            let mut out = String::new();
            for p in &projects {
                writeln!(
                    out,
                    "{:<12} {:<28} {:<12} {}",
                    p.id,
                    p.name(),
                    p.details.status.as_str(),
                    p.created_at
                )?;
            }
            if projects.is_empty() {
                out.push_str("no projects\n");
            }
            Ok(out)
        }
        Some("energy") => {
            let project = required(&args.project, "--project")?;
            let mut page = EnergyPage::new(backend, project, cfg);
            page.load().await?;
            let view = page.view();
            if args.json {
                let mut text = serde_json::to_string_pretty(&view)?;
                text.push('\n');
                return Ok(text);
            }
            render_energy(page.store(), &view, locale)
        }
        Some("import") => {
            let project = required(&args.project, "--project")?;
            let year = required(&args.year, "--year")?;
            let mut page = EnergyPage::new(backend, project, cfg);
            page.load().await?;
            page.import_from_audit(year).await?;
            if let Some(msg) = page.error() {
                bail!("import stored, but reloading the project failed: {msg}");
            }
            page.select_year(year);
            render_energy(page.store(), &page.view(), locale)
        }
        Some("charts") => {
            let project = required(&args.project, "--project")?;
            let Some(dir) = args.out.as_deref() else {
                bail!("missing --out\n{USAGE}");
            };
            let mut page = EnergyPage::new(backend, project, cfg);
            page.load().await?;
            let written = write_charts(&page.view(), dir).await?;
            let mut out = String::new();
            for path in written {
                writeln!(out, "{}", path.display())?;
            }
            Ok(out)
        }
        Some("agenda") => {
            let events = sort_chronologically(&backend.list_events().await?);
            let mut out = String::new();
            for e in &events {
                writeln!(
                    out,
                    "{:<20} {:<9} {}{}",
                    e.details.start,
                    e.kind().label(),
                    e.details.title,
                    e.details
                        .location
                        .as_deref()
                        .map(|l| format!(" @ {l}"))
                        .unwrap_or_default()
                )?;
            }
            Ok(out)
        }
        Some("requests") => {
            let requests = backend.list_client_requests().await?;
            let mut out = String::new();
            for r in &requests {
                let (received, total) = r.progress();
                writeln!(
                    out,
                    "{:<10} {:<28} {:<8} {received}/{total}",
                    r.id,
                    r.body.client_email,
                    r.body.status.label()
                )?;
            }
            Ok(out)
        }
        Some(other) => bail!("unknown command '{other}'\n{USAGE}"),
        None => bail!("{USAGE}"),
    }
}

fn render_energy(store: &YearStore, view: &EnergyView, locale: Locale) -> Result<String> {
    let mut out = String::new();
    if let Some(name) = &view.project_name {
        writeln!(out, "{name}")?;
    }

    write!(out, "{:<8}", "")?;
    for v in Vector::ALL {
        write!(out, "{:>14}", v.key())?;
    }
    writeln!(out)?;
    for year in &view.years {
        write!(out, "{year:<8}")?;
        for v in Vector::ALL {
            write!(out, "{:>14}", format_number(store.total(year, v), locale))?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    write!(out, "{:<8}", "")?;
    for pv in PricedVector::ALL {
        write!(out, "{:>14}", pv.vector().key())?;
    }
    writeln!(out, "{:>14}", "total")?;
    for row in &view.costs.years {
        write!(out, "{:<8}", row.year)?;
        for pv in PricedVector::ALL {
            write!(out, "{:>14}", row.cost(pv).round_dp(2))?;
        }
        writeln!(out, "{:>14}", row.total.round_dp(2))?;
    }
    writeln!(out, "grand total: {}", view.costs.grand_total.round_dp(2))?;
    if let Some(year) = &view.costs.most_expensive_year {
        writeln!(out, "most expensive year: {year}")?;
    }
    if let Some(pv) = view.costs.most_expensive_vector {
        writeln!(out, "most expensive vector: {}", pv.vector().label(locale))?;
    }
    Ok(out)
}

async fn write_charts(view: &EnergyView, dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let mut files: Vec<(String, String)> = vec![
        ("breakdown.svg".into(), view.breakdown.to_svg()?),
        ("overview.svg".into(), view.overview.to_svg()?),
        ("cost-by-year.svg".into(), view.cost_by_year.to_svg()?),
        ("cost-mix.svg".into(), view.cost_mix.to_svg()?),
    ];
    for bars in &view.vector_bars {
        files.push((format!("{}.svg", bars.vector.key()), bars.chart.to_svg()?));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, svg) in files {
        let path = dir.join(name);
        tokio::fs::write(&path, svg)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "charts written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_command_and_flags() {
        let a = args(&["--offline", "import", "--project", "demo-1", "--year", "2024"]);
        assert!(a.offline);
        assert_eq!(a.command.as_deref(), Some("import"));
        assert_eq!(a.project.as_deref(), Some("demo-1"));
        assert_eq!(a.year.as_deref(), Some("2024"));
        assert!(!a.json);
    }

    #[test]
    fn flag_values_are_not_commands() {
        let a = args(&["--config", "desk.yaml", "charts", "--out", "svg"]);
        assert_eq!(a.config, Some(PathBuf::from("desk.yaml")));
        assert_eq!(a.command.as_deref(), Some("charts"));
        assert_eq!(a.out, Some(PathBuf::from("svg")));
    }

    #[test]
    fn version_flag() {
        assert!(args(&["--version"]).version);
        assert!(version_line().starts_with("energy-cli "));
    }

    #[tokio::test]
    async fn offline_projects_are_most_recent_first() {
        let out = run(offline::demo_backend().await, &args(&["projects"]), &ClientConfig::default())
            .await
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("demo-1"));
    }

    #[tokio::test]
    async fn offline_energy_prints_costs() {
        let out = run(
            offline::demo_backend().await,
            &args(&["energy", "--project", offline::DEMO_PROJECT]),
            &ClientConfig::default(),
        )
        .await
        .unwrap();
        assert!(out.starts_with("Brasserie Dupont"));
        assert!(out.contains("2021"));
        assert!(out.contains("grand total:"));
        assert!(out.contains("most expensive vector: Électricité"));
    }

    #[tokio::test]
    async fn offline_import_adds_audit_year() {
        let out = run(
            offline::demo_backend().await,
            &args(&["import", "--project", offline::DEMO_PROJECT, "--year", "2024"]),
            &ClientConfig::default(),
        )
        .await
        .unwrap();
        let row = out.lines().find(|l| l.starts_with("2024")).unwrap();
        assert!(row.contains("121\u{202f}800"));
    }

    #[tokio::test]
    async fn unknown_project_is_an_error() {
        let err = run(
            offline::demo_backend().await,
            &args(&["energy", "--project", "nope"]),
            &ClientConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn agenda_is_chronological() {
        let out = run(offline::demo_backend().await, &args(&["agenda"]), &ClientConfig::default())
            .await
            .unwrap();
        let titles: Vec<&str> = out.lines().collect();
        assert!(titles[0].contains("Call client"));
        assert!(titles[1].contains("Visite chaufferie @ Leuze"));
        assert!(titles[2].contains("Deadline"));
    }

    #[tokio::test]
    async fn requests_show_progress() {
        let out = run(offline::demo_backend().await, &args(&["requests"]), &ClientConfig::default())
            .await
            .unwrap();
        assert!(out.contains("req-1"));
        assert!(out.contains("1/3"));
    }

    #[tokio::test]
    async fn charts_are_written_as_svg_files() {
        let dir = std::env::temp_dir().join(format!("energy-cli-charts-{}", std::process::id()));
        let dir_arg = dir.to_string_lossy().to_string();
        let out = run(
            offline::demo_backend().await,
            &args(&["charts", "--project", offline::DEMO_PROJECT, "--out", &dir_arg]),
            &ClientConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(out.lines().count(), 7);
        let overview = std::fs::read_to_string(dir.join("overview.svg")).unwrap();
        assert!(overview.contains("<polygon"));
        assert!(dir.join("electricity.svg").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_project_flag() {
        let err = run(offline::demo_backend().await, &args(&["energy"]), &ClientConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("missing --project"));
    }
}
