use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use urania::chart::{ChartData, ChartFrame, RadixChart, TransitFrame};
use urania::config::ChartSettings;
use urania::geometry::Point2;
use urania::AspectMatch;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Args {
    /// Chart data JSON: {"planets": {"Sun": [angle, speed?]}, "cusps": [...]}
    chart: PathBuf,

    /// Settings TOML (missing keys keep their defaults).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Transit chart data JSON, laid out around the radix.
    #[arg(long)]
    transit: Option<PathBuf>,

    /// Canvas width.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Wheel radius (default: half the smaller canvas side minus the margin).
    #[arg(long)]
    radius: Option<f64>,

    /// Add As, Ic, Ds and Mc as aspect targets.
    #[arg(long)]
    with_angles: bool,

    /// Print only the detected aspects.
    #[arg(long)]
    aspects_only: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Output {
    Frames {
        radix: ChartFrame,
        #[serde(skip_serializing_if = "Option::is_none")]
        transit: Option<TransitFrame>,
    },
    Aspects {
        radix: Vec<AspectMatch>,
        #[serde(skip_serializing_if = "Option::is_none")]
        transit: Option<Vec<AspectMatch>>,
    },
}

fn read_chart(path: &Path) -> anyhow::Result<ChartData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart data {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse chart data {}", path.display()))
}

fn run(args: &Args) -> anyhow::Result<Output> {
    let settings = match &args.settings {
        Some(path) => ChartSettings::load(path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => ChartSettings::default(),
    };

    let radius = args
        .radius
        .unwrap_or_else(|| args.width.min(args.height) / 2.0 - settings.margin);
    let center = Point2::new(args.width / 2.0, args.height / 2.0);
    log::info!("Radix wheel: center ({}, {}), radius {}", center.x, center.y, radius);

    let data = read_chart(&args.chart)?;
    let angles = data.angles();
    let mut radix = RadixChart::new(data, settings).context("Invalid chart data")?;
    if args.with_angles {
        match angles {
            Some(angles) => radix.add_points_of_interest(angles)?,
            None => log::warn!("--with-angles ignored: chart has no cusps"),
        }
    }
    let transit = match &args.transit {
        Some(path) => Some(radix.transit(read_chart(path)?).context("Invalid transit data")?),
        None => None,
    };

    if args.aspects_only {
        return Ok(Output::Aspects {
            radix: radix.aspects()?,
            transit: transit.as_ref().map(|t| t.aspects()).transpose()?,
        });
    }

    let frame = radix
        .frame(center, radius)
        .context("Failed to lay out radix chart")?;
    log::info!(
        "Laid out {} points, {} aspects",
        frame.points.len(),
        frame.aspects.len()
    );

    let transit = transit
        .as_ref()
        .map(|t| t.frame(center, radius))
        .transpose()
        .context("Failed to lay out transit chart")?;

    Ok(Output::Frames {
        radix: frame,
        transit,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let output = run(&args)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CHART: &str = r#"{
        "planets": {"Sun": [10.0, 1.0], "Moon": [12.0, 13.0], "Mars": [190.0, -0.3]},
        "cusps": [0, 30, 60, 90, 120, 150, 180, 210, 240, 270, 300, 330]
    }"#;

    fn write_temp(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn args(chart: &Path) -> Args {
        Args::parse_from(["urania", chart.to_str().unwrap()])
    }

    #[test]
    fn test_frame_output() {
        let chart = write_temp(CHART);
        let output = run(&args(chart.path())).unwrap();
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["radix"]["points"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["radix"]["metrics"]["radius"], 350.0);
        assert!(json.get("transit").is_none());
    }

    #[test]
    fn test_aspects_only_with_transit() {
        let chart = write_temp(CHART);
        let transit = write_temp(r#"{"planets": {"Venus": [100.0]}}"#);
        let mut args = args(chart.path());
        args.aspects_only = true;
        args.transit = Some(transit.path().to_path_buf());

        let json = serde_json::to_value(run(&args).unwrap()).unwrap();
        assert_eq!(json["radix"].as_array().map(Vec::len), Some(3));
        // Venus squares Sun, Moon and Mars
        assert_eq!(json["transit"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_angles_become_aspect_targets() {
        let chart = write_temp(CHART);
        let mut args = args(chart.path());
        args.aspects_only = true;
        args.with_angles = true;

        let json = serde_json::to_value(run(&args).unwrap()).unwrap();
        let targets: Vec<&str> = json["radix"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|m| m["target"].as_str())
            .collect();
        // Sun conjoins the ascendant, Mars opposes it
        assert_eq!(targets.iter().filter(|t| **t == "As").count(), 2);
    }

    #[test]
    fn test_settings_file_is_applied() {
        let chart = write_temp(CHART);
        let settings = write_temp("margin = 100.0\n");
        let mut args = args(chart.path());
        args.settings = Some(settings.path().to_path_buf());

        let json = serde_json::to_value(run(&args).unwrap()).unwrap();
        assert_eq!(json["radix"]["metrics"]["radius"], 300.0);
    }

    #[test]
    fn test_bad_chart_reports_context() {
        let chart = write_temp(r#"{"planets": {"Sun": [1.0]}, "cusps": [1, 2]}"#);
        let err = run(&args(chart.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid chart data"));
    }
}
