use crate::config::load_config;
use crate::layout::{LayoutRequest, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_family_data;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "pedigree", version, about = "Pedigree chart layout engine")]
pub struct Args {
    /// Family document (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Person the chart is built around
    #[arg(short = 'r', long = "root")]
    pub root: String,

    /// Person to highlight. Defaults to the root.
    #[arg(short = 'f', long = "focus")]
    pub focus: Option<String>,

    /// Config JSON file with layout overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log pipeline details to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if args.pretty {
        config.dump.pretty = true;
    }

    let input = read_input(args.input.as_deref())?;
    let data = parse_family_data(&input)?;
    let request = build_request(&args);
    let layout = compute_layout(&data, &request, &config.layout)?;

    if !layout.diagnostics.is_empty() {
        eprintln!(
            "{} diagnostic(s) while laying out '{}'",
            layout.diagnostics.len(),
            request.root_person_id
        );
    }

    write_layout_dump(args.output.as_deref(), &layout, config.dump.pretty)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_request(args: &Args) -> LayoutRequest {
    let request = LayoutRequest::new(&args.root);
    match args.focus.as_deref() {
        Some(focus) => request.with_focus(focus),
        None => request,
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|path| *path != Path::new("-")) {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from([
            "pedigree", "-i", "tree.json", "-r", "p1", "-f", "p7", "--pretty",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("tree.json")));
        assert!(args.pretty);
        assert!(!args.verbose);
        let request = build_request(&args);
        assert_eq!(request.root_person_id, "p1");
        assert_eq!(request.focus(), "p7");
    }

    #[test]
    fn root_is_required() {
        assert!(Args::try_parse_from(["pedigree", "-i", "tree.json"]).is_err());
    }

    #[test]
    fn focus_defaults_to_root() {
        let args = Args::try_parse_from(["pedigree", "--root", "p1"]).unwrap();
        assert_eq!(build_request(&args).focus(), "p1");
    }

    #[test]
    fn reads_input_from_file() {
        let path = std::env::temp_dir().join(format!("pedigree-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"people": []}"#).unwrap();
        let input = read_input(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(input.contains("people"));
    }
}
