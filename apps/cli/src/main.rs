// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: link MEP systems and elements to architectural spaces.
//!
//! Pairs model documents with graph documents by file stem, writes
//! `brick:hasPart` edges from every system to its members and
//! `bot:hasElement` edges from architectural spaces to the elements found
//! inside them, and saves everything into one output graph.
//!
//! Usage:
//!   ifc-linkset --models DIR --graphs DIR --target-model FILE
//!               --target-graph FILE --output FILE [options]
//!
//! Defaults for every option come from `LINKSET_*` environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ifc_linkset_graph::Namespaces;
use ifc_linkset_processing::config::{parse_prefixes, split_list};
use ifc_linkset_processing::{BatchCoordinator, BatchInputs, LinkConfig};

#[derive(Debug)]
struct Args {
    inputs: BatchInputs,
    config: LinkConfig,
    report: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("ifc-linkset - link MEP systems and elements to spaces");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  ifc-linkset --models DIR --graphs DIR --target-model FILE \\");
    eprintln!("              --target-graph FILE --output FILE [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tolerance-mm N   Vertical tolerance in millimetres (default: 0)");
    eprintln!("  --prefixes abcd    Only match targets whose name starts with one of these");
    eprintln!("  --exclude ID       Never match this target GlobalId (repeatable)");
    eprintln!("  --types T,T        Source element types (default: MEP terminals and devices)");
    eprintln!("  --report FILE      Write a JSON run report");
    eprintln!("  -h, --help         Show this message");
    eprintln!();
    eprintln!("Set RUST_LOG to control log output (e.g. RUST_LOG=debug).");
}

/// Parses arguments after the program name. `Ok(None)` means help was
/// requested.
fn parse_args(args: &[String], mut config: LinkConfig) -> Result<Option<Args>> {
    let mut model_dir = None;
    let mut graph_dir = None;
    let mut target_model = None;
    let mut target_graph = None;
    let mut output = None;
    let mut report = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "-h" | "--help") {
            return Ok(None);
        }
        let value = args
            .get(i + 1)
            .with_context(|| format!("missing value for {flag}"))?;
        match flag {
            "--models" => model_dir = Some(PathBuf::from(value)),
            "--graphs" => graph_dir = Some(PathBuf::from(value)),
            "--target-model" => target_model = Some(PathBuf::from(value)),
            "--target-graph" => target_graph = Some(PathBuf::from(value)),
            "--output" => output = Some(PathBuf::from(value)),
            "--report" => report = Some(PathBuf::from(value)),
            "--tolerance-mm" => {
                config.tolerance_mm = value
                    .parse()
                    .with_context(|| format!("invalid tolerance: {value}"))?;
            }
            "--prefixes" => config.target_prefixes = parse_prefixes(value),
            "--exclude" => config.excluded_targets.push(value.clone()),
            "--types" => config.source_types = split_list(value),
            other => bail!("unknown option: {other}"),
        }
        i += 2;
    }

    let inputs = BatchInputs {
        model_dir: model_dir.context("--models is required")?,
        graph_dir: graph_dir.context("--graphs is required")?,
        target_model: target_model.context("--target-model is required")?,
        target_graph: target_graph.context("--target-graph is required")?,
        output: output.context("--output is required")?,
    };
    Ok(Some(Args {
        inputs,
        config,
        report,
    }))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw, LinkConfig::from_env()) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(err);
        }
    };

    tracing::info!(
        models = %args.inputs.model_dir.display(),
        graphs = %args.inputs.graph_dir.display(),
        target_model = %args.inputs.target_model.display(),
        tolerance_mm = args.config.tolerance_mm,
        source_types = args.config.source_types.len(),
        "Starting linkset run"
    );

    let mut batch = BatchCoordinator::new(args.config, Namespaces::from_env());
    let report = batch.run(&args.inputs).context("linkset run failed")?;

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    println!(
        "Linked {} system members and {} elements to spaces across {} pairs ({} triples, {} warnings)",
        report.members_linked,
        report.spaces_linked,
        report.pairs_processed,
        report.triples,
        report.diagnostics.len()
    );
    Ok(())
}
