//! Subcommand implementations. Each returns the process exit code.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use scatter_core::config::WorkspaceLayout;
use scatter_core::container::{decode_container_file, encode_container_random};
use scatter_core::flow::{prepare_flow, FlowOutcome, PlatformSource};
use scatter_core::manifest::{Manifest, PatchOutcome, DATA_PRESERVING, PROVISIONING_ENABLE};
use scatter_core::pipeline::{cleanup_after_flow, produce_variants, sweep_workspace, FlashStrategy};
use scatter_core::telemetry::PipelineSnapshot;
use scatter_core::types::ScatterError;
use scatter_core::utils::write_replace;
use serde_json::json;
use tracing::debug;

use crate::{LayoutArgs, PassName};

const EXIT_OK: i32 = 0;
const EXIT_NOT_READY: i32 = 2;

fn load_layout(args: &LayoutArgs) -> Result<WorkspaceLayout> {
    let mut layout = WorkspaceLayout::from_base(&args.base);
    if let Some(file) = &args.layout {
        layout = layout
            .with_overrides_from(file)
            .map_err(ScatterError::from)
            .with_context(|| format!("loading layout overrides from {}", file.display()))?;
    }
    debug!(?layout, "workspace layout");
    Ok(layout)
}

fn strategy(keep_data: bool) -> FlashStrategy {
    if keep_data {
        FlashStrategy::DataPreserving
    } else {
        FlashStrategy::Full
    }
}

fn print_stage_times(telemetry: &PipelineSnapshot) {
    let times = &telemetry.stage_times;
    for (stage, _) in times.iter() {
        println!("  {:<8} {:>9.3} ms", stage.to_string(), times.get_ms(*stage));
    }
    println!("  {:<8} {:>9.3} ms", "total", telemetry.elapsed.as_secs_f64() * 1_000.0);
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn decode(input: &Path, output: Option<&Path>, json: bool) -> Result<i32> {
    let plaintext =
        decode_container_file(input).with_context(|| format!("decoding {}", input.display()))?;

    let output: PathBuf = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension("xml"),
    };
    write_replace(&output, &plaintext)?;

    if json {
        print_json(&json!({ "input": input, "output": output, "payload_len": plaintext.len() }))?;
    } else {
        println!("{}", output.display());
    }
    Ok(EXIT_OK)
}

pub fn seal(input: &Path, output: &Path, json: bool) -> Result<i32> {
    let payload = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let container = encode_container_random(&payload).map_err(ScatterError::from)?;
    write_replace(output, &container)?;

    if json {
        print_json(&json!({ "input": input, "output": output, "container_len": container.len() }))?;
    } else {
        println!("{}", output.display());
    }
    Ok(EXIT_OK)
}

pub fn patch(input: &Path, pass: PassName, output: Option<&Path>, json: bool) -> Result<i32> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let mut manifest = Manifest::parse(&bytes)
        .map_err(ScatterError::from)
        .with_context(|| format!("parsing {}", input.display()))?;

    let pass = match pass {
        PassName::Provisioning => PROVISIONING_ENABLE,
        PassName::DataPreserving => DATA_PRESERVING,
    };
    let outcome = pass.apply(&mut manifest).map_err(ScatterError::from)?;

    let output = output.unwrap_or(input);
    if outcome.changed() || output != input {
        write_replace(output, &manifest.serialize())?;
    }

    if json {
        print_json(&json!({ "pass": pass.name, "output": output, "result": outcome }))?;
    } else {
        match outcome {
            PatchOutcome::Applied { records, created, updated } => println!(
                "{}: {} record(s), {} field(s) created, {} updated",
                pass.name, records, created, updated
            ),
            PatchOutcome::NotFound => println!("{}: partition '{}' not found", pass.name, pass.target),
        }
    }
    Ok(if outcome.is_found() { EXIT_OK } else { EXIT_NOT_READY })
}

pub fn variants(args: &LayoutArgs, platform: &str, keep_data: bool, json: bool) -> Result<i32> {
    let layout = load_layout(args)?;
    let Some(report) = produce_variants(&layout, platform, strategy(keep_data))? else {
        if json {
            print_json(&json!({ "status": "no_container", "platform": platform }))?;
        } else {
            println!("no scatter container for {}", platform);
        }
        return Ok(EXIT_NOT_READY);
    };

    if json {
        print_json(&serde_json::to_value(&report)?)?;
    } else {
        println!("{}", report.final_manifest.display());
        print_stage_times(&report.telemetry);
    }
    Ok(EXIT_OK)
}

fn parse_props(props: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for p in props {
        let Some((k, v)) = p.split_once('=') else {
            bail!("property '{}' is not NAME=VALUE", p);
        };
        map.insert(k.trim().to_string(), v.to_string());
    }
    Ok(map)
}

pub fn prepare(
    args: &LayoutArgs,
    platform: Option<&str>,
    props: &[String],
    keep_data: bool,
    json: bool,
) -> Result<i32> {
    let layout = load_layout(args)?;
    let props = parse_props(props)?;
    let source = match platform {
        Some(p) => PlatformSource::Explicit(p),
        None => PlatformSource::Device(&props),
    };

    let outcome = prepare_flow(&layout, source, strategy(keep_data))?;
    if json {
        print_json(&serde_json::to_value(&outcome)?)?;
    } else {
        match &outcome {
            FlowOutcome::Ready { report, bundle, prc, .. } => {
                println!("manifest: {}", report.final_manifest.display());
                println!("flash:    {}", bundle.flash_manifest.display());
                println!("auth:     {}", bundle.auth_bundle.display());
                println!("prc:      {} copied, {} skipped, {} failed", prc.copied, prc.skipped, prc.failed);
                print_stage_times(&report.telemetry);
            }
            other => println!("not ready: {:?}", other),
        }
    }
    Ok(if outcome.is_ready() { EXIT_OK } else { EXIT_NOT_READY })
}

pub fn sweep(args: &LayoutArgs, platform: Option<&str>, json: bool) -> Result<i32> {
    let layout = load_layout(args)?;
    let report = match platform {
        Some(p) => cleanup_after_flow(&layout, p),
        None => sweep_workspace(&layout),
    };
    if json {
        print_json(&serde_json::to_value(report)?)?;
    } else {
        println!("removed {} file(s), {} failed", report.removed, report.failed);
    }
    Ok(EXIT_OK)
}
