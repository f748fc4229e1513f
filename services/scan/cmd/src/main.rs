//! Information element dump tool.
//!
//! Decodes a hex-encoded beacon or probe-response body and prints every
//! element, the security capability string and the Wi-Fi generation.

use anyhow::Context;
use clap::Parser;
use scan_ie::{decode_all, eid, scan_hex, Element, ModeElements, RawElement, WifiMode};
use scan_security::SecurityCapabilities;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod logging;

use config::ToolConfig;
use logging::ScanLogFormatter;

/// Decode 802.11 information elements
#[derive(Parser, Debug)]
#[command(name = "ie-dump", version, about = "Decode 802.11 information elements")]
struct Args {
    /// Element bytes as an even-length hex string
    #[arg(long)]
    hex: String,

    /// Beacon capability information field, decimal or 0x-prefixed hex
    #[arg(long, default_value = "0", value_parser = parse_capability)]
    capability: u16,

    /// Channel center frequency in MHz
    #[arg(long, default_value_t = 2412)]
    frequency: u32,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

fn parse_capability(value: &str) -> Result<u16, std::num::ParseIntError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    elements: &'a [Element],
    capabilities: &'a SecurityCapabilities,
    capabilities_string: String,
    wifi_mode: WifiMode,
}

fn max_rate(elements: &[Element]) -> u32 {
    elements
        .iter()
        .filter_map(|e| match e {
            Element::SupportedRates(r) | Element::ExtendedSupportedRates(r) if r.valid => {
                r.max_rate()
            }
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

fn mode_elements(ies: &[RawElement], elements: &[Element]) -> ModeElements {
    let seen = |pred: fn(&Element) -> bool| elements.iter().any(pred);
    ModeElements {
        eht: seen(|e| matches!(e, Element::EhtOperation(op) if op.present)),
        he: seen(|e| matches!(e, Element::HeOperation(op) if op.present)),
        vht: seen(|e| matches!(e, Element::VhtOperation(op) if op.present)),
        ht: seen(|e| matches!(e, Element::HtOperation(op) if op.present)),
        erp: ies.iter().any(|ie| ie.id == eid::ERP),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("ie_dump={}", args.log_level).parse()?)
        .add_directive(format!("scan_ie={}", args.log_level).parse()?)
        .add_directive(format!("scan_security={}", args.log_level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .event_format(ScanLogFormatter::new("ie-dump"))
        .init();

    let tool_config = match &args.config {
        Some(path) => ToolConfig::load_from_file(path)?,
        None => ToolConfig::from_env(),
    };

    let ies = scan_hex(&args.hex).context("invalid --hex input")?;
    component_debug!("scan", "Scanned {} elements", ies.len());

    let elements = decode_all(&ies);
    let capabilities = SecurityCapabilities::from_elements(
        &ies,
        args.capability,
        args.frequency,
        &tool_config.decoder,
        None,
    );
    let wifi_mode = WifiMode::determine(
        args.frequency,
        max_rate(&elements),
        mode_elements(&ies, &elements),
    );

    if args.json {
        let report = Report {
            elements: &elements,
            capabilities: &capabilities,
            capabilities_string: capabilities.capabilities_string(),
            wifi_mode,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (ie, element) in ies.iter().zip(&elements) {
        if ie.is_extension() {
            println!("{:3}/{:<3} len {:3}  {:?}", ie.id, ie.id_ext, ie.bytes.len(), element);
        } else {
            println!("{:7} len {:3}  {:?}", ie.id, ie.bytes.len(), element);
        }
    }
    println!("capabilities: {}", capabilities);
    println!("mode: {}", wifi_mode);

    Ok(())
}
