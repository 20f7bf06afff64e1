//! Scripted, non-interactive driver for the devices.
//!
//! Loads the module, writes each byte of a command string to the input
//! device as its own write, then prints what the device files report.

use std::io::Write;

use anyhow::{anyhow, Result};

use crate::core::RenderStyle;
use crate::device::{Host, KernelLog, ModuleParams, TetrisModule};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeConfig {
    pub seed: Option<u32>,
    pub style: Option<RenderStyle>,
    pub json: bool,
    pub dmesg: bool,
    pub commands: String,
}

pub const USAGE: &str =
    "usage: tetris-probe [--seed N] [--style plain|boxed] [--json] [--dmesg] [COMMANDS]";

pub fn parse_probe_args(args: &[String]) -> Result<ProbeConfig> {
    let mut config = ProbeConfig::default();
    let mut commands: Option<String> = None;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("probe: missing value for --seed"))?;
                config.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("probe: invalid --seed value: {}", v))?,
                );
            }
            "--style" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("probe: missing value for --style"))?;
                config.style = Some(
                    RenderStyle::from_str(v)
                        .ok_or_else(|| anyhow!("probe: invalid --style value: {}", v))?,
                );
            }
            "--json" => config.json = true,
            "--dmesg" => config.dmesg = true,
            other if other.starts_with("--") => {
                return Err(anyhow!("probe: unknown argument: {}\n{}", other, USAGE));
            }
            other => {
                if commands.is_some() {
                    return Err(anyhow!("probe: more than one command string\n{}", USAGE));
                }
                commands = Some(other.to_string());
            }
        }
        i += 1;
    }

    config.commands = commands.unwrap_or_default();
    Ok(config)
}

/// Run one probe against a fresh host, printing to `out`.
///
/// `params` supplies everything the command line does not override.
pub fn run_probe(
    config: &ProbeConfig,
    mut params: ModuleParams,
    klog: Option<&KernelLog>,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(seed) = config.seed {
        params = params.with_seed(seed);
    }
    if let Some(style) = config.style {
        params.render_style = style;
    }

    let host = Host::new();
    let module = TetrisModule::init(&host, params)?;

    {
        let mut dev = host.open(module.device_path())?;
        for byte in config.commands.bytes() {
            dev.write(&[byte])?;
        }

        if config.json {
            let snapshot = module.game().with_shared_read(|g| g.snapshot());
            writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        } else {
            dev.rewind();
            write!(out, "{}", dev.read_to_string()?)?;
            writeln!(out)?;
            let mut state = host.open(module.state_path())?;
            write!(out, "{}", state.read_to_string()?)?;
        }
    }

    module.exit();

    if config.dmesg {
        if let Some(klog) = klog {
            writeln!(out)?;
            for line in klog.dmesg() {
                writeln!(out, "{}", line)?;
            }
        }
    }
    Ok(())
}
