//! `tetris-probe`: load the module, replay a command string, print the result.

use std::io::{self, Write};

use anyhow::Result;

use tetris_chardev::device::klog::DEFAULT_CAPACITY;
use tetris_chardev::device::{KernelLog, ModuleParams};
use tetris_chardev::probe::{parse_probe_args, run_probe, USAGE};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = parse_probe_args(&args)?;
    let params = ModuleParams::from_env();
    let klog = KernelLog::new(params.log_level, DEFAULT_CAPACITY)
        .with_echo(params.log_echo)
        .install()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_probe(&config, params, Some(klog), &mut out)?;
    out.flush()?;
    Ok(())
}
