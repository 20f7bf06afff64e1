//! Interactive harness (default binary).
//!
//! Loads the module into an in-process host, then drives it the way a user
//! would from a shell: key presses become single-byte writes to the input
//! device, and every redraw reads the device and the diagnostic file back.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tetris_chardev::device::klog::DEFAULT_CAPACITY;
use tetris_chardev::device::{Host, KernelLog, ModuleParams, TetrisModule};
use tetris_chardev::input::{key_to_byte, should_quit};
use tetris_chardev::screen::Screen;

fn main() -> Result<()> {
    let params = ModuleParams::from_env();
    let klog = KernelLog::new(params.log_level, DEFAULT_CAPACITY)
        .with_echo(params.log_echo)
        .install()?;

    let host = Host::new();
    let module = TetrisModule::init(&host, params)?;
    log::info!("harness: {} and {} ready", module.device_path(), module.state_path());

    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&host, &module, klog, &mut screen);

    // Always try to restore terminal state.
    let _ = screen.exit();
    module.exit();
    result
}

fn run(host: &Host, module: &TetrisModule, klog: &KernelLog, screen: &mut Screen) -> Result<()> {
    let mut dev = host.open(module.device_path())?;
    let mut state = host.open(module.state_path())?;

    loop {
        dev.rewind();
        let frame = dev.read_to_string()?;
        state.rewind();
        let report = state.read_to_string()?;
        screen.draw(&frame, &report, &klog.dmesg())?;

        // Resize and other events fall through to a redraw.
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if should_quit(key) {
                return Ok(());
            }
            if let Some(byte) = key_to_byte(key) {
                dev.write(&[byte])?;
            }
        }
    }
}
