//! Character-device front end for the Tetris game.
//!
//! A loaded [`TetrisModule`] exposes one shared game through two files on a
//! [`Host`]:
//!
//! - `/dev/tetris`: write command bytes, read back a frame
//! - `/sys/kernel/debug/tetris/state`: read-only status report
//!
//! ```
//! use tetris_chardev_device::{Host, ModuleParams, TetrisModule};
//!
//! let host = Host::new();
//! let module = TetrisModule::init(&host, ModuleParams::default().with_seed(1)).unwrap();
//!
//! let mut dev = host.open(module.device_path()).unwrap();
//! dev.write(b" ").unwrap();
//! let frame = dev.read_to_string().unwrap();
//! assert!(frame.contains("score: 0"));
//! ```

pub mod diag;
pub mod errno;
pub mod file;
pub mod host;
pub mod input;
pub mod klog;
pub mod module;
pub mod params;
pub mod shared;

pub use diag::{DiagnosticEndpoint, DiagnosticFile, STATE_FILE};
pub use errno::{Errno, Result};
pub use file::{simple_read_from_buffer, FileOperations, OpenFile, ReadBuffer};
pub use host::{DebugfsDir, DebugfsFile, File, Host, HostBuilder, MiscRegistration};
pub use input::{InputDevice, InputFile};
pub use klog::KernelLog;
pub use module::TetrisModule;
pub use params::ModuleParams;
pub use shared::SharedGame;
