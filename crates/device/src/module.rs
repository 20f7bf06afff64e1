//! Module load and unload.
//!
//! [`TetrisModule`] owns every registration the module makes. Loading creates
//! them in order; any failure drops what already exists, so the host is left
//! exactly as it was. Unloading (explicit or on drop) removes them in reverse.

use std::sync::Arc;

use tetris_chardev_core::GameState;

use crate::diag::{DiagnosticEndpoint, STATE_FILE};
use crate::errno::Result;
use crate::host::{DebugfsDir, DebugfsFile, Host, MiscRegistration};
use crate::input::InputDevice;
use crate::params::ModuleParams;
use crate::shared::SharedGame;

pub struct TetrisModule {
    // Drop order is declaration order: state file, directory, device, game.
    state_file: DebugfsFile,
    _debugfs_dir: DebugfsDir,
    misc: MiscRegistration,
    device: Arc<InputDevice>,
    game: SharedGame,
}

impl TetrisModule {
    pub fn init(host: &Host, params: ModuleParams) -> Result<Self> {
        params.validate()?;

        let seed = params.resolved_seed();
        let game = SharedGame::new(GameState::new(seed));
        log::info!("tetris: loading (seed {})", seed);

        let device = Arc::new(InputDevice::new(game.clone(), params.render_style));
        let misc = host
            .register_misc(&params.device_name, device.clone())
            .inspect_err(|e| log::warn!("tetris: misc register failed: {}", e))?;
        log::info!("tetris: registered {}", misc.path());

        let debugfs_dir = host
            .debugfs_create_dir(&params.debugfs_dir)
            .inspect_err(|e| log::warn!("tetris: debugfs dir failed, rolling back: {}", e))?;
        log::debug!("tetris: created {}", debugfs_dir.path());

        let endpoint = Arc::new(DiagnosticEndpoint::new(game.clone()));
        let state_file = host
            .debugfs_create_file(&debugfs_dir, STATE_FILE, endpoint)
            .inspect_err(|e| log::warn!("tetris: debugfs file failed, rolling back: {}", e))?;
        log::info!("tetris: registered {}", state_file.path());

        Ok(Self {
            state_file,
            _debugfs_dir: debugfs_dir,
            misc,
            device,
            game,
        })
    }

    /// Unload now rather than at end of scope
    pub fn exit(self) {}

    /// The module's own handle on the shared game
    pub fn game(&self) -> &SharedGame {
        &self.game
    }

    pub fn device_path(&self) -> &str {
        self.misc.path()
    }

    pub fn state_path(&self) -> &str {
        self.state_file.path()
    }

    /// Files currently open on the input device
    pub fn open_files(&self) -> usize {
        self.device.open_count()
    }
}

impl Drop for TetrisModule {
    fn drop(&mut self) {
        log::info!(
            "tetris: unloading (score {}, {} device file(s) open)",
            self.game.with_shared_read(|g| g.score()),
            self.device.open_count()
        );
    }
}
