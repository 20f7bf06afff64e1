//! Module load, unload and rollback

use std::sync::Arc;

use tetris_chardev::device::{
    simple_read_from_buffer, Errno, FileOperations, Host, ModuleParams, OpenFile, TetrisModule,
};

fn params() -> ModuleParams {
    ModuleParams::default().with_seed(8)
}

struct Squatter;

impl FileOperations for Squatter {
    fn open(&self) -> Result<Box<dyn OpenFile>, Errno> {
        Ok(Box::new(SquatterFile))
    }
}

struct SquatterFile;

impl OpenFile for SquatterFile {
    fn read(&mut self, buf: &mut [u8], pos: &mut u64) -> Result<usize, Errno> {
        Ok(simple_read_from_buffer(buf, pos, b"squatter\n"))
    }

    fn write(&mut self, data: &[u8], _pos: &mut u64) -> Result<usize, Errno> {
        Ok(data.len())
    }
}

#[test]
fn test_load_creates_both_paths_and_unload_removes_them() {
    let host = Host::new();
    let module = TetrisModule::init(&host, params()).unwrap();
    assert_eq!(
        host.paths(),
        vec![
            "/dev/tetris".to_string(),
            "/sys/kernel/debug/tetris".to_string(),
            "/sys/kernel/debug/tetris/state".to_string(),
        ]
    );

    module.exit();
    assert!(host.paths().is_empty());
    assert_eq!(host.open("/dev/tetris").err(), Some(Errno::NoEntry));
    assert_eq!(
        host.open("/sys/kernel/debug/tetris/state").err(),
        Some(Errno::NoEntry)
    );
}

#[test]
fn test_custom_names() {
    let host = Host::new();
    let params = ModuleParams {
        device_name: "tetris1".to_string(),
        debugfs_dir: "tetris-dbg".to_string(),
        ..params()
    };
    let module = TetrisModule::init(&host, params).unwrap();
    assert_eq!(module.device_path(), "/dev/tetris1");
    assert_eq!(module.state_path(), "/sys/kernel/debug/tetris-dbg/state");
}

#[test]
fn test_busy_device_name_fails_without_side_effects() {
    let host = Host::new();
    let _other = host.register_misc("tetris", Arc::new(Squatter)).unwrap();

    assert_eq!(TetrisModule::init(&host, params()).err(), Some(Errno::Busy));
    assert_eq!(host.paths(), vec!["/dev/tetris".to_string()]);

    // The squatter is untouched
    let mut f = host.open("/dev/tetris").unwrap();
    assert_eq!(f.read_to_string().unwrap(), "squatter\n");
}

#[test]
fn test_no_free_minor() {
    let host = Host::builder().misc_minors(0).build();
    assert_eq!(TetrisModule::init(&host, params()).err(), Some(Errno::NoMemory));
    assert!(host.paths().is_empty());
}

#[test]
fn test_debugfs_failure_rolls_back_the_device() {
    let host = Host::builder().debugfs_mounted(false).build();
    assert_eq!(TetrisModule::init(&host, params()).err(), Some(Errno::NoDevice));
    assert!(host.paths().is_empty());
}

#[test]
fn test_existing_debugfs_dir_rolls_back_the_device() {
    let host = Host::new();
    let _dir = host.debugfs_create_dir("tetris").unwrap();

    assert_eq!(TetrisModule::init(&host, params()).err(), Some(Errno::Exists));
    assert_eq!(host.paths(), vec!["/sys/kernel/debug/tetris".to_string()]);
}

#[test]
fn test_reload_after_unload() {
    let host = Host::new();
    TetrisModule::init(&host, params()).unwrap().exit();
    let module = TetrisModule::init(&host, params()).unwrap();
    assert!(host.exists(module.device_path()));
}

#[test]
fn test_second_instance_is_busy() {
    let host = Host::new();
    let _first = TetrisModule::init(&host, params()).unwrap();
    assert_eq!(TetrisModule::init(&host, params()).err(), Some(Errno::Busy));
    assert_eq!(host.paths().len(), 3);
}

#[test]
fn test_open_handles_after_unload() {
    let host = Host::new();
    let module = TetrisModule::init(&host, params()).unwrap();
    let game = module.game().clone();
    let mut dev = host.open(module.device_path()).unwrap();
    let mut state = host.open(module.state_path()).unwrap();

    module.exit();

    // debugfs revokes, the misc file keeps its own handle clone
    assert_eq!(state.read(&mut [0u8; 8]), Err(Errno::Io));
    assert_eq!(dev.write(b" ").unwrap(), 1);
    assert!(dev.read_to_string().unwrap().contains("score: 0"));
    assert_eq!(game.with_shared_read(|g| g.board().occupied_count()), 4);
}

#[test]
fn test_handle_count_returns_to_module_only() {
    let host = Host::new();
    let module = TetrisModule::init(&host, params()).unwrap();
    // The module, the input device and the diagnostic endpoint each hold one.
    let baseline = module.game().handle_count();

    let files: Vec<_> = (0..4)
        .map(|i| {
            let path = if i % 2 == 0 { module.device_path() } else { module.state_path() };
            host.open(path).unwrap()
        })
        .collect();
    assert_eq!(module.game().handle_count(), baseline + 4);
    assert_eq!(module.open_files(), 2);

    drop(files);
    assert_eq!(module.game().handle_count(), baseline);
    assert_eq!(module.open_files(), 0);
}

#[test]
fn test_invalid_names_are_rejected() {
    let host = Host::new();
    for bad in ["", "a/b", ".."] {
        let p = ModuleParams {
            device_name: bad.to_string(),
            ..params()
        };
        assert_eq!(TetrisModule::init(&host, p).err(), Some(Errno::Invalid));
    }
    assert!(host.paths().is_empty());
}
