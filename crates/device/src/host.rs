//! Host device model.
//!
//! Stands in for the running kernel: a misc character device namespace under
//! `/dev` and the debug filesystem under `/sys/kernel/debug`. Drivers register
//! [`FileOperations`] and get back RAII registrations whose `Drop` unlinks the
//! node and waits for in-flight operations on it to finish.
//!
//! Removal semantics follow the kernel:
//! - a removed misc device can no longer be opened, but handles that are
//!   already open keep working;
//! - a removed debugfs file fails every further operation with `EIO`.

use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::errno::{Errno, Result};
use crate::file::{FileOperations, OpenFile};

pub const DEV_ROOT: &str = "/dev";
pub const DEBUGFS_ROOT: &str = "/sys/kernel/debug";

/// Misc minors available when the builder is not told otherwise
pub const DEFAULT_MISC_MINORS: usize = 64;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Misc,
    Debugfs,
}

#[derive(Debug, Default)]
struct EntryState {
    in_flight: usize,
    removed: bool,
}

/// One registered node and its in-flight operation count
struct Entry {
    path: String,
    kind: EntryKind,
    ops: Arc<dyn FileOperations>,
    state: Mutex<EntryState>,
    drained: Condvar,
}

impl Entry {
    fn new(path: String, kind: EntryKind, ops: Arc<dyn FileOperations>) -> Arc<Self> {
        Arc::new(Self {
            path,
            kind,
            ops,
            state: Mutex::new(EntryState::default()),
            drained: Condvar::new(),
        })
    }

    /// Start an operation. `opening` marks an `open()` call, which is refused
    /// once the entry is gone regardless of its kind.
    fn enter(&self, opening: bool) -> Result<OpGuard<'_>> {
        let mut state = lock(&self.state);
        if state.removed && (opening || self.kind == EntryKind::Debugfs) {
            return Err(if opening { Errno::NoEntry } else { Errno::Io });
        }
        state.in_flight += 1;
        Ok(OpGuard { entry: self })
    }

    /// Mark removed and block until every in-flight operation has returned
    fn remove_and_drain(&self) {
        let mut state = lock(&self.state);
        state.removed = true;
        while state.in_flight > 0 {
            state = self
                .drained
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn in_flight(&self) -> usize {
        lock(&self.state).in_flight
    }
}

struct OpGuard<'a> {
    entry: &'a Entry,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(&self.entry.state);
        state.in_flight -= 1;
        if state.in_flight == 0 {
            self.entry.drained.notify_all();
        }
    }
}

enum Node {
    Dir,
    File(Arc<Entry>),
}

struct HostInner {
    misc_minors: usize,
    debugfs_mounted: bool,
    nodes: Mutex<BTreeMap<String, Node>>,
}

/// The running "kernel" the module loads into
#[derive(Clone)]
pub struct Host {
    inner: Arc<HostInner>,
}

#[derive(Debug, Clone)]
pub struct HostBuilder {
    misc_minors: usize,
    debugfs_mounted: bool,
}

impl HostBuilder {
    /// Number of misc devices that can be registered at once
    pub fn misc_minors(mut self, n: usize) -> Self {
        self.misc_minors = n;
        self
    }

    pub fn debugfs_mounted(mut self, mounted: bool) -> Self {
        self.debugfs_mounted = mounted;
        self
    }

    pub fn build(self) -> Host {
        Host {
            inner: Arc::new(HostInner {
                misc_minors: self.misc_minors,
                debugfs_mounted: self.debugfs_mounted,
                nodes: Mutex::new(BTreeMap::new()),
            }),
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// A host with debugfs mounted and the default number of misc minors
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HostBuilder {
        HostBuilder {
            misc_minors: DEFAULT_MISC_MINORS,
            debugfs_mounted: true,
        }
    }

    pub fn misc_path(name: &str) -> String {
        format!("{}/{}", DEV_ROOT, name)
    }

    /// Register a misc character device at `/dev/<name>`
    pub fn register_misc(
        &self,
        name: &str,
        ops: Arc<dyn FileOperations>,
    ) -> Result<MiscRegistration> {
        let path = Self::misc_path(name);
        let mut nodes = lock(&self.inner.nodes);

        if nodes.contains_key(&path) {
            return Err(Errno::Busy);
        }
        let in_use = nodes
            .values()
            .filter(|n| matches!(n, Node::File(e) if e.kind == EntryKind::Misc))
            .count();
        if in_use >= self.inner.misc_minors {
            return Err(Errno::NoMemory);
        }

        let entry = Entry::new(path.clone(), EntryKind::Misc, ops);
        nodes.insert(path, Node::File(entry.clone()));
        Ok(MiscRegistration {
            host: self.clone(),
            entry,
        })
    }

    /// Create `/sys/kernel/debug/<name>`
    pub fn debugfs_create_dir(&self, name: &str) -> Result<DebugfsDir> {
        if !self.inner.debugfs_mounted {
            return Err(Errno::NoDevice);
        }
        let path = format!("{}/{}", DEBUGFS_ROOT, name);
        let mut nodes = lock(&self.inner.nodes);
        if nodes.contains_key(&path) {
            return Err(Errno::Exists);
        }
        nodes.insert(path.clone(), Node::Dir);
        Ok(DebugfsDir {
            host: self.clone(),
            path,
        })
    }

    /// Create `name` inside `dir`
    pub fn debugfs_create_file(
        &self,
        dir: &DebugfsDir,
        name: &str,
        ops: Arc<dyn FileOperations>,
    ) -> Result<DebugfsFile> {
        dir.create_file(name, ops)
    }

    /// Open a registered path
    pub fn open(&self, path: &str) -> Result<File> {
        let entry = match lock(&self.inner.nodes).get(path) {
            Some(Node::File(entry)) => entry.clone(),
            Some(Node::Dir) | None => return Err(Errno::NoEntry),
        };

        let inner = {
            let _op = entry.enter(true)?;
            entry.ops.open()?
        };
        Ok(File {
            entry,
            inner,
            pos: 0,
        })
    }

    pub fn exists(&self, path: &str) -> bool {
        lock(&self.inner.nodes).contains_key(path)
    }

    /// Every registered path, sorted
    pub fn paths(&self) -> Vec<String> {
        lock(&self.inner.nodes).keys().cloned().collect()
    }

    /// Unlink one file node, then wait for its operations to drain.
    /// The namespace lock is released before waiting.
    fn remove_entry(&self, entry: &Arc<Entry>) {
        let unlinked = {
            let mut nodes = lock(&self.inner.nodes);
            let ours = matches!(nodes.get(&entry.path), Some(Node::File(e)) if Arc::ptr_eq(e, entry));
            if ours {
                nodes.remove(&entry.path);
            }
            ours
        };
        if unlinked {
            log::debug!("host: removed {}", entry.path);
        }
        entry.remove_and_drain();
    }

    /// Remove a debugfs directory and anything still inside it
    fn remove_dir(&self, path: &str) {
        let prefix = format!("{}/", path);
        let children: Vec<Arc<Entry>> = {
            let mut nodes = lock(&self.inner.nodes);
            nodes.remove(path);
            let keys: Vec<String> = nodes
                .keys()
                .filter(|k| k.starts_with(&prefix))
                .cloned()
                .collect();
            keys.into_iter()
                .filter_map(|k| match nodes.remove(&k) {
                    Some(Node::File(e)) => Some(e),
                    _ => None,
                })
                .collect()
        };
        for child in children {
            child.remove_and_drain();
        }
        log::debug!("host: removed {}", path);
    }
}

/// Registration of a misc device; unregisters on drop
pub struct MiscRegistration {
    host: Host,
    entry: Arc<Entry>,
}

impl MiscRegistration {
    pub fn path(&self) -> &str {
        &self.entry.path
    }
}

impl Drop for MiscRegistration {
    fn drop(&mut self) {
        self.host.remove_entry(&self.entry);
    }
}

/// A debugfs directory; removed (with its contents) on drop
pub struct DebugfsDir {
    host: Host,
    path: String,
}

impl DebugfsDir {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Create a file inside this directory
    pub fn create_file(&self, name: &str, ops: Arc<dyn FileOperations>) -> Result<DebugfsFile> {
        let path = format!("{}/{}", self.path, name);
        let mut nodes = lock(&self.host.inner.nodes);
        if nodes.contains_key(&path) {
            return Err(Errno::Exists);
        }
        let entry = Entry::new(path.clone(), EntryKind::Debugfs, ops);
        nodes.insert(path, Node::File(entry.clone()));
        Ok(DebugfsFile {
            host: self.host.clone(),
            entry,
        })
    }
}

impl Drop for DebugfsDir {
    fn drop(&mut self) {
        self.host.remove_dir(&self.path);
    }
}

/// A debugfs file; removed on drop
pub struct DebugfsFile {
    host: Host,
    entry: Arc<Entry>,
}

impl DebugfsFile {
    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn in_flight(&self) -> usize {
        self.entry.in_flight()
    }
}

impl Drop for DebugfsFile {
    fn drop(&mut self) {
        self.host.remove_entry(&self.entry);
    }
}

/// An open handle. Dropping it releases the driver's per-open state.
pub struct File {
    entry: Arc<Entry>,
    inner: Box<dyn OpenFile>,
    pos: u64,
}

impl File {
    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Seek back to offset 0, starting a new read cycle
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let _op = self.entry.enter(false)?;
        self.inner.read(buf, &mut self.pos)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let _op = self.entry.enter(false)?;
        self.inner.write(data, &mut self.pos)
    }

    pub fn ioctl(&mut self, cmd: u32, arg: usize) -> Result<isize> {
        let _op = self.entry.enter(false)?;
        self.inner.ioctl(cmd, arg)
    }

    /// Read from the current position until end of data
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    pub fn read_to_string(&mut self) -> Result<String> {
        String::from_utf8(self.read_to_end()?).map_err(|_| Errno::Io)
    }

    /// Release the handle
    pub fn close(self) {}
}
