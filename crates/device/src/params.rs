//! Module parameters.
//!
//! Read from environment variables at load time, in place of the `insmod`
//! parameter list:
//!
//! - `TETRIS_SEED`: piece sequence seed (default: derived from the clock)
//! - `TETRIS_DEVICE_NAME`: misc device node name (default: `tetris`)
//! - `TETRIS_DEBUGFS_DIR`: debugfs directory name (default: `tetris`)
//! - `TETRIS_RENDER_STYLE`: `plain` or `boxed` device frames (default: `plain`)
//! - `TETRIS_LOG_LEVEL`: `error` .. `trace` (default: `info`)
//! - `TETRIS_LOG_ECHO`: `1`/`true`/`yes`/`on` also prints log lines to stderr
//!   (default: off)
//!
//! Missing or unparsable values fall back to the defaults.

use std::time::{SystemTime, UNIX_EPOCH};

use log::LevelFilter;
use tetris_chardev_core::RenderStyle;

use crate::errno::{Errno, Result};

pub const DEFAULT_DEVICE_NAME: &str = "tetris";
pub const DEFAULT_DEBUGFS_DIR: &str = "tetris";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleParams {
    pub seed: Option<u32>,
    pub device_name: String,
    pub debugfs_dir: String,
    pub render_style: RenderStyle,
    pub log_level: LevelFilter,
    pub log_echo: bool,
}

impl Default for ModuleParams {
    fn default() -> Self {
        Self {
            seed: None,
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            debugfs_dir: DEFAULT_DEBUGFS_DIR.to_string(),
            render_style: RenderStyle::Plain,
            log_level: LevelFilter::Info,
            log_echo: false,
        }
    }
}

impl ModuleParams {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("TETRIS_SEED").and_then(|s| s.parse().ok());
        let device_name = non_empty("TETRIS_DEVICE_NAME").unwrap_or(defaults.device_name);
        let debugfs_dir = non_empty("TETRIS_DEBUGFS_DIR").unwrap_or(defaults.debugfs_dir);
        let render_style = non_empty("TETRIS_RENDER_STYLE")
            .and_then(|s| RenderStyle::from_str(&s))
            .unwrap_or(defaults.render_style);
        let log_level = non_empty("TETRIS_LOG_LEVEL")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.log_level);
        let log_echo = non_empty("TETRIS_LOG_ECHO")
            .and_then(|s| parse_switch(&s))
            .unwrap_or(defaults.log_echo);

        Self {
            seed,
            device_name,
            debugfs_dir,
            render_style,
            log_level,
            log_echo,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Node names must be a single non-empty path component
    pub fn validate(&self) -> Result<()> {
        for name in [&self.device_name, &self.debugfs_dir] {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                log::warn!("tetris: rejecting node name {:?}", name);
                return Err(Errno::Invalid);
            }
        }
        Ok(())
    }

    /// The configured seed, or one mixed from the clock and a stack address
    pub fn resolved_seed(&self) -> u32 {
        if let Some(seed) = self.seed {
            return seed;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let addr = &nanos as *const u64 as usize as u64;
        let mixed = nanos ^ addr ^ 0x2026;
        (mixed ^ (mixed >> 32)) as u32
    }
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let params = ModuleParams::from_lookup(|_| None);
        assert_eq!(params, ModuleParams::default());
        assert_eq!(params.device_name, "tetris");
        assert_eq!(params.debugfs_dir, "tetris");
    }

    #[test]
    fn reads_every_variable() {
        let params = ModuleParams::from_lookup(lookup(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_DEVICE_NAME", "tetris0"),
            ("TETRIS_DEBUGFS_DIR", "tetris-dbg"),
            ("TETRIS_RENDER_STYLE", "boxed"),
            ("TETRIS_LOG_LEVEL", "debug"),
            ("TETRIS_LOG_ECHO", "yes"),
        ]));
        assert_eq!(params.seed, Some(42));
        assert_eq!(params.device_name, "tetris0");
        assert_eq!(params.debugfs_dir, "tetris-dbg");
        assert_eq!(params.render_style, RenderStyle::Boxed);
        assert_eq!(params.log_level, LevelFilter::Debug);
        assert!(params.log_echo);
        assert_eq!(params.resolved_seed(), 42);
    }

    #[test]
    fn invalid_values_fall_back() {
        let params = ModuleParams::from_lookup(lookup(&[
            ("TETRIS_SEED", "not-a-number"),
            ("TETRIS_DEVICE_NAME", "   "),
            ("TETRIS_RENDER_STYLE", "sparkly"),
            ("TETRIS_LOG_LEVEL", "loud"),
            ("TETRIS_LOG_ECHO", "maybe"),
        ]));
        assert_eq!(params, ModuleParams::default());
    }

    #[test]
    fn log_echo_switch_values() {
        for (value, expected) in [("1", true), ("ON", true), ("off", false), ("0", false)] {
            let params = ModuleParams::from_lookup(lookup(&[("TETRIS_LOG_ECHO", value)]));
            assert_eq!(params.log_echo, expected, "TETRIS_LOG_ECHO={}", value);
        }
    }

    #[test]
    fn validate_rejects_path_separators() {
        let mut params = ModuleParams::default();
        assert!(params.validate().is_ok());

        params.device_name = "a/b".to_string();
        assert_eq!(params.validate(), Err(Errno::Invalid));

        params.device_name = "tetris".to_string();
        params.debugfs_dir = "..".to_string();
        assert_eq!(params.validate(), Err(Errno::Invalid));
    }
}
