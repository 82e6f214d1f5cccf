use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;
use tracing::warn;

use crate::process::Transport;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    /// Defaults, then `KEY=VALUE` lines from `config_path`, then environment
    /// variables.
    pub fn load_from(config_path: PathBuf) -> Self {
        let mut map = default_map();

        if let Ok(file) = fs::File::open(&config_path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(Result::ok) {
                if let Some((k, v)) = parse_line(&line) {
                    map.insert(k, v);
                }
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            config_path,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    /// Requested runtime name; `None` means auto-detect.
    pub fn runtime_name(&self) -> Option<String> {
        self.get("EXECJS_RUNTIME")
            .filter(|v| !v.trim().is_empty() && !v.trim().eq_ignore_ascii_case("auto"))
    }

    /// Execution deadline; `0` disables it.
    pub fn timeout(&self) -> Option<Duration> {
        match self.get_u64("EXECJS_TIMEOUT") {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }

    pub fn transport(&self) -> Transport {
        let raw = self.get("EXECJS_TRANSPORT").unwrap_or_default();
        Transport::parse(&raw).unwrap_or_else(|| {
            warn!(value = %raw, "unknown EXECJS_TRANSPORT, using pipe");
            Transport::default()
        })
    }

    pub fn log_filter(&self) -> String {
        self.get("EXECJS_LOG").unwrap_or_else(|| "warn".into())
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("EXECJS_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    config_file_in(&base)
}

fn config_file_in(base: &Path) -> PathBuf {
    base.join("execjs").join(".execjsrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("EXECJS_RUNTIME".into(), "auto".into());
    m.insert("EXECJS_TIMEOUT".into(), "0".into());
    m.insert("EXECJS_TRANSPORT".into(), "pipe".into());
    m.insert("EXECJS_LOG".into(), "warn".into());
    m
}
