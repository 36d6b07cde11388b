use dirs::home_dir;
use std::{env, fs, io, path::Path, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".flow_finance";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "flow-finance-data.json";

/// Environment variable overriding the application data directory.
pub const HOME_ENV: &str = "FLOW_FINANCE_HOME";

/// Returns the application-specific data directory, defaulting to `~/.flow_finance`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the persisted budget document inside `base`.
pub fn data_file_in(base: &Path) -> PathBuf {
    base.join(DATA_FILE)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used to stage atomic writes (`data.json` -> `data.json.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to `path` by staging to a temporary file and renaming it into place.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/state.json")),
            PathBuf::from("/data/state.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/state")), PathBuf::from("/data/state.tmp"));
    }

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.json");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp_path(&path).exists());
    }
}
