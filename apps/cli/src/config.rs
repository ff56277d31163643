use std::fs;
use std::path::{Path, PathBuf};

use ingest::{DEFAULT_HEADER_ROWS, IngestOptions, SheetSource};
use mileage_app::{AppConfig, RecordSource};
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "gas-mileage";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3846;
const DEFAULT_SHEET_ID: &str = "1a3QjhxhRyMMYclu3Fs7AJ-ey_rAYMLLPX8uETtP-0_M";
const DEFAULT_GID: &str = "1412224841";
const DEFAULT_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSdFwOyl6iX009A1Q5IR_L1v0aFjALdzjWkNDY6b6i8Ya9a3mA/viewform";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    pub sheet_id: String,
    pub gid: String,
    /// Saved export to read instead of fetching the sheet.
    pub source_file: Option<PathBuf>,
    pub header_rows: usize,
    pub utc_offset_minutes: i32,
    pub form_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            gid: DEFAULT_GID.to_string(),
            source_file: None,
            header_rows: DEFAULT_HEADER_ROWS,
            utc_offset_minutes: 0,
            form_url: Some(DEFAULT_FORM_URL.to_string()),
        }
    }
}

impl CliConfig {
    pub fn app_config(&self, file_override: Option<PathBuf>) -> AppConfig {
        let source = match file_override.or_else(|| self.source_file.clone()) {
            Some(path) => RecordSource::File(path),
            None => RecordSource::Sheet(SheetSource::new(&self.sheet_id, &self.gid)),
        };
        AppConfig {
            source,
            ingest: IngestOptions {
                header_rows: self.header_rows,
                utc_offset_minutes: self.utc_offset_minutes,
            },
            form_url: self.form_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub file: PathBuf,
    pub created: bool,
}

pub fn load_or_create(explicit: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(CONFIG_FILE_NAME),
    };

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }
    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents)
        .map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

fn config_dir() -> Result<PathBuf, String> {
    if let Some(base) = std::env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(base).join(CONFIG_DIR_NAME));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_default_config_when_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let load = load_or_create(Some(&path)).expect("create");
        assert!(load.created);
        assert_eq!(load.config, CliConfig::default());

        let reload = load_or_create(Some(&path)).expect("reload");
        assert!(!reload.created);
        assert_eq!(reload.config, CliConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "port = 9000\nutc_offset_minutes = -300\n").expect("write config");

        let load = load_or_create(Some(&path)).expect("load");
        assert_eq!(load.config.port, 9000);
        assert_eq!(load.config.utc_offset_minutes, -300);
        assert_eq!(load.config.header_rows, DEFAULT_HEADER_ROWS);
        assert_eq!(load.config.gid, DEFAULT_GID);
    }

    #[test]
    fn source_file_takes_precedence_over_sheet() {
        let mut config = CliConfig::default();
        assert!(matches!(
            config.app_config(None).source,
            RecordSource::Sheet(_)
        ));

        config.source_file = Some(PathBuf::from("saved.json"));
        assert_eq!(
            config.app_config(None).source,
            RecordSource::File(PathBuf::from("saved.json"))
        );
        assert_eq!(
            config.app_config(Some(PathBuf::from("other.json"))).source,
            RecordSource::File(PathBuf::from("other.json"))
        );
    }

    #[test]
    fn rejects_malformed_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "port = \"high\"").expect("write config");
        let err = load_or_create(Some(&path)).expect_err("parse error");
        assert!(err.contains("parse config"));
    }
}
