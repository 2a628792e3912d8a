//! Locating, reading and bootstrapping the class file (`klasse.toml`).
//!
//! # TOML Structure
//!
//! ```toml
//! schuelerliste = ["Anna", "Ben", "Cleo", "Dana"]
//!
//! # everyone else is a student listing who they must not work with
//! "Anna" = ["Ben"]
//! "Ben" = ["Anna"]
//! ```
//!
//! When no file exists a commented sample is written and the caller gets
//! [`LoadOutcome::SetupRequired`] instead of a config.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::constraints::ConstraintRelation;
use crate::error::{ConfigError, ConfigResult};
use crate::group::StudentId;

pub const CONFIG_FILE_NAME: &str = "klasse.toml";

const SAMPLE_STUDENTS: [&str; 10] = [
    "Schueler 1",
    "Schueler 2",
    "Schueler 3",
    "Schueler 4",
    "Schueler 5",
    "Schueler 6",
    "Schueler 7",
    "Schueler 8",
    "Schueler 9",
    "Schueler 10",
];

const SAMPLE_CONFLICTS: [(&str, &[&str]); 3] = [
    ("Schueler 1", &["Schueler 2", "Schueler 3"]),
    ("Schueler 2", &["Schueler 1"]),
    ("Schueler 3", &["Schueler 1"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassConfig {
    pub roster: Vec<StudentId>,
    pub constraints: ConstraintRelation,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { path: PathBuf, config: ClassConfig },
    /// No config existed; a sample was written to `path` for the user to edit.
    SetupRequired { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, rename = "schuelerliste", alias = "students")]
    roster: Vec<String>,

    /// Every other top-level key names a student and their conflicts.
    #[serde(flatten)]
    conflicts: BTreeMap<String, toml::Value>,
}

impl ClassConfig {
    /// Parse the contents of a class file. `path` is only used for errors.
    ///
    /// Conflict entries that are not arrays, and array items that are not
    /// strings, are skipped with a warning.
    pub fn parse(contents: &str, path: &Path) -> ConfigResult<Self> {
        let raw: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut constraints = ConstraintRelation::new();
        for (student, value) in raw.conflicts {
            let items = match value {
                toml::Value::Array(items) => items,
                other => {
                    warn!(
                        student = %student,
                        found = other.type_str(),
                        "expected an array of names, skipping entry"
                    );
                    continue;
                }
            };

            let mut forbidden = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(name) => forbidden.push(name),
                    other => warn!(
                        student = %student,
                        value = %other,
                        "ignoring non-string conflict entry"
                    ),
                }
            }
            constraints.insert(student, forbidden);
        }

        Ok(ClassConfig {
            roster: raw.roster,
            constraints,
        })
    }
}

/// Searches the working directory, then the executable's directory.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    file_name: String,
    current_dir: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
}

impl ConfigLocator {
    pub fn new(file_name: &str, current_dir: Option<PathBuf>, exe_dir: Option<PathBuf>) -> Self {
        ConfigLocator {
            file_name: file_name.to_string(),
            current_dir,
            exe_dir,
        }
    }

    pub fn from_env(file_name: &str) -> Self {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::new(file_name, env::current_dir().ok(), exe_dir)
    }

    pub fn find(&self) -> ConfigResult<Option<PathBuf>> {
        let candidates = [&self.current_dir, &self.exe_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(&self.file_name));

        for path in candidates {
            if exists(&path)? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Where a sample goes when nothing was found. Development builds put
    /// it next to the sources, installed binaries next to themselves.
    pub fn creation_path(&self) -> PathBuf {
        let dev_build = self.exe_dir.as_deref().is_some_and(is_development_build);
        match (&self.current_dir, &self.exe_dir) {
            (Some(cwd), _) if dev_build => cwd.join(&self.file_name),
            (_, Some(exe_dir)) => exe_dir.join(&self.file_name),
            (Some(cwd), None) => cwd.join(&self.file_name),
            (None, None) => PathBuf::from(&self.file_name),
        }
    }

    pub fn load_or_create(&self) -> ConfigResult<LoadOutcome> {
        match self.find()? {
            Some(path) => load_file(path),
            None => {
                let path = self.creation_path();
                write_sample(&path)?;
                Ok(LoadOutcome::SetupRequired { path })
            }
        }
    }
}

/// Load an explicitly named file, writing the sample there if it is missing.
pub fn load_or_create_at(path: &Path) -> ConfigResult<LoadOutcome> {
    if exists(path)? {
        load_file(path.to_path_buf())
    } else {
        write_sample(path)?;
        Ok(LoadOutcome::SetupRequired {
            path: path.to_path_buf(),
        })
    }
}

fn exists(path: &Path) -> ConfigResult<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ConfigError::Access {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_file(path: PathBuf) -> ConfigResult<LoadOutcome> {
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = ClassConfig::parse(&contents, &path)?;

    info!(
        path = %path.display(),
        students = config.roster.len(),
        constrained = config.constraints.len(),
        "loaded class config"
    );
    Ok(LoadOutcome::Loaded { path, config })
}

fn is_development_build(exe_dir: &Path) -> bool {
    exe_dir.starts_with(env::temp_dir()) || exe_dir.components().any(|c| c.as_os_str() == "target")
}

fn toml_string(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

fn toml_array(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| toml_string(s)).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn sample_contents() -> String {
    let mut out = format!("schuelerliste = {}\n\n", toml_array(&SAMPLE_STUDENTS));
    out.push_str("# List who must not be put in a group with whom.\n");
    out.push_str("# Example: \"Student A\" = [\"Student B\", \"Student C\"]\n");
    out.push_str("# Keep conflicts symmetric: if X must not work with Y, list X for Y as well.\n");
    for (student, forbidden) in SAMPLE_CONFLICTS {
        out.push_str(&format!("{} = {}\n", toml_string(student), toml_array(forbidden)));
    }
    out.push_str("\n# Adjust 'schuelerliste' and the conflicts above to your class.\n");
    out
}

fn write_sample(path: &Path) -> ConfigResult<()> {
    fs::write(path, sample_contents()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote sample class config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::validate;
    use tempfile::tempdir;

    fn parse(contents: &str) -> ConfigResult<ClassConfig> {
        ClassConfig::parse(contents, Path::new("test.toml"))
    }

    #[test]
    fn test_parse_roster_and_conflicts() {
        let config = parse(
            r#"
schuelerliste = ["Anna", "Ben", "Cleo"]
"Anna" = ["Ben"]
"Ben" = ["Anna", "Cleo"]
"#,
        )
        .unwrap();

        assert_eq!(config.roster, vec!["Anna", "Ben", "Cleo"]);
        assert_eq!(config.constraints.len(), 2);
        assert_eq!(config.constraints["Ben"], vec!["Anna", "Cleo"]);
    }

    #[test]
    fn test_parse_accepts_students_alias() {
        let config = parse(r#"students = ["Anna", "Ben"]"#).unwrap();
        assert_eq!(config.roster, vec!["Anna", "Ben"]);
        assert!(config.constraints.is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_conflicts() {
        let config = parse(
            r#"
schuelerliste = ["Anna", "Ben"]
"Anna" = ["Ben", 3, true]
"Ben" = "Anna"
"#,
        )
        .unwrap();

        assert_eq!(config.constraints.len(), 1);
        assert_eq!(config.constraints["Anna"], vec!["Ben"]);
    }

    #[test]
    fn test_parse_without_roster_is_empty() {
        let config = parse(r#""Anna" = ["Ben"]"#).unwrap();
        assert!(config.roster.is_empty());
        assert_eq!(config.constraints.len(), 1);
    }

    #[test]
    fn test_parse_rejects_invalid_toml() {
        let err = parse("schuelerliste = [\"Anna\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn test_sample_round_trips_as_symmetric_config() {
        let config = parse(&sample_contents()).unwrap();

        assert_eq!(config.roster.len(), 10);
        assert_eq!(config.roster[0], "Schueler 1");
        assert_eq!(config.constraints.len(), 3);
        assert_eq!(config.constraints["Schueler 1"], vec!["Schueler 2", "Schueler 3"]);
        assert!(validate(&config.constraints).is_empty());
    }

    #[test]
    fn test_find_prefers_current_dir() {
        let cwd = tempdir().unwrap();
        let exe = tempdir().unwrap();
        fs::write(cwd.path().join(CONFIG_FILE_NAME), "schuelerliste = [\"A\"]").unwrap();
        fs::write(exe.path().join(CONFIG_FILE_NAME), "schuelerliste = [\"B\"]").unwrap();

        let locator = ConfigLocator::new(
            CONFIG_FILE_NAME,
            Some(cwd.path().to_path_buf()),
            Some(exe.path().to_path_buf()),
        );
        assert_eq!(
            locator.find().unwrap(),
            Some(cwd.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn test_find_falls_back_to_exe_dir() {
        let cwd = tempdir().unwrap();
        let exe = tempdir().unwrap();
        fs::write(exe.path().join(CONFIG_FILE_NAME), "schuelerliste = [\"B\"]").unwrap();

        let locator = ConfigLocator::new(
            CONFIG_FILE_NAME,
            Some(cwd.path().to_path_buf()),
            Some(exe.path().to_path_buf()),
        );
        match locator.load_or_create().unwrap() {
            LoadOutcome::Loaded { path, config } => {
                assert_eq!(path, exe.path().join(CONFIG_FILE_NAME));
                assert_eq!(config.roster, vec!["B"]);
            }
            other => panic!("expected a loaded config, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_writes_sample() {
        let cwd = tempdir().unwrap();
        let exe = tempdir().unwrap();
        let locator = ConfigLocator::new(
            CONFIG_FILE_NAME,
            Some(cwd.path().to_path_buf()),
            Some(exe.path().to_path_buf()),
        );

        // The executable lives under the temp dir, so this counts as a
        // development build and the sample lands in the working directory.
        let expected = cwd.path().join(CONFIG_FILE_NAME);
        match locator.load_or_create().unwrap() {
            LoadOutcome::SetupRequired { path } => assert_eq!(path, expected),
            other => panic!("expected setup to be required, got {:?}", other),
        }

        match locator.load_or_create().unwrap() {
            LoadOutcome::Loaded { config, .. } => assert_eq!(config.roster.len(), 10),
            other => panic!("expected the sample to load, got {:?}", other),
        }
    }

    #[test]
    fn test_creation_path_without_dev_build() {
        let exe_dir = PathBuf::from("/opt/klassen/bin");
        let locator = ConfigLocator::new(
            CONFIG_FILE_NAME,
            Some(PathBuf::from("/home/lehrer")),
            Some(exe_dir.clone()),
        );
        assert_eq!(locator.creation_path(), exe_dir.join(CONFIG_FILE_NAME));

        let cargo_run = ConfigLocator::new(
            CONFIG_FILE_NAME,
            Some(PathBuf::from("/home/lehrer/project")),
            Some(PathBuf::from("/home/lehrer/project/target/debug")),
        );
        assert_eq!(
            cargo_run.creation_path(),
            PathBuf::from("/home/lehrer/project").join(CONFIG_FILE_NAME)
        );

        let cwd_only = ConfigLocator::new(CONFIG_FILE_NAME, Some(PathBuf::from("/srv")), None);
        assert_eq!(cwd_only.creation_path(), PathBuf::from("/srv").join(CONFIG_FILE_NAME));

        let nowhere = ConfigLocator::new(CONFIG_FILE_NAME, None, None);
        assert_eq!(nowhere.creation_path(), PathBuf::from(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_explicit_path_is_created_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("my-class.toml");

        assert!(matches!(
            load_or_create_at(&path).unwrap(),
            LoadOutcome::SetupRequired { .. }
        ));
        assert!(path.exists());
        assert!(matches!(
            load_or_create_at(&path).unwrap(),
            LoadOutcome::Loaded { .. }
        ));
    }
}
