use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "MICRODADOS_ENEM_2023.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "graficos_enem";
pub const DEFAULT_LOG_FILE: &str = "logs/enem_analyzer.log";

/// Paths used by a run, resolved from the environment (and `.env`).
///
/// | Variable          | Default                     |
/// |-------------------|-----------------------------|
/// | `ENEM_DATA_FILE`  | `MICRODADOS_ENEM_2023.csv`  |
/// | `ENEM_OUTPUT_DIR` | `graficos_enem`             |
/// | `LOG_FILE_PATH`   | `logs/enem_analyzer.log`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            PathBuf::from(
                lookup(key)
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| default.to_string()),
            )
        };

        Self {
            data_file: get("ENEM_DATA_FILE", DEFAULT_DATA_FILE),
            output_dir: get("ENEM_OUTPUT_DIR", DEFAULT_OUTPUT_DIR),
            log_file: get("LOG_FILE_PATH", DEFAULT_LOG_FILE),
        }
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        data_file: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = data_file {
            self.data_file = path;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_env_values_and_overrides() {
        let vars: HashMap<&str, &str> = [("ENEM_DATA_FILE", "dados.csv"), ("ENEM_OUTPUT_DIR", " ")]
            .into_iter()
            .collect();
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(settings.data_file, PathBuf::from("dados.csv"));
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));

        let settings = settings.with_overrides(None, Some(PathBuf::from("out")));
        assert_eq!(settings.data_file, PathBuf::from("dados.csv"));
        assert_eq!(settings.output_dir, PathBuf::from("out"));
    }
}
