use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

const DEFAULT_ENV_FILES: [&str; 2] = ["config/.env", ".env"];

/// Typed configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Required
    pub credentials_file: PathBuf,
    pub sheet_id: String,
    pub bot_token: String,

    // Optional
    pub roster_file: Option<PathBuf>,
    pub verify_spreadsheet: bool,
    pub sheets_timeout: Duration,
}

impl Config {
    /// Seed the environment from the env file (if any), then read it.
    pub fn load() -> Result<Self> {
        match env_path("ATB_ENV_FILE") {
            Some(path) => load_dotenv(&path)?,
            None => {
                for candidate in DEFAULT_ENV_FILES {
                    let path = Path::new(candidate);
                    if path.exists() {
                        load_dotenv(path)?;
                        break;
                    }
                }
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .and_then(non_empty)
                .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
        };

        let credentials_file = PathBuf::from(required("GOOGLE_CREDENTIALS_FILE")?);
        let sheet_id = required("SHEET_ID")?;
        let bot_token = required("BOT_TOKEN")?;

        let roster_file = lookup("ATTENDANCE_ROSTER_FILE")
            .and_then(non_empty)
            .map(PathBuf::from);
        let verify_spreadsheet = parse_bool(lookup("VERIFY_SPREADSHEET")).unwrap_or(true);
        let sheets_timeout = Duration::from_secs(
            lookup("SHEETS_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|s| *s > 0)
                .unwrap_or(30),
        );

        Ok(Self {
            credentials_file,
            sheet_id,
            bot_token,
            roster_file,
            verify_spreadsheet,
            sheets_timeout,
        })
    }
}

/// Apply `KEY=value` lines from `path` to the process environment.
///
/// Existing variables win over the file. A file that is missing or unreadable
/// is a config error.
pub fn load_dotenv(path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read env file {}: {e}", path.display())))?;

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue;
        }
        env::set_var(key, val);
    }
    Ok(())
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }

    out
}

fn parse_bool(v: Option<String>) -> Option<bool> {
    let v = v?;
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
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
        move |k: &str| map.get(k).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("GOOGLE_CREDENTIALS_FILE", "/etc/atb/credentials.json"),
        ("SHEET_ID", "1AbC"),
        ("BOT_TOKEN", "123:xyz"),
    ];

    #[test]
    fn required_values_and_defaults() {
        let cfg = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(
            cfg.credentials_file,
            PathBuf::from("/etc/atb/credentials.json")
        );
        assert_eq!(cfg.sheet_id, "1AbC");
        assert_eq!(cfg.bot_token, "123:xyz");
        assert_eq!(cfg.roster_file, None);
        assert!(cfg.verify_spreadsheet);
        assert_eq!(cfg.sheets_timeout, Duration::from_secs(30));
    }

    #[test]
    fn each_missing_or_blank_required_value_is_a_config_error() {
        for missing in ["GOOGLE_CREDENTIALS_FILE", "SHEET_ID", "BOT_TOKEN"] {
            let pairs: Vec<(&str, &str)> = REQUIRED
                .iter()
                .map(|(k, v)| if *k == missing { (*k, "  ") } else { (*k, *v) })
                .collect();
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                matches!(err, Error::Config(ref m) if m.contains(missing)),
                "{missing}: {err}"
            );

            let pairs: Vec<(&str, &str)> =
                REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            assert!(Config::from_lookup(lookup(&pairs)).is_err());
        }
    }

    #[test]
    fn optional_values_override_defaults() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ATTENDANCE_ROSTER_FILE", "roster.json"));
        pairs.push(("VERIFY_SPREADSHEET", "off"));
        pairs.push(("SHEETS_TIMEOUT_SECS", "5"));
        let cfg = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.roster_file, Some(PathBuf::from("roster.json")));
        assert!(!cfg.verify_spreadsheet);
        assert_eq!(cfg.sheets_timeout, Duration::from_secs(5));
    }

    #[test]
    fn garbage_optionals_fall_back() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("VERIFY_SPREADSHEET", "maybe"));
        pairs.push(("SHEETS_TIMEOUT_SECS", "0"));
        let cfg = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(cfg.verify_spreadsheet);
        assert_eq!(cfg.sheets_timeout, Duration::from_secs(30));
    }

    #[test]
    fn dotenv_lines_parse_with_quotes_comments_and_export() {
        let parsed = parse_dotenv(
            "# comment\n\nSHEET_ID=\"abc\"\nexport BOT_TOKEN='1:2'\nGOOGLE_CREDENTIALS_FILE = ./creds.json\nnot a pair\n=novalue\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("SHEET_ID".to_string(), "abc".to_string()),
                ("BOT_TOKEN".to_string(), "1:2".to_string()),
                (
                    "GOOGLE_CREDENTIALS_FILE".to_string(),
                    "./creds.json".to_string()
                ),
            ]
        );
    }

    #[test]
    fn dotenv_never_overrides_existing_variables() {
        let path = std::env::temp_dir().join(format!("atb-dotenv-{}.env", std::process::id()));
        fs::write(
            &path,
            "ATB_TEST_DOTENV_KEEP=from-file\nATB_TEST_DOTENV_NEW=from-file\n",
        )
        .unwrap();
        env::set_var("ATB_TEST_DOTENV_KEEP", "from-env");

        load_dotenv(&path).unwrap();

        assert_eq!(env::var("ATB_TEST_DOTENV_KEEP").unwrap(), "from-env");
        assert_eq!(env::var("ATB_TEST_DOTENV_NEW").unwrap(), "from-file");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_env_file_is_a_config_error() {
        let err = load_dotenv(Path::new("/nonexistent/atb.env")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
