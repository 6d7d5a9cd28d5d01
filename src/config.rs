use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use lettre::message::Mailbox;

use crate::error::ConfigError;

pub const DEFAULT_SCHEDULE_PATH: &str = "messmenu.xlsx";
pub const DEFAULT_CYCLE_START: &str = "2025-11-24";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_CREDENTIAL_VAR: &str = "EMAIL_PASSWORD";

/// Run configuration, built once in `main` and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub schedule_path: PathBuf,
    pub cycle_start: NaiveDate,
    pub sender: String,
    pub recipients: Vec<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Name of the environment variable holding the SMTP password.
    pub credential_var: String,
}

/// Values given on the command line. They win over the environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub schedule_path: Option<PathBuf>,
    pub cycle_start: Option<String>,
    pub sender: Option<String>,
    pub recipients: Vec<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
}

impl Config {
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| env::var(key).ok())
    }

    /// Resolves every setting from `overrides`, then `lookup`, then the defaults.
    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let schedule_path = overrides
            .schedule_path
            .or_else(|| var("MENU_SCHEDULE_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEDULE_PATH));

        let cycle_start_raw = overrides
            .cycle_start
            .or_else(|| var("MENU_CYCLE_START"))
            .unwrap_or_else(|| DEFAULT_CYCLE_START.into());
        let cycle_start = parse_date(&cycle_start_raw).ok_or(ConfigError::Invalid {
            key: "MENU_CYCLE_START",
            value: cycle_start_raw.clone(),
        })?;

        let sender = overrides
            .sender
            .or_else(|| var("MENU_SENDER"))
            .map(|s| s.trim().to_string())
            .ok_or(ConfigError::Missing("MENU_SENDER"))?;

        let recipients = if overrides.recipients.is_empty() {
            var("MENU_RECIPIENTS")
                .map(|list| split_list(&list))
                .unwrap_or_default()
        } else {
            overrides
                .recipients
                .iter()
                .flat_map(|r| split_list(r))
                .collect()
        };
        if recipients.is_empty() {
            return Err(ConfigError::Missing("MENU_RECIPIENTS"));
        }
        check_address("MENU_SENDER", &sender)?;
        for recipient in &recipients {
            check_address("MENU_RECIPIENTS", recipient)?;
        }

        let smtp_host = overrides
            .smtp_host
            .or_else(|| var("SMTP_HOST"))
            .unwrap_or_else(|| DEFAULT_SMTP_HOST.into());

        let smtp_port = match overrides.smtp_port {
            Some(port) => port,
            None => match var("SMTP_PORT") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "SMTP_PORT",
                    value: raw.clone(),
                })?,
                None => DEFAULT_SMTP_PORT,
            },
        };

        let credential_var =
            var("MENU_CREDENTIAL_VAR").unwrap_or_else(|| DEFAULT_CREDENTIAL_VAR.into());

        Ok(Self {
            schedule_path,
            cycle_start,
            sender,
            recipients,
            smtp_host,
            smtp_port,
            credential_var,
        })
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// The `--date` override if given, otherwise `today`.
pub fn resolve_as_of(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ConfigError> {
    match raw {
        Some(raw) => parse_date(raw).ok_or(ConfigError::Invalid {
            key: "--date",
            value: raw.to_string(),
        }),
        None => Ok(today),
    }
}

fn check_address(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    raw.parse::<Mailbox>()
        .map(|_| ())
        .map_err(|_| ConfigError::Invalid {
            key,
            value: raw.to_string(),
        })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunError;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_required_env() {
        let cfg = Config::from_lookup(
            ConfigOverrides::default(),
            lookup(&[
                ("MENU_SENDER", "mess@example.com"),
                ("MENU_RECIPIENTS", "a@example.com, b@example.com,,"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.schedule_path, PathBuf::from("messmenu.xlsx"));
        assert_eq!(cfg.cycle_start, NaiveDate::from_ymd_opt(2025, 11, 24).unwrap());
        assert_eq!(cfg.recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(cfg.smtp_host, "smtp.gmail.com");
        assert_eq!(cfg.smtp_port, 465);
        assert_eq!(cfg.credential_var, "EMAIL_PASSWORD");
    }

    #[test]
    fn test_overrides_beat_env() {
        let overrides = ConfigOverrides {
            schedule_path: Some(PathBuf::from("/tmp/menu.csv")),
            cycle_start: Some("2026-01-05".into()),
            recipients: vec!["c@example.com".into()],
            smtp_port: Some(2465),
            ..Default::default()
        };
        let cfg = Config::from_lookup(
            overrides,
            lookup(&[
                ("MENU_SENDER", "mess@example.com"),
                ("MENU_RECIPIENTS", "a@example.com"),
                ("MENU_SCHEDULE_PATH", "/srv/menu.xlsx"),
                ("SMTP_PORT", "25"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.schedule_path, PathBuf::from("/tmp/menu.csv"));
        assert_eq!(cfg.cycle_start, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(cfg.recipients, vec!["c@example.com"]);
        assert_eq!(cfg.smtp_port, 2465);
    }

    #[test]
    fn test_missing_sender_and_recipients() {
        let err = Config::from_lookup(ConfigOverrides::default(), lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MENU_SENDER")));

        let err = Config::from_lookup(
            ConfigOverrides::default(),
            lookup(&[("MENU_SENDER", "mess@example.com"), ("MENU_RECIPIENTS", " , ")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MENU_RECIPIENTS")));
    }

    #[test]
    fn test_invalid_values() {
        let base = [
            ("MENU_SENDER", "mess@example.com"),
            ("MENU_RECIPIENTS", "a@example.com"),
        ];

        let mut pairs = base.to_vec();
        pairs.push(("MENU_CYCLE_START", "24/11/2025"));
        let err = Config::from_lookup(ConfigOverrides::default(), lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MENU_CYCLE_START", .. }));

        let mut pairs = base.to_vec();
        pairs.push(("SMTP_PORT", "smtp"));
        let err = Config::from_lookup(ConfigOverrides::default(), lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SMTP_PORT", .. }));
    }

    #[test]
    fn test_malformed_addresses_are_config_errors() {
        let err = Config::from_lookup(
            ConfigOverrides::default(),
            lookup(&[
                ("MENU_SENDER", "not an address"),
                ("MENU_RECIPIENTS", "a@example.com"),
            ]),
        )
        .unwrap_err();
        assert!(
            matches!(&err, ConfigError::Invalid { key: "MENU_SENDER", value } if value == "not an address")
        );
        assert_eq!(RunError::from(err).exit_code(), 2);

        let err = Config::from_lookup(
            ConfigOverrides::default(),
            lookup(&[
                ("MENU_SENDER", "mess@example.com"),
                ("MENU_RECIPIENTS", "a@example.com, b-at-example.com"),
            ]),
        )
        .unwrap_err();
        assert!(
            matches!(&err, ConfigError::Invalid { key: "MENU_RECIPIENTS", value } if value == "b-at-example.com")
        );
        assert_eq!(RunError::from(err).exit_code(), 2);
    }

    #[test]
    fn test_named_mailbox_is_accepted() {
        let cfg = Config::from_lookup(
            ConfigOverrides::default(),
            lookup(&[
                ("MENU_SENDER", "Mess Office <mess@example.com>"),
                ("MENU_RECIPIENTS", "a@example.com"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.sender, "Mess Office <mess@example.com>");
    }

    #[test]
    fn test_as_of_date() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
        assert_eq!(resolve_as_of(None, today).unwrap(), today);
        assert_eq!(
            resolve_as_of(Some("2025-12-01"), today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );

        let err = resolve_as_of(Some("tomorrow"), today).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "--date", .. }));
        assert_eq!(RunError::from(err).exit_code(), 2);
    }
}
