use crate::{
    models::{Device, Log},
    Error,
};
use chrono::{DateTime, Duration, DurationRound, Utc};
use log::debug;
use std::{collections::BTreeSet, str::FromStr};

const APP_SECRET_ENV: &str = "APPCENTER_APP_SECRET";
const FIELDS_SEPARATOR: char = ';';
const FIELD_KEY_VALUE_SEPARATOR: char = '=';
const APP_SECRET_KEY: &str = "appsecret";
const TARGET_KEY: &str = "target";

/// Identifies the application and, optionally, a transmission target.
///
/// Accepted formats:
///
/// - a bare app secret: `"{app secret}"`
/// - key value pairs: `"appsecret={app secret};target={transmission target token}"`
/// - a mix of both: `"{app secret};target={transmission target token}"`
///
/// Keys are case insensitive, whitespace around keys and values is ignored and unknown keys are
/// skipped. At most one app secret may be given, either bare or with the `appsecret` key.
///
/// ```
/// use appcenter_logs::AppSecret;
///
/// let secret: AppSecret = "appsecret=1234;target=abcd-efgh".parse().unwrap();
/// assert_eq!(Some("1234"), secret.app_secret());
/// assert_eq!(Some("abcd-efgh"), secret.transmission_target_token());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSecret {
    app_secret: Option<String>,
    transmission_target_token: Option<String>,
}

/// Errors of parsing an [`AppSecret`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The input is empty or whitespace.
    #[error("empty app secret")]
    Empty,
    /// A field is neither a bare app secret nor a single `key=value` pair.
    #[error("invalid format")]
    InvalidFormat,
    /// A known key has no value.
    #[error("missing value for {0}")]
    EmptyValue(&'static str),
    /// Neither an app secret nor a transmission target token was found.
    #[error("missing app secret and transmission target")]
    MissingAppSecret,
}

impl AppSecret {
    /// The app secret, if any.
    pub fn app_secret(&self) -> Option<&str> {
        self.app_secret.as_deref()
    }

    /// The transmission target token, if any.
    pub fn transmission_target_token(&self) -> Option<&str> {
        self.transmission_target_token.as_deref()
    }
}

impl FromStr for AppSecret {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let mut app_secret = None;
        let mut transmission_target_token = None;
        for field in s.split(FIELDS_SEPARATOR).map(str::trim) {
            if field.is_empty() {
                continue;
            }
            let parts: Vec<&str> = field.split(FIELD_KEY_VALUE_SEPARATOR).collect();
            match parts.as_slice() {
                [bare] if app_secret.is_none() => app_secret = Some(bare.to_string()),
                [key, value] => {
                    let value = value.trim();
                    match key.trim().to_lowercase().as_str() {
                        APP_SECRET_KEY if app_secret.is_some() => {
                            return Err(ParseError::InvalidFormat)
                        }
                        APP_SECRET_KEY => {
                            app_secret = Some(non_empty(APP_SECRET_KEY, value)?);
                        }
                        TARGET_KEY => {
                            transmission_target_token = Some(non_empty(TARGET_KEY, value)?);
                        }
                        unknown => debug!("Ignoring unknown app secret field {}", unknown),
                    }
                }
                _ => return Err(ParseError::InvalidFormat),
            }
        }

        if app_secret.is_none() && transmission_target_token.is_none() {
            return Err(ParseError::MissingAppSecret);
        }
        Ok(AppSecret {
            app_secret,
            transmission_target_token,
        })
    }
}

fn non_empty(key: &'static str, value: &str) -> Result<String, ParseError> {
    if value.is_empty() {
        Err(ParseError::EmptyValue(key))
    } else {
        Ok(value.to_string())
    }
}

/// Values applied to every log before it is handed to a transport.
#[derive(Debug, Clone)]
pub struct Settings {
    app_secret: AppSecret,
    transmission_target_tokens: BTreeSet<String>,
    user_id: Option<String>,
    distribution_group_id: Option<String>,
    device: Option<Device>,
}

impl Settings {
    /// Create settings for the given app secret. Its transmission target token, if any, becomes
    /// the first transmission target.
    pub fn new(app_secret: AppSecret) -> Self {
        let transmission_target_tokens = app_secret
            .transmission_target_token()
            .map(String::from)
            .into_iter()
            .collect();
        Settings {
            app_secret,
            transmission_target_tokens,
            user_id: None,
            distribution_group_id: None,
            device: None,
        }
    }

    /// Create settings from the `APPCENTER_APP_SECRET` environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let app_secret = std::env::var(APP_SECRET_ENV).map_err(Error::Environment)?;
        Ok(Settings::new(app_secret.parse()?))
    }

    /// Send logs to an additional transmission target.
    pub fn with_transmission_target(mut self, token: impl Into<String>) -> Self {
        self.transmission_target_tokens.insert(token.into());
        self
    }

    /// Set the user id of logs that have none.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the distribution group id of logs that have none.
    pub fn with_distribution_group_id(mut self, distribution_group_id: impl Into<String>) -> Self {
        self.distribution_group_id = Some(distribution_group_id.into());
        self
    }

    /// Set the device of logs that have none.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// The app secret.
    pub fn app_secret(&self) -> &AppSecret {
        &self.app_secret
    }

    /// Prepare a log for sending.
    ///
    /// Fields the log already has are kept. A missing timestamp is set to now, truncated to the
    /// millisecond precision of the wire format. The log's transmission targets are replaced with
    /// the targets of these settings.
    pub fn prepare(&self, log: &mut Log) {
        log.timestamp.get_or_insert_with(now);
        if log.user_id.is_none() {
            log.user_id.clone_from(&self.user_id);
        }
        if log.distribution_group_id.is_none() {
            log.distribution_group_id
                .clone_from(&self.distribution_group_id);
        }
        if log.device.is_none() {
            log.device.clone_from(&self.device);
        }
        log.set_transmission_target_tokens(self.transmission_target_tokens.iter().cloned());
        debug!(
            "Prepared {} log for {} transmission targets",
            log.kind().type_name(),
            self.transmission_target_tokens.len()
        );
    }
}

fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(Duration::milliseconds(1)).unwrap_or(now)
}
