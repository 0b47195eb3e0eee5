use crate::Error;
use serde::{Deserialize, Serialize};

/// Largest time zone offset from UTC in minutes (UTC+14:00).
const MAX_TIME_ZONE_OFFSET: i32 = 14 * 60;

/// Device characteristics, sent under the `device` key of every log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Name of the SDK. Consists of the name of the SDK and the platform, e.g. "appcenter.ios".
    pub sdk_name: String,

    /// Version of the SDK in semver format, e.g. "1.2.0".
    pub sdk_version: String,

    /// Version of the wrapper SDK when the SDK is used through a wrapper, e.g. Xamarin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper_sdk_version: Option<String>,

    /// Name of the wrapper SDK.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper_sdk_name: Option<String>,

    /// Device model, e.g. "iPad2,3".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Device manufacturer, e.g. "HTC".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oem_name: Option<String>,

    /// OS name, e.g. "iOS".
    pub os_name: String,

    /// OS version, e.g. "9.3.0".
    pub os_version: String,

    /// OS build code, e.g. "LMY47X".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_build: Option<String>,

    /// API level when applicable, like on Android.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_api_level: Option<i32>,

    /// Language code, e.g. "en_US".
    pub locale: String,

    /// Offset in minutes from UTC for the device time zone, including daylight saving time.
    pub time_zone_offset: i32,

    /// Screen size of the device in pixels, e.g. "640x480".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<String>,

    /// Application version name, e.g. "1.1.0".
    pub app_version: String,

    /// Carrier name for mobile devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,

    /// Carrier country code for mobile devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_country: Option<String>,

    /// The application's build number, e.g. "42".
    pub app_build: String,

    /// The bundle identifier, package identifier or namespace of the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_namespace: Option<String>,
}

impl Device {
    /// Check that all required device fields are set.
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("sdkName", &self.sdk_name),
            ("sdkVersion", &self.sdk_version),
            ("osName", &self.os_name),
            ("osVersion", &self.os_version),
            ("locale", &self.locale),
            ("appVersion", &self.app_version),
            ("appBuild", &self.app_build),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(Error::InvalidLog(format!("device {} is empty", name)));
        }

        if !(-MAX_TIME_ZONE_OFFSET..=MAX_TIME_ZONE_OFFSET).contains(&self.time_zone_offset) {
            return Err(Error::InvalidLog(format!(
                "device timeZoneOffset {} is out of range",
                self.time_zone_offset
            )));
        }

        Ok(())
    }
}
