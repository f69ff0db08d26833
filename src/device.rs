//! Device metadata attached to every encrypted payload.
//!
//! The backend's fraud screening expects a snapshot of the environment the
//! payment was entered in. Hosts embed this crate in very different places
//! (webviews, kiosks, native shells), so collection sits behind a trait and
//! the crate ships only a static implementation.

use serde::{Deserialize, Serialize};

/// Browser-level capabilities and viewport dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserData {
    /// Whether scripting is available in the host surface.
    pub java_script_enabled: bool,
    /// Legacy applet support flag. Kept for wire compatibility.
    pub java_enabled: bool,
    /// Color depth of the screen, in bits.
    pub color_depth: u32,
    /// Physical screen height, in pixels.
    pub screen_height: u32,
    /// Physical screen width, in pixels.
    pub screen_width: u32,
    /// Viewport height, in pixels.
    pub inner_height: u32,
    /// Viewport width, in pixels.
    pub inner_width: u32,
}

impl Default for BrowserData {
    fn default() -> Self {
        Self {
            java_script_enabled: true,
            java_enabled: false,
            color_depth: 24,
            screen_height: 0,
            screen_width: 0,
            inner_height: 0,
            inner_width: 0,
        }
    }
}

/// The device snapshot serialized into the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInformation {
    /// Offset from UTC in minutes, positive east of Greenwich.
    pub timezone_offset_utc_minutes: i32,
    /// BCP 47 locale tag of the host surface, for example `en-GB`.
    pub locale: String,
    /// Browser capabilities and dimensions.
    pub browser_data: BrowserData,
}

impl DeviceInformation {
    /// Creates a snapshot with default browser data.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructor arguments"
    )]
    #[must_use]
    pub fn new(locale: impl Into<String>, timezone_offset_utc_minutes: i32) -> Self {
        Self {
            timezone_offset_utc_minutes,
            locale: locale.into(),
            browser_data: BrowserData::default(),
        }
    }
}

/// Supplies the device snapshot at payload-assembly time.
pub trait DeviceInformationSource: Send + Sync {
    /// Collects the current device snapshot.
    fn collect(&self) -> DeviceInformation;
}

/// A source that returns a fixed, pre-collected snapshot.
///
/// Suits hosts that gather the data once at startup, and tests.
#[derive(Debug, Clone)]
pub struct StaticDeviceInformationSource {
    information: DeviceInformation,
}

impl StaticDeviceInformationSource {
    /// Wraps an already-collected snapshot.
    #[must_use]
    pub const fn new(information: DeviceInformation) -> Self {
        Self { information }
    }
}

impl DeviceInformationSource for StaticDeviceInformationSource {
    fn collect(&self) -> DeviceInformation {
        self.information.clone()
    }
}
