//! Visitor environment detection from the User-Agent header

use serde::{Deserialize, Serialize};

/// Coarse device class recorded on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

const HANDHELD_MARKERS: &[&str] = &[
    "mobile",
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

impl DeviceClass {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if !HANDHELD_MARKERS.iter().any(|m| ua.contains(m)) {
            return DeviceClass::Desktop;
        }
        if ua.contains("tablet") || ua.contains("ipad") {
            DeviceClass::Tablet
        } else {
            DeviceClass::Mobile
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Tablet => "Tablet",
            DeviceClass::Desktop => "Desktop",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Mobile" => DeviceClass::Mobile,
            "Tablet" => DeviceClass::Tablet,
            _ => DeviceClass::Desktop,
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser family. Order matters: most engines also advertise "Chrome" or
/// "Safari", so the specific markers are checked first.
pub fn detect_browser(user_agent: &str) -> &'static str {
    const FAMILIES: &[(&[&str], &str)] = &[
        (&["Firefox"], "Firefox"),
        (&["SamsungBrowser"], "Samsung Browser"),
        (&["Opera", "OPR"], "Opera"),
        (&["Edg"], "Edge"),
        (&["Chrome"], "Chrome"),
        (&["Safari"], "Safari"),
        (&["MSIE", "Trident"], "Internet Explorer"),
    ];

    FAMILIES
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| user_agent.contains(m)))
        .map_or("Unknown", |(_, name)| *name)
}
