use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Options for a scripting session
///
/// Deserializes from a camelCase JSON object where durations are given in
/// milliseconds; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    /// Prefix prepended to every `open` location
    pub base_url: String,

    /// Deadline for every wait-style action (default: 5000ms)
    #[serde(with = "duration_ms")]
    pub timeout: Duration,

    /// Pause between two condition checks (default: 50ms)
    #[serde(with = "duration_ms")]
    pub poll_interval: Duration,

    /// Default viewport width (default: 1920)
    pub width: u32,

    /// Default viewport height (default: 1080)
    pub height: u32,

    /// Log every executed action at debug level
    pub debug: bool,

    pub load_images: bool,
    pub ignore_ssl_errors: bool,
    pub ssl_protocol: Option<String>,
    pub web_security: bool,
    pub proxy: Option<String>,
    pub proxy_type: Option<String>,
    pub proxy_auth: Option<String>,
    pub cookies_file: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_millis(5000),
            poll_interval: Duration::from_millis(50),
            width: 1920,
            height: 1080,
            debug: false,
            load_images: true,
            ignore_ssl_errors: true,
            ssl_protocol: None,
            web_security: true,
            proxy: None,
            proxy_type: None,
            proxy_auth: None,
            cookies_file: None,
        }
    }
}

impl SessionOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object, filling in defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder method: set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder method: set the wait timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method: set the poll interval
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Builder method: set the default viewport size
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder method: enable action logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn load_images(mut self, load_images: bool) -> Self {
        self.load_images = load_images;
        self
    }

    pub fn ignore_ssl_errors(mut self, ignore: bool) -> Self {
        self.ignore_ssl_errors = ignore;
        self
    }

    pub fn ssl_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.ssl_protocol = Some(protocol.into());
        self
    }

    pub fn web_security(mut self, enabled: bool) -> Self {
        self.web_security = enabled;
        self
    }

    /// Builder method: route traffic through `host:port`
    pub fn proxy(mut self, host: impl Into<String>) -> Self {
        self.proxy = Some(host.into());
        self
    }

    pub fn proxy_type(mut self, kind: impl Into<String>) -> Self {
        self.proxy_type = Some(kind.into());
        self
    }

    pub fn proxy_auth(mut self, auth: impl Into<String>) -> Self {
        self.proxy_auth = Some(auth.into());
        self
    }

    pub fn cookies_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookies_file = Some(path.into());
        self
    }

    /// Engine launch parameters derived from these options
    pub fn launch_params(&self) -> LaunchParams {
        let mut flags = BTreeMap::new();
        flags.insert("load-images", self.load_images.to_string());
        flags.insert("ignore-ssl-errors", self.ignore_ssl_errors.to_string());
        flags.insert("web-security", self.web_security.to_string());

        let optional = [
            ("ssl-protocol", self.ssl_protocol.clone()),
            ("proxy", self.proxy.clone()),
            ("proxy-type", self.proxy_type.clone()),
            ("proxy-auth", self.proxy_auth.clone()),
            ("cookies-file", self.cookies_file.as_ref().map(|p| p.display().to_string())),
        ];
        for (flag, value) in optional {
            if let Some(value) = value {
                flags.insert(flag, value);
            }
        }

        LaunchParams {
            width: self.width,
            height: self.height,
            flags,
        }
    }
}

/// What an engine needs to start: the default window size and the
/// pass-through launch flags keyed by their native names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub width: u32,
    pub height: u32,
    pub flags: BTreeMap<&'static str, String>,
}

impl LaunchParams {
    /// Look up a flag by native name
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    /// Boolean flag, `default` when absent
    pub fn flag_enabled(&self, name: &str, default: bool) -> bool {
        self.flag(name).map_or(default, |v| v == "true")
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
