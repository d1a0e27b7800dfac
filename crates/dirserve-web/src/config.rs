use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesystemConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_max_upload_size_mb() -> usize { 100 }

fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_upload_size_mb: default_max_upload_size_mb(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            filesystem: FilesystemConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Upper bound for any request body, uploads included.
    pub fn max_body_bytes(&self) -> usize {
        self.filesystem.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.cert_path.is_some() && self.tls.key_path.is_some()
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("DIRSERVE_CONFIG").map(PathBuf::from).ok();

        let config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            Self::from_toml(&contents)?
        } else {
            ServerConfig::default()
        };

        Ok(config.apply_env(|key| std::env::var(key).ok())?.restrict_bind())
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(root) = var("DIRSERVE_ROOT") {
            self.filesystem.root = PathBuf::from(root);
        }

        if let Some(val) = var("DIRSERVE_MAX_UPLOAD_SIZE_MB") {
            match val.parse::<usize>() {
                Ok(mb) => self.filesystem.max_upload_size_mb = mb,
                Err(_) => tracing::warn!("Ignoring invalid DIRSERVE_MAX_UPLOAD_SIZE_MB: {val}"),
            }
        }

        if let Some(addr) = var("DIRSERVE_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }

        if let Some(cert) = var("DIRSERVE_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = var("DIRSERVE_TLS_KEY") {
            self.tls.key_path = Some(key);
        }

        Ok(self)
    }

    // There is no authentication, so never listen on every interface by accident.
    fn restrict_bind(mut self) -> Self {
        if self.bind_addr.ip().is_unspecified() {
            if std::env::var("DIRSERVE_INSECURE").is_ok() {
                tracing::warn!(
                    "Serving {} WITHOUT authentication on all interfaces ({}). \
                     Anyone on the network can upload and delete files!",
                    self.filesystem.root.display(),
                    self.bind_addr
                );
            } else {
                let safe_addr: SocketAddr = ([127, 0, 0, 1], self.bind_addr.port()).into();
                tracing::warn!(
                    "No authentication available. Binding to {} instead of {} for safety. \
                     Set DIRSERVE_INSECURE=1 to override (NOT RECOMMENDED).",
                    safe_addr,
                    self.bind_addr
                );
                self.bind_addr = safe_addr;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.filesystem.max_upload_size_mb, 100);
        assert_eq!(config.max_body_bytes(), 100 * 1024 * 1024);
        assert!(!config.tls_enabled());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.filesystem.max_upload_size_mb, 100);
    }

    #[test]
    fn toml_overrides_fields() {
        let config = ServerConfig::from_toml(
            r#"
            bind_addr = "127.0.0.1:8080"

            [filesystem]
            root = "/srv/share"
            max_upload_size_mb = 5

            [tls]
            cert_path = "cert.pem"
            key_path = "key.pem"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.filesystem.root, PathBuf::from("/srv/share"));
        assert_eq!(config.max_body_bytes(), 5 * 1024 * 1024);
        assert!(config.tls_enabled());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ServerConfig::from_toml("bind_addr = 42").is_err());
    }

    #[test]
    fn env_overrides_toml() {
        let config = ServerConfig::default()
            .apply_env(env(&[
                ("DIRSERVE_ROOT", "/data"),
                ("DIRSERVE_MAX_UPLOAD_SIZE_MB", "7"),
                ("DIRSERVE_BIND_ADDR", "127.0.0.1:9000"),
            ]))
            .unwrap();

        assert_eq!(config.filesystem.root, PathBuf::from("/data"));
        assert_eq!(config.filesystem.max_upload_size_mb, 7);
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn invalid_upload_size_is_ignored() {
        let config = ServerConfig::default()
            .apply_env(env(&[("DIRSERVE_MAX_UPLOAD_SIZE_MB", "lots")]))
            .unwrap();
        assert_eq!(config.filesystem.max_upload_size_mb, 100);
    }

    #[test]
    fn invalid_bind_addr_is_an_error() {
        let result = ServerConfig::default().apply_env(env(&[("DIRSERVE_BIND_ADDR", "nowhere")]));
        assert!(result.is_err());
    }

    #[test]
    fn tls_requires_both_paths() {
        let config = ServerConfig::default()
            .apply_env(env(&[("DIRSERVE_TLS_CERT", "cert.pem")]))
            .unwrap();
        assert!(!config.tls_enabled());
    }
}
