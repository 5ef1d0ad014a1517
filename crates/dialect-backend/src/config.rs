//! Per-adapter configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one solver adapter.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Path to the solver executable (bare names resolve via PATH).
    pub executable: PathBuf,
    /// Wall-clock budget per analysis call.
    pub timeout: Duration,
}

impl BackendConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default ngspice configuration. Windows installs ship the console
    /// binary as `ngspice_con`.
    pub fn ngspice() -> Self {
        let executable = if cfg!(windows) { "ngspice_con" } else { "ngspice" };
        Self {
            executable: PathBuf::from(executable),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Default Xyce configuration.
    pub fn xyce() -> Self {
        Self {
            executable: PathBuf::from("Xyce"),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::ngspice();
        assert_eq!(config.timeout, Duration::from_secs(30));
        let config = BackendConfig::xyce().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.executable, PathBuf::from("Xyce"));
    }
}
