//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub debug: bool,
    pub rtl: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("BLOCK_UI_DEBUG"),
            rtl: env_flag("BLOCK_UI_RTL"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::EnvConfig;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_are_false() {
        let _lock = env_lock();
        let _g1 = set_env_guard("BLOCK_UI_DEBUG", None);
        let _g2 = set_env_guard("BLOCK_UI_RTL", None);

        let config = EnvConfig::from_env();
        assert!(!config.debug);
        assert!(!config.rtl);
    }

    #[test]
    fn env_flags_set_to_one_enable() {
        let _lock = env_lock();
        let _g1 = set_env_guard("BLOCK_UI_DEBUG", Some("1"));
        let _g2 = set_env_guard("BLOCK_UI_RTL", Some("1"));

        let config = EnvConfig::from_env();
        assert!(config.debug);
        assert!(config.rtl);
    }
}
