#[cfg(test)]
mod tests {
    use crate::config::{Config, ReadEnv, DEFAULT_IDENTITY_NAMES};
    use fleet_types::SenderPolicyKind;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct InMemoryEnv(HashMap<&'static str, &'static str>);

    impl InMemoryEnv {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            Self(pairs.iter().cloned().collect())
        }
    }

    impl ReadEnv for InMemoryEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── from_file ─────────────────────────────────────────────────────────────

    #[test]
    fn test_from_file_minimal() {
        let toml = r#"
[[identities]]
name = "Shaka"
token = "TOKEN-A"

[[identities]]
name = "Lilith"
token = "TOKEN-B"

[relay]
channel_id = 123456789
"#;
        let f = write_toml(toml);
        let cfg = Config::from_file(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.identities.len(), 2);
        assert_eq!(cfg.identities[0].name, "Shaka");
        assert_eq!(cfg.identities[1].token, "TOKEN-B");
        assert_eq!(cfg.relay.channel_id, 123456789);
        // Defaults
        assert_eq!(cfg.relay.dispatch_interval_secs, 1);
        assert_eq!(cfg.relay.presence_interval_secs, 60);
        assert_eq!(cfg.rate.window_secs, 60);
        assert_eq!(cfg.rate.max_per_window, 25);
    }

    #[test]
    fn test_from_file_with_access_config() {
        let toml = r#"
[[identities]]
name = "Shaka"
token = "TOK"

[relay]
channel_id = 42

[access]
kind = "allowlist"
allowed_senders = [111, 222]
"#;
        let f = write_toml(toml);
        let cfg = Config::from_file(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.access.kind, SenderPolicyKind::Allowlist);
        assert_eq!(cfg.access.allowed_senders, vec![111, 222]);
    }

    #[test]
    fn test_from_file_open_policy() {
        let toml = r#"
[[identities]]
name = "York"
token = "TOK"

[relay]
channel_id = 42

[access]
kind = "open"
"#;
        let f = write_toml(toml);
        let cfg = Config::from_file(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.access.kind, SenderPolicyKind::Open);
        assert!(cfg.access.allowed_senders.is_empty());
    }

    #[test]
    fn test_from_file_default_access_is_empty_allowlist() {
        let toml = r#"
[[identities]]
name = "Atlas"
token = "TOK"

[relay]
channel_id = 42
"#;
        let f = write_toml(toml);
        let cfg = Config::from_file(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.access.kind, SenderPolicyKind::Allowlist);
        assert!(cfg.access.allowed_senders.is_empty());
    }

    #[test]
    fn test_from_file_rate_and_audit_overrides() {
        let toml = r#"
[[identities]]
name = "Edison"
token = "TOK"

[relay]
channel_id = 42
dispatch_interval_secs = 2

[rate]
window_secs = 30
max_per_window = 10

[audit]
path = "/tmp/fleet-audit.log"
max_bytes = 4096
"#;
        let f = write_toml(toml);
        let cfg = Config::from_file(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.relay.dispatch_interval_secs, 2);
        assert_eq!(cfg.rate.window_secs, 30);
        assert_eq!(cfg.rate.max_per_window, 10);
        assert_eq!(cfg.audit.path.as_deref(), Some("/tmp/fleet-audit.log"));
        assert_eq!(cfg.audit.max_bytes, 4096);
    }

    #[test]
    fn test_from_file_missing_returns_error() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file_invalid_toml_returns_error() {
        let f = write_toml("this is not valid toml !!!");
        let result = Config::from_file(f.path().to_str().unwrap());
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Failed to parse config file"));
    }

    #[test]
    fn test_from_file_no_identities_rejected() {
        let toml = r#"
identities = []

[relay]
channel_id = 42
"#;
        let f = write_toml(toml);
        assert!(Config::from_file(f.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_from_file_duplicate_identity_names_rejected() {
        let toml = r#"
[[identities]]
name = "Shaka"
token = "A"

[[identities]]
name = "Shaka"
token = "B"

[relay]
channel_id = 42
"#;
        let f = write_toml(toml);
        assert!(Config::from_file(f.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_from_file_zero_channel_rejected() {
        let toml = r#"
[[identities]]
name = "Shaka"
token = "A"

[relay]
channel_id = 0
"#;
        let f = write_toml(toml);
        assert!(Config::from_file(f.path().to_str().unwrap()).is_err());
    }

    // ── from_env ──────────────────────────────────────────────────────────────

    #[test]
    fn test_from_env_missing_channel_returns_error() {
        let env = InMemoryEnv::new(&[("SHAKA_TOKEN", "tok")]);
        assert!(Config::from_env_impl(&env).is_err());
    }

    #[test]
    fn test_from_env_no_tokens_returns_error() {
        let env = InMemoryEnv::new(&[("RELAY_CHANNEL_ID", "42")]);
        assert!(Config::from_env_impl(&env).is_err());
    }

    #[test]
    fn test_from_env_collects_present_tokens() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "tok-shaka"),
            ("YORK_TOKEN", "tok-york"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.identities.len(), 2);
        assert_eq!(cfg.identities[0].name, "Shaka");
        assert_eq!(cfg.identities[0].token, "tok-shaka");
        assert_eq!(cfg.identities[1].name, "York");
    }

    #[test]
    fn test_from_env_full_fleet() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "a"),
            ("LILITH_TOKEN", "b"),
            ("EDISON_TOKEN", "c"),
            ("PYTHAGORAS_TOKEN", "d"),
            ("ATLAS_TOKEN", "e"),
            ("YORK_TOKEN", "f"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.identities.len(), 6);
        let names: Vec<_> = cfg.identities.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, DEFAULT_IDENTITY_NAMES);
    }

    #[test]
    fn test_from_env_invalid_channel_id_returns_error() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "not-a-number"),
            ("SHAKA_TOKEN", "tok"),
        ]);
        assert!(Config::from_env_impl(&env).is_err());
    }

    #[test]
    fn test_from_env_sender_policy_open() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "tok"),
            ("RELAY_SENDER_POLICY", "open"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.access.kind, SenderPolicyKind::Open);
    }

    #[test]
    fn test_from_env_allowed_senders_parsed() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "tok"),
            ("RELAY_ALLOWED_SENDERS", "10, 20,30"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.access.allowed_senders, vec![10, 20, 30]);
    }

    #[test]
    fn test_from_env_defaults() {
        let env = InMemoryEnv::new(&[("RELAY_CHANNEL_ID", "42"), ("SHAKA_TOKEN", "tok")]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.access.kind, SenderPolicyKind::Allowlist);
        assert!(cfg.access.allowed_senders.is_empty());
        assert_eq!(cfg.relay.dispatch_interval_secs, 1);
        assert_eq!(cfg.rate.max_per_window, 25);
        assert!(cfg.audit.path.is_some());
    }

    #[test]
    fn test_from_env_dispatch_interval_override() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "tok"),
            ("RELAY_DISPATCH_INTERVAL_SECS", "5"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.relay.dispatch_interval_secs, 5);
    }

    #[test]
    fn test_from_env_audit_overrides() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "tok"),
            ("RELAY_AUDIT_PATH", "/var/log/fleet.log"),
            ("RELAY_AUDIT_MAX_BYTES", "2048"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        assert_eq!(cfg.audit.path.as_deref(), Some("/var/log/fleet.log"));
        assert_eq!(cfg.audit.max_bytes, 2048);
    }

    #[test]
    fn test_toml_roundtrip() {
        let env = InMemoryEnv::new(&[
            ("RELAY_CHANNEL_ID", "42"),
            ("SHAKA_TOKEN", "tok"),
            ("RELAY_ALLOWED_SENDERS", "1,2"),
        ]);
        let cfg = Config::from_env_impl(&env).unwrap();
        let serialized = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(back.identities.len(), cfg.identities.len());
        assert_eq!(back.relay.channel_id, cfg.relay.channel_id);
        assert_eq!(back.access.allowed_senders, cfg.access.allowed_senders);
    }
}
