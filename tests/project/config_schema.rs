use tempfile::TempDir;
use wardline::config::Config;

#[test]
fn minimal_config_deserializes_with_defaults() {
    let toml = r#"
[gate]
auth_key = "abc"
forbidden_intents = ["bootloader", "unlock_partitions", "factory_reset"]

[scanner]
approval_score = 75
"#;

    let parsed: Config = toml::from_str(toml).expect("config should deserialize");

    assert_eq!(parsed.gate.auth_key, "abc");
    assert_eq!(parsed.gate.forbidden_intents.len(), 3);
    assert_eq!(parsed.gate.complexity_ceiling, 2048);
    assert_eq!(parsed.scanner.approval_score, 75);
    assert_eq!(parsed.scanner.red_below, 40);
    assert_eq!(parsed.sensory.channel_capacity, 1000);
    assert_eq!(parsed.sensory.cache_soft_ceiling, 1000);
    assert_eq!(parsed.sensory.cache_trim_target, 500);
    assert_eq!(parsed.stream.interval_ms, 800);
    assert_eq!(parsed.stream.batch_size, 5);
    assert_eq!(parsed.observability.log_level, "info");
    parsed.validate().expect("defaults are valid");
}

#[test]
fn saved_config_reloads_unchanged() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("config.toml");

    let mut config = Config::load_or_init_at(&path).expect("fresh config");
    config.sensory.channel_capacity = 256;
    config.vitals.thermal_zones = vec!["soc-thermal".into()];
    config.save().expect("save");

    let reloaded = Config::load_or_init_at(&path).expect("reload");
    assert_eq!(reloaded.sensory.channel_capacity, 256);
    assert_eq!(reloaded.vitals.thermal_zones, ["soc-thermal"]);
    assert_eq!(reloaded.config_path, path);
}

#[test]
fn misordered_scanner_bands_fail_validation() {
    let toml = r"
[scanner]
red_below = 90
yellow_below = 80
";
    let parsed: Config = toml::from_str(toml).expect("config should deserialize");

    let err = parsed.validate().expect_err("bands are inverted");
    assert!(err.to_string().contains("red_below"));
}

#[test]
fn agent_channel_is_mandatory() {
    let toml = r#"
[sensory]
channels = ["SYSTEM_VITALS"]
"#;
    let parsed: Config = toml::from_str(toml).expect("config should deserialize");

    assert!(parsed.validate().is_err());
}
