use melingo::config::{MelingoConfig, load, parse, resolve_api_key, validate};

#[test]
fn default_config_has_sensible_values() {
    let config = MelingoConfig::default();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.bind, "0.0.0.0");
    assert!(config.engine.enabled);
    assert_eq!(config.engine.provider, "openai");
    assert_eq!(config.engine.model, "gpt-3.5-turbo");
    assert_eq!(config.engine.max_tokens, 200);
    assert_eq!(config.engine.temperature, 0.7);
    assert!(config.engine.api_key.is_none());
    assert!(config.engine.base_url.is_none());
    assert!(config.engine.system_prompt.is_none());
}

#[test]
fn valid_toml_parses_successfully() {
    let toml_str = r#"
[server]
port = 9090
bind = "127.0.0.1"

[engine]
provider = "anthropic"
model = "claude-3-5-haiku-latest"
api_key = "sk-test"
max_tokens = 150
temperature = 0.2
base_url = "http://localhost:4010/v1"
system_prompt = "You write short, friendly store messages."
"#;

    let config = parse(toml_str).unwrap();
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.bind, "127.0.0.1");
    assert_eq!(config.engine.provider, "anthropic");
    assert_eq!(config.engine.model, "claude-3-5-haiku-latest");
    assert_eq!(config.engine.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.engine.max_tokens, 150);
    assert_eq!(
        config.engine.base_url.as_deref(),
        Some("http://localhost:4010/v1")
    );
    assert_eq!(
        config.engine.system_prompt.as_deref(),
        Some("You write short, friendly store messages.")
    );
}

#[test]
fn partial_config_uses_defaults_for_missing_fields() {
    let toml_str = r#"
[engine]
api_key = "test-key"
"#;

    let config = parse(toml_str).unwrap();
    // Server should use defaults
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.bind, "0.0.0.0");
    // Engine should use defaults except api_key
    assert_eq!(config.engine.provider, "openai");
    assert_eq!(config.engine.max_tokens, 200);
    assert_eq!(config.engine.api_key.as_deref(), Some("test-key"));
}

#[test]
fn empty_toml_uses_all_defaults() {
    let config = parse("").unwrap();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.engine.model, "gpt-3.5-turbo");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let err = parse("this is not valid toml {{{").unwrap_err().to_string();
    assert!(
        err.contains("expected") || err.contains("invalid"),
        "error should be descriptive: {err}"
    );
}

#[test]
fn invalid_values_rejected_by_validate() {
    let err = parse("[engine]\nprovider = \"deepmind\"\n").unwrap_err();
    assert!(err.to_string().contains("invalid provider 'deepmind'"));

    let err = parse("[engine]\nmax_tokens = 0\n").unwrap_err();
    assert!(err.to_string().contains("max_tokens"));

    let mut config = MelingoConfig::default();
    config.engine.temperature = 3.5;
    assert!(validate(&config).unwrap_err().to_string().contains("temperature"));
}

#[test]
fn blank_api_key_counts_as_unset() {
    let mut config = parse("[engine]\nprovider = \"openai\"\napi_key = \"   \"\n").unwrap();
    // SAFETY: the only test in this binary touching OPENAI_API_KEY
    unsafe {
        std::env::remove_var("OPENAI_API_KEY");
    }
    resolve_api_key(&mut config);
    assert!(config.engine.api_key.is_none());
}

#[test]
fn config_file_and_env_resolution() {
    // Missing file falls back to defaults.
    // SAFETY: the only test in this binary touching MELINGO_CONFIG / ANTHROPIC_API_KEY
    unsafe {
        std::env::set_var("MELINGO_CONFIG", "/tmp/nonexistent-melingo-config.toml");
    }
    let config = load().unwrap();
    assert_eq!(config.server.port, 8000);

    // File values win over defaults; the key comes from the provider's env var.
    let tmp_config = std::env::temp_dir().join("melingo-test-config.toml");
    std::fs::write(
        &tmp_config,
        r#"
[server]
port = 9999

[engine]
provider = "anthropic"
"#,
    )
    .unwrap();

    unsafe {
        std::env::set_var("MELINGO_CONFIG", &tmp_config);
        std::env::set_var("ANTHROPIC_API_KEY", "sk-ant-from-env");
    }
    let result = load();
    unsafe {
        std::env::remove_var("MELINGO_CONFIG");
        std::env::remove_var("ANTHROPIC_API_KEY");
    }
    std::fs::remove_file(&tmp_config).ok();

    let config = result.unwrap();
    assert_eq!(config.server.port, 9999);
    assert_eq!(config.engine.provider, "anthropic");
    assert_eq!(config.engine.api_key.as_deref(), Some("sk-ant-from-env"));
}
