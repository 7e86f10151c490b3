use sitegen_core::config::Settings;
use sitegen_core::*;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.generation.provider, ProviderId::Claude);
    assert_eq!(settings.generation.model, "claude-2.1");
    assert_eq!(settings.generation.api_key_env, "ANTHROPIC_API_KEY");
    assert_eq!(settings.generation.max_output_tokens, 2000);
    assert_eq!(settings.generation.output_mode, OutputMode::Delimited);
    assert!(settings.generation.base_url.is_none());

    assert_eq!(settings.retry.max_attempts, 3);
    assert!(settings.images.enabled);
    assert_eq!(settings.images.result_count, 10);
    assert!(settings.deploy.token_envs.is_empty());
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.generation.provider = ProviderId::OpenAI;
    settings.generation.model = "gpt-4o-mini".to_string();
    settings.generation.output_mode = OutputMode::Bare;
    settings.retry.base_delay_ms = 250;
    settings.deploy.token_envs = vec!["NETLIFY_AUTH_TOKEN".to_string()];
    settings.save_to(&config_path).unwrap();

    let loaded = Settings::load_from(&config_path);

    assert_eq!(loaded.generation.provider, ProviderId::OpenAI);
    assert_eq!(loaded.generation.model, "gpt-4o-mini");
    assert_eq!(loaded.generation.output_mode, OutputMode::Bare);
    assert_eq!(loaded.retry.base_delay_ms, 250);
    assert_eq!(loaded.deploy.token_envs, vec!["NETLIFY_AUTH_TOKEN"]);
}

#[test]
fn test_settings_partial_file_uses_section_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[generation]
provider = "claude"
model = "claude-3-haiku-20240307"
api_key_env = "MY_KEY"
max_output_tokens = 1000
"#,
    )
    .unwrap();

    let loaded = Settings::load_from(&config_path);

    assert_eq!(loaded.generation.model, "claude-3-haiku-20240307");
    assert_eq!(loaded.generation.history_token_limit, 3000);
    assert_eq!(loaded.retry.max_attempts, 3);
    assert!(loaded.images.enabled);
}

#[test]
fn test_settings_single_key_sections() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[generation]\nprovider = \"openai\"\n\n[images]\nenabled = false\n\n[retry]\nmax_attempts = 5\n",
    )
    .unwrap();

    let loaded = Settings::load_from(&config_path);

    assert_eq!(loaded.generation.provider, ProviderId::OpenAI);
    assert_eq!(loaded.generation.max_output_tokens, 2000);
    assert!(!loaded.images.enabled);
    assert_eq!(loaded.images.search_api_key_env, "PEXELS_API_KEY");
    assert_eq!(loaded.images.result_count, 10);
    assert_eq!(loaded.retry.max_attempts, 5);
    assert_eq!(loaded.retry.base_delay_ms, 1000);
}

#[cfg(target_os = "linux")]
#[test]
fn test_settings_save_writes_under_config_dir() {
    let temp_dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    let mut settings = Settings::default();
    settings.images.result_count = 4;
    settings.save().unwrap();

    assert_eq!(Settings::config_path(), temp_dir.path().join("sitegen").join("config.toml"));
    assert!(Settings::config_path().exists());
    assert_eq!(Settings::load().images.result_count, 4);

    std::env::remove_var("XDG_CONFIG_HOME");
}

#[test]
fn test_settings_invalid_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "this is = = not toml").unwrap();

    let loaded = Settings::load_from(&config_path);
    assert_eq!(loaded.generation.model, "claude-2.1");
}

#[test]
fn test_settings_api_key_reads_from_env() {
    std::env::set_var("TEST_API_KEY_SITEGEN", "test-key-12345");

    let mut settings = Settings::default();
    settings.generation.api_key_env = "TEST_API_KEY_SITEGEN".to_string();
    assert_eq!(settings.api_key(), Some("test-key-12345".to_string()));

    settings.generation.api_key_env = "NONEXISTENT_KEY_SITEGEN_TEST".to_string();
    assert!(settings.api_key().is_none());

    std::env::remove_var("TEST_API_KEY_SITEGEN");
}

#[test]
fn test_deploy_tokens_only_include_set_vars() {
    std::env::set_var("TEST_DEPLOY_TOKEN_SITEGEN", "tok");

    let mut settings = Settings::default();
    settings.deploy.token_envs = vec![
        "TEST_DEPLOY_TOKEN_SITEGEN".to_string(),
        "TEST_DEPLOY_TOKEN_SITEGEN_UNSET".to_string(),
    ];
    let tokens = settings.deploy_tokens();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens.get("TEST_DEPLOY_TOKEN_SITEGEN").map(String::as_str), Some("tok"));

    std::env::remove_var("TEST_DEPLOY_TOKEN_SITEGEN");
}

#[test]
fn test_retry_policy_from_settings() {
    let mut settings = Settings::default();
    settings.retry.max_attempts = 0;
    settings.retry.base_delay_ms = 20;

    let policy = settings.retry_policy();
    assert_eq!(policy.max_attempts, 1);
    assert_eq!(policy.base_delay, Duration::from_millis(20));
}

#[test]
fn test_build_generator_uses_configured_model() {
    let mut settings = Settings::default();
    settings.generation.model = "gpt-4".to_string();
    settings.images.enabled = false;

    let generator = settings.build_generator("key").unwrap();
    assert_eq!(generator.model(), "gpt-4");
}
