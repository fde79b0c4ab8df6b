/// Tests for request validation helpers and configuration handling
#[cfg(test)]
mod helpers_tests {
    use serde_json::json;

    use crate::config::{Config, validate_config};
    use crate::handlers::keep_alive::parse_keep_alive_seconds;
    use crate::handlers::validate::{
        extract_embedding_input, extract_model_name, streaming_requested,
    };

    #[test]
    fn test_keep_alive_parsing() {
        assert_eq!(parse_keep_alive_seconds(None).unwrap(), None);
        assert_eq!(
            parse_keep_alive_seconds(Some(&json!(null))).unwrap(),
            None
        );
        assert_eq!(parse_keep_alive_seconds(Some(&json!(300))).unwrap(), Some(300));
        assert_eq!(parse_keep_alive_seconds(Some(&json!(-1))).unwrap(), Some(-1));
        assert_eq!(
            parse_keep_alive_seconds(Some(&json!("5m"))).unwrap(),
            Some(300)
        );
        assert_eq!(
            parse_keep_alive_seconds(Some(&json!("120"))).unwrap(),
            Some(120)
        );
        assert_eq!(parse_keep_alive_seconds(Some(&json!(""))).unwrap(), None);

        assert!(parse_keep_alive_seconds(Some(&json!("forever"))).is_err());
        assert!(parse_keep_alive_seconds(Some(&json!([5]))).is_err());
    }

    #[test]
    fn test_streaming_defaults_to_true() {
        assert!(streaming_requested(&json!({ "model": "gpt-4" })));
        assert!(streaming_requested(&json!({ "stream": true })));
        assert!(!streaming_requested(&json!({ "stream": false })));
    }

    #[test]
    fn test_model_name_extraction() {
        assert_eq!(
            extract_model_name(&json!({ "model": "gpt-4" })).unwrap(),
            "gpt-4"
        );
        assert!(extract_model_name(&json!({})).is_err());
        assert!(extract_model_name(&json!({ "model": "" })).is_err());
        assert!(extract_model_name(&json!({ "model": 42 })).is_err());
    }

    #[test]
    fn test_embedding_input_prompt_wins_over_synonym() {
        let body = json!({ "prompt": "a", "input": "b" });
        assert_eq!(extract_embedding_input(&body).unwrap(), "a");

        let body = json!({ "input": "b" });
        assert_eq!(extract_embedding_input(&body).unwrap(), "b");

        assert!(extract_embedding_input(&json!({})).is_err());
        assert!(extract_embedding_input(&json!({ "prompt": "" })).is_err());
    }

    fn base_config() -> Config {
        Config {
            openai_api_key: "sk-test".to_string(),
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            port: 11434,
            log_level: "INFO".to_string(),
            request_timeout_seconds: 60,
            stream_timeout_seconds: 300,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(validate_config(&base_config()).is_ok());

        let mut config = base_config();
        config.openai_api_key = "  ".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = base_config();
        config.openai_api_base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = base_config();
        config.port = 0;
        assert!(validate_config(&config).is_err());

        let mut config = base_config();
        config.request_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());

        let mut config = base_config();
        config.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let mut config = base_config();
        config.openai_api_base_url = "https://api.openai.com/v1/".to_string();
        config.normalize();
        assert_eq!(config.openai_api_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_log_level_names() {
        let mut config = base_config();
        for (name, expected) in [
            ("DEBUG", log::LevelFilter::Debug),
            ("info", log::LevelFilter::Info),
            ("WARNING", log::LevelFilter::Warn),
            ("ERROR", log::LevelFilter::Error),
            ("CRITICAL", log::LevelFilter::Error),
        ] {
            config.log_level = name.to_string();
            assert_eq!(config.level_filter(), expected);
        }
    }
}
