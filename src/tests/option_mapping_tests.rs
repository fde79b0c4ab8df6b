/// Tests for parameter mapping between Ollama options and the backend's
/// chat-completion parameters
#[cfg(test)]
mod option_mapping_tests {
    use serde_json::json;

    use crate::handlers::transform::{build_chat_params, convert_format, map_options};

    #[test]
    fn test_direct_parameter_mapping() {
        let options = json!({
            "temperature": 0.7,
            "top_p": 0.9,
            "seed": 42,
            "stop": ["\n", "END"],
            "frequency_penalty": 0.5,
            "presence_penalty": 0.3
        });

        let params = map_options(Some(&options));
        assert_eq!(params["temperature"], 0.7);
        assert_eq!(params["top_p"], 0.9);
        assert_eq!(params["seed"], 42);
        assert_eq!(params["stop"], json!(["\n", "END"]));
        assert_eq!(params["frequency_penalty"], 0.5);
        assert_eq!(params["presence_penalty"], 0.3);
    }

    #[test]
    fn test_num_predict_maps_to_max_tokens() {
        let options = json!({ "num_predict": 100 });
        let params = map_options(Some(&options));
        assert_eq!(params["max_tokens"], 100);
        assert!(!params.contains_key("num_predict"));
    }

    #[test]
    fn test_unmapped_options_dropped() {
        let options = json!({ "top_k": 40, "num_ctx": 4096, "repeat_last_n": 64 });
        let params = map_options(Some(&options));
        assert!(params.is_empty());
    }

    #[test]
    fn test_absent_options() {
        assert!(map_options(None).is_empty());
    }

    #[test]
    fn test_format_json_mode() {
        let format = json!("json");
        assert_eq!(
            convert_format(Some(&format)),
            Some(json!({ "type": "json_object" }))
        );
    }

    #[test]
    fn test_format_schema_forwarded_as_structured_output() {
        let schema = json!({
            "type": "object",
            "properties": { "age": { "type": "integer" } }
        });
        let converted = convert_format(Some(&schema)).unwrap();
        assert_eq!(converted["type"], "json_schema");
        assert_eq!(converted["json_schema"]["strict"], true);
        assert_eq!(converted["json_schema"]["schema"], schema);
    }

    #[test]
    fn test_format_unknown_string_dropped() {
        let format = json!("yaml");
        assert_eq!(convert_format(Some(&format)), None);
        assert_eq!(convert_format(None), None);
    }

    #[test]
    fn test_chat_params_shape() {
        let messages = json!([{ "role": "user", "content": "Hi" }]);
        let params = build_chat_params(
            "gpt-4",
            messages.clone(),
            false,
            Some(&json!({ "temperature": 0.2 })),
            None,
            None,
        );

        assert_eq!(params["model"], "gpt-4");
        assert_eq!(params["messages"], messages);
        assert_eq!(params["stream"], false);
        assert_eq!(params["temperature"], 0.2);
        assert!(params.get("stream_options").is_none());
        assert!(params.get("tools").is_none());
    }

    #[test]
    fn test_streaming_requests_ask_for_usage_totals() {
        let params = build_chat_params(
            "gpt-4",
            json!([{ "role": "user", "content": "Hi" }]),
            true,
            None,
            None,
            None,
        );
        assert_eq!(params["stream"], true);
        assert_eq!(params["stream_options"]["include_usage"], true);
    }

    #[test]
    fn test_tools_forwarded_only_when_non_empty() {
        let tools = json!([{
            "type": "function",
            "function": { "name": "get_weather", "parameters": { "type": "object" } }
        }]);
        let with_tools = build_chat_params(
            "gpt-4",
            json!([{ "role": "user", "content": "Hi" }]),
            false,
            None,
            Some(&tools),
            None,
        );
        assert_eq!(with_tools["tools"], tools);

        let empty = json!([]);
        let without_tools = build_chat_params(
            "gpt-4",
            json!([{ "role": "user", "content": "Hi" }]),
            false,
            None,
            Some(&empty),
            None,
        );
        assert!(without_tools.get("tools").is_none());
    }
}
