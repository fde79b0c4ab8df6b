/// Tests for the request/response translation between the Ollama wire shape
/// and the OpenAI-compatible backend shape
#[cfg(test)]
mod translator_tests {
    use std::time::Instant;

    use serde_json::{Value, json};

    use crate::handlers::transform::{
        build_generate_messages, convert_to_ollama_chat, convert_to_ollama_embedding,
        convert_to_ollama_generate, expand_message_images, format_modified_at, map_done_reason,
        messages_contain_images, model_digest, should_include_model, translate_tags,
        unsupported_generate_fields,
    };
    use crate::registry::ModelRegistry;

    fn registry() -> ModelRegistry {
        ModelRegistry::new()
    }

    #[test]
    fn test_digest_shape_and_determinism() {
        let digest = model_digest("gpt-3.5-turbo");
        assert!(digest.starts_with("sha256:"));
        let hex = &digest["sha256:".len()..];
        assert_eq!(hex.len(), 12);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));

        // Stable per model, distinct across models
        assert_eq!(digest, model_digest("gpt-3.5-turbo"));
        assert_ne!(digest, model_digest("gpt-4"));
    }

    #[test]
    fn test_model_filter_prefixes_and_keywords() {
        let registry = registry();
        assert!(should_include_model("gpt-4", &registry));
        assert!(should_include_model("chatgpt-4o-latest", &registry));
        assert!(should_include_model("o1-mini", &registry));
        assert!(should_include_model("o3-mini", &registry));
        assert!(should_include_model("text-embedding-3-large", &registry));

        assert!(!should_include_model("davinci-002", &registry));
        assert!(!should_include_model("babbage-002", &registry));
        assert!(!should_include_model("gpt-4-turbo-preview", &registry));
        assert!(!should_include_model("gpt-3.5-turbo-instruct", &registry));
        assert!(!should_include_model("whisper-1", &registry));
        assert!(!should_include_model("dall-e-3", &registry));
    }

    #[test]
    fn test_registry_known_models_bypass_keyword_exclusion() {
        // "ada" is an excluded keyword but this id is in the known set
        assert!(should_include_model("text-embedding-ada-002", &registry()));
    }

    #[test]
    fn test_modified_at_uses_numeric_offset() {
        let stamp = format_modified_at(1_680_000_000);
        let parsed = chrono::DateTime::parse_from_rfc3339(&stamp);
        assert!(parsed.is_ok(), "not RFC 3339: {}", stamp);
        assert!(!stamp.ends_with('Z'), "bare Z is not acceptable: {}", stamp);
        assert_eq!(parsed.unwrap().timestamp(), 1_680_000_000);
    }

    #[test]
    fn test_translate_tags_sorted_with_duplicate_name_field() {
        let models = vec![
            json!({"id": "text-embedding-3-small", "object": "model", "created": 1_680_000_004}),
            json!({"id": "gpt-3.5-turbo", "object": "model", "created": 1_680_000_000}),
        ];

        let response = translate_tags(&models, &registry());
        let entries = response["models"].as_array().unwrap();
        assert_eq!(entries.len(), 2);

        // Lexicographic order by name
        assert_eq!(entries[0]["name"], "gpt-3.5-turbo");
        assert_eq!(entries[1]["name"], "text-embedding-3-small");

        for entry in entries {
            assert_eq!(entry["name"], entry["model"]);
            assert!(entry["digest"].as_str().unwrap().starts_with("sha256:"));
        }

        assert_eq!(entries[0]["size"], 1_500_000_000u64);
        assert_eq!(entries[1]["size"], 100_000_000u64);
    }

    #[test]
    fn test_translate_tags_filters_excluded_models() {
        let models = vec![
            json!({"id": "gpt-4", "created": 1_680_000_000}),
            json!({"id": "davinci-002", "created": 1_680_000_000}),
            json!({"id": "whisper-1", "created": 1_680_000_000}),
        ];

        let response = translate_tags(&models, &registry());
        let entries = response["models"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "gpt-4");
    }

    #[test]
    fn test_translate_tags_empty_list() {
        let response = translate_tags(&[], &registry());
        assert_eq!(response, json!({ "models": [] }));
    }

    #[test]
    fn test_translate_tags_deterministic() {
        let models = vec![
            json!({"id": "gpt-4", "created": 1_680_000_000}),
            json!({"id": "gpt-3.5-turbo", "created": 1_680_000_001}),
        ];
        let registry = registry();
        let first = serde_json::to_string(&translate_tags(&models, &registry)).unwrap();
        let second = serde_json::to_string(&translate_tags(&models, &registry)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_done_reason_mapping() {
        assert_eq!(map_done_reason(Some("stop")), "stop");
        assert_eq!(map_done_reason(Some("length")), "length");
        assert_eq!(map_done_reason(Some("tool_calls")), "stop");
        assert_eq!(map_done_reason(Some("content_filter")), "stop");
        assert_eq!(map_done_reason(None), "stop");
    }

    fn backend_chat_response(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3 }
        })
    }

    #[test]
    fn test_generate_envelope() {
        let response =
            convert_to_ollama_generate(&backend_chat_response("Hello!"), "gpt-3.5-turbo", Instant::now());

        assert_eq!(response["model"], "gpt-3.5-turbo");
        assert_eq!(response["response"], "Hello!");
        assert_eq!(response["done"], true);
        assert_eq!(response["done_reason"], "stop");
        assert_eq!(response["prompt_eval_count"], 1);
        assert_eq!(response["eval_count"], 2);
        assert_eq!(response["load_duration"], 0);
        assert!(response["total_duration"].is_u64());
        assert!(response.get("context").is_none());
        assert!(
            chrono::DateTime::parse_from_rfc3339(response["created_at"].as_str().unwrap()).is_ok()
        );
    }

    #[test]
    fn test_generate_envelope_without_usage() {
        let backend = json!({
            "choices": [{ "message": { "role": "assistant", "content": "ok" }, "finish_reason": "length" }]
        });
        let response = convert_to_ollama_generate(&backend, "gpt-4", Instant::now());
        assert_eq!(response["prompt_eval_count"], 0);
        assert_eq!(response["eval_count"], 0);
        assert_eq!(response["done_reason"], "length");
    }

    #[test]
    fn test_chat_envelope() {
        let response = convert_to_ollama_chat(&backend_chat_response("Hi!"), "gpt-4", Instant::now());

        assert_eq!(response["model"], "gpt-4");
        assert_eq!(response["message"]["role"], "assistant");
        assert_eq!(response["message"]["content"], "Hi!");
        assert_eq!(response["done"], true);
        assert_eq!(response["done_reason"], "stop");
        assert!(response["message"].get("tool_calls").is_none());
    }

    #[test]
    fn test_chat_envelope_carries_tool_calls_verbatim() {
        let tool_calls = json!([{
            "id": "call_1",
            "type": "function",
            "function": { "name": "get_weather", "arguments": "{\"city\":\"Berlin\"}" }
        }]);
        let backend = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "", "tool_calls": tool_calls },
                "finish_reason": "tool_calls"
            }]
        });

        let response = convert_to_ollama_chat(&backend, "gpt-4", Instant::now());
        assert_eq!(response["message"]["tool_calls"], tool_calls);
        assert_eq!(response["done_reason"], "stop");
    }

    #[test]
    fn test_embedding_vector_length_preserved() {
        let vector: Vec<f64> = (0..3072).map(|i| i as f64 * 0.001).collect();
        let backend = json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": vector }],
            "model": "text-embedding-3-large"
        });

        let response = convert_to_ollama_embedding(&backend).unwrap();
        assert_eq!(response["embedding"].as_array().unwrap().len(), 3072);
        assert!(response.get("embeddings").is_none());
    }

    #[test]
    fn test_embedding_missing_vector_is_an_error() {
        let err = convert_to_ollama_embedding(&json!({ "data": [] })).unwrap_err();
        assert_eq!(err.status_code, 502);
    }

    #[test]
    fn test_generate_messages_with_system() {
        let messages = build_generate_messages("Hi", Some("You are terse."));
        let list = messages.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["role"], "system");
        assert_eq!(list[0]["content"], "You are terse.");
        assert_eq!(list[1]["role"], "user");
        assert_eq!(list[1]["content"], "Hi");
    }

    #[test]
    fn test_expand_message_images() {
        let messages = vec![json!({
            "role": "user",
            "content": "what is this?",
            "images": ["aGVsbG8="]
        })];

        let expanded = expand_message_images(&messages);
        let message = &expanded.as_array().unwrap()[0];
        assert!(message.get("images").is_none());

        let parts = message["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "what is this?");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/jpeg;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_expand_message_images_leaves_plain_messages_alone() {
        let messages = vec![json!({ "role": "user", "content": "hello" })];
        let expanded = expand_message_images(&messages);
        assert_eq!(expanded.as_array().unwrap()[0]["content"], "hello");
    }

    #[test]
    fn test_messages_contain_images() {
        let with_images = vec![
            json!({ "role": "user", "content": "look" }),
            json!({ "role": "user", "content": "at this", "images": ["aGVsbG8="] }),
        ];
        assert!(messages_contain_images(&with_images));

        let without = vec![json!({ "role": "user", "content": "hello" })];
        assert!(!messages_contain_images(&without));

        // An empty images array is not an image request
        let empty = vec![json!({ "role": "user", "content": "hi", "images": [] })];
        assert!(!messages_contain_images(&empty));
    }

    #[test]
    fn test_unsupported_generate_fields() {
        let body = json!({
            "model": "gpt-4",
            "prompt": "Hi",
            "raw": true,
            "template": "{{ .Prompt }}",
            "context": [1, 2, 3]
        });
        assert_eq!(
            unsupported_generate_fields(&body),
            vec!["raw", "template", "context"]
        );

        let plain = json!({ "model": "gpt-4", "prompt": "Hi" });
        assert!(unsupported_generate_fields(&plain).is_empty());
    }
}
