use crate::constants::{
    SIZE_DEFAULT_EMBEDDING, SIZE_DEFAULT_GPT4_FAMILY, SIZE_DEFAULT_GPT35_FAMILY,
    SIZE_DEFAULT_UNKNOWN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCategory {
    Chat,
    Embedding,
}

struct ModelSpec {
    id: &'static str,
    category: ModelCategory,
    size: u64,
    context_length: u32,
    vision: bool,
}

/// Compiled-in metadata for the backend model families Ollama clients expect
/// to see. The backend's list-models response carries no size, context, or
/// capability information, so these values (and the fallback heuristics) are
/// what the gateway reports and routes on.
static KNOWN_MODELS: &[ModelSpec] = &[
    ModelSpec {
        id: "gpt-3.5-turbo",
        category: ModelCategory::Chat,
        size: 1_500_000_000,
        context_length: 4_096,
        vision: false,
    },
    ModelSpec {
        id: "gpt-3.5-turbo-16k",
        category: ModelCategory::Chat,
        size: 1_600_000_000,
        context_length: 16_384,
        vision: false,
    },
    ModelSpec {
        id: "gpt-4",
        category: ModelCategory::Chat,
        size: 20_000_000_000,
        context_length: 8_192,
        vision: false,
    },
    ModelSpec {
        id: "gpt-4-32k",
        category: ModelCategory::Chat,
        size: 20_500_000_000,
        context_length: 32_768,
        vision: false,
    },
    ModelSpec {
        id: "gpt-4-turbo",
        category: ModelCategory::Chat,
        size: 25_000_000_000,
        context_length: 128_000,
        vision: true,
    },
    ModelSpec {
        id: "gpt-4o",
        category: ModelCategory::Chat,
        size: 20_000_000_000,
        context_length: 128_000,
        vision: true,
    },
    ModelSpec {
        id: "gpt-4o-mini",
        category: ModelCategory::Chat,
        size: 2_000_000_000,
        context_length: 128_000,
        vision: true,
    },
    ModelSpec {
        id: "text-embedding-ada-002",
        category: ModelCategory::Embedding,
        size: 350_000_000,
        context_length: 8_191,
        vision: false,
    },
    ModelSpec {
        id: "text-embedding-3-small",
        category: ModelCategory::Embedding,
        size: 100_000_000,
        context_length: 8_191,
        vision: false,
    },
    ModelSpec {
        id: "text-embedding-3-large",
        category: ModelCategory::Embedding,
        size: 600_000_000,
        context_length: 8_191,
        vision: false,
    },
];

/// Read-only table of known model identifiers. Constructed once at startup
/// and shared; safe for concurrent reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRegistry;

impl ModelRegistry {
    pub fn new() -> Self {
        Self
    }

    fn find(&self, id: &str) -> Option<&'static ModelSpec> {
        KNOWN_MODELS.iter().find(|spec| spec.id == id)
    }

    /// Whether the identifier is in the explicitly-known set. Known models
    /// bypass the keyword exclusion filter in the tags translation.
    pub fn included(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn category(&self, id: &str) -> Option<ModelCategory> {
        if let Some(spec) = self.find(id) {
            return Some(spec.category);
        }
        let lower = id.to_ascii_lowercase();
        if lower.contains("embedding") {
            Some(ModelCategory::Embedding)
        } else if lower.starts_with("gpt-") || lower.starts_with("chatgpt-") {
            Some(ModelCategory::Chat)
        } else {
            None
        }
    }

    /// Nominal byte size: the registry value when known, otherwise a
    /// category default.
    pub fn size(&self, id: &str) -> u64 {
        if let Some(spec) = self.find(id) {
            return spec.size;
        }
        let lower = id.to_ascii_lowercase();
        if lower.contains("embedding") {
            SIZE_DEFAULT_EMBEDDING
        } else if lower.contains("gpt-4") {
            SIZE_DEFAULT_GPT4_FAMILY
        } else if lower.contains("gpt-3.5") {
            SIZE_DEFAULT_GPT35_FAMILY
        } else {
            SIZE_DEFAULT_UNKNOWN
        }
    }

    pub fn context_length(&self, id: &str) -> Option<u32> {
        self.find(id).map(|spec| spec.context_length)
    }

    /// Whether the model accepts image content parts. Unknown identifiers
    /// fall back to family heuristics.
    pub fn supports_vision(&self, id: &str) -> bool {
        if let Some(spec) = self.find(id) {
            return spec.vision;
        }
        let lower = id.to_ascii_lowercase();
        lower.contains("vision") || lower.contains("gpt-4o") || lower.starts_with("chatgpt-")
    }
}
