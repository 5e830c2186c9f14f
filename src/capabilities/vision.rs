use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Model ids known to accept image input. Membership is exact: a model
/// missing from this set is treated as text-only even if its provider
/// family has vision variants.
static VISION_MODELS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        // OpenAI
        "gpt-4o",
        "gpt-4o-mini",
        "gpt-4-turbo",
        "gpt-4-turbo-2024-04-09",
        "gpt-4-vision-preview",
        // Anthropic
        "claude-3-5-sonnet-20241022",
        "claude-3-5-sonnet-20240620",
        "claude-3-opus-20240229",
        "claude-3-sonnet-20240229",
        "claude-3-haiku-20240307",
        "claude-3-5-haiku-20241022",
        // Google
        "gemini-1.5-pro",
        "gemini-1.5-flash",
        "gemini-2.0-flash-exp",
        "gemini-2.5-flash",
        "gemini-pro-vision",
    ])
});

/// Pure set-membership check; no network call, never fails.
pub fn supports_vision(model: &str) -> bool {
    VISION_MODELS.contains(model)
}
