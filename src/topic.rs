/// Decides whether a free-text question is forwarded to the advisor.
pub trait TopicGate: Send + Sync {
    fn is_on_topic(&self, text: &str) -> bool;
}

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "skin",
    "hair",
    "makeup",
    "routine",
    "beauty",
    "product",
    "cleanser",
    "moisturizer",
    "serum",
    "cream",
    "lotion",
    "treatment",
    "face",
    "body",
    "apply",
    "use",
    "morning",
    "night",
    "spf",
    "sunscreen",
    "dry",
    "oily",
    "sensitive",
    "acne",
    "aging",
    "wrinkle",
    "pore",
    "tone",
    "texture",
    "fragrance",
    "perfume",
    "styling",
    "color",
    "dye",
    "care",
    "hydration",
    "exfoliate",
    "mask",
    "powder",
    "foundation",
    "lipstick",
    "mascara",
    "eyeshadow",
    "shampoo",
    "conditioner",
];

/// Case-insensitive substring match against a keyword table.
///
/// "applying" matches "apply" and "SPF50" matches "spf"; there is no word
/// boundary, stemming or negation handling.
#[derive(Debug, Clone)]
pub struct KeywordGate {
    keywords: Vec<String>,
}

impl KeywordGate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordGate {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

impl TopicGate for KeywordGate {
    fn is_on_topic(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}
