//! Keyword fallback replies used when no API key is configured.

use async_trait::async_trait;

use super::error::ProviderError;
use super::provider::ReplyProvider;
use crate::config::ChatMode;

const PROJECT_REPLY: &str = "I see you're asking about projects — check the Projects section for demos and descriptions. Ask me about a specific project for details.";
const SKILLS_REPLY: &str = "The Skills section shows proficiency. I can explain what each skill means or how you might learn it.";
const HELP_REPLY: &str = "Ask me anything about this portfolio, the mascot Cipher, or how the site was built — HTML, CSS, or JavaScript.";
const DEFAULT_REPLY: &str = "Nice question — I don't have an API key configured, so I'm answering from local rules. Provide more context or set an OPENAI_API_KEY to enable richer replies.";

/// A single fallback rule: reply with `reply` when any keyword is a substring
/// of the lowercased message.
#[derive(Debug, Clone)]
pub struct FallbackRule {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

impl FallbackRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Ordered rule list, first match wins.
#[derive(Debug, Clone)]
pub struct FallbackRules {
    rules: Vec<FallbackRule>,
    default_reply: &'static str,
}

impl FallbackRules {
    pub const fn new(rules: Vec<FallbackRule>, default_reply: &'static str) -> Self {
        Self {
            rules,
            default_reply,
        }
    }

    /// Pick the reply for `message`.
    pub fn classify(&self, message: &str) -> &'static str {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(self.default_reply, |rule| rule.reply)
    }
}

impl Default for FallbackRules {
    // Order matters: project > skill/experience > how/help > default.
    fn default() -> Self {
        Self::new(
            vec![
                FallbackRule {
                    keywords: &["project"],
                    reply: PROJECT_REPLY,
                },
                FallbackRule {
                    keywords: &["skill", "experience"],
                    reply: SKILLS_REPLY,
                },
                FallbackRule {
                    keywords: &["how", "help"],
                    reply: HELP_REPLY,
                },
            ],
            DEFAULT_REPLY,
        )
    }
}

/// Provider that answers from `FallbackRules` without any I/O.
#[derive(Debug, Clone, Default)]
pub struct LocalProvider {
    rules: FallbackRules,
}

#[async_trait]
impl ReplyProvider for LocalProvider {
    fn mode(&self) -> ChatMode {
        ChatMode::Local
    }

    async fn reply(&self, message: &str) -> Result<String, ProviderError> {
        Ok(self.rules.classify(message).to_string())
    }
}
