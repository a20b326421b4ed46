//! Static catalog of models, prompt templates, parameter presets and the
//! seed conversations a fresh session starts with.

use crate::types::{AiModel, Chat, ChatId, ChatParameters, Message, MessageId, PromptTemplate};
use chrono::{DateTime, TimeZone, Utc};

/// Parameters a session starts with, and what "reset" restores
pub const DEFAULT_PARAMETERS: ChatParameters = ChatParameters {
    temperature: 0.7,
    max_tokens: 2048,
    top_p: 0.9,
    frequency_penalty: 0.0,
};

/// Get all selectable models
pub fn all_models() -> &'static [AiModel] {
    &[
        AiModel {
            id: "gpt-4",
            name: "GPT-4",
            description: "Most capable GPT model, best for complex reasoning",
            max_tokens: 8192,
            provider: "OpenAI",
        },
        AiModel {
            id: "gpt-3.5-turbo",
            name: "GPT-3.5 Turbo",
            description: "Fast and efficient, great for most tasks",
            max_tokens: 4096,
            provider: "OpenAI",
        },
        AiModel {
            id: "claude-3-opus",
            name: "Claude 3 Opus",
            description: "Anthropic's most powerful model for complex tasks",
            max_tokens: 4096,
            provider: "Anthropic",
        },
        AiModel {
            id: "gemini-pro",
            name: "Gemini Pro",
            description: "Google's advanced AI model with multimodal capabilities",
            max_tokens: 2048,
            provider: "Google",
        },
        AiModel {
            id: "custom",
            name: "Custom Model",
            description: "Configure your own model endpoint",
            max_tokens: 4096,
            provider: "Custom",
        },
    ]
}

/// The model a session selects when nothing else is configured
pub fn default_model() -> AiModel {
    all_models()[0]
}

pub fn find_model(id: &str) -> Option<AiModel> {
    all_models().iter().find(|m| m.id == id).copied()
}

/// Get all prompt templates
pub fn all_templates() -> &'static [PromptTemplate] {
    &[
        PromptTemplate {
            id: "creative-writing",
            name: "Creative Writing",
            description: "For storytelling and creative content",
            content: "You are a creative writing assistant. Help me write engaging, imaginative content with vivid descriptions and compelling narratives. Focus on:\n\n- Rich character development\n- Immersive world-building\n- Engaging dialogue\n- Show, don't tell principle\n\nPlease assist with:",
            category: "Creative",
        },
        PromptTemplate {
            id: "code-review",
            name: "Code Review",
            description: "For analyzing and improving code",
            content: "You are an experienced senior developer conducting a thorough code review. Please analyze the following code for:\n\n- Code quality and best practices\n- Performance optimizations\n- Security vulnerabilities\n- Maintainability improvements\n- Documentation gaps\n\nProvide specific, actionable feedback:\n\n",
            category: "Development",
        },
        PromptTemplate {
            id: "data-analysis",
            name: "Data Analysis",
            description: "For interpreting data and statistics",
            content: "You are a data analyst expert. Help me analyze and interpret data by:\n\n- Identifying key patterns and trends\n- Providing statistical insights\n- Suggesting visualizations\n- Explaining correlations and causations\n- Recommending next steps\n\nData to analyze:\n\n",
            category: "Analytics",
        },
        PromptTemplate {
            id: "technical-writing",
            name: "Technical Writing",
            description: "For documentation and technical content",
            content: "You are a technical writing specialist. Help me create clear, comprehensive documentation that:\n\n- Explains complex concepts simply\n- Follows proper structure and formatting\n- Includes practical examples\n- Addresses common questions\n- Maintains consistency\n\nTopic to document:\n\n",
            category: "Documentation",
        },
        PromptTemplate {
            id: "brainstorming",
            name: "Brainstorming",
            description: "For generating ideas and solutions",
            content: "You are a creative brainstorming partner. Help me generate innovative ideas by:\n\n- Thinking outside the box\n- Building on concepts iteratively\n- Exploring multiple perspectives\n- Combining different approaches\n- Prioritizing feasibility\n\nLet's brainstorm about:\n\n",
            category: "Creative",
        },
    ]
}

pub fn find_template(id: &str) -> Option<&'static PromptTemplate> {
    all_templates().iter().find(|t| t.id == id)
}

/// Templates grouped by category, categories in first-seen order
pub fn templates_by_category() -> Vec<(&'static str, Vec<&'static PromptTemplate>)> {
    let mut groups: Vec<(&'static str, Vec<&'static PromptTemplate>)> = Vec::new();
    for template in all_templates() {
        match groups.iter_mut().find(|(category, _)| *category == template.category) {
            Some((_, members)) => members.push(template),
            None => groups.push((template.category, vec![template])),
        }
    }
    groups
}

/// Named parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Creative,
    Balanced,
    Precise,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Creative, Preset::Balanced, Preset::Precise];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Creative => "creative",
            Preset::Balanced => "balanced",
            Preset::Precise => "precise",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn parameters(self) -> ChatParameters {
        match self {
            Preset::Creative => ChatParameters {
                temperature: 0.9,
                max_tokens: 2048,
                top_p: 0.95,
                frequency_penalty: 0.3,
            },
            Preset::Balanced => DEFAULT_PARAMETERS,
            Preset::Precise => ChatParameters {
                temperature: 0.3,
                max_tokens: 1024,
                top_p: 0.8,
                frequency_penalty: 0.1,
            },
        }
    }
}

// ============================================================================
// Seed conversations
// ============================================================================

fn seed_time(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, min, sec)
        .single()
        .unwrap_or_default()
}

fn seed_user(id: &str, content: &str, at: DateTime<Utc>) -> Message {
    Message::user(MessageId::from(id), content, at)
}

fn seed_reply(id: &str, content: &str, model: &str, at: DateTime<Utc>) -> Message {
    Message::assistant(MessageId::from(id), content, Some(model.to_string()), at)
}

fn seed_chat(id: &str, title: &str, messages: Vec<Message>) -> Chat {
    let created_at = messages.first().map(|m| m.timestamp).unwrap_or_default();
    let updated_at = messages.last().map_or(created_at, |m| m.timestamp);
    Chat {
        id: ChatId::from(id),
        title: title.to_string(),
        messages,
        created_at,
        updated_at,
    }
}

/// Conversations present when a session starts, most recent first
pub fn seed_chats() -> Vec<Chat> {
    vec![
        seed_chat(
            "chat-1",
            "Machine Learning Basics",
            vec![
                seed_user(
                    "1",
                    "Can you explain the concept of machine learning in simple terms?",
                    seed_time(14, 30, 0),
                ),
                seed_reply(
                    "2",
                    "Machine learning is like teaching a computer to recognize patterns and make predictions based on examples, similar to how humans learn from experience. \n\nImagine showing a child thousands of photos labeled \"cat\" or \"dog.\" Eventually, they learn to identify cats and dogs in new photos. Machine learning works similarly - we show computers lots of data with known answers, and they learn to make predictions on new, unseen data.\n\nThe three main types are:\n- **Supervised learning**: Learning with labeled examples\n- **Unsupervised learning**: Finding patterns in unlabeled data\n- **Reinforcement learning**: Learning through trial and error with rewards",
                    "gpt-4",
                    seed_time(14, 30, 20),
                ),
                seed_user(
                    "3",
                    "That's a great explanation! Can you give me a practical example of each type?",
                    seed_time(14, 31, 20),
                ),
                seed_reply(
                    "4",
                    "Absolutely! Here are practical examples:\n\n**Supervised Learning:**\n- Email spam detection: Train on thousands of emails labeled \"spam\" or \"not spam\"\n- Medical diagnosis: Use X-rays with known diagnoses to identify diseases\n- Price prediction: Use house features (size, location) with sale prices to predict new home values\n\n**Unsupervised Learning:**\n- Customer segmentation: Group customers by shopping behavior without predefined categories\n- Data compression: Find patterns to reduce file sizes\n- Anomaly detection: Identify unusual network traffic that might indicate security threats\n\n**Reinforcement Learning:**\n- Game AI: AlphaGo learning chess by playing millions of games\n- Autonomous vehicles: Learning to drive by trial and error in simulations\n- Recommendation systems: Learning what content keeps users engaged",
                    "gpt-4",
                    seed_time(14, 31, 40),
                ),
            ],
        ),
        seed_chat(
            "chat-2",
            "Python Fibonacci Function",
            vec![
                seed_user(
                    "5",
                    "Help me write a Python function to calculate fibonacci numbers",
                    seed_time(12, 30, 0),
                ),
                seed_reply(
                    "6",
                    "Here's an efficient Python function to calculate Fibonacci numbers with multiple approaches:\n\n```python\ndef fibonacci_iterative(n):\n    \"\"\"Calculate nth Fibonacci number iteratively (most efficient)\"\"\"\n    if n <= 1:\n        return n\n    \n    a, b = 0, 1\n    for _ in range(2, n + 1):\n        a, b = b, a + b\n    return b\n\ndef fibonacci_memoized(n, memo={}):\n    \"\"\"Calculate nth Fibonacci number with memoization\"\"\"\n    if n in memo:\n        return memo[n]\n    if n <= 1:\n        return n\n    \n    memo[n] = fibonacci_memoized(n-1, memo) + fibonacci_memoized(n-2, memo)\n    return memo[n]\n\n# Usage examples\nprint(fibonacci_iterative(10))  # Output: 55\nprint(fibonacci_memoized(10))   # Output: 55\n```\n\nThe iterative version is most efficient for single calculations, while the memoized version is better when calculating multiple Fibonacci numbers.",
                    "gpt-3.5-turbo",
                    seed_time(12, 30, 20),
                ),
            ],
        ),
        seed_chat(
            "chat-3",
            "REST API Best Practices",
            vec![
                seed_user(
                    "7",
                    "What are the best practices for designing a REST API?",
                    seed_time(11, 30, 0),
                ),
                seed_reply(
                    "8",
                    "Here are the key best practices for designing REST APIs:\n\n## 1. Resource-Based URLs\n- Use nouns, not verbs: `/users` not `/getUsers`\n- Use plural nouns: `/users/123` not `/user/123`\n- Nest resources logically: `/users/123/posts`\n\n## 2. HTTP Methods\n- **GET**: Retrieve data (idempotent)\n- **POST**: Create new resources\n- **PUT**: Update/replace entire resource\n- **PATCH**: Partial updates\n- **DELETE**: Remove resources\n\n## 3. Status Codes\n- **200**: Success\n- **201**: Created\n- **400**: Bad Request\n- **401**: Unauthorized\n- **404**: Not Found\n- **500**: Internal Server Error\n\n## 4. Additional Best Practices\n- Version your API: `/api/v1/users`\n- Implement pagination for large datasets\n- Use HTTPS everywhere\n- Rate limiting and authentication\n- Comprehensive error handling\n- Clear documentation (OpenAPI/Swagger)",
                    "claude-3-opus",
                    seed_time(11, 30, 20),
                ),
            ],
        ),
    ]
}
