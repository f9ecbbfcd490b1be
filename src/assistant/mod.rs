//! Aethon research assistant.
//!
//! Replies come from a keyword rule table. When an OpenAI-compatible endpoint is configured
//! the reply text is generated there instead, while suggestions and actions still come from
//! the matched rule.

mod rules;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AssistantConfig;
use crate::errors::AppError;
use crate::models::{
    ChatMessage, ChatResponse, FileRecord, Outline, OutlineKind, OutlineSection, ResearchAction,
};

use rules::{match_rule, Rule};

/// Prior turns forwarded to the upstream model.
const MAX_HISTORY: usize = 10;
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
const UPSTREAM_FAILURE: &str = "Aethon AI failed to respond.";

const SYSTEM_PROMPT: &str = "You are Aethon, an AI research assistant for The Research Hub platform. \
You help researchers with research methodology and design, literature reviews, data interpretation \
and statistical analysis, writing papers and grants, citation formatting and reference management, \
collaboration, and research project planning. Be accurate and professional, give specific and \
actionable advice, ask clarifying questions when needed, and maintain academic integrity.";

/// Assistant service shared by the chat and assistant endpoints.
pub struct Assistant {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Answer one chat turn.
    pub async fn reply(
        &self,
        prompt: &str,
        history: &[ChatMessage],
    ) -> Result<ChatResponse, AppError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::Validation("Message is required".to_string()));
        }

        let rule = match_rule(prompt);
        tracing::debug!("Assistant matched rule {}", rule.name);

        let text = match &self.config.api_url {
            Some(url) => self.complete(url, prompt, history).await?,
            None => {
                self.pause().await;
                rule.text.to_string()
            }
        };

        Ok(canned(rule, text))
    }

    /// Canned analysis of an uploaded file, based on its MIME type.
    pub async fn analyze_file(&self, file: &FileRecord) -> ChatResponse {
        self.pause().await;

        if file.content_type.to_lowercase().contains("pdf") {
            return ChatResponse {
                response: format!(
                    "I've analyzed your PDF document \"{}\". Here's what I found:

**Document Summary:**
- **Type**: Research paper/Academic document
- **Key Sections**: Abstract, Introduction, Methods, Results, Discussion

**Recommendations:**
- Consider expanding the discussion section
- Add more recent citations
- Include a limitations section
- Strengthen the conclusion with practical implications",
                    file.name
                ),
                suggestions: strings(&[
                    "Create summary note",
                    "Extract citations",
                    "Generate keywords",
                    "Identify key quotes",
                ]),
                research_actions: actions(&[
                    ("create_note", "Save Analysis Notes"),
                    ("extract_citations", "Extract Citations"),
                    ("create_summary", "Create Summary"),
                ]),
            };
        }

        ChatResponse {
            response: "I've analyzed your file. Please let me know what specific insights you'd like me to provide.".to_string(),
            suggestions: strings(&["Analyze content", "Extract key information", "Create summary"]),
            research_actions: actions(&[("create_note", "Save Analysis")]),
        }
    }

    async fn pause(&self) {
        if !self.config.reply_delay.is_zero() {
            tokio::time::sleep(self.config.reply_delay).await;
        }
    }

    /// Single chat-completion call. No retry.
    async fn complete(
        &self,
        url: &str,
        prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, AppError> {
        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            max_tokens: usize,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct CompletionChoice {
            message: ChatMessage,
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<CompletionChoice>,
        }

        let recent = &history[history.len().saturating_sub(MAX_HISTORY)..];
        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(ChatMessage::new("system", SYSTEM_PROMPT));
        messages.extend(recent.iter().cloned());
        messages.push(ChatMessage::new("user", prompt));

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: 1000,
            temperature: 0.7,
        };

        let mut builder = self.client.post(url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Assistant endpoint returned {}: {}", status, body);
            return Err(AppError::Upstream(UPSTREAM_FAILURE.to_string()));
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                tracing::error!("Assistant endpoint returned no content");
                AppError::Upstream(UPSTREAM_FAILURE.to_string())
            })
    }
}

type SectionTable = &'static [(&'static str, &'static [&'static str])];

const PAPER_SECTIONS: SectionTable = &[
    ("Abstract", &["Background", "Methods", "Results", "Conclusions"]),
    (
        "Introduction",
        &["Problem Statement", "Literature Gap", "Research Questions", "Objectives"],
    ),
    (
        "Literature Review",
        &["Theoretical Framework", "Previous Studies", "Research Gaps"],
    ),
    (
        "Methodology",
        &["Research Design", "Participants", "Data Collection", "Analysis Plan"],
    ),
    (
        "Results",
        &["Descriptive Statistics", "Main Findings", "Additional Analyses"],
    ),
    (
        "Discussion",
        &["Interpretation", "Implications", "Limitations", "Future Research"],
    ),
    ("Conclusion", &["Summary", "Contributions", "Recommendations"]),
];

const THESIS_SECTIONS: SectionTable = &[
    (
        "Chapter 1: Introduction",
        &["Background", "Problem Statement", "Research Questions", "Significance"],
    ),
    (
        "Chapter 2: Literature Review",
        &["Theoretical Framework", "Previous Research", "Gaps and Opportunities"],
    ),
    (
        "Chapter 3: Methodology",
        &["Research Design", "Data Collection", "Analysis Methods", "Ethical Considerations"],
    ),
    (
        "Chapter 4: Results",
        &["Quantitative Findings", "Qualitative Findings", "Integrated Analysis"],
    ),
    (
        "Chapter 5: Discussion",
        &["Interpretation", "Theoretical Implications", "Practical Applications"],
    ),
    (
        "Chapter 6: Conclusion",
        &["Summary", "Contributions", "Limitations", "Future Directions"],
    ),
];

const PROPOSAL_SECTIONS: SectionTable = &[
    ("Executive Summary", &["Overview", "Objectives", "Expected Outcomes"]),
    (
        "Background and Significance",
        &["Problem Context", "Research Importance", "Innovation"],
    ),
    ("Literature Review", &["Current State", "Gaps", "Theoretical Foundation"]),
    ("Research Design", &["Methodology", "Timeline", "Resources"]),
    ("Expected Outcomes", &["Deliverables", "Impact", "Dissemination"]),
    ("Budget and Resources", &["Personnel", "Equipment", "Travel", "Other Costs"]),
];

/// Document outline for a topic.
pub fn outline(topic: &str, kind: OutlineKind) -> Result<Outline, AppError> {
    let topic = require_topic(topic)?;

    let (title, sections) = match kind {
        OutlineKind::Paper => (format!("Research Paper: {}", topic), PAPER_SECTIONS),
        OutlineKind::Thesis => (format!("Thesis: {}", topic), THESIS_SECTIONS),
        OutlineKind::Proposal => (format!("Research Proposal: {}", topic), PROPOSAL_SECTIONS),
    };

    Ok(Outline {
        title,
        sections: sections
            .iter()
            .map(|(title, subsections)| OutlineSection {
                title: title.to_string(),
                subsections: strings(subsections),
            })
            .collect(),
    })
}

/// Five templated research questions about a topic.
pub fn research_questions(topic: &str) -> Result<Vec<String>, AppError> {
    let topic = require_topic(topic)?;
    Ok(vec![
        format!("How does {} impact current research methodologies?", topic),
        format!(
            "What are the long-term implications of {} in academic settings?",
            topic
        ),
        format!(
            "How can {} be integrated with existing theoretical frameworks?",
            topic
        ),
        format!(
            "What methodological approaches are most effective for studying {}?",
            topic
        ),
        format!(
            "What are the ethical considerations surrounding {} research?",
            topic
        ),
    ])
}

fn require_topic(topic: &str) -> Result<&str, AppError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("Topic is required".to_string()));
    }
    Ok(topic)
}

fn canned(rule: &Rule, text: String) -> ChatResponse {
    ChatResponse {
        response: text,
        suggestions: strings(rule.suggestions),
        research_actions: actions(rule.actions),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The first action of each reply is the one the UI highlights.
fn actions(items: &[(&str, &str)]) -> Vec<ResearchAction> {
    items
        .iter()
        .enumerate()
        .map(|(i, (action_type, label))| ResearchAction {
            action_type: action_type.to_string(),
            label: label.to_string(),
            priority: (i == 0).then(|| "high".to_string()),
        })
        .collect()
}
