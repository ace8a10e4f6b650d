use std::fmt::Write;

const DEFAULT_STYLE_GUIDE: &str = "\
- Casual and authentic: use everyday \"netizen\" slang naturally (e.g. 家人們, 誰懂, 絕了, 勸敗).
- Direct and personal: open with a strong hook, like a friend sharing a secret find.
- Structured but clean: use spacing and bullet marks (e.g. ▫️, ✨) to keep it readable.
- Engagement driven: encourage saving, sharing, or commenting without being pushy.
- Emojis: liberal but tasteful, to carry emotion.
- Keep paragraphs short; aim for an exciting \"quiet luxury\" / \"hidden gem\" vibe.";

const DEFAULT_OUTPUT_LANGUAGE: &str = "Traditional Chinese (Taiwan)";

fn default_structure_rules() -> Vec<String> {
    [
        "Hook: a catchy one-line intro (e.g. \"I can't believe I found this...\", \"Stop scrolling 🛑\").",
        "Body: 3-4 key selling points extracted from the product info, formatted as bullet points.",
        "Opinion: a personal endorsement (e.g. \"The quality is insane for this price\").",
        "Call to action: a subtle nudge to check the link or save the post.",
    ]
    .iter()
    .map(|rule| (*rule).to_string())
    .collect()
}

/// Template configuration for the generated post. Defaults reproduce the
/// stock persona; every field is overridable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStyle {
    pub style_guide: String,
    pub output_language: String,
    /// Structural requirements, rendered as a numbered list in order.
    pub structure_rules: Vec<String>,
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            style_guide: DEFAULT_STYLE_GUIDE.to_string(),
            output_language: DEFAULT_OUTPUT_LANGUAGE.to_string(),
            structure_rules: default_structure_rules(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptBuilder {
    style: PromptStyle,
}

impl PromptBuilder {
    pub fn new(style: PromptStyle) -> Self {
        Self { style }
    }

    pub fn build(&self, content: &str) -> String {
        format!(
            "You are a social media expert who specializes in creating viral short-form posts.
Take the following product information and turn it into a distinctly platform-native post.

Style and vibe:
{style_guide}

Format structure:
{structure_rules}

Input product info:
{content}

Output requirements:
- Language: {output_language}.
- Do NOT include any markdown code blocks (like ```). Just return the raw text.
- Do NOT include placeholders like [Link].",
            style_guide = self.style.style_guide,
            structure_rules = render_structure_rules(&self.style.structure_rules),
            output_language = self.style.output_language,
        )
    }
}

fn render_structure_rules(rules: &[String]) -> String {
    let mut rendered = String::new();
    for (index, rule) in rules.iter().enumerate() {
        if index > 0 {
            rendered.push('\n');
        }
        write!(rendered, "{}. {rule}", index + 1)
            .expect("failed to write structure rule to String");
    }
    rendered
}
