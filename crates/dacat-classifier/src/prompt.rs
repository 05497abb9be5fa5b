//! LLM prompt construction for statement classification

use dacat_domain::Category;

/// Builds the classification prompt for one statement
///
/// Output is a pure function of the statement text: instructions, the
/// numbered taxonomy and the format rules are fixed.
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete classification prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and taxonomy in rank order
        prompt.push_str(TASK_INSTRUCTIONS);
        prompt.push_str("\n\nCategories ordered from highest to lowest public accessibility:\n\n");
        for category in Category::ALL {
            prompt.push_str(&format!("{}. {}\n", category.rank(), category.as_str()));
        }
        prompt.push('\n');

        // 2. Output constraints
        prompt.push_str(STRICT_RULES);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str("\n\n");

        // 3. The statement, fenced off from the instructions
        prompt.push_str("Data Availability Statement:\n");
        prompt.push_str("\"\"\"");
        prompt.push_str(self.text);
        prompt.push_str("\"\"\"\n\n");

        // 4. Final directive
        prompt.push_str("Classify now.\n");

        prompt
    }
}

const TASK_INSTRUCTIONS: &str =
    "You must classify the Data Availability statement into EXACTLY ONE category.";

const STRICT_RULES: &str = r#"Strict rules:
- Choose EXACTLY ONE category.
- Follow the accessibility hierarchy.
- Output ONLY valid JSON.
- Do not use markdown.
- Do not wrap in ```json.
- Do not add explanations outside JSON."#;

const OUTPUT_FORMAT: &str = r#"Output format:
{
  "category": "EXACT CATEGORY NAME",
  "reason": "short explanation"
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text_delimited() {
        let prompt = PromptBuilder::new("Data are in GEO (GSE12345).").build();
        assert!(prompt.contains("\"\"\"Data are in GEO (GSE12345).\"\"\""));
    }

    #[test]
    fn test_prompt_lists_categories_in_rank_order() {
        let prompt = PromptBuilder::new("x").build();
        let positions: Vec<usize> = Category::ALL
            .iter()
            .map(|c| prompt.find(&format!("{}. {}", c.rank(), c.as_str())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_prompt_includes_format_rules() {
        let prompt = PromptBuilder::new("x").build();
        assert!(prompt.contains("EXACTLY ONE category"));
        assert!(prompt.contains("Output ONLY valid JSON."));
        assert!(prompt.contains("\"category\""));
        assert!(prompt.contains("\"reason\""));
    }

    #[test]
    fn test_statement_follows_instructions_and_ends_with_directive() {
        let prompt = PromptBuilder::new("STATEMENT").build();
        let statement_at = prompt.find("STATEMENT").unwrap();
        assert!(prompt.find("Strict rules").unwrap() < statement_at);
        assert!(prompt.trim_end().ends_with("Classify now."));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = PromptBuilder::new("same text").build();
        let b = PromptBuilder::new("same text").build();
        assert_eq!(a, b);

        let c = PromptBuilder::new("other text").build();
        assert_eq!(a.replace("same text", ""), c.replace("other text", ""));
    }
}
