use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the bundled summary prompt. Bump together with the asset file.
pub const PROMPT_VERSION: &str = "contract_summary_v1";

pub const CONTRACT_SUMMARY_TEMPLATE: &str = include_str!("../../prompts/contract_summary_v1.md");

pub const ANALYST_SYSTEM_PROMPT: &str = "You are a Solidity contract analyst.";

pub const CONTRACT_INPUT_VARIABLE: &str = "contract_input";

/// Heading whose presence marks a response as following the output format.
pub const SUMMARY_HEADER: &str = "## Contract Summary";

pub const REQUIRED_SECTIONS: [&str; 4] = [
    "Contract Summary",
    "Key Functions",
    "Permissions",
    "Security Patterns",
];

const EXAMPLE_OUTPUT_OPEN: &str = "**Example Output**:\n```markdown\n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system_prompt: String,
    pub user_prompt_template: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            version: name.clone(),
            name,
            system_prompt: String::new(),
            user_prompt_template: String::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_user_template(mut self, template: impl Into<String>) -> Self {
        self.user_prompt_template = template.into();
        self
    }

    /// The bundled four-section summary prompt with its few-shot example.
    pub fn contract_summary() -> Self {
        Self::new("contract_summary")
            .with_version(PROMPT_VERSION)
            .with_system_prompt(ANALYST_SYSTEM_PROMPT)
            .with_user_template(CONTRACT_SUMMARY_TEMPLATE)
    }

    /// Returns `(system_prompt, user_prompt)` with `{name}` placeholders replaced.
    ///
    /// Substitution is literal, so braces in Solidity code inside the template
    /// or inside the values are left alone.
    pub fn build_prompt(&self, variables: &HashMap<String, String>) -> (String, String) {
        (
            substitute_variables(&self.system_prompt, variables),
            substitute_variables(&self.user_prompt_template, variables),
        )
    }

    pub fn render(&self, contract_input: &str) -> (String, String) {
        let mut variables = HashMap::new();
        variables.insert(CONTRACT_INPUT_VARIABLE.to_string(), contract_input.to_string());
        self.build_prompt(&variables)
    }

    /// The worked example answer embedded in the template, if it has one.
    pub fn example_output(&self) -> Option<&str> {
        let start = self.user_prompt_template.find(EXAMPLE_OUTPUT_OPEN)? + EXAMPLE_OUTPUT_OPEN.len();
        let rest = &self.user_prompt_template[start..];
        let end = rest.find("```")?;
        Some(rest[..end].trim())
    }
}

fn substitute_variables(template: &str, variables: &HashMap<String, String>) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}
