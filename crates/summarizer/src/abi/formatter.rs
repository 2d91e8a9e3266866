use tracing::warn;

use super::types::{AbiEntry, AbiParam, ContractInterface};

/// Returned in place of an empty listing; the summarizer accepts it as input.
pub const NO_FUNCTIONS_SENTINEL: &str = "No functions found in ABI.";

pub struct AbiFormatter;

impl AbiFormatter {
    /// Renders one `name(type name, ...)` line per function entry, in ABI order.
    /// Function entries without a name are skipped.
    pub fn format(interface: &ContractInterface) -> String {
        let lines: Vec<String> = interface
            .functions()
            .filter(|entry| {
                let named = entry.name.as_deref().is_some_and(|name| !name.is_empty());
                if !named {
                    warn!("Skipping unnamed function entry in ABI");
                }
                named
            })
            .map(Self::format_function)
            .collect();

        if lines.is_empty() {
            NO_FUNCTIONS_SENTINEL.to_string()
        } else {
            lines.join("\n")
        }
    }

    pub fn format_function(entry: &AbiEntry) -> String {
        let params: Vec<String> = entry.inputs.iter().map(Self::format_param).collect();
        format!(
            "{}({})",
            entry.name.as_deref().unwrap_or_default(),
            params.join(", ")
        )
    }

    fn format_param(param: &AbiParam) -> String {
        format!("{} {}", param.ty, param.name.as_deref().unwrap_or_default())
            .trim()
            .to_string()
    }
}
