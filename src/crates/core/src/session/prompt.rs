//! System prompt assembly
//!
//! Synthesized fresh for every turn: base instructions, the serialized
//! workbook context, and the schema rendering matching the backend's
//! capability (native tools get a short pointer, text backends get the full
//! fenced-block protocol).

use crate::schema::text_protocol;
use crate::util::types::ProviderKind;

const BASE_INSTRUCTIONS: &str = "You are a spreadsheet assistant embedded in a workbook. \
Answer the user's questions about their data and, when they ask for changes, \
propose concrete spreadsheet operations. Only reference cells and sheets that \
exist in the workbook state below. Keep answers short and concrete.";

pub fn build_system_prompt(context: &str, provider: ProviderKind) -> String {
    let mut prompt = String::from(BASE_INSTRUCTIONS);
    prompt.push_str("\n\nCurrent workbook state:\n");
    prompt.push_str(context);
    prompt.push('\n');

    if provider.supports_tool_calls() {
        prompt.push_str(
            "\nUse the provided tools to perform spreadsheet changes; one tool call per operation.\n",
        );
    } else {
        prompt.push('\n');
        prompt.push_str(&text_protocol());
    }

    prompt
}
