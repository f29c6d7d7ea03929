//! Prompt template for policy simplification.

const PROMPT_TEMPLATE: &str = "Summarize this government policy in plain English. Then list 3 pros and 3 cons.

Policy text: {text}

Format:
SUMMARY: [Plain English summary here]
PROS:
1. [First pro]
2. [Second pro]
3. [Third pro]
CONS:
1. [First con]
2. [Second con]
3. [Third con]";

/// Build the prompt for a policy text. The text is embedded verbatim.
pub fn build_prompt(policy_text: &str) -> String {
    // Split around the placeholder so braces in the policy text are left alone
    match PROMPT_TEMPLATE.split_once("{text}") {
        Some((before, after)) => format!("{}{}{}", before, policy_text, after),
        None => PROMPT_TEMPLATE.to_string(),
    }
}
