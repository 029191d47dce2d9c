//! Prompt assembly for the fact-check reasoning call.

/// System instruction shared by every backend. Demands the structured
/// marker format the verdict parser understands.
pub const FACT_CHECK_SYSTEM_PROMPT: &str = "\
You are a rigorous fact-checking analyst. You verify claims strictly \
against the evidence provided to you and never invent sources. Always \
answer in the exact format below and nothing else:

VERDICT: <TRUE | FALSE | MISLEADING | NOT ENOUGH EVIDENCE>
CONFIDENCE: <number between 0.0 and 1.0>
EXPLANATION: <two to four sentences grounded in the evidence>
SOURCES: <the sources from the evidence you relied on, separated by ';'>";

/// Builds the user prompt from the claim and the aggregated evidence
/// context. The context is passed through verbatim so the numbered
/// evidence blocks keep their ordering.
pub fn build_fact_check_prompt(claim_text: &str, context: &str) -> String {
    format!(
        "CLAIM TO VERIFY:\n{claim_text}\n\nEVIDENCE CONTEXT:\n{context}\n\n\
         Verify the claim using only the evidence context above. If the \
         evidence is insufficient or off-topic, say NOT ENOUGH EVIDENCE."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_claim_and_context() {
        let p = build_fact_check_prompt("The sky is green", "[NEWS 1 - BBC] https://x\ntext\n");
        assert!(p.contains("CLAIM TO VERIFY:\nThe sky is green"));
        assert!(p.contains("[NEWS 1 - BBC]"));
    }

    #[test]
    fn system_prompt_describes_marker_format() {
        assert!(FACT_CHECK_SYSTEM_PROMPT.contains("VERDICT:"));
        assert!(FACT_CHECK_SYSTEM_PROMPT.contains("CONFIDENCE:"));
        assert!(FACT_CHECK_SYSTEM_PROMPT.contains("SOURCES:"));
    }
}
