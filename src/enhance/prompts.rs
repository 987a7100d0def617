//! Prompt construction for the enhancement calls.
//!
//! Kept beside the client so the only module that talks to the API also
//! owns everything that goes into it.

/// System prompt for free-text rewrites.
pub const SYSTEM: &str = "You are an expert résumé editor. \
    Rewrite the text you are given to be clear, specific, and active-voice. \
    Preserve every factual claim exactly — never invent numbers, titles, \
    technologies, or outcomes that are not in the input. \
    Respond with the rewritten text only, no preamble and no commentary.";

/// System prompt for calls that must return JSON.
pub const JSON_SYSTEM: &str = "You are an expert résumé editor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Preserve every factual claim exactly — never invent numbers, titles, \
    technologies, or outcomes that are not in the input.";

/// Rewrite the professional overview paragraph.
pub fn overview_prompt(overview: &str) -> String {
    format!(
        "Rewrite this professional summary. Keep it to the same length or \
         shorter, keep the first person implied (no \"I\"), and keep every \
         factual claim:\n\n{overview}"
    )
}

/// Rewrite a position's achievement bullets. The response must be a JSON
/// array of strings, one per input bullet, in the same order.
pub fn achievements_prompt(role: &str, company: &str, bullets: &[&str]) -> String {
    let mut prompt = format!(
        "Rewrite these achievement bullets for a {role} position at \
         {company}. Return a JSON array of strings with exactly {} elements, \
         one rewritten bullet per input bullet, in the same order. Start \
         each bullet with a strong verb and keep every metric exactly as \
         written:\n",
        bullets.len()
    );
    for bullet in bullets {
        prompt.push_str("\n- ");
        prompt.push_str(bullet);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_prompt_embeds_the_text() {
        let prompt = overview_prompt("A decade of building.");
        assert!(prompt.contains("A decade of building."));
    }

    #[test]
    fn achievements_prompt_lists_every_bullet() {
        let prompt = achievements_prompt("Engineer", "Acme", &["Did a", "Did b"]);
        assert!(prompt.contains("exactly 2 elements"));
        assert!(prompt.contains("- Did a"));
        assert!(prompt.contains("- Did b"));
        assert!(prompt.contains("Engineer position at Acme"));
    }
}
