use crate::domain::WritingScenario;
use crate::progression::prompt_context_of;
use crate::prompts::WritingVariables;

const SCENARIO_EXAMPLE: &str = r#"{
  "context": "You merged a change yesterday that broke the nightly build. The release manager noticed it this morning and the release is scheduled for tomorrow.",
  "recipientRole": "Release Manager",
  "goal": "<goal in the learner's language>",
  "keyPoints": ["<point 1 in the learner's language>", "<point 2>", "<point 3>"]
}"#;

const FEEDBACK_EXAMPLE: &str = r#"{
  "score": 72,
  "critique": "<critique in the learner's language, quoting example sentences such as: \"I'd appreciate it if you could take a look.\">",
  "improvedVersion": "Hi Sam,\n\nI'm sorry about the broken build. I've already reverted the change and the pipeline is green again.\n\nBest,\nAlex",
  "grammarMistakes": ["<\"I have merge\" -> \"I have merged\": explanation in the learner's language>"]
}"#;

/// Prompt for a writing task the learner must respond to.
pub fn scenario_prompt(level: u8, vars: WritingVariables, explanation_language: &str) -> String {
    format!(
        "Create a workplace writing task for a software engineer learning English.\n\
         \n\
         LEARNER PROFILE: {context}\n\
         \n\
         The situation: {situation}. The message the learner writes should be {tone}.\n\
         \n\
         Describe the situation in `context` (in English, 2-4 sentences, matching the \
         learner's level). Name who the message is for in `recipientRole`. Write the \
         `goal` and 3 to 4 `keyPoints` the message must cover in {language}, so the \
         learner understands the task without translating it.\n\
         \n\
         EXAMPLE OF THE EXPECTED FORMAT:\n\
         {example}",
        context = prompt_context_of(level),
        situation = vars.situation,
        tone = vars.tone,
        language = explanation_language,
        example = SCENARIO_EXAMPLE,
    )
}

/// Prompt asking the model to grade `draft` against `scenario`.
pub fn evaluation_prompt(
    scenario: &WritingScenario,
    level: u8,
    draft: &str,
    explanation_language: &str,
) -> String {
    let key_points = scenario
        .key_points
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Evaluate a message written in English by a software engineer.\n\
         \n\
         LEARNER PROFILE: {context}\n\
         \n\
         TASK GIVEN TO THE LEARNER:\n\
         Context: {scenario_context}\n\
         Recipient: {recipient}\n\
         Goal: {goal}\n\
         Key points:\n\
         {key_points}\n\
         \n\
         LEARNER'S MESSAGE:\n\
         \"\"\"\n\
         {draft}\n\
         \"\"\"\n\
         \n\
         Return:\n\
         - `score`: an integer from 0 to 100 covering task completion, clarity, tone and \
         grammar, judged against what is expected at the learner's level.\n\
         - `critique`: in {language}. Explain what worked and what to improve, and \
         include example sentences in English that the learner could have used.\n\
         - `improvedVersion`: a natural rewrite of the whole message in English, as a \
         fluent engineer would write it, keeping the learner's intent.\n\
         - `grammarMistakes`: each grammar or vocabulary mistake with its correction, \
         explained in {language}. Use an empty list if there are none.\n\
         \n\
         EXAMPLE OF THE EXPECTED FORMAT:\n\
         {example}",
        context = prompt_context_of(level),
        scenario_context = scenario.context,
        recipient = scenario.recipient_role,
        goal = scenario.goal,
        key_points = key_points,
        draft = draft,
        language = explanation_language,
        example = FEEDBACK_EXAMPLE,
    )
}
