use crate::config;
use crate::progression::prompt_context_of;
use crate::prompts::ReadingVariables;

const READING_EXAMPLE: &str = r#"{
  "subject": "Heads-up: staging DB restore tonight",
  "sender": "Priya Nair, Platform Engineer",
  "body": "Hi all,\n\nWe'll restore the staging database from last night's snapshot at 22:00 UTC. Anything you pushed to staging after 18:00 will be lost, so please export test data you need before then.\n\nThanks,\nPriya",
  "questions": [
    {
      "question": "What should engineers do before 22:00 UTC?",
      "options": ["Push new code to staging", "Export any test data they need", "Restart the production database", "Take a snapshot of production"],
      "correctIndex": 1,
      "explanation": "<explanation in the learner's language>"
    }
  ]
}"#;

/// Prompt for a workplace message followed by comprehension questions.
pub fn exercise_prompt(level: u8, vars: ReadingVariables, explanation_language: &str) -> String {
    format!(
        "Create a reading comprehension exercise for a software engineer learning English.\n\
         \n\
         LEARNER PROFILE: {context}\n\
         \n\
         Write a realistic workplace message (email, Slack thread or ticket comment) about \
         {topic}. The tone of the message must be {tone}. Include a subject line and a \
         sender with a name and a job title.\n\
         \n\
         Then write exactly {count} multiple-choice questions that test comprehension of \
         the message: main idea, specific details, and the implied intent or tone. Each \
         question must have 4 options with exactly one correct answer, given by \
         `correctIndex` (0-based). Write the questions and options in English.\n\
         \n\
         For every question write an `explanation` in {language} that explains why the \
         correct option is right, quoting the relevant part of the message.\n\
         \n\
         EXAMPLE OF THE EXPECTED FORMAT (shorter than yours should be):\n\
         {example}",
        context = prompt_context_of(level),
        topic = vars.topic,
        tone = vars.tone,
        count = config::READING_QUESTION_COUNT,
        language = explanation_language,
        example = READING_EXAMPLE,
    )
}
