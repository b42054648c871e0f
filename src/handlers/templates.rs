//! Template and view structs for the dashboard and session pages.
//!
//! Views hold display-ready values only, so templates never reach into
//! domain types.

use askama::Template;

use crate::notice::Notice;

/// Notification as shown in the page header
pub struct NoticeView {
  pub id: u64,
  pub kind: &'static str,
  pub message: String,
}

impl From<Notice> for NoticeView {
  fn from(notice: Notice) -> Self {
    Self {
      id: notice.id,
      kind: notice.kind.as_str(),
      message: notice.message,
    }
  }
}

/// One completed exercise in the dashboard history
pub struct HistoryRow {
  pub kind: &'static str,
  pub score: u8,
  pub level: u8,
  pub completed_at: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub notices: Vec<NoticeView>,
  pub back: &'static str,
  pub level: u8,
  pub max_level: u8,
  pub tier: &'static str,
  pub context: String,
  pub experience: u32,
  pub threshold: u32,
  pub percentage: u32,
  pub is_max_level: bool,
  pub history: Vec<HistoryRow>,
  pub total_completed: usize,
  pub has_session: bool,
  pub session_label: String,
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
  pub notices: Vec<NoticeView>,
  pub back: &'static str,
  pub kind: &'static str,
  pub level: u8,
  pub refresh_secs: u64,
}

#[derive(Template)]
#[template(path = "failed.html")]
pub struct FailedTemplate {
  pub notices: Vec<NoticeView>,
  pub back: &'static str,
  pub kind: &'static str,
  pub message: String,
}

pub struct OptionView {
  pub index: usize,
  pub text: String,
  pub selected: bool,
  /// Set after submission on the option that was the right answer
  pub is_answer: bool,
}

pub struct QuestionView {
  pub index: usize,
  pub number: usize,
  pub prompt: String,
  pub options: Vec<OptionView>,
  pub correct: bool,
  pub explanation: String,
}

#[derive(Template)]
#[template(path = "reading.html")]
pub struct ReadingTemplate {
  pub notices: Vec<NoticeView>,
  pub back: &'static str,
  pub level: u8,
  pub subject: String,
  pub sender: String,
  pub body: String,
  pub questions: Vec<QuestionView>,
  pub submitted: bool,
  pub score: u8,
  pub correct_count: usize,
  pub refresh_secs: u64,
}

#[derive(Template)]
#[template(path = "writing.html")]
pub struct WritingTemplate {
  pub notices: Vec<NoticeView>,
  pub back: &'static str,
  pub level: u8,
  pub context: String,
  pub recipient_role: String,
  pub goal: String,
  pub key_points: Vec<String>,
  pub draft: String,
  pub min_chars: usize,
  pub grading: bool,
  pub graded: bool,
  pub refresh_secs: u64,
  pub score: u8,
  pub critique: String,
  pub improved_version: String,
  pub grammar_mistakes: Vec<String>,
}
