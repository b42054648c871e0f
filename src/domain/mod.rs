pub mod exercise;
pub mod progress;

pub use exercise::{
  ReadingExercise, ReadingQuestion, Validate, WritingFeedback, WritingScenario,
};
pub use progress::{ExerciseKind, ExerciseRecord, ProgressRecord};
