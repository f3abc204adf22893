//! Qualitative feedback text.
//!
//! Two independent decisions per topic: a praise tier driven by accuracy, and
//! an improvement nudge driven only by whether any credit was lost. A topic
//! can be "strong" and still get a nudge.

use serde::{Deserialize, Serialize};

use crate::model::{Grade, GradeBand};
use crate::statistics::TopicStat;

/// Topic with grade-specific improvement hints.
pub const NUMBER_SERIES: &str = "Number Series";

/// Returned as the learning plan summary when a batch has no records.
pub const NO_RESPONSES: &str = "No responses found. Try attempting a few questions to get a personalized learning plan.";

/// Praise tiers by topic accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PraiseTier {
    /// Accuracy of 80% or more.
    Strong,
    /// Accuracy from 50% up to 80%.
    Fair,
    /// Attempted, below 50%.
    Started,
    /// Nothing attempted.
    NotAttempted,
}

impl PraiseTier {
    pub fn classify(stat: &TopicStat) -> Self {
        let accuracy = stat.accuracy_percent();
        if accuracy >= 80.0 {
            PraiseTier::Strong
        } else if accuracy >= 50.0 {
            PraiseTier::Fair
        } else if stat.attempted() > 0.0 {
            PraiseTier::Started
        } else {
            PraiseTier::NotAttempted
        }
    }
}

/// Positive and improvement text for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessages {
    pub positive: String,
    pub improvement: String,
}

/// Build the feedback messages for one topic.
pub fn topic_feedback(topic: &str, stat: &TopicStat, grade: Grade) -> TopicMessages {
    let positive = match PraiseTier::classify(stat) {
        PraiseTier::Strong => format!(
            "You are strong in {topic}. You quickly understand patterns and apply them correctly."
        ),
        PraiseTier::Fair => format!(
            "You have a fair understanding of {topic}, and with a bit more practice you can master it."
        ),
        PraiseTier::Started => format!(
            "You have started working on {topic}. Keep practicing to build confidence."
        ),
        PraiseTier::NotAttempted => format!(
            "No attempts recorded in {topic} yet. Try a few questions to gauge your understanding."
        ),
    };

    let improvement = if stat.wrong_count > 0.0 {
        improvement_hint(topic, grade)
    } else if stat.attempted() == 0.0 {
        "Start practicing questions in this topic to identify areas for improvement.".to_string()
    } else {
        "No major issues noticed in this topic so far. Keep it up!".to_string()
    };

    TopicMessages {
        positive,
        improvement,
    }
}

fn improvement_hint(topic: &str, grade: Grade) -> String {
    if topic != NUMBER_SERIES {
        return format!(
            "You need some improvement in {topic}. Review the core concepts and solve a few guided practice problems."
        );
    }
    let hint = match grade.band() {
        GradeBand::Early => "Work more on understanding the order of numbers, especially ‘before’ and ‘after’ numbers. Practice counting forwards and backwards from different starting points.",
        GradeBand::Middle => "Focus on identifying patterns like skip counting, multiplication, or division in the series. Practice with larger numbers.",
        GradeBand::Upper => "Analyze complex patterns involving multiple operations (e.g., n^2 + 1, Fibonacci). Practice algebraic sequences.",
    };
    hint.to_string()
}

/// Overall accuracy tiers for the learning plan summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTier {
    Perfect,
    Good,
    Started,
    Nothing,
}

impl PlanTier {
    pub fn from_accuracy(accuracy_percent: u32) -> Self {
        match accuracy_percent {
            100.. => PlanTier::Perfect,
            70..=99 => PlanTier::Good,
            1..=69 => PlanTier::Started,
            0 => PlanTier::Nothing,
        }
    }
}

const TIME_TIP: &str = "\n\nTime Tip:\n\
- For questions you know well, try to reduce the time taken gradually.\n\
- If a question feels confusing, it’s okay to take a bit longer and think calmly rather than guessing.";

/// The human-readable learning plan for the whole batch.
pub fn learning_plan_summary(accuracy_percent: u32, grade: Grade) -> String {
    let primary = grade.is_primary();
    let body = match (PlanTier::from_accuracy(accuracy_percent), primary) {
        (PlanTier::Perfect, true) => "Excellent work! You answered all the attempted questions correctly. 🎉\n\n\
            - Continue practicing slightly more challenging number series problems.\n\
            - Try mixed questions: ‘before’, ‘after’, and ‘between’ numbers.\n\
            - Introduce timed quizzes to maintain your speed and accuracy.",
        (PlanTier::Perfect, false) => "Excellent work! You answered all the attempted questions correctly. 🎉\n\n\
            - Challenge yourself with advanced sequences and series problems.\n\
            - Explore competitive exam level questions (Olympiad, NTSE).\n\
            - Focus on speed and accuracy under time constraints.",
        (PlanTier::Good, true) => "Good job! You have a strong foundation but there is still room to improve.\n\n\
            - Revise the mistakes you made and understand why the correct answer is different.\n\
            - Practice 10–15 more questions on ‘before’ and ‘after’ numbers daily.\n\
            - Mix very easy and slightly tricky questions to build confidence and speed.",
        (PlanTier::Good, false) => "Good job! You have a strong foundation but there is still room to improve.\n\n\
            - Revise the mistakes you made and understand why the correct answer is different.\n\
            - Practice identifying different types of progressions (AP, GP).\n\
            - Solve problems involving squares, cubes, and prime numbers.",
        (PlanTier::Started, true) => "You’ve made a start, and this is a good step. Now let’s focus on building your basics.\n\n\
            - Start with simple counting: say and write numbers from 1 to 100.\n\
            - Practice questions like ‘number before’ and ‘number after’ using a number line or chart.\n\
            - Re-attempt the questions you got wrong and discuss them with a teacher/mentor if needed.",
        (PlanTier::Started, false) => "You’ve made a start, and this is a good step. Now let’s focus on building your basics.\n\n\
            - Review the basic rules of arithmetic progressions and number patterns.\n\
            - Practice finding the difference between consecutive terms.\n\
            - Re-attempt the questions you got wrong and discuss them with a teacher/mentor if needed.",
        (PlanTier::Nothing, _) => "No questions were answered yet, so we can’t judge your level.\n\n\
            - Try answering at least 5–10 questions on number series.\n\
            - Don’t worry about speed in the beginning—focus on understanding the pattern.\n\
            - Once you are comfortable, we can create a more detailed learning plan for you.",
    };
    format!("{body}{TIME_TIP}")
}
