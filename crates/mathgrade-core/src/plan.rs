//! Structured, day-by-day remediation plans.

use serde::{Deserialize, Serialize};

use crate::statistics::TopicStat;

/// One day of the remediation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// 1-based day number.
    pub day: u32,
    /// The topic practiced that day.
    pub skill_category: String,
    /// Activity to do with a tutor.
    pub learn_with_tutor: String,
    /// Activity to do alone.
    pub self_learn: String,
}

/// Remediation activities for topics whose name contains one of `keywords`.
#[derive(Debug, Clone, Copy)]
pub struct RemediationRule {
    pub keywords: &'static [&'static str],
    pub learn_with_tutor: &'static str,
    pub self_learn: &'static str,
}

impl RemediationRule {
    /// Case-insensitive substring match against the topic name.
    pub fn matches(&self, topic: &str) -> bool {
        let topic = topic.to_lowercase();
        self.keywords.iter().any(|k| topic.contains(*k))
    }
}

/// Remediation rules, checked in order; the first match wins. Some topic
/// names match more than one rule (e.g. "Addition of Fractions"), so the
/// order decides the output.
pub const REMEDIATION_RULES: &[RemediationRule] = &[
    RemediationRule {
        keywords: &["counting"],
        learn_with_tutor: "Practice counting forwards and backwards with teacher using number line",
        self_learn: "Complete counting worksheet (1-100) and practice skip counting by 2s, 5s, 10s",
    },
    RemediationRule {
        keywords: &["before", "after"],
        learn_with_tutor: "Use number line to find numbers before and after with guidance",
        self_learn: "Practice 15 before/after questions daily using flashcards",
    },
    RemediationRule {
        keywords: &["between"],
        learn_with_tutor: "Identify numbers between two given numbers with teacher support",
        self_learn: "Solve 10 'between' problems using number chart",
    },
    RemediationRule {
        keywords: &["pattern", "sequence"],
        learn_with_tutor: "Identify and extend patterns with teacher explaining the rule",
        self_learn: "Create your own number patterns and solve pattern worksheets",
    },
    RemediationRule {
        keywords: &["addition", "add"],
        learn_with_tutor: "Practice addition strategies with manipulatives and teacher guidance",
        self_learn: "Complete 20 addition problems daily, check answers yourself",
    },
    RemediationRule {
        keywords: &["subtraction", "subtract"],
        learn_with_tutor: "Learn subtraction techniques using number line with teacher",
        self_learn: "Practice 20 subtraction problems, use counters to verify",
    },
    RemediationRule {
        keywords: &["multiplication", "multiply"],
        learn_with_tutor: "Understand multiplication as repeated addition with teacher",
        self_learn: "Memorize times tables and practice 15 multiplication facts daily",
    },
    RemediationRule {
        keywords: &["division", "divide"],
        learn_with_tutor: "Learn division concepts using grouping method with teacher",
        self_learn: "Practice division facts and solve 15 division problems",
    },
    RemediationRule {
        keywords: &["fraction"],
        learn_with_tutor: "Understand fractions using visual models with teacher support",
        self_learn: "Draw fraction diagrams and practice comparing fractions",
    },
    RemediationRule {
        keywords: &["decimal"],
        learn_with_tutor: "Learn place value of decimals with teacher using base-10 blocks",
        self_learn: "Practice decimal operations and rounding exercises",
    },
    RemediationRule {
        keywords: &["geometry", "shape"],
        learn_with_tutor: "Identify and classify shapes with teacher using real objects",
        self_learn: "Draw different shapes and find shapes in your environment",
    },
    RemediationRule {
        keywords: &["measurement", "measure"],
        learn_with_tutor: "Practice measuring length, weight, volume with teacher",
        self_learn: "Measure 10 objects at home and record measurements",
    },
    RemediationRule {
        keywords: &["time", "clock"],
        learn_with_tutor: "Read analog and digital clocks with teacher guidance",
        self_learn: "Practice telling time every hour and solve time word problems",
    },
    RemediationRule {
        keywords: &["money"],
        learn_with_tutor: "Count coins and notes with teacher using real/play money",
        self_learn: "Practice making change and solve money word problems",
    },
];

/// Tutor and self-study activities for a topic.
pub fn remediation_for(topic: &str) -> (String, String) {
    match REMEDIATION_RULES.iter().find(|rule| rule.matches(topic)) {
        Some(rule) => (rule.learn_with_tutor.to_string(), rule.self_learn.to_string()),
        None => (
            format!("Discuss {topic} concepts with teacher and work through examples together"),
            format!("Practice {topic} problems independently and review mistakes"),
        ),
    }
}

/// Build the remediation schedule.
///
/// Every topic that is not perfect gets one day, weakest (most missed
/// credit) first. Topics with nothing attempted are included: skipping a
/// topic is a reason to practice it. Ties keep topic-name order.
pub fn build_learning_plan<'a, I>(topics: I) -> Vec<PlanStep>
where
    I: IntoIterator<Item = (&'a String, &'a TopicStat)>,
{
    let mut needing_work: Vec<(&String, &TopicStat)> = topics
        .into_iter()
        .filter(|(_, stat)| !stat.is_perfect())
        .collect();
    needing_work.sort_by(|a, b| a.0.cmp(b.0));
    needing_work.sort_by(|a, b| b.1.wrong_count.total_cmp(&a.1.wrong_count));

    needing_work
        .into_iter()
        .zip(1u32..)
        .map(|((topic, _), day)| {
            let (learn_with_tutor, self_learn) = remediation_for(topic);
            PlanStep {
                day,
                skill_category: topic.clone(),
                learn_with_tutor,
                self_learn,
            }
        })
        .collect()
}
