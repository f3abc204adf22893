//! Report generation.
//!
//! Grades every record, folds the results into topic stats and a summary,
//! then derives feedback text and the learning plan. Each call builds its
//! own accumulators, so concurrent calls never share state.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::evaluator::evaluate;
use crate::feedback::{learning_plan_summary, topic_feedback};
use crate::model::{AttemptRecord, Grade};
use crate::parser::AttemptBatch;
use crate::plan::build_learning_plan;
use crate::report::{QuestionReport, Report, TimeEntry, TopicFeedback};
use crate::results::ScoreResult;
use crate::statistics::{compute_summary, fold_topics};

/// Grade a batch of attempt records and build the full report.
pub fn generate_report(responses: &[AttemptRecord], grade: &str) -> Report {
    if responses.is_empty() {
        tracing::info!("no responses to grade");
        return Report::empty();
    }

    let grade_level = Grade::parse(grade);
    let graded: Vec<(&AttemptRecord, ScoreResult)> =
        responses.iter().map(|r| (r, evaluate(r))).collect();

    let topic_stats = fold_topics(graded.iter().map(|(r, res)| (r.topic_name(), res)));
    let summary = compute_summary(&graded);

    let topic_feedback: BTreeMap<String, TopicFeedback> = topic_stats
        .into_iter()
        .map(|(topic, stat)| {
            let messages = topic_feedback(&topic, &stat, grade_level);
            let feedback = TopicFeedback {
                stat,
                positive_feedback: messages.positive,
                improvement_feedback: messages.improvement,
            };
            (topic, feedback)
        })
        .collect();

    let learning_plan =
        build_learning_plan(topic_feedback.iter().map(|(topic, fb)| (topic, &fb.stat)));

    let per_question_report = graded
        .iter()
        .map(|(record, result)| question_report(record, result))
        .collect();

    let time_report = responses
        .iter()
        .map(|r| TimeEntry {
            question_id: r.question_id.clone(),
            question: r.question.clone(),
            time_taken: r.time_taken,
        })
        .collect();

    tracing::info!(
        questions = summary.total_questions,
        attempted = summary.attempted,
        accuracy = summary.accuracy_percent,
        topics = topic_feedback.len(),
        plan_days = learning_plan.len(),
        "report generated"
    );

    Report {
        learning_plan_summary: learning_plan_summary(summary.accuracy_percent, grade_level),
        summary,
        topic_feedback,
        per_question_report,
        time_report,
        learning_plan,
    }
}

/// Grade untyped JSON input.
///
/// Anything that is not a batch degrades to the empty report; records that
/// cannot be read are skipped with a warning.
pub fn generate_report_from_value(value: &Value, grade: &str) -> Report {
    let batch = AttemptBatch::from_value(value);
    generate_report(&batch.responses, grade)
}

fn question_report(record: &AttemptRecord, result: &ScoreResult) -> QuestionReport {
    QuestionReport {
        question_id: record.question_id.clone(),
        question: record.question.clone(),
        image: record.image.clone(),
        topic: record.topic.clone(),
        kind: record.kind.clone(),
        tree: record.tree.clone(),
        rows: record.rows.clone(),
        headers: record.headers.clone(),
        input_keys: record.input_keys.clone(),
        correct_answer: result.correct_answer.clone(),
        user_answer: result.user_answer.clone(),
        attempted: result.attempted,
        is_correct: result.is_correct,
        score: result.score,
        time_taken: record.time_taken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<AttemptRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn mixed_batch() -> Vec<AttemptRecord> {
        records(json!([
            {"questionId": 1, "question": "After 41?", "topic": "Number Series", "type": "userInput",
             "answer": "42", "userAnswer": "42", "timeTaken": 10},
            {"questionId": 2, "question": "Before 30?", "topic": "Number Series", "type": "userInput",
             "answer": "29", "userAnswer": "31", "timeTaken": 15},
            {"questionId": 3, "question": "Simplify", "topic": "Fractions", "type": "tableInput",
             "answer": "{\"0\":{\"n\":1,\"d\":2},\"1\":\"7\"}",
             "userAnswer": "{\"0\":{\"num\":2,\"den\":4},\"1\":\"8\"}",
             "rows": [{}, {}], "timeTaken": 40},
            {"questionId": 4, "question": "Add", "topic": "Addition", "type": "mcq",
             "answer": "5", "userAnswer": null},
            {"questionId": 5, "question": "Count coins", "topic": "Money", "type": "userInput",
             "answer": "25", "userAnswer": "25", "timeTaken": "slow"}
        ]))
    }

    #[test]
    fn empty_input_gives_fallback_report() {
        let report = generate_report(&[], "Grade 5");
        assert_eq!(report.summary.total_questions, 0);
        assert_eq!(report.summary.accuracy_percent, 0);
        assert!(report
            .learning_plan_summary
            .starts_with("No responses found"));
        assert!(report.topic_feedback.is_empty());
    }

    #[test]
    fn non_array_value_degrades_to_empty_report() {
        let report = generate_report_from_value(&json!({"unexpected": true}), "Grade 5");
        assert_eq!(report, Report::empty());
    }

    #[test]
    fn mixed_batch_summary() {
        let report = generate_report(&mixed_batch(), "Grade 4");
        let s = &report.summary;
        assert_eq!(s.total_questions, 5);
        assert_eq!(s.attempted, 4);
        assert_eq!(s.correct, 2.5);
        assert_eq!(s.wrong, 1.5);
        // 2.5 of 5 questions.
        assert_eq!(s.accuracy_percent, 50);
        assert_eq!(s.total_time, 65.0);

        let fractions = &report.per_question_report[2];
        assert_eq!(fractions.score, 0.5);
        assert!(fractions.attempted);
        assert!(!fractions.is_correct);

        let skipped = &report.per_question_report[3];
        assert!(!skipped.attempted);
        assert!(skipped.user_answer.is_none());
    }

    #[test]
    fn topics_and_plan() {
        let report = generate_report(&mixed_batch(), "Grade 4");
        let topics: Vec<&str> = report.topic_feedback.keys().map(String::as_str).collect();
        assert_eq!(topics, vec!["Addition", "Fractions", "Money", "Number Series"]);

        let addition = &report.topic_feedback["Addition"];
        assert_eq!(addition.stat.total_questions, 1);
        assert_eq!(addition.stat.attempted(), 0.0);
        assert!(addition.positive_feedback.starts_with("No attempts recorded"));

        // Money is perfect and drops out; the three others need work.
        let plan: Vec<&str> = report
            .learning_plan
            .iter()
            .map(|s| s.skill_category.as_str())
            .collect();
        assert_eq!(plan, vec!["Number Series", "Fractions", "Addition"]);
        assert!(report.learning_plan_summary.starts_with("You’ve made a start"));
    }

    #[test]
    fn perfect_topic_is_excluded_from_plan() {
        let batch = records(json!([
            {"topic": "Addition", "answer": "2", "userAnswer": "2"},
            {"topic": "Addition", "answer": "4", "userAnswer": "4.0"},
            {"topic": "Addition", "answer": "6", "userAnswer": " 6 "}
        ]));
        let report = generate_report(&batch, "Grade 2");
        assert!(report.topic_feedback["Addition"].stat.is_perfect());
        assert!(report.learning_plan.is_empty());
        assert_eq!(report.summary.accuracy_percent, 100);
        assert!(report.learning_plan_summary.starts_with("Excellent work!"));
    }

    #[test]
    fn accuracy_counts_unattempted_questions() {
        let mut batch = vec![AttemptRecord {
            topic: Some("Money".into()),
            answer: json!("1"),
            user_answer: json!("1"),
            ..Default::default()
        }];
        batch.extend((0..9).map(|_| AttemptRecord {
            topic: Some("Money".into()),
            answer: json!("1"),
            ..Default::default()
        }));
        let report = generate_report(&batch, "Grade 5");
        assert_eq!(report.summary.accuracy_percent, 10);
    }

    #[test]
    fn factor_tree_alternative_grouping_scores_full_credit() {
        let tree = json!({
            "id": "r", "val": 12, "children": [
                {"id": "a", "val": 2, "isInput": true},
                {"id": "b", "val": 6, "isInput": true, "children": [
                    {"id": "b1", "val": 2, "isInput": true},
                    {"id": "b2", "val": 3, "isInput": true}
                ]}
            ]
        });
        let batch = records(json!([{
            "topic": "Factors", "type": "factorTree", "tree": tree,
            "answer": "{\"a\":\"2\",\"b\":\"6\",\"b1\":\"2\",\"b2\":\"3\"}",
            "userAnswer": {"a": "3", "b": "4", "b1": "2", "b2": "2"}
        }]));
        let report = generate_report(&batch, "Grade 6");
        assert_eq!(report.per_question_report[0].score, 1.0);
        assert!(report.per_question_report[0].is_correct);
    }

    #[test]
    fn serialized_report_is_idempotent() {
        let batch = mixed_batch();
        let first = serde_json::to_string(&generate_report(&batch, "Grade 4")).unwrap();
        let second = serde_json::to_string(&generate_report(&batch, "Grade 4")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn topic_stats_do_not_depend_on_record_order() {
        let batch = mixed_batch();
        let mut reversed = batch.clone();
        reversed.reverse();

        let forward = generate_report(&batch, "Grade 4");
        let backward = generate_report(&reversed, "Grade 4");
        assert_eq!(forward.topic_feedback, backward.topic_feedback);
        assert_eq!(forward.summary, backward.summary);
        assert_eq!(forward.learning_plan, backward.learning_plan);
    }

    #[test]
    fn time_report_keeps_input_order_and_nulls() {
        let report = generate_report(&mixed_batch(), "Grade 4");
        let times: Vec<Option<f64>> = report.time_report.iter().map(|t| t.time_taken).collect();
        assert_eq!(times, vec![Some(10.0), Some(15.0), Some(40.0), None, None]);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["timeReport"][4]["timeTaken"].is_null());
    }

    #[test]
    fn untyped_batch_object_is_graded() {
        let value = json!({
            "grade": "Grade 3",
            "responses": [
                {"topic": "Time", "answer": "3", "userAnswer": "3"},
                "not a record"
            ]
        });
        let report = generate_report_from_value(&value, "Grade 3");
        assert_eq!(report.summary.total_questions, 1);
        assert_eq!(report.summary.correct, 1.0);
    }
}
