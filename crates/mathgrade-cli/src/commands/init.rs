//! The `mathgrade init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("mathgrade.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("attempt-batches").context("failed to create attempt-batches/")?;
    write_if_missing(Path::new("attempt-batches/example.json"), EXAMPLE_BATCH)?;

    println!("\nNext steps:");
    println!("  1. Edit mathgrade.toml to set the default grade and output directory");
    println!("  2. Run: mathgrade validate --input attempt-batches/example.json");
    println!("  3. Run: mathgrade grade --input attempt-batches/example.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mathgrade configuration

# Grade used when a batch does not carry one. MATHGRADE_GRADE overrides it.
default_grade = "Grade 5"

# Where `mathgrade grade` writes reports. ${VAR} references are expanded.
output_dir = "./mathgrade-results"

# json, markdown or all
default_format = "json"

pretty = true
"#;

const EXAMPLE_BATCH: &str = r#"{
  "grade": "Grade 5",
  "responses": [
    {
      "questionId": 1,
      "question": "Which number comes after 199?",
      "topic": "Number Series",
      "type": "userInput",
      "answer": "200",
      "userAnswer": "200",
      "timeTaken": 14
    },
    {
      "questionId": 2,
      "question": "Fill in the missing term: 3, 6, 12, __, 48",
      "topic": "Number Series",
      "type": "userInput",
      "answer": "24",
      "userAnswer": "18",
      "timeTaken": 31
    },
    {
      "questionId": 3,
      "question": "Write each fraction in its simplest form.",
      "topic": "Fractions",
      "type": "tableInput",
      "headers": ["Fraction", "Simplest form"],
      "rows": [{"fraction": "4/8"}, {"fraction": "6/9"}],
      "answer": "{\"0\":{\"n\":1,\"d\":2},\"1\":{\"n\":2,\"d\":3}}",
      "userAnswer": "{\"0\":{\"n\":2,\"d\":4},\"1\":{\"n\":3,\"d\":4}}",
      "timeTaken": 58
    },
    {
      "questionId": 4,
      "question": "Complete the factor tree for 36.",
      "topic": "Factors",
      "type": "factorTree",
      "tree": {
        "id": "root", "val": 36, "children": [
          {"id": "a", "val": 6, "isInput": true, "children": [{"id": "a1", "val": 2}, {"id": "a2", "val": 3}]},
          {"id": "b", "val": 6, "isInput": true, "children": [{"id": "b1", "val": 2}, {"id": "b2", "val": 3}]}
        ]
      },
      "answer": "{\"a\":\"6\",\"b\":\"6\"}",
      "userAnswer": {"a": "6", "b": "6"},
      "timeTaken": 40
    },
    {
      "questionId": 5,
      "question": "How many 5-rupee coins make 25 rupees?",
      "topic": "Money",
      "type": "mcq",
      "options": ["4", "5", "6"],
      "answer": "5",
      "userAnswer": null
    }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mathgrade_core::parser::{parse_attempt_batch_str, validate_batch};

    #[test]
    fn sample_config_parses() {
        let config: crate::config::MathgradeConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.default_grade, "Grade 5");
    }

    #[test]
    fn example_batch_is_valid() {
        let batch = parse_attempt_batch_str(EXAMPLE_BATCH, Path::new("example.json")).unwrap();
        assert_eq!(batch.responses.len(), 5);
        assert!(validate_batch(&batch).is_empty());
    }
}
