use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};
use websurfer_core::{Config, Paths};

#[derive(Debug, Clone, Deserialize)]
struct EvalRecord {
    task_id: String,
    question: String,
    #[serde(default)]
    file_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvalResult {
    task_id: String,
    answer: String,
    steps: usize,
}

fn parse_dataset(content: &str) -> anyhow::Result<Vec<EvalRecord>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

/// Run one question end to end. Each question gets its own orchestrator,
/// surfer and browser session; only the read-only config is shared.
async fn answer_question(config: &Config, paths: &Paths, record: EvalRecord) -> EvalResult {
    info!(task_id = %record.task_id, "Starting question");

    let question = super::ask::compose_question(&record.question, record.file_name.as_deref());
    let outcome = match super::build_orchestrator(config, paths) {
        Ok(orchestrator) => orchestrator.run_task(&question).await,
        Err(e) => {
            return EvalResult {
                task_id: record.task_id,
                answer: format!("Error: {}", e),
                steps: 0,
            }
        }
    };

    match outcome {
        Ok(run) => EvalResult {
            task_id: record.task_id,
            answer: run.final_answer,
            steps: run.steps.len(),
        },
        Err(e) => {
            warn!(task_id = %record.task_id, error = %e, "Question failed");
            EvalResult {
                task_id: record.task_id,
                answer: format!("Error: {}", e),
                steps: 0,
            }
        }
    }
}

pub async fn run(dataset: &str, output: &str, concurrency: usize) -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = super::load_config(&paths)?;

    let content = std::fs::read_to_string(dataset)?;
    let records = parse_dataset(&content)?;
    info!(count = records.len(), concurrency, "Loaded dataset");

    let mut out = std::fs::File::create(output)?;

    // Results are appended in completion order, not dataset order.
    let mut results = stream::iter(records)
        .map(|record| {
            let config = config.clone();
            let paths = paths.clone();
            async move { answer_question(&config, &paths, record).await }
        })
        .buffer_unordered(concurrency.max(1));

    while let Some(result) = results.next().await {
        info!(task_id = %result.task_id, steps = result.steps, "Question finished");
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset() {
        let content = r#"{"task_id": "t1", "question": "q1"}

{"task_id": "t2", "question": "q2", "file_name": "data.xlsx"}
"#;
        let records = parse_dataset(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].task_id, "t1");
        assert!(records[0].file_name.is_none());
        assert_eq!(records[1].file_name.as_deref(), Some("data.xlsx"));
    }

    #[test]
    fn test_parse_dataset_rejects_bad_line() {
        assert!(parse_dataset("not json").is_err());
    }

    #[test]
    fn test_result_serialization() {
        let result = EvalResult {
            task_id: "t1".to_string(),
            answer: "42".to_string(),
            steps: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["task_id"], "t1");
        assert_eq!(json["steps"], 3);
    }
}
