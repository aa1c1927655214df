use websurfer_core::Paths;

/// Phrase a question for the orchestrator, attaching a file path when the
/// question comes with one.
pub fn compose_question(question: &str, file: Option<&str>) -> String {
    match file {
        Some(path) => format!("{}\n\nThis question is about the attached file: {}", question, path),
        None => question.to_string(),
    }
}

pub async fn run(question: &str, file: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = super::load_config(&paths)?;
    let orchestrator = super::build_orchestrator(&config, &paths)?;

    let result = orchestrator.run_task(&compose_question(question, file)).await?;
    println!("{}", result.final_answer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_question() {
        assert_eq!(compose_question("q?", None), "q?");
        let with_file = compose_question("q?", Some("/tmp/data.xlsx"));
        assert!(with_file.starts_with("q?"));
        assert!(with_file.contains("/tmp/data.xlsx"));
    }
}
