use websurfer_core::Paths;

pub async fn run(task: &str) -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = super::load_config(&paths)?;
    let surfer = super::build_surfer(&config, &paths)?;

    let result = surfer.run_task(task).await?;
    println!("{}", result.final_answer);
    Ok(())
}
