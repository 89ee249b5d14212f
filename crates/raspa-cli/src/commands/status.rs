use super::blocking;
use crate::cli::{GlobalArgs, StatusArgs};
use crate::config::LoadedConfig;
use crate::error::Result;
use raspa_client::core::models::job::{JobHandle, JobStatus};
use raspa_client::engine::client::SimulationClient;

pub async fn run(args: StatusArgs, global: &GlobalArgs) -> Result<()> {
    let config = LoadedConfig::load(global.config.as_deref())?;
    let client_config = config.client_config(global.server.as_deref())?;
    let handle = JobHandle::new(args.task_id);

    let status = blocking(move || {
        let client = SimulationClient::connect(client_config)?;
        Ok(client.get_status(&handle)?)
    })
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", render(&status));
    }
    Ok(())
}

fn render(status: &JobStatus) -> String {
    let mut out = format!("Task Status: {}\n", status.state);
    if !status.log.is_empty() {
        out.push_str("Recent Logs:\n");
        for line in status.log_lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
