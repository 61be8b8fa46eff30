//! Interactive task list command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use tasklist_core::config::{Config, paths};
use tasklist_core::logging;
use tasklist_core::store::{MemoryTaskStore, TaskSource, TaskStore, demo_tasks};

pub struct RunOptions<'a> {
    pub tasks_file: Option<&'a Path>,
    pub latency_ms: Option<u64>,
    pub fail: Option<&'a str>,
}

pub fn run(config: &Config, options: RunOptions<'_>) -> Result<()> {
    let source = task_source(config, &options)?;

    let _log_guard = logging::init_file_logging(&paths::logs_dir(), &config.log.level)?;

    let latency = options
        .latency_ms
        .map_or_else(|| config.store.latency(), Duration::from_millis);
    tracing::info!(?latency, "building task store");

    let store: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new(source).with_latency(latency));
    tasklist_tui::run_task_list(store, config.list.clone())
}

/// CLI flags win over config; demo tasks when nothing is given.
fn task_source(config: &Config, options: &RunOptions<'_>) -> Result<TaskSource> {
    if let Some(message) = options.fail {
        return Ok(TaskSource::Failing(message.to_string()));
    }

    let file = options
        .tasks_file
        .map(Path::to_path_buf)
        .or_else(|| config.store.tasks_file.clone());

    match file {
        Some(path) if !path.exists() => {
            bail!("Tasks file not found: {}", path.display())
        }
        Some(path) => Ok(TaskSource::File(path)),
        None => Ok(TaskSource::Inline(demo_tasks())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RunOptions<'static> {
        RunOptions {
            tasks_file: None,
            latency_ms: None,
            fail: None,
        }
    }

    #[test]
    fn test_defaults_to_demo_tasks() {
        let source = task_source(&Config::default(), &options()).unwrap();
        assert!(matches!(source, TaskSource::Inline(tasks) if !tasks.is_empty()));
    }

    #[test]
    fn test_fail_flag_wins() {
        let opts = RunOptions {
            fail: Some("network failure"),
            ..options()
        };
        let source = task_source(&Config::default(), &opts).unwrap();
        assert!(matches!(source, TaskSource::Failing(msg) if msg == "network failure"));
    }

    #[test]
    fn test_missing_tasks_file_is_rejected() {
        let opts = RunOptions {
            tasks_file: Some(Path::new("/definitely/not/here.json")),
            ..options()
        };
        let err = task_source(&Config::default(), &opts).unwrap_err();
        assert!(err.to_string().contains("Tasks file not found"));
    }

    #[test]
    fn test_config_tasks_file_used_when_flag_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "[]").unwrap();

        let mut config = Config::default();
        config.store.tasks_file = Some(path.clone());

        let source = task_source(&config, &options()).unwrap();
        assert!(matches!(source, TaskSource::File(p) if p == path));
    }
}
