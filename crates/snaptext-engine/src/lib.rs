use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use kanal::{AsyncReceiver, AsyncSender};
use snaptext_config::engine::EngineConfig;
use snaptext_types::{AppEvent, ImageBuffer, RecognitionOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

mod protocol;

pub use protocol::{
    EngineResponse, normalize_result, parse_response, request_line, sequence_from_path, task_path,
};

/// Hands a capture to the recognition engine. Non-blocking for the caller;
/// the outcome arrives later as an `AppEvent::Recognition` on the event
/// channel, exactly once per submitted sequence number.
#[async_trait::async_trait]
pub trait Dispatch: Send + Sync {
    async fn submit(&self, image: Arc<ImageBuffer>, seq: u64);
}

struct Job {
    image: Arc<ImageBuffer>,
    seq: u64,
}

/// Owner of the out-of-process engine. Submission persists the capture as a
/// temporary PNG and writes one JSON task line to the child's stdin; a reader
/// task turns stdout lines back into recognition events.
///
/// Must be created on the runtime: `launch` spawns the worker tasks.
pub struct EngineHandle {
    jobs: AsyncSender<Job>,
    events: AsyncSender<AppEvent>,
}

impl EngineHandle {
    /// Start the engine child process. If it cannot be started the handle
    /// degrades: every submit reports an inline failure and the session stays
    /// usable. Single attempt, no retry.
    pub fn launch(config: &EngineConfig, events: AsyncSender<AppEvent>) -> Self {
        let (jobs_tx, jobs_rx) = kanal::bounded_async::<Job>(8);

        match spawn_engine(config) {
            Ok((child, stdin, stdout)) => {
                tracing::info!("recognition engine started");
                tokio::spawn(submit_worker(
                    jobs_rx,
                    child,
                    stdin,
                    config.temp_dir.clone(),
                    events.clone(),
                ));
                tokio::spawn(result_reader(stdout, events.clone()));
            }
            Err(e) => {
                tracing::error!("recognition engine unavailable: {e:#}");
                tokio::spawn(degraded_worker(jobs_rx, events.clone(), format!("{e:#}")));
            }
        }

        Self {
            jobs: jobs_tx,
            events,
        }
    }
}

#[async_trait::async_trait]
impl Dispatch for EngineHandle {
    async fn submit(&self, image: Arc<ImageBuffer>, seq: u64) {
        if self.jobs.send(Job { image, seq }).await.is_err() {
            let _ = self
                .events
                .send(AppEvent::Recognition {
                    seq,
                    outcome: RecognitionOutcome::Failed("engine worker stopped".to_string()),
                })
                .await;
        }
    }
}

fn spawn_engine(config: &EngineConfig) -> Result<(Child, ChildStdin, ChildStdout)> {
    let exe = config
        .exe_path
        .as_ref()
        .context("engine executable not configured")?;

    let mut command = Command::new(exe);
    if let Some(lib_dir) = &config.lib_dir {
        command.current_dir(lib_dir);
    }

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to start {}", exe.display()))?;

    let stdin = child.stdin.take().context("engine stdin unavailable")?;
    let stdout = child.stdout.take().context("engine stdout unavailable")?;
    Ok((child, stdin, stdout))
}

/// Drains submitted jobs. Holding the `Child` here ties the engine process to
/// the worker's lifetime; dropping the handle tears the child down with it.
async fn submit_worker(
    jobs: AsyncReceiver<Job>,
    _child: Child,
    mut stdin: ChildStdin,
    temp_dir: PathBuf,
    events: AsyncSender<AppEvent>,
) {
    if let Err(e) = tokio::fs::create_dir_all(&temp_dir).await {
        tracing::warn!("could not create temp dir {}: {e}", temp_dir.display());
    }

    while let Ok(job) = jobs.recv().await {
        if let Err(e) = run_job(&mut stdin, &temp_dir, &job).await {
            tracing::warn!("engine submit failed: {e:#}");
            let _ = events
                .send(AppEvent::Recognition {
                    seq: job.seq,
                    outcome: RecognitionOutcome::Failed(format!("engine call failed: {e:#}")),
                })
                .await;
        }
    }
}

async fn run_job(stdin: &mut ChildStdin, temp_dir: &Path, job: &Job) -> Result<()> {
    let path = protocol::task_path(temp_dir, job.seq);

    let image = job.image.clone();
    let target = path.clone();
    tokio::task::spawn_blocking(move || snaptext_io::files::save_png(&target, &image))
        .await
        .context("png encode task failed")??;

    let mut line = protocol::request_line(&path);
    line.push('\n');
    stdin
        .write_all(line.as_bytes())
        .await
        .context("failed to write task to engine")?;
    stdin.flush().await.context("failed to flush engine stdin")?;
    Ok(())
}

async fn result_reader(stdout: ChildStdout, events: AsyncSender<AppEvent>) {
    let mut lines = BufReader::new(stdout).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => handle_line(&line, &events).await,
            Ok(None) => {
                tracing::warn!("engine closed its output");
                break;
            }
            Err(e) => {
                tracing::error!("error reading engine output: {e}");
                break;
            }
        }
    }
}

async fn handle_line(line: &str, events: &AsyncSender<AppEvent>) {
    let Some(response) = protocol::parse_response(line) else {
        tracing::debug!("engine chatter: {line}");
        return;
    };

    let Some(seq) = protocol::sequence_from_path(&response.image_path) else {
        tracing::warn!("uncorrelated engine response for {}", response.image_path);
        return;
    };

    let _ = tokio::fs::remove_file(&response.image_path).await;

    let _ = events
        .send(AppEvent::Recognition {
            seq,
            outcome: response.outcome,
        })
        .await;
}

async fn degraded_worker(jobs: AsyncReceiver<Job>, events: AsyncSender<AppEvent>, reason: String) {
    while let Ok(job) = jobs.recv().await {
        let _ = events
            .send(AppEvent::Recognition {
                seq: job.seq,
                outcome: RecognitionOutcome::Failed(format!("engine unavailable: {reason}")),
            })
            .await;
    }
}
