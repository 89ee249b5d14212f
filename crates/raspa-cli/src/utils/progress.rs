use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use raspa_client::core::models::job::JobState;
use raspa_client::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Tracks which lines of the server-side log have already been shown.
///
/// The service returns the tail of the log on every status call, so consecutive
/// snapshots overlap: the end of the previous snapshot reappears at the start of the
/// next one. The longest such overlap is skipped and the rest is new. Without any
/// overlap the whole snapshot is new.
#[derive(Debug, Default)]
pub struct LogFollower {
    previous: Vec<String>,
}

impl LogFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_lines<'a>(&mut self, snapshot: &[&'a str]) -> Vec<&'a str> {
        let max_overlap = self.previous.len().min(snapshot.len());
        let overlap = (0..=max_overlap)
            .rev()
            .find(|&k| {
                self.previous[self.previous.len() - k..]
                    .iter()
                    .zip(&snapshot[..k])
                    .all(|(seen, line)| seen.as_str() == *line)
            })
            .unwrap_or(0);

        if !snapshot.is_empty() {
            self.previous = snapshot.iter().map(|line| line.to_string()).collect();
        }
        snapshot[overlap..].to_vec()
    }
}

struct HandlerState {
    pb: ProgressBar,
    follower: LogFollower,
    last_state: Option<JobState>,
}

#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<HandlerState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::spinner_style());
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(HandlerState {
                pb,
                follower: LogFollower::new(),
                last_state: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };
            let HandlerState {
                pb,
                follower,
                last_state,
            } = &mut *guard;

            match progress {
                Progress::Submitted { handle } => {
                    pb.reset();
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(format!("Task {} submitted", handle));
                }
                Progress::StatusPolled { status } => {
                    let snapshot: Vec<&str> = status.log_lines().collect();
                    for line in follower.new_lines(&snapshot) {
                        pb.println(format!("  {}", line));
                    }
                    pb.set_message(format!("Status: {}", status.state));
                    *last_state = Some(status.state);
                }
                Progress::Waiting { interval } => {
                    let state = last_state
                        .as_ref()
                        .map_or("unknown", |state| state.as_str());
                    pb.set_message(format!(
                        "Status: {} (next check in {}s)",
                        state,
                        interval.as_secs()
                    ));
                }
                Progress::DownloadStarted { total_bytes } => {
                    pb.reset();
                    match total_bytes {
                        Some(total) => {
                            pb.disable_steady_tick();
                            pb.set_length(total);
                            pb.set_style(Self::bar_style());
                        }
                        None => {
                            pb.set_style(Self::byte_spinner_style());
                            pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                        }
                    }
                    pb.set_position(0);
                    pb.set_message("Downloading results");
                }
                Progress::DownloadAdvanced { downloaded } => {
                    pb.set_position(downloaded);
                }
                Progress::DownloadFinished { path, bytes } => {
                    pb.disable_steady_tick();
                    pb.set_position(bytes);
                    pb.finish_with_message(format!(
                        "✓ {} written to {}",
                        HumanBytes(bytes),
                        path.display()
                    ));
                }
            }
        })
    }

    /// Stops the spinner if the workflow ended without finishing the bar itself.
    pub fn finish(&self) {
        if let Ok(guard) = self.state.lock() {
            if !guard.pb.is_finished() {
                guard.pb.disable_steady_tick();
                guard.pb.abandon();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create spinner style template")
    }

    fn byte_spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
            .expect("Failed to create byte spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg:<20} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .expect("Failed to create bar style template")
        .progress_chars("#>-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
