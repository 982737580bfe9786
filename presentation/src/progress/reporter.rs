//! Progress reporting for council deliberations

use colored::Colorize;
use council_application::ports::progress::StageProgressNotifier;
use council_domain::{Role, TaskId, TaskStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};

/// Reports stage progress with a single pipeline bar
///
/// The bar has one step per council role; its message mirrors the role
/// status board (working, retrying, done, error).
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn pipeline_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let mut guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        let bar = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new(Role::PIPELINE.len() as u64);
            pb.set_style(Self::pipeline_style());
            pb.set_prefix("Council");
            pb.enable_steady_tick(std::time::Duration::from_millis(120));
            pb
        });
        f(bar);
    }

    /// Print a line above the bar without tearing it
    pub fn println(&self, line: impl AsRef<str>) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(pb) => pb.println(line.as_ref()),
            None => println!("{}", line.as_ref()),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StageProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, _task_id: &TaskId, role: Role) {
        self.with_bar(|pb| pb.set_message(format!("{} working...", role.display_name())));
    }

    fn on_stage_retry(&self, _task_id: &TaskId, role: Role, attempt: usize, error: &str) {
        self.with_bar(|pb| {
            pb.set_message(format!(
                "{} retrying (attempt {} failed: {})",
                role.display_name(),
                attempt,
                error
            ))
        });
    }

    fn on_stage_complete(&self, _task_id: &TaskId, role: Role, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), role.display_name())
            } else {
                format!("{} {}", "x".red(), role.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_deliberation_finished(&self, _task_id: &TaskId, status: TaskStatus) {
        let bar = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pb) = bar {
            match status {
                TaskStatus::ConsensusReached => {
                    pb.finish_with_message(format!("{}", "consensus reached".green()))
                }
                other => pb.abandon_with_message(format!("{}", other.as_str().red())),
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl StageProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, _task_id: &TaskId, role: Role) {
        eprintln!("{} {}", "->".cyan(), role.display_name().bold());
    }

    fn on_stage_retry(&self, _task_id: &TaskId, role: Role, attempt: usize, error: &str) {
        eprintln!(
            "  {} {} attempt {} failed: {}",
            "!".yellow(),
            role.display_name(),
            attempt,
            error
        );
    }

    fn on_stage_complete(&self, _task_id: &TaskId, role: Role, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), role.display_name());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), role.display_name());
        }
    }

    fn on_deliberation_finished(&self, task_id: &TaskId, status: TaskStatus) {
        eprintln!("{} {} {}", "=".cyan(), task_id, status);
    }
}
