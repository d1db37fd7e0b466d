//! Terminal rendering of session updates and project records.

use colored::{ColoredString, Colorize};
use tuneforge_training::{JobStatus, ProjectRecord, ProjectStore, SessionUpdate, UpdatePhase};

#[must_use]
pub fn status_label(status: JobStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        JobStatus::Configuring | JobStatus::Provisioning => label.dimmed(),
        JobStatus::Training => label.yellow(),
        JobStatus::Deploying => label.blue(),
        JobStatus::Active => label.green().bold(),
        JobStatus::Failed => label.red().bold(),
    }
}

/// Prints updates of one session as they arrive.
#[derive(Debug, Default)]
pub struct LiveRenderer {
    status: Option<JobStatus>,
}

impl LiveRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, update: &SessionUpdate) {
        let metric_lines: Vec<String> = update.metrics.iter().map(|m| m.display_line()).collect();
        for line in &update.display_lines {
            if metric_lines.contains(line) {
                println!("{}", line.cyan());
            } else {
                println!("{line}");
            }
        }

        if let UpdatePhase::Failed { error } = &update.phase {
            println!("{} {}", "✗".red(), error.red());
        }

        if self.status != Some(update.status) {
            println!("  {} {}", "status →".dimmed(), status_label(update.status));
            self.status = Some(update.status);
        }
    }
}

pub fn print_record_summary(record: &ProjectRecord) {
    println!();
    println!("{}", format!("Project {} ({})", record.name, record.id).bold().cyan());
    println!("  Status:  {}", status_label(record.status));
    println!("  Lines:   {}", record.log_lines.len());
    println!("  Metrics: {}", record.metrics.len());
    if let Some(loss) = record.latest_loss() {
        println!("  Loss:    {loss:.4}");
    }
    println!();
}

pub fn print_store_table(store: &ProjectStore) {
    println!();
    println!("{}", format!("Projects ({})", store.len()).bold().cyan());
    println!();
    println!("{:<20} {:<14} {:>6} {:>8} {:>10}", "Name", "Status", "Lines", "Metrics", "Last loss");
    println!("{}", "─".repeat(62));
    for record in store.projects() {
        let loss = record.latest_loss().map_or_else(|| "-".to_string(), |l| format!("{l:.4}"));
        // Pad before colouring so escape codes do not break alignment.
        let status = format!("{:<14}", record.status.to_string());
        let status = match record.status {
            JobStatus::Active => status.green(),
            JobStatus::Failed => status.red(),
            _ => status.normal(),
        };
        println!(
            "{:<20} {} {:>6} {:>8} {:>10}",
            record.name,
            status,
            record.log_lines.len(),
            record.metrics.len(),
            loss
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(status_label(JobStatus::Deploying).to_string(), "Deploying");
        assert_eq!(status_label(JobStatus::Failed).to_string(), "Failed");
    }

    #[test]
    fn test_live_renderer_tracks_status() {
        let mut renderer = LiveRenderer::new();
        renderer.render(&SessionUpdate::new(UpdatePhase::Started, JobStatus::Provisioning));
        assert_eq!(renderer.status, Some(JobStatus::Provisioning));
        renderer.render(&SessionUpdate::new(UpdatePhase::Round, JobStatus::Training));
        assert_eq!(renderer.status, Some(JobStatus::Training));
    }
}
