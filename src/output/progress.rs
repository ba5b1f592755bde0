use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Progress tracking for the two fetch phases of a job inspection
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start_phase_1(job_id: u64) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Phase 1/2: Fetching job {job_id} and its push")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self) -> Self {
        self.pb
            .finish_with_message(bright_green("Phase 1/2: Fetched job and push ✓").to_string());
        let pb = create_spinner(bright_yellow("Phase 2/2: Loading detail view").to_string());
        Self { pb }
    }

    pub fn finish_phase_2(self) {
        self.pb
            .finish_with_message(bright_green("Phase 2/2: Detail view loaded ✓").to_string());
        eprintln!("\n");
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
