//! Progress bar display for collection installs

use indicatif::{ProgressBar, ProgressStyle};

/// Per-member progress for a collection install
pub struct CollectionProgress {
    bar: ProgressBar,
}

impl CollectionProgress {
    pub fn new(total_members: u64) -> Self {
        let bar = ProgressBar::new(total_members);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(bar_style.progress_chars("#>-"));
        }
        Self { bar }
    }

    /// Show the member currently being installed
    pub fn start_member(&self, package_id: &str) {
        self.bar.set_message(package_id.to_string());
    }

    pub fn member_done(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Abandon on error, leaving the bar visible at its last position
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
