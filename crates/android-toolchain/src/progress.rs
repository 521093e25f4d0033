//! Progress reporting
//!
//! Every artifact gets one indicator whose text is updated through the
//! phases (downloading, verifying, extracting) and which is finished
//! exactly once with a success or failure message.

use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// A single progress indicator
pub trait Progress {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);

    /// Determined indicators show a percentage, undetermined ones only
    /// show activity.
    fn is_determined(&self) -> bool;
    fn set_determined(&mut self, determined: bool);

    fn percent(&self) -> f64;
    fn set_percent(&mut self, percent: f64);

    /// Replaces the indicator with a final success or failure line.
    fn finish(&mut self, success: bool, message: &str);
}

/// Creates progress indicators
pub trait ProgressFactory {
    fn create(&self, text: &str, determined: bool) -> Box<dyn Progress>;
}

/// Progress indicator drawn on the terminal
pub struct TerminalProgress {
    bar: ProgressBar,
    text: String,
    determined: bool,
    percent: f64,
    bar_width: u16,
    finished: bool,
    /// Receives the final line when the bar can't be drawn
    fallback: Option<Box<dyn Write>>,
}

impl TerminalProgress {
    fn new(
        bar: ProgressBar,
        text: &str,
        determined: bool,
        bar_width: u16,
        fallback: Option<Box<dyn Write>>,
    ) -> Self {
        let progress = Self {
            bar,
            text: text.to_string(),
            determined,
            percent: 0.0,
            bar_width,
            finished: false,
            fallback,
        };
        progress.apply_style();
        progress.bar.set_message(progress.text.clone());
        progress
    }

    fn apply_style(&self) {
        if self.determined {
            self.bar.disable_steady_tick();
            self.bar.set_length(100);
            let template = format!(
                "{{msg}} [{{bar:{}.cyan/blue}}] {{percent:>3}}%",
                self.bar_width.max(1)
            );
            let style = ProgressStyle::with_template(&template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            self.bar.set_style(style);
        } else {
            let style = ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            self.bar.set_style(style);
            if !self.bar.is_hidden() {
                self.bar.enable_steady_tick(TICK_INTERVAL);
            }
        }
    }
}

impl Progress for TerminalProgress {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.bar.set_message(self.text.clone());
    }

    fn is_determined(&self) -> bool {
        self.determined
    }

    fn set_determined(&mut self, determined: bool) {
        if self.determined != determined {
            self.determined = determined;
            self.apply_style();
        }
    }

    fn percent(&self) -> f64 {
        self.percent
    }

    fn set_percent(&mut self, percent: f64) {
        self.percent = percent.clamp(0.0, 100.0);
        self.bar.set_position(self.percent.round() as u64);
    }

    fn finish(&mut self, success: bool, message: &str) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.bar.disable_steady_tick();
        let style = ProgressStyle::with_template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.bar.set_style(style);
        let mark = if success { '✓' } else { '✗' };
        let line = format!("{} {}", mark, message);
        // indicatif hides bars whose target isn't a terminal.
        if self.bar.is_hidden() {
            if let Some(out) = self.fallback.as_mut() {
                let _ = writeln!(out, "{}", line);
            }
        }
        self.bar.finish_with_message(line);
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        if !self.finished {
            self.bar.finish_and_clear();
        }
    }
}

/// Creates terminal progress indicators, or hidden ones for
/// non-interactive use.
///
/// Visible indicators whose bar can't be drawn (stderr isn't a terminal)
/// still print their final line to stderr. Hidden ones print nothing.
#[derive(Debug, Clone)]
pub struct TerminalProgressFactory {
    bar_width: u16,
    hidden: bool,
}

impl TerminalProgressFactory {
    pub fn new(bar_width: u16) -> Self {
        Self { bar_width, hidden: false }
    }

    pub fn hidden() -> Self {
        Self { bar_width: 30, hidden: true }
    }
}

impl ProgressFactory for TerminalProgressFactory {
    fn create(&self, text: &str, determined: bool) -> Box<dyn Progress> {
        if self.hidden {
            let bar = ProgressBar::hidden();
            return Box::new(TerminalProgress::new(bar, text, determined, self.bar_width, None));
        }
        let bar = ProgressBar::new(100);
        let fallback: Option<Box<dyn Write>> = Some(Box::new(std::io::stderr()));
        Box::new(TerminalProgress::new(bar, text, determined, self.bar_width, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_final_line_without_terminal() {
        let buffer = SharedBuffer::default();
        let mut progress = TerminalProgress::new(
            ProgressBar::hidden(),
            "Downloading manifest",
            false,
            30,
            Some(Box::new(buffer.clone())),
        );

        progress.set_text("Downloading manifest (0.1 MB)");
        assert!(buffer.0.borrow().is_empty());

        progress.finish(false, "Couldn't download the manifest file (status code 404)");
        progress.finish(true, "ignored");
        assert_eq!(
            String::from_utf8(buffer.0.borrow().clone()).unwrap(),
            "✗ Couldn't download the manifest file (status code 404)\n"
        );
    }

    #[test]
    fn test_text_and_mode() {
        let mut progress = TerminalProgressFactory::hidden().create("Downloading tools", false);
        assert_eq!(progress.text(), "Downloading tools");
        assert!(!progress.is_determined());

        progress.set_determined(true);
        progress.set_text("Extracting aapt2");
        progress.set_percent(140.0);

        assert!(progress.is_determined());
        assert_eq!(progress.text(), "Extracting aapt2");
        assert_eq!(progress.percent(), 100.0);

        progress.finish(true, "Tools installed");
        // Finishing twice is harmless.
        progress.finish(false, "ignored");
    }
}
