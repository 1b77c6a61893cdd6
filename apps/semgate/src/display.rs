//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use semgate_ops::OperationResult;
use semgate_types::{ColorChoice, RunReport, WorkerRecord};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        self.term.write_line(&json)
    }

    /// Render as formatted table
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Run(report) => self.render_run_report(report),
            OperationResult::Success(message) => self.render_success_message(message),
        }
    }

    /// Render a run timeline and its summary
    fn render_run_report(&self, report: &RunReport) -> io::Result<()> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Worker").add_attribute(Attribute::Bold),
            Cell::new("Waited").add_attribute(Attribute::Bold),
            Cell::new("Granted (ms)").add_attribute(Attribute::Bold),
            Cell::new("Released (ms)").add_attribute(Attribute::Bold),
            Cell::new("Held (ms)").add_attribute(Attribute::Bold),
        ]);

        for record in &report.records {
            table.add_row(vec![
                Cell::new(&record.label),
                Cell::new(if record.waited { "yes" } else { "no" }),
                self.format_granted(record),
                Cell::new(format_ms(record.released_at_ms)),
                Cell::new(format_ms(record.held_ms())),
            ]);
        }

        self.term.write_line("")?;
        self.term.write_line(&table.to_string())?;
        self.term.write_line("")?;

        let bold = self.style(Style::new().bold());
        self.term.write_line(&format!(
            "{} run {}",
            bold.apply_to(report.kind.to_string()),
            report.run_id
        ))?;
        self.term.write_line(&format!(
            "  Capacity:      {} ({} policy)",
            report.capacity, report.policy
        ))?;
        self.term.write_line(&format!(
            "  Peak holders:  {}",
            report.peak_holders
        ))?;
        self.term.write_line(&format!(
            "  Had to wait:   {} of {}",
            report.blocked(),
            report.workers
        ))?;

        let timed_out = report.timed_out();
        if timed_out > 0 {
            let yellow = self.style(Style::new().yellow());
            self.term.write_line(&format!(
                "  Timed out:     {}",
                yellow.apply_to(timed_out)
            ))?;
        }

        self.term.write_line(&format!(
            "  Elapsed:       {} ms",
            report.elapsed_ms
        ))?;
        self.term.write_line(&format!(
            "  Free at end:   {}/{}",
            report.final_available, report.capacity
        ))
    }

    /// Render success message
    fn render_success_message(&self, message: &str) -> io::Result<()> {
        self.term.write_line(message)
    }

    fn format_granted(&self, record: &WorkerRecord) -> Cell {
        match record.granted_at_ms {
            Some(ms) => Cell::new(ms),
            None if self.supports_color() => Cell::new("timed out").fg(Color::Yellow),
            None => Cell::new("timed out"),
        }
    }

    fn style(&self, style: Style) -> Style {
        if self.supports_color() {
            style.force_styling(true)
        } else {
            style.force_styling(false)
        }
    }

    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn format_ms(ms: Option<u64>) -> String {
    ms.map_or_else(|| "-".to_string(), |ms| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(Some(42)), "42");
        assert_eq!(format_ms(None), "-");
    }

    #[test]
    fn test_color_choice_overrides_terminal() {
        let renderer = OutputRenderer::new(false, ColorChoice::Never);
        assert!(!renderer.supports_color());

        let renderer = OutputRenderer::new(false, ColorChoice::Always);
        assert!(renderer.supports_color());
    }
}
