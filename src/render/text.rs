use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

use colored::{Color, Colorize};

use fintrack_config::Config;
use fintrack_core::{AggregateService, Report};
use fintrack_domain::{CategoryTotal, Kind};

use super::ChartRenderer;

const RULE_WIDTH: usize = 48;
const LABEL_WIDTH: usize = 16;
const VALUE_WIDTH: usize = 14;

/// Plain-text rendering of a report: summary, pie shares, dated table, breakdowns.
pub struct TextRenderer {
    config: Config,
    use_color: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TextRenderer {
    pub fn new(config: Config, out: impl Write + Send + 'static) -> Self {
        let use_color = config.ui_color_enabled && std::env::var_os("NO_COLOR").is_none();
        Self {
            config,
            use_color,
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Writes to stdout; colour only when stdout is a terminal.
    pub fn stdout(config: Config) -> Self {
        let tty = io::stdout().is_terminal();
        let mut renderer = Self::new(config, io::stdout());
        renderer.use_color &= tty;
        renderer
    }

    pub fn plain(mut self) -> Self {
        self.use_color = false;
        self
    }

    pub fn format(&self, report: &Report) -> String {
        let aggregate = &report.aggregate;
        let insights = &report.insights;
        let mut text = String::new();

        self.heading(&mut text, &format!("Reports & Insights ({})", self.config.currency));
        let _ = writeln!(
            text,
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}   avg/day {}",
            "Total Income",
            self.tint(&self.money(aggregate.total_income), Color::Green),
            self.money(insights.avg_daily_income),
        );
        let _ = writeln!(
            text,
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}   avg/day {}",
            "Total Expenses",
            self.tint(&self.money(aggregate.total_expenses), Color::Red),
            self.money(insights.avg_daily_expense),
        );
        let balance_color = if insights.is_in_surplus() {
            Color::Green
        } else {
            Color::Red
        };
        let _ = writeln!(
            text,
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
            "Total Balance",
            self.tint(&self.money(insights.total_balance), balance_color),
        );

        self.heading(&mut text, "Income vs Expenses");
        let pie = AggregateService::pie(aggregate);
        let whole: f64 = pie.iter().map(|slice| slice.value).sum();
        for slice in pie {
            let share = if whole > 0.0 {
                format!("{:.1}%", slice.value / whole * 100.0)
            } else {
                "n/a".to_string()
            };
            let _ = writeln!(text, "  {:<LABEL_WIDTH$}{share}", slice.kind.to_string());
        }

        self.heading(&mut text, "Daily Income & Expenses");
        if aggregate.by_date.is_empty() {
            let _ = writeln!(text, "  No entries yet.");
        } else {
            let _ = writeln!(
                text,
                "  {:<12}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
                "Date", "Income", "Expenses", "Net"
            );
            for row in &aggregate.by_date {
                let _ = writeln!(
                    text,
                    "  {:<12}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
                    row.date,
                    self.money(row.income_sum),
                    self.money(row.expense_sum),
                    self.money(row.net()),
                );
            }
        }

        self.breakdown(&mut text, Kind::Income, &aggregate.income_by_category);
        self.breakdown(&mut text, Kind::Expense, &aggregate.expense_by_category);
        text
    }

    fn breakdown(&self, text: &mut String, kind: Kind, totals: &[CategoryTotal]) {
        let (title, column, color) = match kind {
            Kind::Income => ("Income Breakdown", "Source", Color::Green),
            Kind::Expense => ("Expense Breakdown", "Category", Color::Red),
        };
        self.heading(text, title);
        if totals.is_empty() {
            let _ = writeln!(text, "  None recorded.");
            return;
        }
        let _ = writeln!(text, "  {column:<LABEL_WIDTH$}{:>VALUE_WIDTH$}", "Total");
        for total in totals {
            let _ = writeln!(
                text,
                "  {:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
                total.label,
                self.tint(&self.money(total.total), color),
            );
        }
    }

    fn heading(&self, text: &mut String, title: &str) {
        if !text.is_empty() {
            text.push('\n');
        }
        let title = if self.use_color {
            title.bold().to_string()
        } else {
            title.to_string()
        };
        let _ = writeln!(text, "{title}");
        let _ = writeln!(text, "{}", "─".repeat(RULE_WIDTH));
    }

    fn money(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    fn tint(&self, value: &str, color: Color) -> String {
        if self.use_color {
            value.color(color).to_string()
        } else {
            value.to_string()
        }
    }
}

impl ChartRenderer for TextRenderer {
    fn render(&self, report: &Report) {
        let text = self.format(report);
        match self.out.lock() {
            Ok(mut out) => {
                if let Err(err) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
                    tracing::warn!(error = %err, "failed to write report");
                }
            }
            Err(_) => tracing::warn!("report output lock poisoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::ReportService;
    use fintrack_domain::{CategoryOrder, LedgerEntry};

    fn sample_report() -> Report {
        ReportService::build(
            &[LedgerEntry::new(100.0, "Salary", "2025-01-01")],
            &[
                LedgerEntry::new(40.0, "Food", "2025-01-01"),
                LedgerEntry::new(10.0, "Food", "2025-01-02"),
            ],
            CategoryOrder::FirstSeen,
        )
    }

    #[test]
    fn plain_report_lists_totals_and_rows() {
        let renderer = TextRenderer::new(Config::default(), io::sink()).plain();
        let text = renderer.format(&sample_report());

        assert!(text.contains("Total Income"));
        assert!(text.contains("₹100.00"));
        assert!(text.contains("avg/day ₹50.00"));
        assert!(text.contains("2025-01-02"));
        assert!(text.contains("-₹10.00"));
        assert!(text.contains("66.7%"));
        assert!(text.contains("Food"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn heading_names_the_configured_currency() {
        let config = Config {
            currency: "USD".into(),
            ..Config::default()
        };
        let text = TextRenderer::new(config, io::sink()).plain().format(&Report::default());
        assert!(text.starts_with("Reports & Insights (USD)\n"));
    }

    #[test]
    fn coloured_report_tints_amounts() {
        colored::control::set_override(true);
        let mut renderer = TextRenderer::new(Config::default(), io::sink());
        renderer.use_color = true;
        let text = renderer.format(&sample_report());
        let income = "₹100.00".color(Color::Green).to_string();
        let expenses = "₹50.00".color(Color::Red).to_string();
        colored::control::unset_override();

        assert!(text.contains("\u{1b}["));
        assert!(text.contains(&income));
        assert!(text.contains(&expenses));
    }

    #[test]
    fn empty_report_renders_placeholders() {
        let renderer = TextRenderer::new(Config::default(), io::sink()).plain();
        let text = renderer.format(&Report::default());
        assert!(text.contains("No entries yet."));
        assert!(text.contains("n/a"));
        assert!(text.contains("None recorded."));
    }
}
