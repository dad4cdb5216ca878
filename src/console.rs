//! Interactive scoring form over stdin/stdout

use crate::config::FormDefaults;
use crate::features::FeatureBuilder;
use crate::model::Classifier;
use crate::scoring::RiskEvaluator;
use crate::stats::SessionStats;
use crate::types::{AnalysisReport, RawTransaction, TransactionType, TIME_STEP_MAX, TIME_STEP_MIN};
use std::io::{self, BufRead, Write};
use tracing::{error, info};

/// One-transaction-at-a-time scoring console.
///
/// Prompts for the seven raw transaction fields, scores the transaction,
/// and renders the verdict. Blank input takes the configured default shown
/// in brackets; `quit` (or end of input) ends the session. Bad input and
/// request-scoped scoring failures are reported inline and never end the
/// session.
pub struct ScoringConsole<C: Classifier, R: BufRead, W: Write> {
    evaluator: RiskEvaluator<C>,
    builder: FeatureBuilder,
    defaults: FormDefaults,
    input: R,
    out: W,
    stats: SessionStats,
}

impl<C: Classifier, R: BufRead, W: Write> ScoringConsole<C, R, W> {
    pub fn new(evaluator: RiskEvaluator<C>, defaults: FormDefaults, input: R, out: W) -> Self {
        Self {
            evaluator,
            builder: FeatureBuilder::new(),
            defaults,
            input,
            out,
            stats: SessionStats::new(),
        }
    }

    /// Run the session until the analyst quits or input ends.
    pub fn run(mut self) -> io::Result<SessionStats> {
        writeln!(self.out, "PaySim fraud scoring console")?;
        writeln!(
            self.out,
            "Scores TRANSFER and CASH_OUT transactions with the trained classifier."
        )?;
        writeln!(
            self.out,
            "Press enter to accept the default in brackets; type 'quit' to exit."
        )?;

        loop {
            writeln!(self.out)?;
            writeln!(self.out, "--- New transaction ---")?;

            let Some(tx) = self.collect_transaction()? else {
                break;
            };

            // Authoritative gate; the per-field checks above make failures
            // here rare but not impossible.
            if let Err(e) = tx.validate() {
                writeln!(self.out, "  ! {e}")?;
                continue;
            }

            let features = self.builder.build(&tx);
            match self.evaluator.evaluate(&features) {
                Ok(result) => {
                    let report = result.into_report(&tx, &features);
                    info!(
                        report_id = %report.report_id,
                        tx_type = %report.tx_type,
                        amount = report.amount,
                        fraud_probability = report.fraud_probability,
                        recommendation = report.recommendation.as_str(),
                        "Transaction scored"
                    );
                    self.stats.record_scored(report.is_fraud);
                    self.render_report(&report)?;
                }
                Err(e) if e.is_request_scoped() => {
                    error!(error = %e, "Scoring failed");
                    self.stats.record_failure();
                    writeln!(self.out, "⚠ Scoring failed: {e}")?;
                }
                Err(e) => {
                    error!(error = %e, "Fatal scoring failure, ending session");
                    return Err(io::Error::other(e));
                }
            }
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "Session ended: {} scored, {} flagged, {} failed.",
            self.stats.scored(),
            self.stats.flagged(),
            self.stats.failed()
        )?;
        self.stats.log_summary();
        Ok(self.stats)
    }

    /// Prompt for all seven fields. `None` means the session is over.
    fn collect_transaction(&mut self) -> io::Result<Option<RawTransaction>> {
        let defaults = self.defaults.clone();

        let Some(time_step) = self.prompt(
            "Time step, hour of month 1-744",
            &defaults.time_step.to_string(),
            defaults.time_step,
            parse_time_step,
        )?
        else {
            return Ok(None);
        };

        let Some(tx_type) = self.prompt(
            "Transaction type, TRANSFER or CASH_OUT",
            defaults.tx_type.as_str(),
            defaults.tx_type,
            parse_tx_type,
        )?
        else {
            return Ok(None);
        };

        let Some(amount) = self.prompt(
            "Amount",
            &defaults.amount.to_string(),
            defaults.amount,
            parse_money,
        )?
        else {
            return Ok(None);
        };

        let Some(sender_before) = self.prompt(
            "Sender balance before (oldBalanceOrig)",
            &defaults.sender_balance_before.to_string(),
            defaults.sender_balance_before,
            parse_money,
        )?
        else {
            return Ok(None);
        };

        let Some(sender_after) = self.prompt(
            "Sender balance after (newBalanceOrig)",
            &defaults.sender_balance_after.to_string(),
            defaults.sender_balance_after,
            parse_money,
        )?
        else {
            return Ok(None);
        };

        let Some(receiver_before) = self.prompt(
            "Receiver balance before (oldBalanceDest)",
            &defaults.receiver_balance_before.to_string(),
            defaults.receiver_balance_before,
            parse_money,
        )?
        else {
            return Ok(None);
        };

        let Some(receiver_after) = self.prompt(
            "Receiver balance after (newBalanceDest)",
            &defaults.receiver_balance_after.to_string(),
            defaults.receiver_balance_after,
            parse_money,
        )?
        else {
            return Ok(None);
        };

        Ok(Some(RawTransaction::new(
            time_step,
            tx_type,
            amount,
            sender_before,
            sender_after,
            receiver_before,
            receiver_after,
        )))
    }

    /// Ask for one field until the input parses, is blank (default), or the
    /// analyst quits.
    fn prompt<T, F>(
        &mut self,
        label: &str,
        default_display: &str,
        default: T,
        parse: F,
    ) -> io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            write!(self.out, "{label} [{default_display}]: ")?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if is_quit(trimmed) {
                return Ok(None);
            }
            if trimmed.is_empty() {
                return Ok(Some(default));
            }

            match parse(trimmed) {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => writeln!(self.out, "  ! {reason}")?,
            }
        }
    }

    fn render_report(&mut self, report: &AnalysisReport) -> io::Result<()> {
        writeln!(self.out)?;
        if report.is_fraud {
            writeln!(
                self.out,
                "❌ FRAUD DETECTED! ({} of {})",
                report.tx_type,
                format_amount(report.amount)
            )?;
            writeln!(
                self.out,
                "Risk level: {:.2}%",
                report.fraud_probability * 100.0
            )?;
            writeln!(self.out, "Action: {}", report.recommendation.action_text())?;
            writeln!(self.out, "Key indicators (error balances):")?;
            writeln!(
                self.out,
                "  sender:   {:.2}",
                report.error_balance_sender
            )?;
            writeln!(
                self.out,
                "  receiver: {:.2}",
                report.error_balance_receiver
            )?;
        } else {
            writeln!(
                self.out,
                "✅ Transaction ALLOWED. ({} of {})",
                report.tx_type,
                format_amount(report.amount)
            )?;
            writeln!(
                self.out,
                "Risk level: {:.2}%",
                report.fraud_probability * 100.0
            )?;
            writeln!(self.out, "Action: {}", report.recommendation.action_text())?;
            writeln!(
                self.out,
                "Risk is low; the error-balance pattern looks normal."
            )?;
        }
        writeln!(
            self.out,
            "Report {} at {}",
            report.report_id,
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(())
    }
}

fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q")
}

fn parse_time_step(input: &str) -> Result<u32, String> {
    let value: u32 = input
        .parse()
        .map_err(|_| "enter a whole number".to_string())?;
    if !(TIME_STEP_MIN..=TIME_STEP_MAX).contains(&value) {
        return Err(format!(
            "time step must be between {TIME_STEP_MIN} and {TIME_STEP_MAX}"
        ));
    }
    Ok(value)
}

fn parse_tx_type(input: &str) -> Result<TransactionType, String> {
    input
        .parse::<TransactionType>()
        .map_err(|e| e.to_string())
}

fn parse_money(input: &str) -> Result<f64, String> {
    let value: f64 = input.parse().map_err(|_| "enter a number".to_string())?;
    if !value.is_finite() || value < 0.0 {
        return Err("must be a non-negative number".to_string());
    }
    Ok(value)
}

/// Render an amount the way the analysts expect: whole units with
/// thousands separators.
fn format_amount(amount: f64) -> String {
    let rounded = format!("{amount:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}
