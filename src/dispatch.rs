use std::io::Write;

use reqwest::StatusCode;
use tracing::{error, info, warn};

use crate::config::EventConfig;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::names::AttendeeName;
use crate::tito::{DiscountCodeApi, DiscountCodeRequest};

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Created,
    Rejected(StatusCode),
    TransportFailed(String),
    Skipped,
    DryRun,
}

/// The console line printed for one request, if any.
pub fn outcome_line(code: &str, outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Created => Some(format!("Created discount code: {code}")),
        Outcome::Rejected(_) | Outcome::TransportFailed(_) => {
            Some(format!("Failed to create discount code: {code}"))
        }
        Outcome::Skipped => Some(format!("Skipping existing discount code: {code}")),
        Outcome::DryRun => None,
    }
}

#[derive(Debug, PartialEq)]
pub struct Failure {
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct DispatchReport {
    pub created: usize,
    pub skipped: usize,
    pub dry_run: usize,
    pub failed: Vec<Failure>,
}

impl DispatchReport {
    fn tally(&mut self, code: String, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::DryRun => self.dry_run += 1,
            Outcome::Rejected(status) => self.failed.push(Failure {
                code,
                reason: format!("HTTP {status}"),
            }),
            Outcome::TransportFailed(reason) => self.failed.push(Failure { code, reason }),
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.skipped + self.dry_run + self.failed.len()
    }
}

pub struct Dispatcher<'a, A, W> {
    api: &'a A,
    out: W,
    dry_run: bool,
    ledger: Option<Ledger>,
}

impl<'a, A: DiscountCodeApi, W: Write> Dispatcher<'a, A, W> {
    pub fn new(api: &'a A, out: W) -> Self {
        Self {
            api,
            out,
            dry_run: false,
            ledger: None,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn ledger(mut self, ledger: Option<Ledger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Create every (name, tier) code in order, names outermost.
    pub async fn run(
        &mut self,
        names: &[AttendeeName],
        config: &EventConfig,
    ) -> Result<DispatchReport> {
        info!(
            "Dispatching {} codes ({} names x {} tiers)",
            names.len() * config.tier_count(),
            names.len(),
            config.tier_count()
        );

        let mut report = DispatchReport::default();
        for name in names {
            for tier in config.tiers() {
                let request = DiscountCodeRequest::new(config, name, tier);
                let outcome = self.dispatch_one(&request).await?;
                if let Some(line) = outcome_line(&request.code, &outcome) {
                    writeln!(self.out, "{line}")?;
                }
                report.tally(request.code, outcome);
            }
        }

        self.write_summary(&report)?;
        Ok(report)
    }

    async fn dispatch_one(&mut self, request: &DiscountCodeRequest) -> Result<Outcome> {
        if self
            .ledger
            .as_ref()
            .is_some_and(|l| l.contains(&request.code))
        {
            return Ok(Outcome::Skipped);
        }

        if self.dry_run {
            writeln!(self.out, "Creating code: {}", request.to_json()?)?;
            return Ok(Outcome::DryRun);
        }

        match self.api.create_discount_code(request).await {
            Ok(StatusCode::CREATED) => {
                if let Some(ledger) = &mut self.ledger {
                    ledger.record(&request.code)?;
                }
                Ok(Outcome::Created)
            }
            Ok(status) => {
                warn!("Tito rejected {} with {}", request.code, status);
                Ok(Outcome::Rejected(status))
            }
            Err(e) => {
                error!("Request for {} failed: {}", request.code, e);
                Ok(Outcome::TransportFailed(e.to_string()))
            }
        }
    }

    fn write_summary(&mut self, report: &DispatchReport) -> Result<()> {
        if self.dry_run {
            writeln!(
                self.out,
                "Dry run: {} requests prepared, {} already created",
                report.dry_run, report.skipped
            )?;
            return Ok(());
        }

        writeln!(
            self.out,
            "Created {}, failed {}, skipped {} discount codes",
            report.created,
            report.failed.len(),
            report.skipped
        )?;
        if !report.failed.is_empty() {
            writeln!(self.out, "Failed codes:")?;
            for failure in &report.failed {
                writeln!(self.out, "  {} ({})", failure.code, failure.reason)?;
            }
        }
        Ok(())
    }
}
