//! Promotion outcomes, summary counts and progress events.

use serde::{Deserialize, Serialize};

use crate::types::ResourceId;

/// Final classification of one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionAction {
    Deployed,
    /// Dry-run stand-in for `Deployed`
    WouldDeploy,
    AlreadyDeployed,
    Skipped,
    Failed,
}

impl PromotionAction {
    pub fn label(&self) -> &'static str {
        match self {
            PromotionAction::Deployed => "Deployed",
            PromotionAction::WouldDeploy => "Would deploy",
            PromotionAction::AlreadyDeployed => "Already deployed",
            PromotionAction::Skipped => "Skipped",
            PromotionAction::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionOutcome {
    pub project_id: ResourceId,
    pub project_name: String,
    pub source_version: Option<String>,
    /// Version in the target after this run (`None`: never deployed there).
    pub target_version: Option<String>,
    pub action: PromotionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<ResourceId>,
}

impl PromotionOutcome {
    /// `Action` column text, with the error appended for failures.
    pub fn action_label(&self) -> String {
        match (&self.action, &self.error) {
            (PromotionAction::Failed, Some(error)) => format!("Failed: {error}"),
            (action, _) => action.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionSummary {
    pub deployed: usize,
    pub would_deploy: usize,
    pub already_deployed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PromotionSummary {
    pub fn record(&mut self, action: PromotionAction) {
        match action {
            PromotionAction::Deployed => self.deployed += 1,
            PromotionAction::WouldDeploy => self.would_deploy += 1,
            PromotionAction::AlreadyDeployed => self.already_deployed += 1,
            PromotionAction::Skipped => self.skipped += 1,
            PromotionAction::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.deployed + self.would_deploy + self.already_deployed + self.skipped + self.failed
    }
}

/// Result of one promotion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionReport {
    pub space: String,
    pub source_environment: String,
    pub target_environment: String,
    pub dry_run: bool,
    /// Filter/exclude description, if any were given
    pub selection: Option<String>,
    /// Projects in enumeration order
    pub outcomes: Vec<PromotionOutcome>,
    pub summary: PromotionSummary,
}

impl PromotionReport {
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

/// Receives per-project progress. All methods default to doing nothing.
pub trait PromotionObserver {
    fn on_start(&mut self, _total: usize) {}

    fn on_project(&mut self, _index: usize, _total: usize, _project_name: &str) {}

    fn on_outcome(&mut self, _index: usize, _outcome: &PromotionOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PromotionObserver for NoopObserver {}

/// Accumulates outcomes in arrival order and forwards them to an observer.
pub struct PromotionReporter<'o> {
    outcomes: Vec<PromotionOutcome>,
    summary: PromotionSummary,
    total: usize,
    observer: &'o mut dyn PromotionObserver,
}

impl<'o> PromotionReporter<'o> {
    pub fn new(total: usize, observer: &'o mut dyn PromotionObserver) -> Self {
        observer.on_start(total);
        Self {
            outcomes: Vec::with_capacity(total),
            summary: PromotionSummary::default(),
            total,
            observer,
        }
    }

    /// Announce the project about to be processed.
    pub fn begin(&mut self, project_name: &str) {
        let index = self.outcomes.len();
        self.observer.on_project(index, self.total, project_name);
    }

    pub fn record(&mut self, outcome: PromotionOutcome) {
        let index = self.outcomes.len();
        self.summary.record(outcome.action);
        self.observer.on_outcome(index, &outcome);
        self.outcomes.push(outcome);
    }

    pub fn summary(&self) -> PromotionSummary {
        self.summary
    }

    pub fn into_outcomes(self) -> (Vec<PromotionOutcome>, PromotionSummary) {
        (self.outcomes, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, action: PromotionAction) -> PromotionOutcome {
        PromotionOutcome {
            project_id: ResourceId::new(format!("Projects-{name}")),
            project_name: name.to_string(),
            source_version: Some("1.0.0".to_string()),
            target_version: None,
            action,
            error: (action == PromotionAction::Failed).then(|| "boom".to_string()),
            deployment_id: None,
        }
    }

    #[derive(Default)]
    struct Recording {
        started: Option<usize>,
        announced: Vec<String>,
        finished: Vec<(usize, PromotionAction)>,
    }

    impl PromotionObserver for Recording {
        fn on_start(&mut self, total: usize) {
            self.started = Some(total);
        }

        fn on_project(&mut self, _index: usize, _total: usize, project_name: &str) {
            self.announced.push(project_name.to_string());
        }

        fn on_outcome(&mut self, index: usize, outcome: &PromotionOutcome) {
            self.finished.push((index, outcome.action));
        }
    }

    #[test]
    fn summary_counts_every_action() {
        let mut observer = NoopObserver;
        let mut reporter = PromotionReporter::new(5, &mut observer);
        for action in [
            PromotionAction::Deployed,
            PromotionAction::Deployed,
            PromotionAction::AlreadyDeployed,
            PromotionAction::Skipped,
            PromotionAction::Failed,
        ] {
            reporter.record(outcome("p", action));
        }

        let summary = reporter.summary();
        assert_eq!(summary.deployed, 2);
        assert_eq!(summary.already_deployed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn outcomes_keep_arrival_order_and_notify_observer() {
        let mut observer = Recording::default();
        {
            let mut reporter = PromotionReporter::new(2, &mut observer);
            reporter.begin("Worker");
            reporter.record(outcome("Worker", PromotionAction::Failed));
            reporter.begin("API Service");
            reporter.record(outcome("API Service", PromotionAction::Deployed));

            let (outcomes, _) = reporter.into_outcomes();
            let names: Vec<_> = outcomes.iter().map(|o| o.project_name.as_str()).collect();
            assert_eq!(names, vec!["Worker", "API Service"]);
        }

        assert_eq!(observer.started, Some(2));
        assert_eq!(observer.announced, vec!["Worker", "API Service"]);
        assert_eq!(
            observer.finished,
            vec![(0, PromotionAction::Failed), (1, PromotionAction::Deployed)]
        );
    }

    #[test]
    fn failed_label_includes_error() {
        assert_eq!(
            outcome("p", PromotionAction::Failed).action_label(),
            "Failed: boom"
        );
        assert_eq!(
            outcome("p", PromotionAction::WouldDeploy).action_label(),
            "Would deploy"
        );
    }
}
