//! Generic step-by-step wizard.
//!
//! A wizard is an ordered list of [`StepDefinition`]s driving a single piece of
//! form state `S`. Each step declares how to validate the state, what to do
//! when the user moves past it, and optionally when it does not apply.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::errors::WizardError;

type Validator<S> = Box<dyn Fn(&S) -> Vec<String> + Send + Sync>;
type Transition<S> = Box<dyn Fn(&mut S) -> Result<()> + Send + Sync>;
type SkipRule<S> = Box<dyn Fn(&S) -> bool + Send + Sync>;

/// What the UI should render for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Form,
    Calculation,
    Documents,
    Signature,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    InProgress,
    Completed,
}

/// Snapshot of how far through the wizard the user is.
///
/// Skipped steps are left out of every count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardProgress {
    pub current_step: String,
    pub position: usize,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub percent: u32,
    pub status: WizardStatus,
}

/// Per-step row for a stepper header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub id: String,
    pub title: String,
    pub kind: StepKind,
    pub completed: bool,
    pub skipped: bool,
    pub current: bool,
}

pub struct StepDefinition<S> {
    id: &'static str,
    title: &'static str,
    kind: StepKind,
    validate: Validator<S>,
    on_next: Option<Transition<S>>,
    skip_when: Option<SkipRule<S>>,
}

impl<S> StepDefinition<S> {
    /// Creates a step that always validates and has no transition.
    pub fn new(id: &'static str, title: &'static str, kind: StepKind) -> Self {
        Self {
            id,
            title,
            kind,
            validate: Box::new(|_: &S| Vec::new()),
            on_next: None,
            skip_when: None,
        }
    }

    /// Sets the validator. An empty list means the user may proceed.
    pub fn validate_with(
        mut self,
        validate: impl Fn(&S) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Box::new(validate);
        self
    }

    /// Sets an action run after validation passes, before advancing.
    pub fn on_next(mut self, on_next: impl Fn(&mut S) -> Result<()> + Send + Sync + 'static) -> Self {
        self.on_next = Some(Box::new(on_next));
        self
    }

    /// Marks the step as not applicable whenever `skip_when` holds.
    pub fn skip_when(mut self, skip_when: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.skip_when = Some(Box::new(skip_when));
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn errors(&self, state: &S) -> Vec<String> {
        (self.validate)(state)
    }

    pub fn is_skipped(&self, state: &S) -> bool {
        self.skip_when.as_ref().map(|f| f(state)).unwrap_or(false)
    }
}

impl<S> std::fmt::Debug for StepDefinition<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .finish()
    }
}

pub struct Wizard<S> {
    steps: Vec<StepDefinition<S>>,
    state: S,
    current: usize,
    furthest: usize,
    completed: Vec<bool>,
    status: WizardStatus,
}

impl<S> Wizard<S> {
    pub fn new(steps: Vec<StepDefinition<S>>, state: S) -> Result<Self> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps.into());
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|s| s.id == step.id) {
                return Err(WizardError::DuplicateStep(step.id.to_string()).into());
            }
        }

        let mut wizard = Self {
            completed: vec![false; steps.len()],
            steps,
            state,
            current: 0,
            furthest: 0,
            status: WizardStatus::InProgress,
        };
        let first = wizard.next_active_from(0).ok_or(WizardError::NoSteps)?;
        wizard.current = first;
        wizard.furthest = first;
        Ok(wizard)
    }

    pub fn current_step(&self) -> &StepDefinition<S> {
        &self.steps[self.current]
    }

    pub fn validation_errors(&self) -> Vec<String> {
        self.current_step().errors(&self.state)
    }

    pub fn can_proceed(&self) -> bool {
        !self.is_complete() && self.validation_errors().is_empty()
    }

    /// Validates the current step, runs its transition and moves on.
    ///
    /// Returns `Completed` once the last applicable step has been passed.
    pub fn next(&mut self) -> Result<WizardStatus> {
        if self.is_complete() {
            return Err(WizardError::AlreadyComplete.into());
        }

        let step = &self.steps[self.current];
        let reasons = step.errors(&self.state);
        if !reasons.is_empty() {
            debug!("Step '{}' blocked: {}", step.id, reasons.join("; "));
            return Err(WizardError::step_invalid(step.id, reasons).into());
        }
        if let Some(on_next) = &step.on_next {
            on_next(&mut self.state)?;
        }
        self.completed[self.current] = true;

        match self.next_active_from(self.current + 1) {
            Some(index) => {
                debug!("Wizard advanced: {} -> {}", step.id, self.steps[index].id);
                self.current = index;
                self.furthest = self.furthest.max(index);
            }
            None => {
                debug!("Wizard completed at step '{}'", step.id);
                self.status = WizardStatus::Completed;
            }
        }
        Ok(self.status)
    }

    /// Moves to the previous applicable step. Returns false at the first step.
    ///
    /// Going back from a completed wizard reopens it on its last step.
    pub fn back(&mut self) -> bool {
        if self.is_complete() {
            self.status = WizardStatus::InProgress;
            return true;
        }
        let previous = (0..self.current)
            .rev()
            .find(|&i| !self.steps[i].is_skipped(&self.state));
        match previous {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Jumps to a step the user has already reached.
    pub fn go_to(&mut self, step_id: &str) -> Result<()> {
        let index = self
            .steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| WizardError::UnknownStep(step_id.to_string()))?;
        if index > self.furthest || self.steps[index].is_skipped(&self.state) {
            return Err(WizardError::StepNotReached(step_id.to_string()).into());
        }
        self.current = index;
        self.status = WizardStatus::InProgress;
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.status == WizardStatus::Completed
    }

    pub fn progress(&self) -> WizardProgress {
        let active: Vec<usize> = (0..self.steps.len())
            .filter(|&i| !self.steps[i].is_skipped(&self.state))
            .collect();
        let completed_steps = active.iter().filter(|&&i| self.completed[i]).count();
        let position = active
            .iter()
            .position(|&i| i == self.current)
            .map(|p| p + 1)
            .unwrap_or(0);
        let percent = if active.is_empty() {
            100
        } else {
            (completed_steps * 100 / active.len()) as u32
        };

        WizardProgress {
            current_step: self.current_step().id.to_string(),
            position,
            total_steps: active.len(),
            completed_steps,
            percent,
            status: self.status,
        }
    }

    pub fn step_summaries(&self) -> Vec<StepSummary> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepSummary {
                id: step.id.to_string(),
                title: step.title.to_string(),
                kind: step.kind,
                completed: self.completed[i],
                skipped: step.is_skipped(&self.state),
                current: i == self.current,
            })
            .collect()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the form state.
    ///
    /// Editing reopens the current step and every step after it: they must be
    /// passed again with [`Wizard::next`], so their transitions re-run on the
    /// edited state, and `go_to` can no longer jump past the current step.
    pub fn state_mut(&mut self) -> &mut S {
        self.invalidate_from(self.current);
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    fn invalidate_from(&mut self, index: usize) {
        let stale = self.is_complete()
            || self.furthest > index
            || self.completed[index..].iter().any(|&done| done);
        if !stale {
            return;
        }
        debug!("Wizard state edited at step '{}'", self.steps[index].id);
        self.completed[index..].iter_mut().for_each(|done| *done = false);
        self.furthest = index;
        self.status = WizardStatus::InProgress;
    }

    fn next_active_from(&self, start: usize) -> Option<usize> {
        (start..self.steps.len()).find(|&i| !self.steps[i].is_skipped(&self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[derive(Debug, Default)]
    struct Form {
        name: String,
        skip_middle: bool,
        visits: u32,
    }

    fn steps() -> Vec<StepDefinition<Form>> {
        vec![
            StepDefinition::new("name", "Your name", StepKind::Form).validate_with(|f: &Form| {
                if f.name.trim().is_empty() {
                    vec!["Name is required".to_string()]
                } else {
                    Vec::new()
                }
            }),
            StepDefinition::new("middle", "Optional", StepKind::Form)
                .skip_when(|f: &Form| f.skip_middle)
                .on_next(|f: &mut Form| {
                    f.visits += 1;
                    Ok(())
                }),
            StepDefinition::new("review", "Review", StepKind::Review),
        ]
    }

    #[test]
    fn test_rejects_empty_and_duplicate_steps() {
        let result = Wizard::<Form>::new(Vec::new(), Form::default());
        assert!(matches!(result, Err(Error::Wizard(WizardError::NoSteps))));

        let dupes = vec![
            StepDefinition::new("a", "A", StepKind::Form),
            StepDefinition::new("a", "A again", StepKind::Form),
        ];
        let result = Wizard::new(dupes, Form::default());
        assert!(matches!(
            result,
            Err(Error::Wizard(WizardError::DuplicateStep(ref id))) if id == "a"
        ));
    }

    #[test]
    fn test_validation_gates_next() {
        let mut wizard = Wizard::new(steps(), Form::default()).unwrap();
        assert!(!wizard.can_proceed());
        assert_eq!(wizard.validation_errors(), vec!["Name is required"]);

        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            Error::Wizard(WizardError::StepInvalid { ref step, .. }) if step == "name"
        ));
        assert_eq!(wizard.current_step().id(), "name");

        wizard.state_mut().name = "Ada".to_string();
        assert!(wizard.can_proceed());
        assert_eq!(wizard.next().unwrap(), WizardStatus::InProgress);
        assert_eq!(wizard.current_step().id(), "middle");
    }

    #[test]
    fn test_full_run_with_transition() {
        let mut wizard = Wizard::new(steps(), Form::default()).unwrap();
        wizard.state_mut().name = "Ada".to_string();

        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.state().visits, 1);
        assert_eq!(wizard.next().unwrap(), WizardStatus::Completed);
        assert!(wizard.is_complete());
        assert_eq!(wizard.progress().percent, 100);

        assert!(matches!(
            wizard.next(),
            Err(Error::Wizard(WizardError::AlreadyComplete))
        ));
    }

    #[test]
    fn test_skipped_steps_are_bypassed() {
        let form = Form {
            name: "Ada".to_string(),
            skip_middle: true,
            ..Default::default()
        };
        let mut wizard = Wizard::new(steps(), form).unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.current_step().id(), "review");
        assert_eq!(wizard.state().visits, 0);

        let progress = wizard.progress();
        assert_eq!(progress.total_steps, 2);
        assert_eq!(progress.position, 2);
        assert_eq!(progress.percent, 50);

        assert!(wizard.back());
        assert_eq!(wizard.current_step().id(), "name");
        assert!(!wizard.back());

        assert!(wizard.step_summaries()[1].skipped);
    }

    #[test]
    fn test_go_to_only_reached_steps() {
        let mut wizard = Wizard::new(steps(), Form::default()).unwrap();
        assert!(matches!(
            wizard.go_to("review"),
            Err(Error::Wizard(WizardError::StepNotReached(_)))
        ));
        assert!(matches!(
            wizard.go_to("missing"),
            Err(Error::Wizard(WizardError::UnknownStep(_)))
        ));

        wizard.state_mut().name = "Ada".to_string();
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.go_to("name").unwrap();
        assert_eq!(wizard.current_step().id(), "name");
        wizard.go_to("review").unwrap();
        assert_eq!(wizard.current_step().id(), "review");
    }

    #[test]
    fn test_back_reopens_completed_wizard() {
        let mut wizard = Wizard::new(steps(), Form::default()).unwrap();
        wizard.state_mut().name = "Ada".to_string();
        while wizard.next().unwrap() != WizardStatus::Completed {}

        assert!(wizard.back());
        assert!(!wizard.is_complete());
        assert_eq!(wizard.current_step().id(), "review");
    }

    #[test]
    fn test_failing_transition_keeps_step() {
        let steps = vec![
            StepDefinition::new("calc", "Calculate", StepKind::Calculation).on_next(
                |_: &mut Form| Err(Error::Unexpected("calculation failed".to_string())),
            ),
            StepDefinition::new("review", "Review", StepKind::Review),
        ];
        let mut wizard = Wizard::new(steps, Form::default()).unwrap();
        assert!(wizard.next().is_err());
        assert_eq!(wizard.current_step().id(), "calc");
        assert_eq!(wizard.progress().completed_steps, 0);
    }

    #[test]
    fn test_all_steps_skipped_is_rejected() {
        let steps = vec![
            StepDefinition::new("only", "Only", StepKind::Form).skip_when(|_: &Form| true),
        ];
        assert!(matches!(
            Wizard::new(steps, Form::default()),
            Err(Error::Wizard(WizardError::NoSteps))
        ));
    }

    #[test]
    fn test_editing_earlier_step_blocks_jump_ahead() {
        let mut wizard = Wizard::new(steps(), Form::default()).unwrap();
        wizard.state_mut().name = "Ada".to_string();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.state().visits, 1);

        // Looking back without editing keeps later steps reachable.
        wizard.go_to("name").unwrap();
        wizard.go_to("review").unwrap();

        wizard.go_to("name").unwrap();
        wizard.state_mut().name = "Grace".to_string();
        assert!(matches!(
            wizard.go_to("review"),
            Err(Error::Wizard(WizardError::StepNotReached(_)))
        ));
        assert_eq!(wizard.progress().completed_steps, 0);

        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.state().visits, 2);
        assert_eq!(wizard.current_step().id(), "review");
    }

    #[test]
    fn test_editing_completed_wizard_reopens_it() {
        let mut wizard = Wizard::new(steps(), Form::default()).unwrap();
        wizard.state_mut().name = "Ada".to_string();
        while wizard.next().unwrap() != WizardStatus::Completed {}

        wizard.state_mut().skip_middle = true;
        assert!(!wizard.is_complete());
        assert_eq!(wizard.next().unwrap(), WizardStatus::Completed);
    }
}
