//! Practice terminal state machine.
//!
//! The machine walks a chapter's simulation steps. It owns only transient
//! session state (step index, transcript, completion) and never touches the
//! store: an accepted submission reports the XP to award and the caller
//! decides how to persist it.
//!
//! ```text
//! AwaitingInput(i) --correct--> Advancing(i+1) --advance()--> AwaitingInput(i+1)
//!        |                    \-> Completed            (last step)
//!        +--wrong/empty--> AwaitingInput(i)
//! ```

use std::time::Duration;
use tracing::debug;

use crate::catalog::SimulationStep;
use crate::locale::Locale;

/// Pause between an accepted step and the next prompt
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1000);

/// Decides whether a submitted command satisfies a step
pub trait CommandMatcher: Send + Sync {
    fn matches(&self, step: &SimulationStep, command: &str) -> bool;
}

/// Exact string equality against the expected command or an alternative
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl CommandMatcher for ExactMatcher {
    fn matches(&self, step: &SimulationStep, command: &str) -> bool {
        let mut alternatives = step.alternative_commands.iter();
        command == step.expected_command || alternatives.any(|alt| alt == command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    AwaitingInput(usize),
    /// Step accepted, waiting for the paced move to this index
    Advancing(usize),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Prompt(String),
    Command(String),
    Output(String),
    Success { xp: u64 },
    Error { command: String },
    TryAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextStep { after: Duration },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank after trimming; nothing happens
    Empty,
    /// Wrong command; same step, no XP
    Rejected,
    Accepted { xp: u64, advance: Advance },
    /// Not awaiting input (advancing or completed)
    Ignored,
}

pub struct Simulation<'a> {
    steps: &'a [SimulationStep],
    locale: Locale,
    state: SimState,
    transcript: Vec<TranscriptEntry>,
    matcher: Box<dyn CommandMatcher>,
    step_delay: Duration,
}

impl<'a> Simulation<'a> {
    pub fn new(steps: &'a [SimulationStep], locale: Locale) -> Self {
        let mut transcript = Vec::new();
        let state = match steps.first() {
            Some(first) => {
                let prompt = first.prompt.get(locale).to_string();
                transcript.push(TranscriptEntry::Prompt(prompt));
                SimState::AwaitingInput(0)
            }
            None => SimState::Completed,
        };
        Self {
            steps,
            locale,
            state,
            transcript,
            matcher: Box::new(ExactMatcher),
            step_delay: DEFAULT_STEP_DELAY,
        }
    }

    pub fn with_matcher(mut self, matcher: impl CommandMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SimState::Completed
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step currently shown to the learner
    pub fn current_step(&self) -> Option<&'a SimulationStep> {
        match self.state {
            SimState::AwaitingInput(i) => self.steps.get(i),
            SimState::Advancing(i) => self.steps.get(i.saturating_sub(1)),
            SimState::Completed => None,
        }
    }

    /// 1-based (current, total) for the "Step n/m" indicator
    pub fn step_label(&self) -> (usize, usize) {
        let total = self.steps.len();
        match self.state {
            SimState::AwaitingInput(i) => (i + 1, total),
            SimState::Advancing(i) => (i, total),
            SimState::Completed => (total, total),
        }
    }

    pub fn hint(&self) -> Option<&'a str> {
        let locale = self.locale;
        self.current_step().map(|s| s.hint.get(locale))
    }

    pub fn submit(&mut self, input: &str) -> Submission {
        let index = match self.state {
            SimState::AwaitingInput(i) => i,
            _ => return Submission::Ignored,
        };
        let command = input.trim();
        if command.is_empty() {
            return Submission::Empty;
        }
        let steps = self.steps;
        let step = &steps[index];

        let transcript = &mut self.transcript;
        transcript.push(TranscriptEntry::Command(command.to_string()));

        if !self.matcher.matches(step, command) {
            debug!(step = index, command, "command rejected");
            let command = command.to_string();
            transcript.push(TranscriptEntry::Error { command });
            transcript.push(TranscriptEntry::TryAgain);
            return Submission::Rejected;
        }

        let output = step.output.clone();
        transcript.push(TranscriptEntry::Output(output));
        transcript.push(TranscriptEntry::Success { xp: step.xp });

        let advance = if index + 1 < self.steps.len() {
            self.state = SimState::Advancing(index + 1);
            Advance::NextStep {
                after: self.step_delay,
            }
        } else {
            self.state = SimState::Completed;
            Advance::Finished
        };
        debug!(step = index, xp = step.xp, ?advance, "command accepted");

        Submission::Accepted {
            xp: step.xp,
            advance,
        }
    }

    /// Finish a paced transition; returns false if nothing was pending
    pub fn advance(&mut self) -> bool {
        let next = match self.state {
            SimState::Advancing(next) => next,
            _ => return false,
        };
        self.state = SimState::AwaitingInput(next);
        let prompt = self.steps[next].prompt.get(self.locale).to_string();
        self.transcript.push(TranscriptEntry::Prompt(prompt));
        true
    }
}
