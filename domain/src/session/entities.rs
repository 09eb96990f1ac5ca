//! Session aggregate: the canonical state of one comparison session
//!
//! Every state change is a synchronous method on [`Session`]. Network
//! operations are split in two: a `begin_*` method validates preconditions
//! and hands out a ticket, and the matching `finish_*` method records the
//! outcome. Nothing here performs I/O.

use super::assessment::AssessmentResult;
use super::busy::{BusyFlags, OperationKind};
use super::history::{ConversationEntry, ConversationHistory};
use super::intent::Intent;
use super::ticket::{AssessmentTicket, TurnTicket};
use super::turn::{AgentAnswer, Turn, TurnStatus};
use crate::agent::catalog::AgentCatalog;
use crate::agent::entities::{AgentPair, AgentSlot};
use crate::core::error::{DomainError, SessionError, ValidationError};
use crate::core::question::Question;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Inputs for a fresh comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonRequest {
    pub agent1_id: Option<String>,
    pub agent2_id: Option<String>,
    pub question: String,
    pub best_practices: Vec<String>,
}

impl ComparisonRequest {
    pub fn new(
        agent1_id: impl Into<String>,
        agent2_id: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            agent1_id: Some(agent1_id.into()),
            agent2_id: Some(agent2_id.into()),
            question: question.into(),
            best_practices: Vec::new(),
        }
    }

    pub fn with_practices<I, S>(mut self, practices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.best_practices = practices.into_iter().map(Into::into).collect();
        self
    }
}

/// One comparison session (Aggregate root)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    agent1_id: Option<String>,
    agent2_id: Option<String>,
    selected_practices: BTreeSet<String>,
    selected_criteria: BTreeSet<String>,
    question_draft: String,
    follow_up_drafts: BTreeMap<usize, String>,
    turns: Vec<Turn>,
    history: ConversationHistory,
    assessments: BTreeMap<usize, AssessmentResult>,
    error: Option<SessionError>,
    busy: BusyFlags,
    pair: Option<AgentPair>,
    catalog: AgentCatalog,
    /// Bumped by every fresh comparison; tickets from older generations are stale.
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Read Access ====================

    pub fn agent_id(&self, slot: AgentSlot) -> Option<&str> {
        match slot {
            AgentSlot::First => self.agent1_id.as_deref(),
            AgentSlot::Second => self.agent2_id.as_deref(),
        }
    }

    pub fn selected_practices(&self) -> &BTreeSet<String> {
        &self.selected_practices
    }

    pub fn selected_criteria(&self) -> &BTreeSet<String> {
        &self.selected_criteria
    }

    pub fn question_draft(&self) -> &str {
        &self.question_draft
    }

    pub fn follow_up_draft(&self, index: usize) -> Option<&str> {
        self.follow_up_drafts.get(&index).map(String::as_str)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// Index the next follow-up should use
    pub fn next_follow_up_index(&self) -> usize {
        match self.turns.last() {
            Some(last) if last.status().is_failure() => last.index(),
            _ => self.turns.len(),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn assessments(&self) -> &BTreeMap<usize, AssessmentResult> {
        &self.assessments
    }

    pub fn assessment(&self, index: usize) -> Option<&AssessmentResult> {
        self.assessments.get(&index)
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    /// The agents that answered turn 0
    pub fn pair(&self) -> Option<&AgentPair> {
        self.pair.as_ref()
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ==================== Intents ====================

    /// Apply a primitive intent from the rendering layer.
    ///
    /// Each intent touches exactly one field. Selecting the agent already
    /// chosen for the other slot is rejected and leaves the session unchanged.
    pub fn apply(&mut self, intent: Intent) -> Result<(), ValidationError> {
        match intent {
            Intent::SelectAgent { slot, agent_id } => {
                let agent_id = agent_id.filter(|id| !id.trim().is_empty());
                if let Some(id) = agent_id.as_deref()
                    && self.agent_id(slot.other()) == Some(id)
                {
                    return Err(ValidationError::DuplicateAgents);
                }
                match slot {
                    AgentSlot::First => self.agent1_id = agent_id,
                    AgentSlot::Second => self.agent2_id = agent_id,
                }
            }
            Intent::TogglePractice(practice) => toggle(&mut self.selected_practices, practice),
            Intent::ToggleCriterion(criterion) => toggle(&mut self.selected_criteria, criterion),
            Intent::EditQuestion(text) => self.question_draft = text,
            Intent::EditFollowUp { index, text } => {
                self.follow_up_drafts.insert(index, text);
            }
            Intent::Retry => self.error = None,
        }
        Ok(())
    }

    pub fn set_catalog(&mut self, catalog: AgentCatalog) {
        self.catalog = catalog;
    }

    pub fn record_error(&mut self, error: SessionError) {
        self.error = Some(error);
    }

    // ==================== Comparison / Follow-up ====================

    /// Admit a fresh comparison.
    ///
    /// On success the session is reset to a single `Pending` turn 0 and the
    /// `comparing` flag is raised. On failure only the error field changes.
    pub fn begin_comparison(
        &mut self,
        request: ComparisonRequest,
    ) -> Result<TurnTicket, ValidationError> {
        let (agent1_id, agent2_id, question) = match self.admit_comparison(&request) {
            Ok(admitted) => admitted,
            Err(e) => return Err(self.reject(e)),
        };

        self.generation += 1;
        self.busy.set(OperationKind::Compare, true);
        self.error = None;
        self.turns.clear();
        self.history.clear();
        self.assessments.clear();
        self.follow_up_drafts.clear();
        self.turns.push(Turn::pending(0, question.content()));
        self.pair = Some(AgentPair::new(agent1_id.clone(), agent2_id.clone()));

        Ok(TurnTicket {
            generation: self.generation,
            index: 0,
            agent1_id,
            agent2_id,
            question,
            best_practices: request.best_practices,
            conversation_history: Vec::new(),
        })
    }

    /// Admit a comparison built from the current selections and question draft.
    pub fn begin_comparison_from_drafts(&mut self) -> Result<TurnTicket, ValidationError> {
        let request = ComparisonRequest {
            agent1_id: self.agent1_id.clone(),
            agent2_id: self.agent2_id.clone(),
            question: self.question_draft.clone(),
            best_practices: self.selected_practices.iter().cloned().collect(),
        };
        self.begin_comparison(request)
    }

    fn admit_comparison(
        &self,
        request: &ComparisonRequest,
    ) -> Result<(String, String, Question), ValidationError> {
        if self.busy.comparing {
            return Err(ValidationError::Busy(OperationKind::Compare));
        }

        let agent1 = non_blank(request.agent1_id.as_deref());
        let agent2 = non_blank(request.agent2_id.as_deref());
        let question = Question::try_new(&request.question);
        let (Some(agent1), Some(agent2), Some(question)) = (agent1, agent2, question) else {
            return Err(ValidationError::MissingInput);
        };

        if agent1 == agent2 {
            return Err(ValidationError::DuplicateAgents);
        }
        self.catalog.check_selectable(agent1)?;
        self.catalog.check_selectable(agent2)?;

        Ok((agent1.to_string(), agent2.to_string(), question))
    }

    /// Admit a follow-up question at `index`.
    ///
    /// `index` must be the next unanswered turn: turn `index - 1` is
    /// completed and turn `index` is either absent or a failed attempt,
    /// which is replaced by a new `Pending` turn.
    pub fn begin_follow_up(
        &mut self,
        index: usize,
        question: &str,
    ) -> Result<TurnTicket, ValidationError> {
        let (question, pair) = match self.admit_follow_up(index, question) {
            Ok(admitted) => admitted,
            Err(e) => return Err(self.reject(e)),
        };

        self.busy.set(OperationKind::FollowUp, true);
        self.error = None;
        let turn = Turn::pending(index, question.content());
        if index < self.turns.len() {
            self.turns[index] = turn;
        } else {
            self.turns.push(turn);
        }

        Ok(TurnTicket {
            generation: self.generation,
            index,
            agent1_id: pair.agent1_id,
            agent2_id: pair.agent2_id,
            question,
            best_practices: self.selected_practices.iter().cloned().collect(),
            conversation_history: self.history.entries().to_vec(),
        })
    }

    /// Admit the follow-up drafted for `index`.
    pub fn begin_follow_up_from_draft(
        &mut self,
        index: usize,
    ) -> Result<TurnTicket, ValidationError> {
        let draft = self.follow_up_drafts.get(&index).cloned().unwrap_or_default();
        self.begin_follow_up(index, &draft)
    }

    fn admit_follow_up(
        &self,
        index: usize,
        question: &str,
    ) -> Result<(Question, AgentPair), ValidationError> {
        if self.busy.following_up {
            return Err(ValidationError::Busy(OperationKind::FollowUp));
        }
        let question = Question::try_new(question).ok_or(ValidationError::BlankFollowUp)?;
        if index == 0 {
            return Err(ValidationError::InitialTurn);
        }
        let pair = match (&self.pair, self.turns.is_empty()) {
            (Some(pair), false) => pair.clone(),
            _ => return Err(ValidationError::NoComparison),
        };

        let next = self.turns.len();
        if index > next {
            return Err(ValidationError::IndexGap { index, next });
        }
        if !self.turns[index - 1].is_completed() {
            return Err(ValidationError::OutOfOrder {
                index,
                previous: index - 1,
            });
        }
        if let Some(existing) = self.turns.get(index) {
            match existing.status() {
                TurnStatus::Completed => return Err(ValidationError::AlreadyAnswered(index)),
                TurnStatus::Pending => {
                    return Err(ValidationError::Busy(OperationKind::FollowUp));
                }
                TurnStatus::Failed | TurnStatus::TimedOut => {}
            }
        }

        Ok((question, pair))
    }

    /// Record the outcome of a comparison or follow-up.
    ///
    /// The busy flag of the ticket's class is always lowered. A ticket from
    /// an earlier generation changes nothing else.
    pub fn finish_turn(
        &mut self,
        ticket: &TurnTicket,
        outcome: Result<(AgentAnswer, AgentAnswer), SessionError>,
    ) -> Result<TurnStatus, DomainError> {
        let kind = ticket.kind();
        self.busy.set(kind, false);
        self.ensure_current(ticket.generation)?;

        let turn = self
            .turns
            .get_mut(ticket.index)
            .ok_or(ValidationError::TurnNotFound(ticket.index))?;

        let status = match outcome {
            Ok((agent1, agent2)) => {
                turn.complete(agent1.response.clone(), agent2.response.clone())?;
                self.history.append(ConversationEntry::new(
                    ticket.question.content(),
                    agent1.response,
                    agent2.response,
                ));
                self.error = None;
                if kind == OperationKind::Compare {
                    if let Some(pair) = self.pair.as_mut() {
                        pair.agent1_name = agent1.name;
                        pair.agent2_name = agent2.name;
                    }
                    self.assessments.clear();
                    self.selected_criteria.clear();
                }
                TurnStatus::Completed
            }
            Err(error) => {
                let status = if error.is_timeout() {
                    turn.time_out(error.message.clone())?;
                    TurnStatus::TimedOut
                } else {
                    turn.fail(error.message.clone())?;
                    TurnStatus::Failed
                };
                self.error = Some(error);
                status
            }
        };

        debug_assert!(self.check_invariants());
        Ok(status)
    }

    // ==================== Assessment ====================

    /// Admit an assessment of a completed turn.
    pub fn begin_assessment<I, S>(
        &mut self,
        turn_index: usize,
        criteria: I,
    ) -> Result<AssessmentTicket, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let criteria: Vec<String> = criteria
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        match self.admit_assessment(turn_index, criteria) {
            Ok(ticket) => {
                self.busy.set(OperationKind::Assess, true);
                self.error = None;
                Ok(ticket)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Admit an assessment using the currently selected criteria.
    pub fn begin_assessment_from_selection(
        &mut self,
        turn_index: usize,
    ) -> Result<AssessmentTicket, ValidationError> {
        let criteria: Vec<String> = self.selected_criteria.iter().cloned().collect();
        self.begin_assessment(turn_index, criteria)
    }

    fn admit_assessment(
        &self,
        turn_index: usize,
        criteria: Vec<String>,
    ) -> Result<AssessmentTicket, ValidationError> {
        if self.busy.assessing {
            return Err(ValidationError::Busy(OperationKind::Assess));
        }
        if criteria.is_empty() {
            return Err(ValidationError::EmptyCriteria);
        }
        let turn = self
            .turns
            .get(turn_index)
            .ok_or(ValidationError::TurnNotFound(turn_index))?;
        let (agent1_response, agent2_response) = turn
            .responses()
            .ok_or(ValidationError::TurnNotCompleted(turn_index))?;
        let pair = self.pair.as_ref().ok_or(ValidationError::NoComparison)?;

        Ok(AssessmentTicket {
            generation: self.generation,
            turn_index,
            agent1_id: pair.agent1_id.clone(),
            agent2_id: pair.agent2_id.clone(),
            question: turn.question().to_string(),
            agent1_response: agent1_response.to_string(),
            agent2_response: agent2_response.to_string(),
            criteria,
        })
    }

    /// Record the outcome of an assessment. Last write wins per turn.
    pub fn finish_assessment(
        &mut self,
        ticket: &AssessmentTicket,
        outcome: Result<AssessmentResult, SessionError>,
    ) -> Result<(), DomainError> {
        self.busy.set(OperationKind::Assess, false);
        self.ensure_current(ticket.generation)?;

        match outcome {
            Ok(result) => {
                let completed = self
                    .turns
                    .get(ticket.turn_index)
                    .is_some_and(Turn::is_completed);
                if !completed {
                    return Err(ValidationError::TurnNotCompleted(ticket.turn_index).into());
                }
                self.assessments.insert(ticket.turn_index, result);
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }

        debug_assert!(self.check_invariants());
        Ok(())
    }

    // ==================== Invariants ====================

    /// Check the structural invariants of the session.
    pub fn check_invariants(&self) -> bool {
        let distinct_agents = match (&self.agent1_id, &self.agent2_id) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        };

        let contiguous = self.turns.iter().enumerate().all(|(i, t)| t.index() == i);

        let completed: Vec<&Turn> = self.turns.iter().filter(|t| t.is_completed()).collect();
        let history_tracks_turns = completed.len() == self.history.len()
            && completed
                .iter()
                .zip(self.history.entries())
                .all(|(turn, entry)| turn.question() == entry.question);

        let assessments_on_completed = self
            .assessments
            .keys()
            .all(|i| self.turns.get(*i).is_some_and(Turn::is_completed));

        distinct_agents && contiguous && history_tracks_turns && assessments_on_completed
    }

    fn ensure_current(&self, generation: u64) -> Result<(), DomainError> {
        if generation != self.generation {
            return Err(DomainError::StaleTicket {
                ticket: generation,
                current: self.generation,
            });
        }
        Ok(())
    }

    fn reject(&mut self, error: ValidationError) -> ValidationError {
        self.error = Some(SessionError::from(&error));
        error
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn toggle(set: &mut BTreeSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
