//! Property-based tests for the turn state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::transcript::Sender;
use crate::transport::{TransportError, TransportErrorKind, TransportReply};
use proptest::prelude::*;

const FALLBACK: &str = "fallback";

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> TurnContext {
    TurnContext::new(FALLBACK)
}

fn appended(effects: &[Effect]) -> Vec<(Sender, String)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendMessage { sender, text } => Some((*sender, text.clone())),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_blank_input() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

fn arb_text_input() -> impl Strategy<Value = String> {
    ("[ \t]{0,3}", "[a-zA-Z0-9?!.,]{1,20}( [a-zA-Z0-9]{1,10}){0,3}", "[ \t\n]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

fn arb_state() -> impl Strategy<Value = TurnState> {
    prop_oneof![
        Just(TurnState::Idle),
        (1u64..1000).prop_map(|turn| TurnState::Pending { turn }),
    ]
}

fn arb_error() -> impl Strategy<Value = TransportError> {
    (
        prop_oneof![
            Just(TransportErrorKind::Network),
            Just(TransportErrorKind::Status),
            Just(TransportErrorKind::Malformed),
            Just(TransportErrorKind::Handler),
            Just(TransportErrorKind::Panicked),
        ],
        "[a-z ]{0,20}",
    )
        .prop_map(|(kind, message)| TransportError::new(kind, message))
}

fn arb_reply() -> impl Strategy<Value = TransportReply> {
    (
        "[a-zA-Z ]{0,20}",
        proptest::option::of("[a-z0-9]{0,8}"),
    )
        .prop_map(|(text, session_id)| TransportReply { text, session_id })
}

/// What the transport does for one turn in a simulated session
#[derive(Debug, Clone)]
enum Outcome {
    Reply(TransportReply),
    Fail(TransportError),
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        arb_reply().prop_map(Outcome::Reply),
        arb_error().prop_map(Outcome::Fail),
    ]
}

/// One step a user (or misbehaving caller) can take
#[derive(Debug, Clone)]
enum Step {
    /// Submit and let the transport settle
    Turn(String, Outcome),
    /// Submit while another turn is still pending
    Overlap(String, String, Outcome),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (prop_oneof![arb_text_input(), arb_blank_input()], arb_outcome())
            .prop_map(|(input, outcome)| Step::Turn(input, outcome)),
        (arb_text_input(), arb_text_input(), arb_outcome())
            .prop_map(|(first, second, outcome)| Step::Overlap(first, second, outcome)),
    ]
}

// ============================================================================
// Simulation
// ============================================================================

/// Minimal executor: applies transitions and records effects the way the
/// controller does, without any I/O
struct Sim {
    state: TurnState,
    turns: u64,
    transcript: Vec<(Sender, String)>,
    session: Option<String>,
}

impl Sim {
    fn new() -> Self {
        Self {
            state: TurnState::Idle,
            turns: 0,
            transcript: vec![(Sender::Bot, "welcome".to_string())],
            session: None,
        }
    }

    fn apply(&mut self, event: TurnEvent) -> Result<Option<u64>, TransitionError> {
        let result = transition(&self.state, &test_context(), event)?;
        self.state = result.new_state;
        let mut dispatched = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { sender, text } => self.transcript.push((sender, text)),
                Effect::RecordSession { session_id } => self.session = Some(session_id),
                Effect::Dispatch { turn, .. } => dispatched = Some(turn),
                Effect::NotifyPending { .. } => {}
            }
        }
        Ok(dispatched)
    }

    fn submit(&mut self, input: &str) -> Option<u64> {
        let turn = self.turns + 1;
        match self.apply(TurnEvent::submit(input, turn)) {
            Ok(dispatched) => {
                self.turns = turn;
                dispatched
            }
            Err(_) => None,
        }
    }

    fn settle(&mut self, turn: u64, outcome: Outcome) {
        let event = match outcome {
            Outcome::Reply(reply) => TurnEvent::TransportReplied { turn, reply },
            Outcome::Fail(error) => TurnEvent::TransportFailed { turn, error },
        };
        self.apply(event).expect("outcome for the pending turn must apply");
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_blank_input_never_transitions(state in arb_state(), input in arb_blank_input()) {
        let result = transition(&state, &test_context(), TurnEvent::submit(input, 1));
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyInput);
    }

    #[test]
    fn prop_pending_rejects_text(turn in 1u64..1000, input in arb_text_input()) {
        let state = TurnState::Pending { turn };
        let result = transition(&state, &test_context(), TurnEvent::submit(input, turn + 1));
        prop_assert_eq!(result.unwrap_err(), TransitionError::Busy);
    }

    #[test]
    fn prop_accepted_submit_appends_trimmed_user_text(
        input in arb_text_input(),
        turn in 1u64..1000,
    ) {
        let event = TurnEvent::submit(input.clone(), turn);
        let result = transition(&TurnState::Idle, &test_context(), event).unwrap();

        prop_assert_eq!(result.new_state, TurnState::Pending { turn });
        prop_assert_eq!(
            appended(&result.effects),
            vec![(Sender::User, input.trim().to_string())]
        );

        let dispatches = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Dispatch { .. }))
            .count();
        prop_assert_eq!(dispatches, 1);
        prop_assert_eq!(result.effects.first(), Some(&Effect::NotifyPending { pending: true }));
    }

    #[test]
    fn prop_outcome_always_returns_to_idle(turn in 1u64..1000, outcome in arb_outcome()) {
        let event = match outcome {
            Outcome::Reply(reply) => TurnEvent::TransportReplied { turn, reply },
            Outcome::Fail(error) => TurnEvent::TransportFailed { turn, error },
        };
        let result = transition(&TurnState::Pending { turn }, &test_context(), event).unwrap();

        prop_assert_eq!(result.new_state, TurnState::Idle);
        let bots = appended(&result.effects);
        prop_assert_eq!(bots.len(), 1);
        prop_assert_eq!(bots[0].0, Sender::Bot);
        prop_assert!(!bots[0].1.trim().is_empty());
        prop_assert_eq!(result.effects.last(), Some(&Effect::NotifyPending { pending: false }));
    }

    #[test]
    fn prop_failure_uses_fallback_and_keeps_session(turn in 1u64..1000, error in arb_error()) {
        let event = TurnEvent::TransportFailed { turn, error };
        let result = transition(&TurnState::Pending { turn }, &test_context(), event).unwrap();

        prop_assert_eq!(appended(&result.effects), vec![(Sender::Bot, FALLBACK.to_string())]);
        let records_session = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RecordSession { .. }));
        prop_assert!(!records_session, "failure must not record a session");
    }

    #[test]
    fn prop_transcript_pairs_user_and_bot(steps in proptest::collection::vec(arb_step(), 0..20)) {
        let mut sim = Sim::new();
        let mut accepted = 0usize;

        for step in steps {
            match step {
                Step::Turn(input, outcome) => {
                    if let Some(turn) = sim.submit(&input) {
                        accepted += 1;
                        sim.settle(turn, outcome);
                    }
                }
                Step::Overlap(first, second, outcome) => {
                    let turn = sim.submit(&first).expect("non-blank input while idle is accepted");
                    accepted += 1;
                    let before = sim.transcript.len();
                    let session = sim.session.clone();
                    prop_assert!(sim.submit(&second).is_none());
                    prop_assert_eq!(sim.transcript.len(), before);
                    prop_assert_eq!(&sim.session, &session);
                    sim.settle(turn, outcome);
                }
            }
            prop_assert_eq!(sim.state, TurnState::Idle);
        }

        // Welcome message plus exactly two entries per accepted turn
        prop_assert_eq!(sim.transcript.len(), 1 + 2 * accepted);
        for pair in sim.transcript[1..].chunks(2) {
            prop_assert_eq!(pair[0].0, Sender::User);
            prop_assert_eq!(pair[1].0, Sender::Bot);
        }
    }

    #[test]
    fn prop_session_follows_latest_non_empty_id(
        replies in proptest::collection::vec(arb_reply(), 1..10),
    ) {
        let mut sim = Sim::new();
        let mut expected: Option<String> = None;

        for reply in replies {
            let turn = sim.submit("hello").unwrap();
            if !reply.text.trim().is_empty() {
                if let Some(id) = reply.session_id.clone().filter(|id| !id.is_empty()) {
                    expected = Some(id);
                }
            }
            sim.settle(turn, Outcome::Reply(reply));
            prop_assert_eq!(&sim.session, &expected);
        }
    }
}
