// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session behavior against a scripted gateway.

mod common;

use std::sync::Arc;

use common::{project_artifact, single_file_artifact, ScriptedGateway};
use revu_core::chat::{ChatSession, SessionError};
use revu_domain_types::{ConversationScope, ModelChoice};

fn project_session() -> (Arc<ScriptedGateway>, ChatSession) {
    let gateway = Arc::new(ScriptedGateway::new());
    let artifact = Arc::new(project_artifact("p-1", &["main.py", "util.py"]));
    (gateway, ChatSession::new(artifact, ModelChoice::Gpt4o))
}

#[tokio::test]
async fn histories_of_different_scopes_never_mix() {
    let (gateway, session) = project_session();
    gateway.script_chat_answer("it orchestrates the pipeline");
    gateway.script_chat_answer("it parses one file");

    session
        .ask(&*gateway, "What is the architecture?", ConversationScope::EntireProject)
        .await
        .unwrap();
    session
        .ask(&*gateway, "What does this file do?", ConversationScope::SpecificFile(0))
        .await
        .unwrap();

    let project_history = session.history(ConversationScope::EntireProject);
    let file_history = session.history(ConversationScope::SpecificFile(0));
    assert_eq!(project_history.len(), 1);
    assert_eq!(file_history.len(), 1);
    assert_eq!(project_history[0].answer, "it orchestrates the pipeline");
    assert_eq!(file_history[0].answer, "it parses one file");
    assert!(session.history(ConversationScope::SpecificFile(1)).is_empty());

    // The file-scoped request carried its file index to the gateway.
    let calls = gateway.calls();
    assert!(calls[0].contains("file=None"), "{calls:?}");
    assert!(calls[1].contains("file=Some(0)"), "{calls:?}");
}

#[tokio::test]
async fn correlation_token_is_minted_once_per_scope() {
    let (gateway, session) = project_session();

    session
        .ask(&*gateway, "first", ConversationScope::EntireProject)
        .await
        .unwrap();
    session
        .ask(&*gateway, "second", ConversationScope::EntireProject)
        .await
        .unwrap();
    session
        .ask(&*gateway, "third", ConversationScope::SpecificFile(1))
        .await
        .unwrap();

    let calls = gateway.calls();
    // Same token across turns of one scope, a different one per scope.
    assert_eq!(calls[0], calls[1]);
    assert_ne!(calls[0], calls[2]);
    assert_eq!(session.history(ConversationScope::EntireProject).len(), 2);
}

#[tokio::test]
async fn failed_turn_appends_nothing_and_preserves_the_question() {
    let (gateway, session) = project_session();
    gateway.script_chat_error("Model temporarily unavailable");

    let scope = ConversationScope::EntireProject;
    let err = session.ask(&*gateway, "Why does this fail?", scope).await;
    assert!(matches!(err, Err(SessionError::Gateway(_))));
    assert!(session.history(scope).is_empty());
    assert_eq!(
        session.pending_question(scope).as_deref(),
        Some("Why does this fail?")
    );

    // A later retry completes the turn and clears the pending question.
    gateway.script_chat_answer("because of the off-by-one");
    let turn = session.ask(&*gateway, "Why does this fail?", scope).await.unwrap();
    assert_eq!(turn.answer, "because of the off-by-one");
    assert_eq!(session.history(scope).len(), 1);
    assert_eq!(session.pending_question(scope), None);
}

#[tokio::test]
async fn blank_questions_are_rejected_before_the_network() {
    let (gateway, session) = project_session();

    let err = session
        .ask(&*gateway, "   \n\t", ConversationScope::EntireProject)
        .await;
    assert!(matches!(err, Err(SessionError::EmptyQuestion)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn file_scope_must_exist_in_the_artifact() {
    let (gateway, session) = project_session();

    let err = session
        .ask(&*gateway, "hm?", ConversationScope::SpecificFile(7))
        .await;
    assert!(matches!(err, Err(SessionError::InvalidScope(_))));
    assert!(gateway.calls().is_empty());

    // A single-file artifact only answers for itself.
    let single = ChatSession::new(Arc::new(single_file_artifact()), ModelChoice::Gpt4o);
    let err = single
        .ask(&*gateway, "hm?", ConversationScope::SpecificFile(1))
        .await;
    assert!(matches!(err, Err(SessionError::InvalidScope(_))));
}

#[tokio::test]
async fn a_second_question_is_rejected_while_one_is_in_flight() {
    let (gateway, session) = project_session();
    let gate = gateway.gate_chat();
    let scope = ConversationScope::EntireProject;

    let mut first = Box::pin(session.ask(&*gateway, "slow one", scope));
    // Drive the first ask up to the blocked gateway call.
    assert!(futures::poll!(first.as_mut()).is_pending());

    let second = session.ask(&*gateway, "impatient", scope).await;
    assert!(matches!(second, Err(SessionError::QuestionPending(_))));

    // A different scope is unaffected by the in-flight question.
    gateway.script_chat_answer("other scope answer");
    // Release the gate for both the blocked call and the new one.
    gate.notify_one();
    gate.notify_one();
    let other = session
        .ask(&*gateway, "independent", ConversationScope::SpecificFile(0))
        .await;
    assert!(other.is_ok());

    first.await.unwrap();
    assert_eq!(session.history(scope).len(), 1);
}

#[tokio::test]
async fn dropping_an_in_flight_ask_frees_the_scope() {
    let (gateway, session) = project_session();
    let gate = gateway.gate_chat();
    let scope = ConversationScope::EntireProject;

    {
        let mut blocked = Box::pin(session.ask(&*gateway, "abandoned", scope));
        assert!(futures::poll!(blocked.as_mut()).is_pending());
    }

    // The dropped future released its in-flight marker.
    gate.notify_one();
    let retry = session.ask(&*gateway, "fresh start", scope).await;
    assert!(retry.is_ok());
}
