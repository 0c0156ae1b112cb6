//! Ownership checks and role gating.

use super::helpers::{ACCOUNT, Harness, account_id, applicant, examiner, harness, system_actor};
use eyre::ensure;
use rstest::rstest;
use strr::application::{
    adapters::memory::InMemoryEventLog,
    domain::{ApplicationId, EventName, NewApplicationEvent},
    ports::EventLog,
    services::{ApplicationLifecycleError, ErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn privileged_callers_are_always_authorized(harness: Harness) -> eyre::Result<()> {
    let lifecycle = harness.endpoints.lifecycle();

    ensure!(lifecycle.authorize(&examiner(), None, ApplicationId::new(404)).await?);
    ensure!(lifecycle.authorize(&system_actor(), None, ApplicationId::new(404)).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ownership_needs_user_and_account(harness: Harness) -> eyre::Result<()> {
    let submitted = harness.submit(&applicant(7), "Victoria").await?;
    let lifecycle = harness.endpoints.lifecycle();
    let account = account_id(ACCOUNT);
    let other_account = account_id("B2");

    ensure!(lifecycle.authorize(&applicant(7), Some(&account), submitted.id()).await?);
    ensure!(!lifecycle.authorize(&applicant(8), Some(&account), submitted.id()).await?);
    ensure!(!lifecycle.authorize(&applicant(7), Some(&other_account), submitted.id()).await?);
    ensure!(!lifecycle.authorize(&applicant(7), None, submitted.id()).await?);
    ensure!(!lifecycle.authorize(&applicant(7), Some(&account), ApplicationId::new(404)).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_checks_existence_before_ownership(harness: Harness) -> eyre::Result<()> {
    let submitted = harness.submit(&applicant(7), "Victoria").await?;
    let account = account_id(ACCOUNT);

    let owned = harness
        .endpoints
        .get_application(&applicant(7), Some(&account), submitted.id())
        .await?;
    let foreign = harness
        .endpoints
        .get_application(&applicant(8), Some(&account), submitted.id())
        .await;
    let missing = harness
        .endpoints
        .get_application(&applicant(8), Some(&account), ApplicationId::new(404))
        .await;

    ensure!(owned == submitted);
    ensure!(matches!(foreign, Err(ApplicationLifecycleError::Unauthorized { .. })));
    ensure!(missing.map_err(|err| err.kind()).err() == Some(ErrorKind::NotFound));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn applicants_only_see_visible_events(harness: Harness) -> eyre::Result<()> {
    let submitted = harness.submit(&applicant(7), "Victoria").await?;
    let hidden = NewApplicationEvent::application(EventName::PaymentComplete, submitted.id())
        .hidden_from_applicant();
    EventLog::append(&*harness.events, &hidden).await?;
    let account = account_id(ACCOUNT);

    let applicant_view = harness
        .endpoints
        .list_events(&applicant(7), Some(&account), submitted.id())
        .await?;
    let examiner_view = harness
        .endpoints
        .list_events(&examiner(), None, submitted.id())
        .await?;
    let stranger_view = harness
        .endpoints
        .list_events(&applicant(8), Some(&account), submitted.id())
        .await;

    ensure!(applicant_view.len() == 1);
    ensure!(applicant_view.iter().all(|event| event.visible_to_applicant));
    ensure!(examiner_view.len() == 2);
    ensure!(matches!(stranger_view, Err(ApplicationLifecycleError::Unauthorized { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn event_log_lists_oldest_first() -> eyre::Result<()> {
    let log = InMemoryEventLog::new();
    let id = ApplicationId::new(3);
    log.append(&NewApplicationEvent::application(EventName::ApplicationSubmitted, id))
        .await?;
    log.append(&NewApplicationEvent::application(EventName::PaymentComplete, ApplicationId::new(4)))
        .await?;
    log.append(&NewApplicationEvent::application(EventName::PaymentComplete, id))
        .await?;

    let events = log.list_for_application(id, true).await?;

    let names: Vec<_> = events.iter().map(|event| event.event_name).collect();
    ensure!(names == vec![EventName::ApplicationSubmitted, EventName::PaymentComplete]);
    ensure!(events.windows(2).all(|pair| pair.first().map(|e| e.id) < pair.last().map(|e| e.id)));
    Ok(())
}
