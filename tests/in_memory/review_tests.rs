//! Examiner decisions through the boundary.

use super::helpers::{Harness, applicant, examiner, harness};
use chrono::Duration;
use eyre::{ensure, eyre};
use rstest::rstest;
use strr::application::{
    domain::{ApplicationId, ApplicationStatus, EventName, RegistrationStatus},
    ports::ApplicationRepository,
    services::{ApplicationLifecycleError, ErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn decline_records_decision_without_registration(harness: Harness) -> eyre::Result<()> {
    let in_review = harness.in_full_review(&applicant(7)).await?;
    let reviewer = examiner();

    let declined = harness
        .endpoints
        .update_status(&reviewer, in_review.id(), "DECLINED")
        .await?;

    ensure!(declined.status() == ApplicationStatus::Declined);
    ensure!(declined.decided_at().is_some());
    ensure!(declined.reviewer_id() == Some(reviewer.user_id()));
    ensure!(declined.registration_id().is_none());
    ensure!(harness.provisioner.registrations()?.is_empty());
    ensure!(harness.event_names(declined.id()).await?.last() == Some(&EventName::ManuallyDenied));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_provisions_an_owned_registration(harness: Harness) -> eyre::Result<()> {
    let in_review = harness.in_full_review(&applicant(7)).await?;

    let approved = harness
        .endpoints
        .update_status(&examiner(), in_review.id(), "full_review_approved")
        .await?;

    let registration_id = approved
        .registration_id()
        .ok_or_else(|| eyre!("registration id missing"))?;
    let registrations = harness.provisioner.registrations()?;
    let (registration, _) = registrations
        .iter()
        .find(|(candidate, _)| candidate.id == registration_id)
        .ok_or_else(|| eyre!("registration not provisioned"))?;
    ensure!(registration.submitter_id == approved.submitter_id());
    ensure!(&registration.payment_account == approved.payment_account());
    ensure!(registration.status == RegistrationStatus::Active);
    ensure!(registration.expiry_date - registration.start_date == Duration::days(365));
    ensure!(
        harness.repository.find_by_registration_id(registration_id).await?.map(|found| found.id())
            == Some(approved.id())
    );

    let events = harness.events.all()?;
    let tail: Vec<_> = events.iter().rev().take(2).collect();
    ensure!(tail.len() == 2);
    ensure!(tail.iter().any(|event| {
        event.event_name == EventName::RegistrationCreated
            && event.registration_id == Some(registration_id)
    }));
    ensure!(
        harness.event_names(approved.id()).await?.last() == Some(&EventName::ManuallyApproved)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn information_request_keeps_application_open(harness: Harness) -> eyre::Result<()> {
    let in_review = harness.in_full_review(&applicant(7)).await?;

    let updated = harness
        .endpoints
        .update_status(&examiner(), in_review.id(), "ADDITIONAL_INFO_REQUESTED")
        .await?;

    ensure!(updated.status() == ApplicationStatus::AdditionalInfoRequested);
    ensure!(updated.decided_at().is_none());
    ensure!(
        harness.event_names(updated.id()).await?.last()
            == Some(&EventName::MoreInformationRequested)
    );

    let declined = harness
        .endpoints
        .update_status(&examiner(), updated.id(), "DECLINED")
        .await?;
    ensure!(declined.status() == ApplicationStatus::Declined);
    Ok(())
}

#[rstest]
#[case("DECLINED")]
#[case("FULL_REVIEW_APPROVED")]
#[case("ADDITIONAL_INFO_REQUESTED")]
#[tokio::test(flavor = "multi_thread")]
async fn terminal_applications_reject_transitions(
    harness: Harness,
    #[case] target: &str,
) -> eyre::Result<()> {
    let in_review = harness.in_full_review(&applicant(7)).await?;
    let declined = harness
        .endpoints
        .update_status(&examiner(), in_review.id(), "DECLINED")
        .await?;
    let events_before = harness.events.all()?.len();

    let result = harness
        .endpoints
        .update_status(&examiner(), declined.id(), target)
        .await;

    let err = result.err().ok_or_else(|| eyre!("transition must fail"))?;
    ensure!(err.kind() == ErrorKind::InvalidState);
    ensure!(harness.stored(declined.id()).await? == declined);
    ensure!(harness.events.all()?.len() == events_before);
    ensure!(harness.provisioner.registrations()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn applicants_cannot_change_status(harness: Harness) -> eyre::Result<()> {
    let in_review = harness.in_full_review(&applicant(7)).await?;

    let result = harness
        .endpoints
        .update_status(&applicant(7), in_review.id(), "DECLINED")
        .await;

    let err = result.err().ok_or_else(|| eyre!("transition must fail"))?;
    ensure!(err.kind() == ErrorKind::Authorization);
    ensure!(err.status_code() == 403);
    ensure!(harness.stored(in_review.id()).await? == in_review);
    Ok(())
}

#[rstest]
#[case("ARCHIVED", ErrorKind::Validation)]
#[case("PAID", ErrorKind::InvalidState)]
#[case("FULL_REVIEW", ErrorKind::InvalidState)]
#[tokio::test(flavor = "multi_thread")]
async fn target_status_is_checked_before_lookup(
    harness: Harness,
    #[case] target: &str,
    #[case] expected: ErrorKind,
) {
    let result = harness
        .endpoints
        .update_status(&examiner(), ApplicationId::new(404), target)
        .await;

    let err = result.expect_err("transition must fail");
    assert_eq!(err.kind(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_application_is_not_found(harness: Harness) {
    let result = harness
        .endpoints
        .update_status(&examiner(), ApplicationId::new(404), "DECLINED")
        .await;

    let err = result.expect_err("transition must fail");
    assert!(matches!(err, ApplicationLifecycleError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisional_approval_has_no_decision_event(harness: Harness) -> eyre::Result<()> {
    let in_review = harness.in_full_review(&applicant(7)).await?;

    let result = harness
        .endpoints
        .update_status(&examiner(), in_review.id(), "PROVISIONALLY_APPROVED")
        .await;

    let err = result.err().ok_or_else(|| eyre!("transition must fail"))?;
    ensure!(err.kind() == ErrorKind::InvalidState);
    ensure!(harness.stored(in_review.id()).await?.status() == ApplicationStatus::FullReview);
    Ok(())
}
