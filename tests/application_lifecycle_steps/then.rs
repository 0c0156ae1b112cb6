//! Then steps for application lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use strr::application::{
    domain::{ApplicationStatus, EventName, PaymentStatus},
    ports::{ApplicationRepository, EventLog},
    services::ErrorKind,
};
use rstest_bdd_macros::then;

#[then(r#"the application status is "{status}""#)]
fn application_status_is(world: &LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ApplicationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let application_id = world.current_application()?.id();
    let stored = run_async(world.repository.find_by_id(application_id))?
        .ok_or_else(|| eyre::eyre!("application {application_id} not stored"))?;

    if stored.status() != expected {
        return Err(eyre::eyre!("expected status {expected}, found {}", stored.status()));
    }
    Ok(())
}

#[then(r#"the payment status is "{code}""#)]
fn payment_status_is(world: &LifecycleWorld, code: String) -> Result<(), eyre::Report> {
    let application = world.current_application()?;
    let expected = PaymentStatus::from_code(&code);

    if application.payment_status() != Some(&expected) {
        return Err(eyre::eyre!(
            "expected payment status {expected}, found {:?}",
            application.payment_status()
        ));
    }
    Ok(())
}

#[then(r#"the event log records "{event_name}""#)]
fn event_log_records(world: &LifecycleWorld, event_name: String) -> Result<(), eyre::Report> {
    let expected = EventName::try_from(event_name.as_str())
        .map_err(|err| eyre::eyre!("invalid expected event in scenario: {err}"))?;
    let application_id = world.current_application()?.id();
    let events = run_async(world.events.list_for_application(application_id, false))?;

    if !events.iter().any(|event| event.event_name == expected) {
        return Err(eyre::eyre!("event {expected} not logged for application {application_id}"));
    }
    Ok(())
}

#[then("the decision is stamped with the examiner")]
fn decision_stamped(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let application = world.current_application()?;

    eyre::ensure!(application.decided_at().is_some(), "decision time not set");
    eyre::ensure!(
        application.reviewer_id() == Some(world.examiner.user_id()),
        "reviewer mismatch: {:?}",
        application.reviewer_id()
    );
    Ok(())
}

#[then("no registration was created")]
fn no_registration(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.current_application()?.registration_id().is_none());
    eyre::ensure!(world.provisioner.registrations()?.is_empty());
    Ok(())
}

#[then("a registration owned by the applicant is linked to the application")]
fn registration_linked(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let application = world.current_application()?;
    let registration_id = application
        .registration_id()
        .ok_or_else(|| eyre::eyre!("application has no registration"))?;
    let registrations = world.provisioner.registrations()?;
    let (registration, _) = registrations
        .iter()
        .find(|(candidate, _)| candidate.id == registration_id)
        .ok_or_else(|| eyre::eyre!("registration {registration_id} not provisioned"))?;

    eyre::ensure!(registration.submitter_id == application.submitter_id());
    Ok(())
}

#[then(r#"the request fails with a "{kind}" error"#)]
fn request_fails_with(world: &LifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected a failed request"))?;
    let actual = err.kind();

    if format!("{actual:?}") != kind {
        return Err(eyre::eyre!("expected {kind} error, got {actual:?} ({err})"));
    }
    eyre::ensure!(actual != ErrorKind::Internal);
    Ok(())
}
