//! Given steps for application lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use strr::application::{
    domain::{Application, ApplicationStatus, CallerContext, UserId},
    ports::ApplicationRepository,
};

#[given("an applicant with user id {user_id}")]
fn applicant_with_id(world: &mut LifecycleWorld, user_id: i64) {
    world.applicant = Some(CallerContext::new(UserId::new(user_id)));
}

#[given(r#"the applicant submitted an application for "{city}" on account "{account}""#)]
fn applicant_submitted(
    world: &mut LifecycleWorld,
    city: String,
    account: String,
) -> Result<(), eyre::Report> {
    let applicant = world
        .applicant
        .clone()
        .ok_or_else(|| eyre::eyre!("missing applicant in scenario world"))?;
    let payload = json!({
        "registration": {
            "primaryContact": {"name": {"firstName": "Ada", "lastName": "Lovelace"}},
            "unitAddress": {"city": city}
        }
    });
    let submitted = run_async(
        world
            .endpoints
            .submit_application(&applicant, Some(&account), payload),
    )
    .wrap_err("submit application in scenario setup")?;
    world.application = Some(submitted);
    Ok(())
}

#[given("the application is paid and under full review")]
fn paid_and_under_review(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let submitted = world.current_application()?.clone();
    let invoice_id = submitted
        .invoice_id()
        .ok_or_else(|| eyre::eyre!("submitted application has no invoice"))?;
    world
        .payments
        .set_invoice_status(invoice_id, "APPROVED", None)?;
    let paid = run_async(
        world
            .endpoints
            .reconcile_invoice(&world.examiner, invoice_id),
    )
    .wrap_err("reconcile payment in scenario setup")?;

    let mut data = paid.into_persisted();
    data.status = ApplicationStatus::FullReview;
    let in_review = run_async(world.repository.update(&Application::from_persisted(data)))
        .wrap_err("move application into full review")?;
    world.application = Some(in_review);
    Ok(())
}

#[given(r#"the examiner has set the status to "{status}""#)]
fn examiner_has_set_status(world: &mut LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let application_id = world.current_application()?.id();
    let updated = run_async(
        world
            .endpoints
            .update_status(&world.examiner, application_id, &status),
    )
    .wrap_err("apply examiner decision in scenario setup")?;
    world.application = Some(updated);
    Ok(())
}
