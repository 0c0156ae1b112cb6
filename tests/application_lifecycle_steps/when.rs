//! When steps for application lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::when;
use serde_json::json;
use strr::application::services::ApplicationQuery;

#[when(r#"the applicant submits an application for "{city}" on account "{account}""#)]
fn applicant_submits(
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
    let result = run_async(
        world
            .endpoints
            .submit_application(&applicant, Some(&account), payload),
    );
    world.record(result);
    Ok(())
}

#[when(r#"the pay service reports the invoice as "{status_code}""#)]
fn pay_service_reports(world: &mut LifecycleWorld, status_code: String) -> Result<(), eyre::Report> {
    let invoice_id = world
        .current_application()?
        .invoice_id()
        .ok_or_else(|| eyre::eyre!("application has no invoice"))?;
    world
        .payments
        .set_invoice_status(invoice_id, status_code, None)?;
    let result = run_async(
        world
            .endpoints
            .reconcile_invoice(&world.examiner, invoice_id),
    );
    world.record(result);
    Ok(())
}

#[when(r#"the examiner sets the status to "{status}""#)]
fn examiner_sets_status(world: &mut LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let application_id = world.current_application()?.id();
    let result = run_async(
        world
            .endpoints
            .update_status(&world.examiner, application_id, &status),
    );
    world.record(result);
    Ok(())
}

#[when(r#"the examiner searches for "{text}""#)]
fn examiner_searches(world: &mut LifecycleWorld, text: String) {
    let query = ApplicationQuery {
        search_text: Some(text),
        ..ApplicationQuery::default()
    };
    let result = run_async(world.endpoints.search_applications(&world.examiner, &query));
    if let Err(err) = result {
        world.last_error = Some(err);
    }
}
