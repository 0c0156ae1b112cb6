//! Listing, filtering, pagination and search through the boundary.

use super::helpers::{ACCOUNT, Harness, account_id, applicant, examiner, harness};
use eyre::ensure;
use rstest::rstest;
use strr::application::{
    domain::{ApplicationStatus, CallerRole},
    services::{ApplicationLifecycleError, ApplicationQuery, ErrorKind},
};

fn page(page: u32, limit: u32) -> ApplicationQuery {
    ApplicationQuery {
        page: Some(page),
        limit: Some(limit),
        ..ApplicationQuery::default()
    }
}

#[rstest]
#[case(15, 5)]
#[case(25, 10)]
#[tokio::test(flavor = "multi_thread")]
async fn second_page_holds_the_remainder(
    harness: Harness,
    #[case] submitted: usize,
    #[case] expected: usize,
) -> eyre::Result<()> {
    for _ in 0..submitted {
        harness.submit(&applicant(7), "Victoria").await?;
    }
    let account = account_id(ACCOUNT);

    let listed = harness
        .endpoints
        .list_applications(&applicant(7), Some(&account), &page(2, 10))
        .await?;

    ensure!(listed.items.len() == expected);
    ensure!(listed.total == u64::try_from(submitted)?);
    ensure!(listed.page == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_newest_first(harness: Harness) -> eyre::Result<()> {
    let first = harness.submit(&applicant(7), "Victoria").await?;
    let second = harness.submit(&applicant(7), "Nanaimo").await?;
    let account = account_id(ACCOUNT);

    let listed = harness
        .endpoints
        .list_applications(&applicant(7), Some(&account), &ApplicationQuery::default())
        .await?;

    let ids: Vec<_> = listed.items.iter().map(|application| application.id()).collect();
    ensure!(ids == vec![second.id(), first.id()]);
    ensure!(listed.limit == 50);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn applicants_only_see_their_own_account(harness: Harness) -> eyre::Result<()> {
    let own = harness.submit(&applicant(7), "Victoria").await?;
    harness.submit(&applicant(8), "Victoria").await?;
    harness
        .endpoints
        .submit_application(&applicant(7), Some("B2"), super::helpers::registration_payload("Sooke"))
        .await?;
    let account = account_id(ACCOUNT);

    let listed = harness
        .endpoints
        .list_applications(&applicant(7), Some(&account), &ApplicationQuery::default())
        .await?;
    let without_account = harness
        .endpoints
        .list_applications(&applicant(7), None, &ApplicationQuery::default())
        .await?;
    let everything = harness
        .endpoints
        .list_applications(&examiner(), None, &ApplicationQuery::default())
        .await?;

    ensure!(listed.items.iter().map(|application| application.id()).collect::<Vec<_>>() == vec![own.id()]);
    ensure!(without_account.total == 0);
    ensure!(everything.total == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_filter_is_case_insensitive(harness: Harness) -> eyre::Result<()> {
    let due = harness.submit(&applicant(7), "Victoria").await?;
    let paid = harness.submit(&applicant(7), "Victoria").await?;
    harness.pay(&paid).await?;
    let query = ApplicationQuery {
        status: Some("payment_due".to_owned()),
        ..ApplicationQuery::default()
    };

    let listed = harness
        .endpoints
        .list_applications(&examiner(), None, &query)
        .await?;

    ensure!(listed.total == 1);
    ensure!(listed.items.first().map(|application| application.id()) == Some(due.id()));
    ensure!(
        listed
            .items
            .iter()
            .all(|application| application.status() == ApplicationStatus::PaymentDue)
    );
    Ok(())
}

#[rstest]
#[case(ApplicationQuery { status: Some("ARCHIVED".to_owned()), ..ApplicationQuery::default() })]
#[case(page(0, 10))]
#[case(page(1, 101))]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_queries_are_validation_errors(harness: Harness, #[case] query: ApplicationQuery) {
    let result = harness
        .endpoints
        .list_applications(&examiner(), None, &query)
        .await;

    let err = result.expect_err("query must fail");
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_payload_text(harness: Harness) -> eyre::Result<()> {
    harness.submit(&applicant(7), "Victoria").await?;
    let nanaimo = harness.submit(&applicant(8), "Nanaimo").await?;
    let query = ApplicationQuery {
        search_text: Some("nanaimo".to_owned()),
        ..ApplicationQuery::default()
    };

    let found = harness.endpoints.search_applications(&examiner(), &query).await?;

    ensure!(found.total == 1);
    ensure!(found.items.first().map(|application| application.id()) == Some(nanaimo.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn short_search_text_is_rejected(harness: Harness) {
    let query = ApplicationQuery {
        search_text: Some("Vi".to_owned()),
        ..ApplicationQuery::default()
    };

    let result = harness.endpoints.search_applications(&examiner(), &query).await;

    let err = result.expect_err("search must fail");
    assert!(matches!(err, ApplicationLifecycleError::SearchTextTooShort { min: 3 }));
    assert_eq!(err.status_code(), 400);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_requires_staff_role(harness: Harness) -> eyre::Result<()> {
    harness.submit(&applicant(7), "Victoria").await?;
    let investigator = applicant(50).with_role(CallerRole::Investigator);

    let denied = harness
        .endpoints
        .search_applications(&applicant(7), &ApplicationQuery::default())
        .await;
    let allowed = harness
        .endpoints
        .search_applications(&investigator, &ApplicationQuery::default())
        .await?;

    ensure!(matches!(denied, Err(ApplicationLifecycleError::Forbidden(_))));
    ensure!(allowed.total == 1);
    Ok(())
}
