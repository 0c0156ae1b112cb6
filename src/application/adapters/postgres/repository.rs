//! `PostgreSQL` repository implementation for application storage.

use super::{
    models::{ApplicationChangeset, ApplicationRow, CountRow, NewApplicationRow},
    pool::{PgPool, run_blocking},
    schema::applications,
};
use crate::application::{
    domain::{
        AccountId, Application, ApplicationFilter, ApplicationId, ApplicationStatus,
        ApplicationType, InvoiceId, NewApplication, Page, PaymentStatus, PersistedApplicationData,
        RegistrationId, UserId,
    },
    ports::{ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};

/// Columns selected by the raw full-text search query, in table order.
const APPLICATION_COLUMNS: &str = concat!(
    "id, payload, application_type, status, submitted_at, decided_at, invoice_id, ",
    "payment_status_code, payment_completed_at, payment_account, submitter_id, ",
    "reviewer_id, registration_id, version"
);

/// Predicate shared by the search page and count queries. `$1` is the
/// optional status, `$2` the optional search text.
const SEARCH_PREDICATE: &str = concat!(
    "($1::varchar IS NULL OR status = $1) ",
    "AND ($2::text IS NULL OR search_vector @@ plainto_tsquery('english', $2))"
);

/// `PostgreSQL`-backed application repository.
#[derive(Debug, Clone)]
pub struct PostgresApplicationRepository {
    pool: PgPool,
}

impl PostgresApplicationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
    async fn create(&self, application: &NewApplication) -> ApplicationRepositoryResult<Application> {
        let new_row = to_new_row(application);
        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(applications::table)
                .values(&new_row)
                .returning(ApplicationRow::as_returning())
                .get_result::<ApplicationRow>(connection)
                .map_err(ApplicationRepositoryError::persistence)?;
            row_to_application(row)
        })
        .await
    }

    async fn update(&self, application: &Application) -> ApplicationRepositoryResult<Application> {
        let id = application.id();
        let expected_version = application.version();
        let changeset = to_changeset(application);

        run_blocking(&self.pool, move |connection| {
            let row = diesel::update(
                applications::table
                    .filter(applications::id.eq(id.value()))
                    .filter(applications::version.eq(expected_version)),
            )
            .set(&changeset)
            .returning(ApplicationRow::as_returning())
            .get_result::<ApplicationRow>(connection)
            .optional()
            .map_err(ApplicationRepositoryError::persistence)?;

            match row {
                Some(updated) => row_to_application(updated),
                None => Err(missing_row_error(connection, id, expected_version)?),
            }
        })
        .await
    }

    async fn find_by_id(&self, id: ApplicationId) -> ApplicationRepositoryResult<Option<Application>> {
        run_blocking(&self.pool, move |connection| {
            let row = applications::table
                .filter(applications::id.eq(id.value()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()
                .map_err(ApplicationRepositoryError::persistence)?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn find_by_invoice_id(
        &self,
        invoice_id: InvoiceId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        run_blocking(&self.pool, move |connection| {
            let row = applications::table
                .filter(applications::invoice_id.eq(invoice_id.value()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()
                .map_err(ApplicationRepositoryError::persistence)?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn find_by_registration_id(
        &self,
        registration_id: RegistrationId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        run_blocking(&self.pool, move |connection| {
            let row = applications::table
                .filter(applications::registration_id.eq(registration_id.value()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()
                .map_err(ApplicationRepositoryError::persistence)?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn find_for_user_and_account(
        &self,
        user_id: UserId,
        account_id: Option<&AccountId>,
        filter: &ApplicationFilter,
        is_examiner: bool,
    ) -> ApplicationRepositoryResult<Page<Application>> {
        let pagination = filter.pagination;
        let owner = match (is_examiner, account_id) {
            (true, _) => None,
            (false, Some(account)) => Some((user_id.value(), account.as_str().to_owned())),
            (false, None) => return Ok(Page::from_ordered(Vec::new(), pagination)),
        };
        let status = filter.status.map(|value| value.as_str().to_owned());
        let limit = i64::from(pagination.limit());
        let offset = i64::try_from(pagination.offset()).map_err(ApplicationRepositoryError::persistence)?;

        run_blocking(&self.pool, move |connection| {
            let total = filtered_applications(status.as_deref(), owner.as_ref())
                .count()
                .get_result::<i64>(connection)
                .map_err(ApplicationRepositoryError::persistence)?;
            let rows = filtered_applications(status.as_deref(), owner.as_ref())
                .order(applications::id.desc())
                .limit(limit)
                .offset(offset)
                .load::<ApplicationRow>(connection)
                .map_err(ApplicationRepositoryError::persistence)?;
            rows_to_page(rows, total, pagination)
        })
        .await
    }

    async fn search(&self, filter: &ApplicationFilter) -> ApplicationRepositoryResult<Page<Application>> {
        let pagination = filter.pagination;
        let status = filter.status.map(|value| value.as_str().to_owned());
        let search_text = filter.search_text.clone();
        let limit = i64::from(pagination.limit());
        let offset = i64::try_from(pagination.offset()).map_err(ApplicationRepositoryError::persistence)?;

        run_blocking(&self.pool, move |connection| {
            let total = diesel::sql_query(format!(
                "SELECT COUNT(*) AS total FROM applications WHERE {SEARCH_PREDICATE}"
            ))
            .bind::<Nullable<Text>, _>(status.as_deref())
            .bind::<Nullable<Text>, _>(search_text.as_deref())
            .get_result::<CountRow>(connection)
            .map_err(ApplicationRepositoryError::persistence)?
            .total;

            let rows = diesel::sql_query(format!(
                "SELECT {APPLICATION_COLUMNS} FROM applications WHERE {SEARCH_PREDICATE} \
                 ORDER BY id DESC LIMIT $3 OFFSET $4"
            ))
            .bind::<Nullable<Text>, _>(status.as_deref())
            .bind::<Nullable<Text>, _>(search_text.as_deref())
            .bind::<BigInt, _>(limit)
            .bind::<BigInt, _>(offset)
            .load::<ApplicationRow>(connection)
            .map_err(ApplicationRepositoryError::persistence)?;

            rows_to_page(rows, total, pagination)
        })
        .await
    }
}

/// Builds the listing query; `owner` restricts rows to a submitter and account.
fn filtered_applications<'a>(
    status: Option<&'a str>,
    owner: Option<&'a (i64, String)>,
) -> applications::BoxedQuery<'a, Pg> {
    let mut query = applications::table.into_boxed();
    if let Some(value) = status {
        query = query.filter(applications::status.eq(value));
    }
    if let Some((submitter_id, account)) = owner {
        query = query
            .filter(applications::submitter_id.eq(*submitter_id))
            .filter(applications::payment_account.eq(account.as_str()));
    }
    query
}

/// Classifies a conditional update that matched no row.
fn missing_row_error(
    connection: &mut PgConnection,
    id: ApplicationId,
    expected_version: i64,
) -> ApplicationRepositoryResult<ApplicationRepositoryError> {
    let exists = diesel::select(diesel::dsl::exists(
        applications::table.filter(applications::id.eq(id.value())),
    ))
    .get_result::<bool>(connection)
    .map_err(ApplicationRepositoryError::persistence)?;

    Ok(if exists {
        ApplicationRepositoryError::ConcurrentModification { id, expected_version }
    } else {
        ApplicationRepositoryError::NotFound(id)
    })
}

fn rows_to_page(
    rows: Vec<ApplicationRow>,
    total: i64,
    pagination: crate::application::domain::Pagination,
) -> ApplicationRepositoryResult<Page<Application>> {
    let items = rows
        .into_iter()
        .map(row_to_application)
        .collect::<ApplicationRepositoryResult<Vec<_>>>()?;
    Ok(Page {
        items,
        total: u64::try_from(total).map_err(ApplicationRepositoryError::persistence)?,
        page: pagination.page(),
        limit: pagination.limit(),
    })
}

fn to_new_row(application: &NewApplication) -> NewApplicationRow {
    NewApplicationRow {
        payload: application.payload.clone(),
        application_type: application.application_type.as_str().to_owned(),
        status: ApplicationStatus::Draft.as_str().to_owned(),
        submitted_at: application.submitted_at,
        payment_account: application.payment_account.as_str().to_owned(),
        submitter_id: application.submitter_id.value(),
        version: 0,
    }
}

fn to_changeset(application: &Application) -> ApplicationChangeset {
    ApplicationChangeset {
        status: application.status().as_str().to_owned(),
        decided_at: application.decided_at(),
        invoice_id: application.invoice_id().map(InvoiceId::value),
        payment_status_code: application.payment_status().map(|status| status.as_str().to_owned()),
        payment_completed_at: application.payment_completed_at(),
        payment_account: application.payment_account().as_str().to_owned(),
        reviewer_id: application.reviewer_id().map(UserId::value),
        registration_id: application.registration_id().map(RegistrationId::value),
        version: application.version() + 1,
    }
}

fn row_to_application(row: ApplicationRow) -> ApplicationRepositoryResult<Application> {
    let ApplicationRow {
        id,
        payload,
        application_type: persisted_type,
        status: persisted_status,
        submitted_at,
        decided_at,
        invoice_id,
        payment_status_code,
        payment_completed_at,
        payment_account: persisted_account,
        submitter_id,
        reviewer_id,
        registration_id,
        version,
    } = row;

    let application_type = ApplicationType::try_from(persisted_type.as_str())
        .map_err(ApplicationRepositoryError::persistence)?;
    let status = ApplicationStatus::try_from(persisted_status.as_str())
        .map_err(ApplicationRepositoryError::persistence)?;
    let payment_account =
        AccountId::new(persisted_account).map_err(ApplicationRepositoryError::persistence)?;

    Ok(Application::from_persisted(PersistedApplicationData {
        id: ApplicationId::new(id),
        application_type,
        payload,
        status,
        submitted_at,
        decided_at,
        invoice_id: invoice_id.map(InvoiceId::new),
        payment_status: payment_status_code.as_deref().map(PaymentStatus::from_code),
        payment_completed_at,
        payment_account,
        submitter_id: UserId::new(submitter_id),
        reviewer_id: reviewer_id.map(UserId::new),
        registration_id: registration_id.map(RegistrationId::new),
        version,
    }))
}
