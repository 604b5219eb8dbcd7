//! Employee repository: listing, lookup, create and slice updates.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use hrms_core::employee::{
    BankInformation, BasicInformation, EmployeeInput, FamilyInformation, PersonalInformation,
};
use hrms_shared::types::PageResponse;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set,
};
use serde::Serialize;
use tracing::info;

use super::error::{RepositoryError, unique_violation};
use super::query::{ListParams, like};
use crate::entities::{
    departments, employee_beneficiaries, employee_children, employee_educations,
    employee_languages, employees, employments, funding_allocations, leave_balances,
};

/// Sort keys accepted by [`EmployeeRepository::list`].
pub const EMPLOYEE_SORTS: &[&str] = &[
    "staff_id",
    "first_name_en",
    "last_name_en",
    "date_of_birth",
    "organization",
    "status",
    "created_at",
    "department",
];

const DUPLICATE_STAFF_ID: &str = "The staff id has already been taken for this organization.";

/// Filter options for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Exact organization.
    pub organization: Option<String>,
    /// Exact status.
    pub status: Option<String>,
    /// Exact gender.
    pub gender: Option<String>,
    /// Substring of staff id or any name.
    pub search: Option<String>,
    /// Department of the employee's employment.
    pub department_id: Option<i32>,
}

/// An employee with everything they own.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetails {
    /// Employee row.
    #[serde(flatten)]
    pub employee: employees::Model,
    /// Employment record.
    pub employment: Option<employments::Model>,
    /// Languages.
    pub languages: Vec<employee_languages::Model>,
    /// Education history.
    pub educations: Vec<employee_educations::Model>,
    /// Children.
    pub children: Vec<employee_children::Model>,
    /// Beneficiaries.
    pub beneficiaries: Vec<employee_beneficiaries::Model>,
    /// Leave balances, latest year first.
    pub leave_balances: Vec<leave_balances::Model>,
    /// Funding allocations.
    pub funding_allocations: Vec<funding_allocations::Model>,
}

/// Head counts for the statistics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeStatistics {
    /// All employees.
    pub total: u64,
    /// Employments still running today.
    pub active_employments: u64,
    /// Count per status.
    pub by_status: BTreeMap<String, u64>,
    /// Count per organization.
    pub by_organization: BTreeMap<String, u64>,
    /// Count per gender.
    pub by_gender: BTreeMap<String, u64>,
}

fn sort_column(key: &str) -> employees::Column {
    match key {
        "staff_id" => employees::Column::StaffId,
        "first_name_en" => employees::Column::FirstNameEn,
        "last_name_en" => employees::Column::LastNameEn,
        "date_of_birth" => employees::Column::DateOfBirth,
        "organization" => employees::Column::Organization,
        "status" => employees::Column::Status,
        _ => employees::Column::CreatedAt,
    }
}

fn apply_basic(model: &mut employees::ActiveModel, basic: BasicInformation) {
    model.organization = Set(basic.organization.unwrap_or_default());
    model.staff_id = Set(basic.staff_id.unwrap_or_default());
    model.initial_en = Set(basic.initial_en);
    model.initial_th = Set(basic.initial_th);
    model.first_name_en = Set(basic.first_name_en.unwrap_or_default());
    model.last_name_en = Set(basic.last_name_en);
    model.first_name_th = Set(basic.first_name_th);
    model.last_name_th = Set(basic.last_name_th);
    model.gender = Set(basic.gender.unwrap_or_default());
    model.date_of_birth = Set(basic.date_of_birth.unwrap_or_default());
    model.status = Set(basic.status.unwrap_or_default());
}

fn apply_personal(model: &mut employees::ActiveModel, personal: PersonalInformation) {
    model.nationality = Set(personal.nationality);
    model.religion = Set(personal.religion);
    model.identification_type = Set(personal.identification_type);
    model.identification_number = Set(personal.identification_number);
    model.social_security_number = Set(personal.social_security_number);
    model.tax_number = Set(personal.tax_number);
    model.mobile_phone = Set(personal.mobile_phone);
    model.permanent_address = Set(personal.permanent_address);
    model.current_address = Set(personal.current_address);
    model.military_status = Set(personal.military_status);
    model.marital_status = Set(personal.marital_status);
    model.driver_license_number = Set(personal.driver_license_number);
    model.remark = Set(personal.remark);
}

fn apply_family(model: &mut employees::ActiveModel, family: FamilyInformation) {
    model.spouse_name = Set(family.spouse_name);
    model.spouse_phone_number = Set(family.spouse_phone_number);
    model.emergency_contact_person_name = Set(family.emergency_contact_person_name);
    model.emergency_contact_person_relationship =
        Set(family.emergency_contact_person_relationship);
    model.emergency_contact_person_phone = Set(family.emergency_contact_person_phone);
    model.father_name = Set(family.father_name);
    model.father_occupation = Set(family.father_occupation);
    model.father_phone_number = Set(family.father_phone_number);
    model.mother_name = Set(family.mother_name);
    model.mother_occupation = Set(family.mother_occupation);
    model.mother_phone_number = Set(family.mother_phone_number);
}

fn apply_bank(model: &mut employees::ActiveModel, bank: BankInformation) {
    model.bank_name = Set(bank.bank_name);
    model.bank_branch = Set(bank.bank_branch);
    model.bank_account_name = Set(bank.bank_account_name);
    model.bank_account_number = Set(bank.bank_account_number);
}

/// True when another employee already uses `staff_id` in `organization`.
pub(crate) async fn staff_id_taken<C: ConnectionTrait>(
    conn: &C,
    organization: &str,
    staff_id: &str,
    except_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = employees::Entity::find()
        .filter(employees::Column::Organization.eq(organization))
        .filter(employees::Column::StaffId.eq(staff_id));
    if let Some(id) = except_id {
        query = query.filter(employees::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

/// Inserts a validated employee payload.
pub(crate) async fn insert_employee<C: ConnectionTrait>(
    conn: &C,
    input: EmployeeInput,
    actor: Option<i32>,
) -> Result<employees::Model, DbErr> {
    let now = Utc::now();
    let mut model = employees::ActiveModel {
        created_by: Set(actor),
        updated_by: Set(actor),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_basic(&mut model, input.basic);
    apply_personal(&mut model, input.personal);
    apply_family(&mut model, input.family);
    apply_bank(&mut model, input.bank);
    model.insert(conn).await
}

/// Employee repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists employees with filters, sorting and pagination.
    ///
    /// Sorting by `department` and filtering by `department_id` go through
    /// the employee's employment record.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown sort keys, or a database error.
    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        params: &ListParams,
    ) -> Result<PageResponse<employees::Model>, RepositoryError> {
        let sort = params.sort_key(EMPLOYEE_SORTS, "created_at")?;

        let mut query = employees::Entity::find();
        if filter.department_id.is_some() || sort == "department" {
            query = query.join(JoinType::LeftJoin, employees::Relation::Employment.def());
        }
        if let Some(organization) = &filter.organization {
            query = query.filter(employees::Column::Organization.eq(organization.as_str()));
        }
        if let Some(status) = &filter.status {
            query = query.filter(employees::Column::Status.eq(status.as_str()));
        }
        if let Some(gender) = &filter.gender {
            query = query.filter(employees::Column::Gender.eq(gender.as_str()));
        }
        if let Some(department_id) = filter.department_id {
            query = query.filter(employments::Column::DepartmentId.eq(department_id));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like(search);
            query = query.filter(
                Condition::any()
                    .add(employees::Column::StaffId.like(pattern.as_str()))
                    .add(employees::Column::FirstNameEn.like(pattern.as_str()))
                    .add(employees::Column::LastNameEn.like(pattern.as_str()))
                    .add(employees::Column::FirstNameTh.like(pattern.as_str()))
                    .add(employees::Column::LastNameTh.like(pattern.as_str())),
            );
        }

        let total = query.clone().count(&self.db).await?;

        if sort == "department" {
            query = query
                .join(JoinType::LeftJoin, employments::Relation::Department.def())
                .order_by(departments::Column::Name, params.order());
        } else {
            query = query.order_by(sort_column(sort), params.order());
        }

        let data = query
            .order_by_asc(employees::Column::Id)
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, params.page, total))
    }

    /// Finds an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads an employee or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn get(&self, id: i32) -> Result<employees::Model, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound("Employee"))
    }

    /// Loads an employee with every owned record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn find_details(&self, id: i32) -> Result<EmployeeDetails, RepositoryError> {
        let employee = self.get(id).await?;

        let employment = employments::Entity::find()
            .filter(employments::Column::EmployeeId.eq(id))
            .one(&self.db)
            .await?;
        let languages = employee_languages::Entity::find()
            .filter(employee_languages::Column::EmployeeId.eq(id))
            .order_by_asc(employee_languages::Column::Id)
            .all(&self.db)
            .await?;
        let educations = employee_educations::Entity::find()
            .filter(employee_educations::Column::EmployeeId.eq(id))
            .order_by_desc(employee_educations::Column::StartDate)
            .all(&self.db)
            .await?;
        let children = employee_children::Entity::find()
            .filter(employee_children::Column::EmployeeId.eq(id))
            .order_by_asc(employee_children::Column::DateOfBirth)
            .all(&self.db)
            .await?;
        let beneficiaries = employee_beneficiaries::Entity::find()
            .filter(employee_beneficiaries::Column::EmployeeId.eq(id))
            .order_by_asc(employee_beneficiaries::Column::Id)
            .all(&self.db)
            .await?;
        let leave_balances = leave_balances::Entity::find()
            .filter(leave_balances::Column::EmployeeId.eq(id))
            .order_by_desc(leave_balances::Column::Year)
            .order_by_asc(leave_balances::Column::LeaveTypeId)
            .all(&self.db)
            .await?;
        let funding_allocations = funding_allocations::Entity::find()
            .filter(funding_allocations::Column::EmployeeId.eq(id))
            .order_by_desc(funding_allocations::Column::StartDate)
            .all(&self.db)
            .await?;

        Ok(EmployeeDetails {
            employee,
            employment,
            languages,
            educations,
            children,
            beneficiaries,
            leave_balances,
            funding_allocations,
        })
    }

    /// Finds employees by staff id, optionally within one organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_staff_id(
        &self,
        staff_id: &str,
        organization: Option<&str>,
    ) -> Result<Vec<employees::Model>, DbErr> {
        let mut query = employees::Entity::find().filter(employees::Column::StaffId.eq(staff_id));
        if let Some(organization) = organization {
            query = query.filter(employees::Column::Organization.eq(organization));
        }
        query
            .order_by_asc(employees::Column::Organization)
            .all(&self.db)
            .await
    }

    /// Creates an employee from a validated payload.
    ///
    /// # Errors
    ///
    /// Returns a `staff_id` validation error when the staff id is taken.
    pub async fn create(
        &self,
        input: EmployeeInput,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        let organization = input.basic.organization.clone().unwrap_or_default();
        let staff_id = input.staff_id().to_string();
        if staff_id_taken(&self.db, &organization, &staff_id, None).await? {
            return Err(RepositoryError::field("staff_id", DUPLICATE_STAFF_ID));
        }

        let employee = insert_employee(&self.db, input, actor)
            .await
            .map_err(|e| unique_violation(e, "staff_id", DUPLICATE_STAFF_ID))?;

        info!(employee_id = employee.id, staff_id = %employee.staff_id, "Employee created");
        Ok(employee)
    }

    /// Replaces every slice of an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `staff_id` validation error.
    pub async fn update(
        &self,
        id: i32,
        input: EmployeeInput,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        let existing = self.get(id).await?;
        self.check_staff_id(&input.basic, id).await?;

        let mut model: employees::ActiveModel = existing.into();
        apply_basic(&mut model, input.basic);
        apply_personal(&mut model, input.personal);
        apply_family(&mut model, input.family);
        apply_bank(&mut model, input.bank);
        self.save(model, actor).await
    }

    /// Replaces the basic information slice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `staff_id` validation error.
    pub async fn update_basic(
        &self,
        id: i32,
        basic: BasicInformation,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        let existing = self.get(id).await?;
        self.check_staff_id(&basic, id).await?;
        let mut model: employees::ActiveModel = existing.into();
        apply_basic(&mut model, basic);
        self.save(model, actor).await
    }

    /// Replaces the personal information slice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub async fn update_personal(
        &self,
        id: i32,
        personal: PersonalInformation,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        let mut model: employees::ActiveModel = self.get(id).await?.into();
        apply_personal(&mut model, personal);
        self.save(model, actor).await
    }

    /// Replaces the family information slice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub async fn update_family(
        &self,
        id: i32,
        family: FamilyInformation,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        let mut model: employees::ActiveModel = self.get(id).await?.into();
        apply_family(&mut model, family);
        self.save(model, actor).await
    }

    /// Replaces the bank information slice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub async fn update_bank(
        &self,
        id: i32,
        bank: BankInformation,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        let mut model: employees::ActiveModel = self.get(id).await?.into();
        apply_bank(&mut model, bank);
        self.save(model, actor).await
    }

    async fn check_staff_id(&self, basic: &BasicInformation, id: i32) -> Result<(), RepositoryError> {
        let organization = basic.organization.as_deref().unwrap_or_default();
        let staff_id = basic.staff_id.as_deref().unwrap_or_default();
        if staff_id_taken(&self.db, organization, staff_id, Some(id)).await? {
            return Err(RepositoryError::field("staff_id", DUPLICATE_STAFF_ID));
        }
        Ok(())
    }

    async fn save(
        &self,
        mut model: employees::ActiveModel,
        actor: Option<i32>,
    ) -> Result<employees::Model, RepositoryError> {
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let employee = model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, "staff_id", DUPLICATE_STAFF_ID))?;
        info!(employee_id = employee.id, "Employee updated");
        Ok(employee)
    }

    /// Employees for export, ordered by organization and staff id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_export(
        &self,
        organization: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<employees::Model>, DbErr> {
        let mut query = employees::Entity::find();
        if let Some(organization) = organization {
            query = query.filter(employees::Column::Organization.eq(organization));
        }
        if let Some(status) = status {
            query = query.filter(employees::Column::Status.eq(status));
        }
        query
            .order_by_asc(employees::Column::Organization)
            .order_by_asc(employees::Column::StaffId)
            .all(&self.db)
            .await
    }

    /// Aggregated head counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn statistics(&self, today: NaiveDate) -> Result<EmployeeStatistics, DbErr> {
        let total = employees::Entity::find().count(&self.db).await?;
        let active_employments = employments::Entity::find()
            .filter(
                Condition::any()
                    .add(employments::Column::EndDate.is_null())
                    .add(employments::Column::EndDate.gte(today)),
            )
            .count(&self.db)
            .await?;

        Ok(EmployeeStatistics {
            total,
            active_employments,
            by_status: self.group_counts(employees::Column::Status).await?,
            by_organization: self.group_counts(employees::Column::Organization).await?,
            by_gender: self.group_counts(employees::Column::Gender).await?,
        })
    }

    async fn group_counts(
        &self,
        column: employees::Column,
    ) -> Result<BTreeMap<String, u64>, DbErr> {
        let rows: Vec<(String, i64)> = employees::Entity::find()
            .select_only()
            .column(column)
            .column_as(Expr::col(employees::Column::Id).count(), "count")
            .group_by(column)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(key, count)| (key, u64::try_from(count).unwrap_or_default()))
            .collect())
    }
}
