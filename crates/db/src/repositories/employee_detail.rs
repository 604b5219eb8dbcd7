//! Records owned by an employee: employment, repeating details and funding.

use chrono::Utc;
use hrms_core::employee::{
    BeneficiaryInput, ChildInput, EducationInput, EmploymentInput, FundingAllocationInput,
    FundingStatus, LanguageInput, check_total_effort,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TryIntoModel,
};
use tracing::info;

use super::error::RepositoryError;
use crate::entities::{
    departments, employee_beneficiaries, employee_children, employee_educations,
    employee_languages, employees, employments, funding_allocations, positions,
};

/// The repeating detail collections under an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    /// `employee_languages`
    Languages,
    /// `employee_educations`
    Educations,
    /// `employee_children`
    Children,
    /// `employee_beneficiaries`
    Beneficiaries,
}

impl DetailKind {
    /// Parses the URL segment.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "languages" => Some(Self::Languages),
            "educations" => Some(Self::Educations),
            "children" => Some(Self::Children),
            "beneficiaries" => Some(Self::Beneficiaries),
            _ => None,
        }
    }

    /// Singular label for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Languages => "Language",
            Self::Educations => "Education",
            Self::Children => "Child",
            Self::Beneficiaries => "Beneficiary",
        }
    }
}

/// Repository for employee-owned records.
#[derive(Debug, Clone)]
pub struct EmployeeDetailRepository {
    db: DatabaseConnection,
}

impl EmployeeDetailRepository {
    /// Creates a new employee detail repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_employee(&self, employee_id: i32) -> Result<employees::Model, RepositoryError> {
        employees::Entity::find_by_id(employee_id)
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound("Employee"))
    }

    /// The employee's employment record, if any.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn employment(
        &self,
        employee_id: i32,
    ) -> Result<Option<employments::Model>, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        Ok(employments::Entity::find()
            .filter(employments::Column::EmployeeId.eq(employee_id))
            .one(&self.db)
            .await?)
    }

    /// Creates or replaces the employment record.
    ///
    /// The position must belong to the chosen department.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing employee, or validation errors for
    /// unknown or mismatched department and position.
    pub async fn upsert_employment(
        &self,
        employee_id: i32,
        input: EmploymentInput,
        actor: Option<i32>,
    ) -> Result<employments::Model, RepositoryError> {
        self.ensure_employee(employee_id).await?;

        let department_id = input.department_id.unwrap_or_default();
        let position_id = input.position_id.unwrap_or_default();
        if departments::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::field(
                "department_id",
                "The selected department id is invalid.",
            ));
        }
        let Some(position) = positions::Entity::find_by_id(position_id).one(&self.db).await? else {
            return Err(RepositoryError::field(
                "position_id",
                "The selected position id is invalid.",
            ));
        };
        if position.department_id != department_id {
            return Err(RepositoryError::field(
                "position_id",
                "The position must belong to the selected department.",
            ));
        }

        let now = Utc::now();
        let existing = employments::Entity::find()
            .filter(employments::Column::EmployeeId.eq(employee_id))
            .one(&self.db)
            .await?;
        let mut model = match existing {
            Some(current) => current.into(),
            None => employments::ActiveModel {
                employee_id: Set(employee_id),
                created_by: Set(actor),
                created_at: Set(now),
                ..Default::default()
            },
        };
        model.department_id = Set(Some(department_id));
        model.position_id = Set(Some(position_id));
        model.employment_type = Set(input.employment_type.unwrap_or_default());
        model.start_date = Set(input.start_date.unwrap_or_default());
        model.end_date = Set(input.end_date);
        model.probation_pass_date = Set(input.probation_pass_date);
        model.pay_method = Set(input.pay_method);
        model.salary = Set(input.salary);
        model.updated_by = Set(actor);
        model.updated_at = Set(now);

        let employment = model.save(&self.db).await?.try_into_model()?;
        info!(employee_id, employment_id = employment.id, "Employment saved");
        Ok(employment)
    }

    /// Languages of an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn languages(
        &self,
        employee_id: i32,
    ) -> Result<Vec<employee_languages::Model>, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        Ok(employee_languages::Entity::find()
            .filter(employee_languages::Column::EmployeeId.eq(employee_id))
            .order_by_asc(employee_languages::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Adds a language.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn add_language(
        &self,
        employee_id: i32,
        input: LanguageInput,
    ) -> Result<employee_languages::Model, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        let now = Utc::now();
        Ok(employee_languages::ActiveModel {
            employee_id: Set(employee_id),
            language: Set(input.language.unwrap_or_default()),
            proficiency: Set(input.proficiency),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Education history of an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn educations(
        &self,
        employee_id: i32,
    ) -> Result<Vec<employee_educations::Model>, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        Ok(employee_educations::Entity::find()
            .filter(employee_educations::Column::EmployeeId.eq(employee_id))
            .order_by_desc(employee_educations::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Adds an education entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn add_education(
        &self,
        employee_id: i32,
        input: EducationInput,
    ) -> Result<employee_educations::Model, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        let now = Utc::now();
        Ok(employee_educations::ActiveModel {
            employee_id: Set(employee_id),
            school_name: Set(input.school_name.unwrap_or_default()),
            degree: Set(input.degree.unwrap_or_default()),
            start_date: Set(input.start_date.unwrap_or_default()),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Children of an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn children(
        &self,
        employee_id: i32,
    ) -> Result<Vec<employee_children::Model>, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        Ok(employee_children::Entity::find()
            .filter(employee_children::Column::EmployeeId.eq(employee_id))
            .order_by_asc(employee_children::Column::DateOfBirth)
            .all(&self.db)
            .await?)
    }

    /// Adds a child.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn add_child(
        &self,
        employee_id: i32,
        input: ChildInput,
    ) -> Result<employee_children::Model, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        let now = Utc::now();
        Ok(employee_children::ActiveModel {
            employee_id: Set(employee_id),
            name: Set(input.name.unwrap_or_default()),
            date_of_birth: Set(input.date_of_birth.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Beneficiaries of an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn beneficiaries(
        &self,
        employee_id: i32,
    ) -> Result<Vec<employee_beneficiaries::Model>, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        Ok(employee_beneficiaries::Entity::find()
            .filter(employee_beneficiaries::Column::EmployeeId.eq(employee_id))
            .order_by_asc(employee_beneficiaries::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Adds a beneficiary.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn add_beneficiary(
        &self,
        employee_id: i32,
        input: BeneficiaryInput,
    ) -> Result<employee_beneficiaries::Model, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        let now = Utc::now();
        Ok(employee_beneficiaries::ActiveModel {
            employee_id: Set(employee_id),
            name: Set(input.name.unwrap_or_default()),
            relationship: Set(input.relationship.unwrap_or_default()),
            phone_number: Set(input.phone_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Deletes one detail row belonging to the employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the row does not exist under that employee.
    pub async fn delete_detail(
        &self,
        kind: DetailKind,
        employee_id: i32,
        detail_id: i32,
    ) -> Result<(), RepositoryError> {
        let result = match kind {
            DetailKind::Languages => {
                employee_languages::Entity::delete_many()
                    .filter(employee_languages::Column::Id.eq(detail_id))
                    .filter(employee_languages::Column::EmployeeId.eq(employee_id))
                    .exec(&self.db)
                    .await?
            }
            DetailKind::Educations => {
                employee_educations::Entity::delete_many()
                    .filter(employee_educations::Column::Id.eq(detail_id))
                    .filter(employee_educations::Column::EmployeeId.eq(employee_id))
                    .exec(&self.db)
                    .await?
            }
            DetailKind::Children => {
                employee_children::Entity::delete_many()
                    .filter(employee_children::Column::Id.eq(detail_id))
                    .filter(employee_children::Column::EmployeeId.eq(employee_id))
                    .exec(&self.db)
                    .await?
            }
            DetailKind::Beneficiaries => {
                employee_beneficiaries::Entity::delete_many()
                    .filter(employee_beneficiaries::Column::Id.eq(detail_id))
                    .filter(employee_beneficiaries::Column::EmployeeId.eq(employee_id))
                    .exec(&self.db)
                    .await?
            }
        };
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(kind.label()));
        }
        info!(employee_id, detail_id, kind = kind.label(), "Employee detail deleted");
        Ok(())
    }

    /// Funding allocations of an employee, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the employee does not exist.
    pub async fn funding_allocations(
        &self,
        employee_id: i32,
    ) -> Result<Vec<funding_allocations::Model>, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        Ok(funding_allocations::Entity::find()
            .filter(funding_allocations::Column::EmployeeId.eq(employee_id))
            .order_by_desc(funding_allocations::Column::StartDate)
            .order_by_desc(funding_allocations::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Finds a funding allocation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_funding_allocation(
        &self,
        id: i32,
    ) -> Result<Option<funding_allocations::Model>, DbErr> {
        funding_allocations::Entity::find_by_id(id).one(&self.db).await
    }

    async fn other_active_efforts(
        &self,
        employee_id: i32,
        except_id: Option<i32>,
    ) -> Result<Vec<Decimal>, DbErr> {
        let mut query = funding_allocations::Entity::find()
            .filter(funding_allocations::Column::EmployeeId.eq(employee_id))
            .filter(funding_allocations::Column::Status.eq(FundingStatus::Active.as_str()));
        if let Some(id) = except_id {
            query = query.filter(funding_allocations::Column::Id.ne(id));
        }
        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|allocation| allocation.level_of_effort)
            .collect())
    }

    /// Adds a funding allocation, keeping active effort at or below 100%.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing employee or a `level_of_effort`
    /// validation error.
    pub async fn create_funding_allocation(
        &self,
        employee_id: i32,
        input: FundingAllocationInput,
        actor: Option<i32>,
    ) -> Result<funding_allocations::Model, RepositoryError> {
        self.ensure_employee(employee_id).await?;
        let status = input.status.unwrap_or(FundingStatus::Active);
        let effort = input.level_of_effort.unwrap_or_default();
        if status == FundingStatus::Active {
            check_total_effort(&self.other_active_efforts(employee_id, None).await?, effort)?;
        }

        let now = Utc::now();
        let allocation = funding_allocations::ActiveModel {
            employee_id: Set(employee_id),
            grant_code: Set(input.grant_code.unwrap_or_default()),
            budget_line_code: Set(input.budget_line_code.unwrap_or_default()),
            level_of_effort: Set(effort),
            start_date: Set(input.start_date.unwrap_or_default()),
            end_date: Set(input.end_date),
            status: Set(status.as_str().to_string()),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(employee_id, allocation_id = allocation.id, "Funding allocation created");
        Ok(allocation)
    }

    /// Updates a funding allocation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `level_of_effort` validation error.
    pub async fn update_funding_allocation(
        &self,
        id: i32,
        input: FundingAllocationInput,
        actor: Option<i32>,
    ) -> Result<funding_allocations::Model, RepositoryError> {
        let existing = self
            .find_funding_allocation(id)
            .await?
            .ok_or(RepositoryError::NotFound("Funding allocation"))?;
        let status = input
            .status
            .or_else(|| FundingStatus::parse(&existing.status))
            .unwrap_or(FundingStatus::Active);
        let effort = input.level_of_effort.unwrap_or(existing.level_of_effort);
        if status == FundingStatus::Active {
            check_total_effort(
                &self.other_active_efforts(existing.employee_id, Some(id)).await?,
                effort,
            )?;
        }

        let mut model: funding_allocations::ActiveModel = existing.into();
        model.grant_code = Set(input.grant_code.unwrap_or_default());
        model.budget_line_code = Set(input.budget_line_code.unwrap_or_default());
        model.level_of_effort = Set(effort);
        model.start_date = Set(input.start_date.unwrap_or_default());
        model.end_date = Set(input.end_date);
        model.status = Set(status.as_str().to_string());
        model.updated_by = Set(actor);
        model.updated_at = Set(Utc::now());
        let allocation = model.update(&self.db).await?;

        info!(allocation_id = id, "Funding allocation updated");
        Ok(allocation)
    }

    /// Deletes a funding allocation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the allocation does not exist.
    pub async fn delete_funding_allocation(&self, id: i32) -> Result<(), RepositoryError> {
        let result = funding_allocations::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound("Funding allocation"));
        }
        info!(allocation_id = id, "Funding allocation deleted");
        Ok(())
    }
}
