//! Employees and the records they own.

use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_organization::{Departments, Positions};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn employee_fk<T: IntoIden + 'static, C: IntoIden + 'static>(
    name: &str,
    table: T,
    column: C,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Employees::Table, Employees::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string_len(Employees::Organization, 10))
                    .col(string_len(Employees::StaffId, 50))
                    .col(string_len_null(Employees::InitialEn, 10))
                    .col(string_len_null(Employees::InitialTh, 20))
                    .col(string_len(Employees::FirstNameEn, 255))
                    .col(string_len_null(Employees::LastNameEn, 255))
                    .col(string_len_null(Employees::FirstNameTh, 255))
                    .col(string_len_null(Employees::LastNameTh, 255))
                    .col(string_len(Employees::Gender, 20))
                    .col(date(Employees::DateOfBirth))
                    .col(string_len(Employees::Status, 50))
                    .col(string_len_null(Employees::Nationality, 100))
                    .col(string_len_null(Employees::Religion, 100))
                    .col(string_len_null(Employees::IdentificationType, 50))
                    .col(string_len_null(Employees::IdentificationNumber, 50))
                    .col(string_len_null(Employees::SocialSecurityNumber, 50))
                    .col(string_len_null(Employees::TaxNumber, 50))
                    .col(string_len_null(Employees::BankName, 100))
                    .col(string_len_null(Employees::BankBranch, 100))
                    .col(string_len_null(Employees::BankAccountName, 255))
                    .col(string_len_null(Employees::BankAccountNumber, 50))
                    .col(string_len_null(Employees::MobilePhone, 20))
                    .col(text_null(Employees::PermanentAddress))
                    .col(text_null(Employees::CurrentAddress))
                    .col(string_len_null(Employees::MilitaryStatus, 50))
                    .col(string_len_null(Employees::MaritalStatus, 50))
                    .col(string_len_null(Employees::SpouseName, 255))
                    .col(string_len_null(Employees::SpousePhoneNumber, 20))
                    .col(string_len_null(Employees::EmergencyContactPersonName, 255))
                    .col(string_len_null(Employees::EmergencyContactPersonRelationship, 100))
                    .col(string_len_null(Employees::EmergencyContactPersonPhone, 20))
                    .col(string_len_null(Employees::FatherName, 255))
                    .col(string_len_null(Employees::FatherOccupation, 255))
                    .col(string_len_null(Employees::FatherPhoneNumber, 20))
                    .col(string_len_null(Employees::MotherName, 255))
                    .col(string_len_null(Employees::MotherOccupation, 255))
                    .col(string_len_null(Employees::MotherPhoneNumber, 20))
                    .col(string_len_null(Employees::DriverLicenseNumber, 50))
                    .col(string_len_null(Employees::Remark, 255))
                    .col(integer_null(Employees::CreatedBy))
                    .col(integer_null(Employees::UpdatedBy))
                    .col(timestamp_with_time_zone(Employees::CreatedAt))
                    .col(timestamp_with_time_zone(Employees::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_employees_organization_staff_id")
                    .table(Employees::Table)
                    .col(Employees::Organization)
                    .col(Employees::StaffId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employments::Table)
                    .if_not_exists()
                    .col(pk_auto(Employments::Id))
                    .col(integer_uniq(Employments::EmployeeId))
                    .col(integer_null(Employments::DepartmentId))
                    .col(integer_null(Employments::PositionId))
                    .col(string_len(Employments::EmploymentType, 50))
                    .col(date(Employments::StartDate))
                    .col(date_null(Employments::EndDate))
                    .col(date_null(Employments::ProbationPassDate))
                    .col(string_len_null(Employments::PayMethod, 50))
                    .col(decimal_len_null(Employments::Salary, 12, 2))
                    .col(integer_null(Employments::CreatedBy))
                    .col(integer_null(Employments::UpdatedBy))
                    .col(timestamp_with_time_zone(Employments::CreatedAt))
                    .col(timestamp_with_time_zone(Employments::UpdatedAt))
                    .foreign_key(&mut employee_fk(
                        "fk_employments_employee",
                        Employments::Table,
                        Employments::EmployeeId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employments_department")
                            .from(Employments::Table, Employments::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employments_position")
                            .from(Employments::Table, Employments::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeLanguages::Table)
                    .if_not_exists()
                    .col(pk_auto(EmployeeLanguages::Id))
                    .col(integer(EmployeeLanguages::EmployeeId))
                    .col(string_len(EmployeeLanguages::Language, 100))
                    .col(string_len_null(EmployeeLanguages::Proficiency, 50))
                    .col(timestamp_with_time_zone(EmployeeLanguages::CreatedAt))
                    .col(timestamp_with_time_zone(EmployeeLanguages::UpdatedAt))
                    .foreign_key(&mut employee_fk(
                        "fk_employee_languages_employee",
                        EmployeeLanguages::Table,
                        EmployeeLanguages::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeEducations::Table)
                    .if_not_exists()
                    .col(pk_auto(EmployeeEducations::Id))
                    .col(integer(EmployeeEducations::EmployeeId))
                    .col(string_len(EmployeeEducations::SchoolName, 255))
                    .col(string_len(EmployeeEducations::Degree, 255))
                    .col(date(EmployeeEducations::StartDate))
                    .col(date_null(EmployeeEducations::EndDate))
                    .col(timestamp_with_time_zone(EmployeeEducations::CreatedAt))
                    .col(timestamp_with_time_zone(EmployeeEducations::UpdatedAt))
                    .foreign_key(&mut employee_fk(
                        "fk_employee_educations_employee",
                        EmployeeEducations::Table,
                        EmployeeEducations::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeChildren::Table)
                    .if_not_exists()
                    .col(pk_auto(EmployeeChildren::Id))
                    .col(integer(EmployeeChildren::EmployeeId))
                    .col(string_len(EmployeeChildren::Name, 255))
                    .col(date(EmployeeChildren::DateOfBirth))
                    .col(timestamp_with_time_zone(EmployeeChildren::CreatedAt))
                    .col(timestamp_with_time_zone(EmployeeChildren::UpdatedAt))
                    .foreign_key(&mut employee_fk(
                        "fk_employee_children_employee",
                        EmployeeChildren::Table,
                        EmployeeChildren::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeBeneficiaries::Table)
                    .if_not_exists()
                    .col(pk_auto(EmployeeBeneficiaries::Id))
                    .col(integer(EmployeeBeneficiaries::EmployeeId))
                    .col(string_len(EmployeeBeneficiaries::Name, 255))
                    .col(string_len(EmployeeBeneficiaries::Relationship, 100))
                    .col(string_len_null(EmployeeBeneficiaries::PhoneNumber, 20))
                    .col(timestamp_with_time_zone(EmployeeBeneficiaries::CreatedAt))
                    .col(timestamp_with_time_zone(EmployeeBeneficiaries::UpdatedAt))
                    .foreign_key(&mut employee_fk(
                        "fk_employee_beneficiaries_employee",
                        EmployeeBeneficiaries::Table,
                        EmployeeBeneficiaries::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FundingAllocations::Table)
                    .if_not_exists()
                    .col(pk_auto(FundingAllocations::Id))
                    .col(integer(FundingAllocations::EmployeeId))
                    .col(string_len(FundingAllocations::GrantCode, 50))
                    .col(string_len(FundingAllocations::BudgetLineCode, 50))
                    .col(decimal_len(FundingAllocations::LevelOfEffort, 5, 2))
                    .col(date(FundingAllocations::StartDate))
                    .col(date_null(FundingAllocations::EndDate))
                    .col(string_len(FundingAllocations::Status, 20).default("active"))
                    .col(integer_null(FundingAllocations::CreatedBy))
                    .col(integer_null(FundingAllocations::UpdatedBy))
                    .col(timestamp_with_time_zone(FundingAllocations::CreatedAt))
                    .col(timestamp_with_time_zone(FundingAllocations::UpdatedAt))
                    .foreign_key(&mut employee_fk(
                        "fk_funding_allocations_employee",
                        FundingAllocations::Table,
                        FundingAllocations::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FundingAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeLanguages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeEducations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeChildren::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeBeneficiaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
    Organization,
    StaffId,
    InitialEn,
    InitialTh,
    FirstNameEn,
    LastNameEn,
    FirstNameTh,
    LastNameTh,
    Gender,
    DateOfBirth,
    Status,
    Nationality,
    Religion,
    IdentificationType,
    IdentificationNumber,
    SocialSecurityNumber,
    TaxNumber,
    BankName,
    BankBranch,
    BankAccountName,
    BankAccountNumber,
    MobilePhone,
    PermanentAddress,
    CurrentAddress,
    MilitaryStatus,
    MaritalStatus,
    SpouseName,
    SpousePhoneNumber,
    EmergencyContactPersonName,
    EmergencyContactPersonRelationship,
    EmergencyContactPersonPhone,
    FatherName,
    FatherOccupation,
    FatherPhoneNumber,
    MotherName,
    MotherOccupation,
    MotherPhoneNumber,
    DriverLicenseNumber,
    Remark,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Employments {
    Table,
    Id,
    EmployeeId,
    DepartmentId,
    PositionId,
    EmploymentType,
    StartDate,
    EndDate,
    ProbationPassDate,
    PayMethod,
    Salary,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeLanguages {
    Table,
    Id,
    EmployeeId,
    Language,
    Proficiency,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeEducations {
    Table,
    Id,
    EmployeeId,
    SchoolName,
    Degree,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeChildren {
    Table,
    Id,
    EmployeeId,
    Name,
    DateOfBirth,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeBeneficiaries {
    Table,
    Id,
    EmployeeId,
    Name,
    Relationship,
    PhoneNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FundingAllocations {
    Table,
    Id,
    EmployeeId,
    GrantCode,
    BudgetLineCode,
    LevelOfEffort,
    StartDate,
    EndDate,
    Status,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
