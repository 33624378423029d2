use crate::model::{
    attendance::{
        Attendance, AttendanceDetail, AttendanceStatus, CheckIn, CheckOut, CreateAttendance,
        UpdateAttendance,
    },
    department::{CreateDepartment, Department, DepartmentDetail, UpdateDepartment},
    employee::{CreateEmployee, Employee, EmployeeDetail, EmployeeStatus, UpdateEmployee},
    leave_request::{
        ApproveLeave, CreateLeave, Leave, LeaveDetail, LeaveStatus, LeaveType, RejectLeave,
        UpdateLeave,
    },
    outsourcing_company::{
        CompanyStatus, CreateOutsourcingCompany, OutsourcingCompany, OutsourcingCompanyDetail,
        UpdateOutsourcingCompany,
    },
    outsourcing_employee::{
        ContractorStatus, CreateOutsourcingEmployee, OutsourcingEmployee,
        OutsourcingEmployeeDetail, UpdateOutsourcingEmployee,
    },
    position::{CreatePosition, Position, PositionDetail, UpdatePosition},
    role::Role,
    user::{LoginReq, LoginResponse, RegisterReq, User},
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Management API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System

Record keeping for an organization's people and its contracted staff.

### Key Features
- **Employees, Departments, Positions**
  - Create, update, list and view records; employees link to a department, a position and a manager
- **Attendance**
  - Daily check-in and check-out, hours worked derived from the two times
- **Leave**
  - Request leave, approve or reject it, review history per employee
- **Outsourcing**
  - Contracting companies and the external staff they supply

### Security
Everything except `/auth/register` and `/auth/login` needs a **JWT Bearer** token from `/auth/login`.

### Response Format
- camelCase JSON
- Errors are `{"error": "<message>"}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::profile,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::employees_by_department,
        crate::api::employee::employees_by_manager,

        crate::api::department::create_department,
        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::position::create_position,
        crate::api::position::list_positions,
        crate::api::position::get_position,
        crate::api::position::update_position,
        crate::api::position::delete_position,

        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::attendance_by_employee,
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::leaves_by_employee,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::outsourcing_company::list_companies,
        crate::api::outsourcing_company::get_company,
        crate::api::outsourcing_company::create_company,
        crate::api::outsourcing_company::update_company,
        crate::api::outsourcing_company::delete_company,

        crate::api::outsourcing_employee::list_contractors,
        crate::api::outsourcing_employee::get_contractor,
        crate::api::outsourcing_employee::contractors_by_company,
        crate::api::outsourcing_employee::create_contractor,
        crate::api::outsourcing_employee::update_contractor,
        crate::api::outsourcing_employee::delete_contractor
    ),
    components(
        schemas(
            Role,
            User,
            RegisterReq,
            LoginReq,
            LoginResponse,
            EmployeeStatus,
            Employee,
            EmployeeDetail,
            CreateEmployee,
            UpdateEmployee,
            Department,
            DepartmentDetail,
            CreateDepartment,
            UpdateDepartment,
            Position,
            PositionDetail,
            CreatePosition,
            UpdatePosition,
            AttendanceStatus,
            Attendance,
            AttendanceDetail,
            CreateAttendance,
            UpdateAttendance,
            CheckIn,
            CheckOut,
            LeaveType,
            LeaveStatus,
            Leave,
            LeaveDetail,
            CreateLeave,
            UpdateLeave,
            ApproveLeave,
            RejectLeave,
            CompanyStatus,
            OutsourcingCompany,
            OutsourcingCompanyDetail,
            CreateOutsourcingCompany,
            UpdateOutsourcingCompany,
            ContractorStatus,
            OutsourcingEmployee,
            OutsourcingEmployeeDetail,
            CreateOutsourcingEmployee,
            UpdateOutsourcingEmployee
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "Position", description = "Position management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Outsourcing", description = "Outsourcing companies and contractors"),
    )
)]
pub struct ApiDoc;

/// Declares the `bearer_auth` scheme the protected paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/attendance/check-in"));
        assert!(doc.paths.paths.contains_key("/api/leaves/{id}/approve"));
        assert!(doc.paths.paths.contains_key("/api/outsourcing-employees/company/{company_id}"));

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("OutsourcingCompany"));
    }
}
