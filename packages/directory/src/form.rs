//! Employee form state and client-side validation.

use store::{Employee, EmployeeDraft, EmployeeField};
use thiserror::Error;

/// Bad form input, caught before any network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Valid email is required")]
    EmailInvalid,
    #[error("Employee number is required")]
    EmpNumRequired,
    #[error("Phone number is required")]
    PhoneRequired,
}

impl ValidationError {
    /// The input the user has to correct.
    pub fn field(self) -> EmployeeField {
        match self {
            ValidationError::NameRequired => EmployeeField::Name,
            ValidationError::EmailInvalid => EmployeeField::Email,
            ValidationError::EmpNumRequired => EmployeeField::EmpNum,
            ValidationError::PhoneRequired => EmployeeField::PhoneNo,
        }
    }
}

/// The four text inputs of the employee form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    pub emp_num: String,
    pub phone_no: String,
}

impl EmployeeForm {
    /// Form pre-filled from an existing record.
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            emp_num: employee.emp_num.clone(),
            phone_no: employee.phone_no.clone(),
        }
    }

    /// Set one input. Timestamp columns are not editable and are ignored.
    pub fn set(&mut self, field: EmployeeField, value: impl Into<String>) {
        let slot = match field {
            EmployeeField::Name => &mut self.name,
            EmployeeField::Email => &mut self.email,
            EmployeeField::EmpNum => &mut self.emp_num,
            EmployeeField::PhoneNo => &mut self.phone_no,
            EmployeeField::CreatedAt | EmployeeField::UpdatedAt => return,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        self == &Self::default()
    }

    /// Check inputs in display order and build the trimmed draft.
    pub fn validate(&self) -> Result<EmployeeDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::EmailInvalid);
        }
        let emp_num = self.emp_num.trim();
        if emp_num.is_empty() {
            return Err(ValidationError::EmpNumRequired);
        }
        let phone_no = self.phone_no.trim();
        if phone_no.is_empty() {
            return Err(ValidationError::PhoneRequired);
        }

        Ok(EmployeeDraft {
            name: name.to_string(),
            email: email.to_string(),
            emp_num: emp_num.to_string(),
            phone_no: phone_no.to_string(),
        })
    }
}
