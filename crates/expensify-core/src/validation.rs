//! Local form validation. Nothing here touches the network.

use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::expense::{Category, NewExpense};

const REQUIRED_FIELDS: &str = "Please fill in all required fields";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(email: &str, password: &str) -> Result<Self, ClientError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ClientError::validation("Please enter email"));
        }
        if password.is_empty() {
            return Err(ClientError::validation("Please enter password"));
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Checks the confirmation first, then that every field is filled.
    pub fn validate(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, ClientError> {
        if password != confirm_password {
            return Err(ClientError::validation("Passwords do not match"));
        }
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ClientError::validation(REQUIRED_FIELDS));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

pub fn validate_otp(otp: &str) -> Result<String, ClientError> {
    let otp = otp.trim();
    if otp.is_empty() {
        return Err(ClientError::validation("Please enter the OTP"));
    }
    Ok(otp.to_string())
}

impl NewExpense {
    /// Validates raw add-expense input.
    ///
    /// `date` defaults to now. The description is trimmed.
    pub fn validate(
        amount: &str,
        description: &str,
        category: Category,
        date: Option<DateTime<Utc>>,
    ) -> Result<Self, ClientError> {
        let amount = amount.trim();
        let description = description.trim();
        if amount.is_empty() || description.is_empty() {
            return Err(ClientError::validation(REQUIRED_FIELDS));
        }

        let amount = amount
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(|| ClientError::validation("Please enter a valid amount"))?;

        Ok(Self {
            amount,
            category,
            description: description.to_string(),
            date: date.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ClientError) -> String {
        match err {
            ClientError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_login_requires_email_then_password() {
        assert_eq!(
            message(LoginForm::validate("  ", "pw").unwrap_err()),
            "Please enter email"
        );
        assert_eq!(
            message(LoginForm::validate("a@b.c", "").unwrap_err()),
            "Please enter password"
        );
        let form = LoginForm::validate(" a@b.c ", "pw").unwrap();
        assert_eq!(form.email, "a@b.c");
    }

    #[test]
    fn test_signup_checks_confirmation_first() {
        assert_eq!(
            message(SignupForm::validate("", "", "a", "b").unwrap_err()),
            "Passwords do not match"
        );
        assert_eq!(
            message(SignupForm::validate("Ana", "", "pw", "pw").unwrap_err()),
            REQUIRED_FIELDS
        );
        assert!(SignupForm::validate("Ana", "a@b.c", "pw", "pw").is_ok());
    }

    #[test]
    fn test_otp_must_be_present() {
        assert!(validate_otp(" ").is_err());
        assert_eq!(validate_otp(" 123456 ").unwrap(), "123456");
    }

    #[test]
    fn test_new_expense_required_fields() {
        let err = NewExpense::validate("", "Lunch", Category::Food, None).unwrap_err();
        assert_eq!(message(err), REQUIRED_FIELDS);

        let err = NewExpense::validate("10", "   ", Category::Food, None).unwrap_err();
        assert_eq!(message(err), REQUIRED_FIELDS);
    }

    #[test]
    fn test_new_expense_rejects_bad_amounts() {
        for amount in ["abc", "0", "-5", "NaN", "inf"] {
            let err = NewExpense::validate(amount, "Lunch", Category::Food, None).unwrap_err();
            assert_eq!(message(err), "Please enter a valid amount", "amount {amount}");
        }
    }

    #[test]
    fn test_new_expense_trims_and_defaults_date() {
        let before = Utc::now();
        let expense = NewExpense::validate("12.5", "  Lunch ", Category::Food, None).unwrap();
        assert_eq!(expense.description, "Lunch");
        assert!((expense.amount - 12.5).abs() < f64::EPSILON);
        assert!(expense.date >= before);
    }
}
