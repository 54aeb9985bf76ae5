//! Storefront forms that are not provider rows.

use crate::ids::ProductId;
use crate::validation::rules::{char_len, has_password_mix, is_blank, is_email};
use crate::validation::{Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const MIN_LOGIN_PASSWORD: usize = 6;
pub const MIN_NEW_PASSWORD: usize = 8;
pub const MAX_NAME_LEN: usize = 255;

pub(crate) const INVALID_EMAIL: &str = "Email inválido";

fn check_email(errors: &mut ValidationErrors, field: &str, email: &str) {
    errors.check(is_email(email), field, INVALID_EMAIL);
}

pub(crate) fn check_name(errors: &mut ValidationErrors, field: &str, name: &str) {
    errors.check(!is_blank(name), field, "Nome é obrigatório");
    errors.check(char_len(name) <= MAX_NAME_LEN, field, "Nome muito longo");
}

/// Rules for a password being set, plus its confirmation.
fn check_new_password(errors: &mut ValidationErrors, password: &str, confirm: &str) {
    errors.check(
        char_len(password) >= MIN_NEW_PASSWORD,
        "password",
        "Senha deve ter pelo menos 8 caracteres",
    );
    errors.check(
        has_password_mix(password),
        "password",
        "Senha deve conter pelo menos uma letra minúscula, uma maiúscula e um número",
    );
    errors.check(password == confirm, "confirmPassword", "Senhas não coincidem");
}

/// Sign-in form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        errors.check(
            char_len(&self.password) >= MIN_LOGIN_PASSWORD,
            "password",
            "Senha deve ter pelo menos 6 caracteres",
        );
        errors.into_result()
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_email(&mut errors, "email", &self.email);
        check_new_password(&mut errors, &self.password, &self.confirm_password);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

impl Validate for ForgotPasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_new_password(&mut errors, &self.password, &self.confirm_password);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsletterForm {
    #[serde(default)]
    pub email: String,
}

impl Validate for NewsletterForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

/// "Add to cart" request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItemForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl Validate for CartItemForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.product_id.is_uuid(),
            "product_id",
            "ID do produto inválido",
        );
        errors.check(
            self.quantity >= 1,
            "quantity",
            "Quantidade deve ser pelo menos 1",
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Ana".to_string(),
            email: "ana@pixel3d.com.br".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_register_accepts_strong_matching_password() {
        assert!(register("Pixel123", "Pixel123").validate().is_ok());
    }

    #[test]
    fn test_register_mismatch_reported_on_confirmation() {
        let errors = register("Pixel123", "Pixel124").validate().unwrap_err();
        assert_eq!(errors.messages_for("confirmPassword"), vec!["Senhas não coincidem"]);
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_register_weak_password() {
        let errors = register("pixel", "pixel").validate().unwrap_err();
        assert_eq!(errors.messages_for("password").len(), 2);
    }

    #[test]
    fn test_register_from_json_uses_camel_case_confirmation() {
        let form: RegisterForm = serde_json::from_value(serde_json::json!({
            "name": "",
            "email": "ana",
            "password": "Pixel123",
            "confirmPassword": "Pixel123"
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.messages_for("name"), vec!["Nome é obrigatório"]);
        assert_eq!(errors.messages_for("email"), vec![INVALID_EMAIL]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_login_minimum_length() {
        let form = LoginForm {
            email: "ana@pixel3d.com.br".to_string(),
            password: "12345".to_string(),
        };
        assert!(form.validate().unwrap_err().has("password"));
    }

    #[test]
    fn test_cart_item_form() {
        let ok = CartItemForm {
            product_id: ProductId::new("00000000-0000-4000-8000-000000000001"),
            quantity: 1,
        };
        assert!(ok.validate().is_ok());
        let bad = CartItemForm {
            product_id: ProductId::new("benchy"),
            quantity: 0,
        };
        assert_eq!(bad.validate().unwrap_err().len(), 2);
    }
}
