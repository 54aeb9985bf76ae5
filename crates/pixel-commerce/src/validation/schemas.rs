//! Rules for the provider payloads, and lookup of a schema by name.

use crate::cart::Coupon;
use crate::catalog::{NewProduct, ProductUpdate};
use crate::checkout::{NewOrder, NewOrderItem, ShippingAddress};
use crate::gateway::{BlogPostUpdate, ContactMessage, CustomerForm, NewBlogPost, NewReview};
use crate::money::Money;
use crate::search::{FilterCriteria, PageRequest, MAX_PAGE_SIZE};
use crate::validation::forms::{check_name, INVALID_EMAIL};
use crate::validation::rules::{
    char_len, is_blank, is_coupon_code, is_datetime, is_email, is_slug, is_url,
};
use crate::validation::{
    CartItemForm, ForgotPasswordForm, LoginForm, NewsletterForm, RegisterForm, ResetPasswordForm,
    Validate, ValidationErrors,
};
use serde::de::DeserializeOwned;

pub const MAX_TEXT_LEN: usize = 255;
pub const MAX_MESSAGE_LEN: usize = 1000;
pub const MAX_COUPON_CODE_LEN: usize = 50;

fn at_least_one_cent(amount: &Money) -> bool {
    amount.amount_cents >= 1
}

fn check_price(errors: &mut ValidationErrors, price: &Money) {
    errors.check(at_least_one_cent(price), "price", "Preço deve ser maior que zero");
}

fn check_stock(errors: &mut ValidationErrors, stock: i64) {
    errors.check(stock >= 0, "stock_quantity", "Estoque não pode ser negativo");
}

fn check_print_time(errors: &mut ValidationErrors, hours: Option<f64>) {
    errors.check(
        hours.map(|h| h >= 0.0).unwrap_or(true),
        "print_time_hours",
        "Tempo de impressão não pode ser negativo",
    );
}

impl Validate for NewProduct {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_price(&mut errors, &self.price);
        check_stock(&mut errors, self.stock_quantity);
        check_print_time(&mut errors, self.print_time_hours);
        errors.into_result()
    }
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, "name", name);
        }
        if let Some(price) = &self.price {
            check_price(&mut errors, price);
        }
        if let Some(stock) = self.stock_quantity {
            check_stock(&mut errors, stock);
        }
        errors.into_result()
    }
}

impl Validate for ShippingAddress {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(!is_blank(&self.street), "street", "Rua é obrigatória");
        errors.check(!is_blank(&self.number), "number", "Número é obrigatório");
        errors.check(!is_blank(&self.neighborhood), "neighborhood", "Bairro é obrigatório");
        errors.check(!is_blank(&self.city), "city", "Cidade é obrigatória");
        let state = char_len(&self.state);
        errors.check(state >= 2, "state", "Estado é obrigatório");
        errors.check(state <= 2, "state", "Estado deve ter 2 caracteres");
        let zip = char_len(&self.zip_code);
        errors.check(zip >= 8, "zipCode", "CEP deve ter 8 dígitos");
        errors.check(zip <= 9, "zipCode", "CEP inválido");
        errors.into_result()
    }
}

fn nest_address(errors: &mut ValidationErrors, address: &ShippingAddress) {
    if let Err(nested) = address.validate() {
        errors.nest("shipping_address", nested);
    }
}

impl Validate for CustomerForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        errors.check(is_email(&self.email), "email", INVALID_EMAIL);
        if let Some(address) = &self.shipping_address {
            nest_address(&mut errors, address);
        }
        errors.into_result()
    }
}

impl Validate for NewOrder {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.customer_id.is_uuid(),
            "customer_id",
            "ID do cliente inválido",
        );
        errors.check(
            at_least_one_cent(&self.total_price),
            "total_price",
            "Total deve ser maior que zero",
        );
        nest_address(&mut errors, &self.shipping_address);
        for (i, line) in self.lines.iter().enumerate() {
            errors.check(
                line.quantity >= 1,
                &format!("lines.{}.quantity", i),
                "Quantidade deve ser pelo menos 1",
            );
        }
        errors.into_result()
    }
}

impl Validate for NewOrderItem {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.order_id.is_uuid(), "order_id", "ID do pedido inválido");
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
        errors.check(
            at_least_one_cent(&self.price_at_purchase),
            "price_at_purchase",
            "Preço deve ser maior que zero",
        );
        errors.into_result()
    }
}

fn check_post_title(errors: &mut ValidationErrors, title: &str) {
    errors.check(!is_blank(title), "title", "Título é obrigatório");
    errors.check(char_len(title) <= MAX_TEXT_LEN, "title", "Título muito longo");
}

fn check_post_slug(errors: &mut ValidationErrors, slug: &str) {
    errors.check(!slug.is_empty(), "slug", "Slug é obrigatório");
    errors.check(char_len(slug) <= MAX_TEXT_LEN, "slug", "Slug muito longo");
    if !slug.is_empty() {
        errors.check(
            is_slug(slug),
            "slug",
            "Slug deve conter apenas letras minúsculas, números e hífens",
        );
    }
}

fn check_post_image(errors: &mut ValidationErrors, url: Option<&str>) {
    if let Some(url) = url {
        errors.check(is_url(url), "featured_image_url", "URL da imagem inválida");
    }
}

impl Validate for NewBlogPost {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_post_title(&mut errors, &self.title);
        errors.check(!is_blank(&self.content), "content", "Conteúdo é obrigatório");
        check_post_slug(&mut errors, &self.slug);
        check_post_image(&mut errors, self.featured_image_url.as_deref());
        errors.into_result()
    }
}

/// Same rules as a new post, for the fields being changed.
impl Validate for BlogPostUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_post_title(&mut errors, title);
        }
        if let Some(content) = &self.content {
            errors.check(!is_blank(content), "content", "Conteúdo é obrigatório");
        }
        if let Some(slug) = &self.slug {
            check_post_slug(&mut errors, slug);
        }
        check_post_image(&mut errors, self.featured_image_url.as_deref());
        errors.into_result()
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.product_id.is_uuid(),
            "product_id",
            "ID do produto inválido",
        );
        errors.check(self.rating >= 1, "rating", "Avaliação mínima é 1");
        errors.check(self.rating <= 5, "rating", "Avaliação máxima é 5");
        errors.into_result()
    }
}

impl Validate for ContactMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name);
        errors.check(is_email(&self.email), "email", INVALID_EMAIL);
        errors.check(!is_blank(&self.subject), "subject", "Assunto é obrigatório");
        errors.check(
            char_len(&self.subject) <= MAX_TEXT_LEN,
            "subject",
            "Assunto muito longo",
        );
        errors.check(!is_blank(&self.message), "message", "Mensagem é obrigatória");
        errors.check(
            char_len(&self.message) <= MAX_MESSAGE_LEN,
            "message",
            "Mensagem muito longa",
        );
        errors.into_result()
    }
}

impl Validate for FilterCriteria {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.min_price.map(|m| !m.is_negative()).unwrap_or(true),
            "min_price",
            "Preço mínimo não pode ser negativo",
        );
        errors.check(
            self.max_price.map(|m| !m.is_negative()).unwrap_or(true),
            "max_price",
            "Preço máximo não pode ser negativo",
        );
        errors.into_result()
    }
}

impl Validate for PageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.page >= 1, "page", "Página deve ser pelo menos 1");
        errors.check(
            (1..=MAX_PAGE_SIZE).contains(&self.limit),
            "limit",
            "Limite deve estar entre 1 e 100",
        );
        errors.into_result()
    }
}

impl Validate for Coupon {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(!self.code.is_empty(), "code", "Código é obrigatório");
        errors.check(
            char_len(&self.code) <= MAX_COUPON_CODE_LEN,
            "code",
            "Código muito longo",
        );
        if !self.code.is_empty() {
            errors.check(
                is_coupon_code(&self.code),
                "code",
                "Código deve conter apenas letras maiúsculas, números e hífens",
            );
        }
        errors.check(
            self.discount_bp >= 0,
            "discount_percent",
            "Desconto não pode ser negativo",
        );
        errors.check(
            self.discount_bp <= 10_000,
            "discount_percent",
            "Desconto não pode ser maior que 100%",
        );
        errors.check(
            self.usage_limit.map(|l| l >= 1).unwrap_or(true),
            "usage_limit",
            "Limite de uso deve ser pelo menos 1",
        );
        errors.into_result()
    }
}

/// Named payload schemas, for validating raw JSON (e.g., from the CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Product,
    Customer,
    Order,
    OrderItem,
    BlogPost,
    CartItem,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    ProductFilters,
    Pagination,
    Contact,
    Newsletter,
    Review,
    Coupon,
}

impl Schema {
    pub const ALL: [Schema; 16] = [
        Schema::Product,
        Schema::Customer,
        Schema::Order,
        Schema::OrderItem,
        Schema::BlogPost,
        Schema::CartItem,
        Schema::Login,
        Schema::Register,
        Schema::ForgotPassword,
        Schema::ResetPassword,
        Schema::ProductFilters,
        Schema::Pagination,
        Schema::Contact,
        Schema::Newsletter,
        Schema::Review,
        Schema::Coupon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Product => "product",
            Schema::Customer => "customer",
            Schema::Order => "order",
            Schema::OrderItem => "order-item",
            Schema::BlogPost => "blog-post",
            Schema::CartItem => "cart-item",
            Schema::Login => "login",
            Schema::Register => "register",
            Schema::ForgotPassword => "forgot-password",
            Schema::ResetPassword => "reset-password",
            Schema::ProductFilters => "product-filters",
            Schema::Pagination => "pagination",
            Schema::Contact => "contact",
            Schema::Newsletter => "newsletter",
            Schema::Review => "review",
            Schema::Coupon => "coupon",
        }
    }

    /// Accepts the kebab-case name or its snake_case spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|schema| schema.as_str() == normalized)
    }

    /// Decode `value` as this schema's payload and check its rules. A payload
    /// that does not decode is reported against the `payload` field.
    pub fn validate_json(&self, value: serde_json::Value) -> Result<(), ValidationErrors> {
        match self {
            Schema::Product => check_as::<NewProduct>(value),
            Schema::Customer => check_as::<CustomerForm>(value),
            Schema::Order => check_as::<NewOrder>(value),
            Schema::OrderItem => check_as::<NewOrderItem>(value),
            Schema::BlogPost => check_as::<NewBlogPost>(value),
            Schema::CartItem => check_as::<CartItemForm>(value),
            Schema::Login => check_as::<LoginForm>(value),
            Schema::Register => check_as::<RegisterForm>(value),
            Schema::ForgotPassword => check_as::<ForgotPasswordForm>(value),
            Schema::ResetPassword => check_as::<ResetPasswordForm>(value),
            Schema::ProductFilters => check_as::<FilterCriteria>(value),
            Schema::Pagination => check_as::<PageRequest>(value),
            Schema::Contact => check_as::<ContactMessage>(value),
            Schema::Newsletter => check_as::<NewsletterForm>(value),
            Schema::Review => check_as::<NewReview>(value),
            Schema::Coupon => {
                if let Some(text) = value.get("valid_until").and_then(|v| v.as_str()) {
                    if !is_datetime(text) {
                        return Err(ValidationErrors::single("valid_until", "Data inválida"));
                    }
                }
                check_as::<Coupon>(value)
            }
        }
    }
}

fn check_as<T>(value: serde_json::Value) -> Result<(), ValidationErrors>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_value(value)
        .map_err(|e| ValidationErrors::single("payload", e.to_string()))?;
    payload.validate()
}
