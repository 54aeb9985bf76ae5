//! Payload validation against the storefront schemas.

use anyhow::{anyhow, bail, Result};
use pixel_commerce::validation::{Schema, ValidationErrors};
use serde_json::json;

use super::ValidateArgs;
use crate::context::Context;

/// Run the validate command.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let schema = parse_schema(&args.schema)?;
    let payload = ctx.read_json(&args.file)?;
    ctx.output
        .debug(&format!("Validating {} as {}", args.file, schema.as_str()));

    let outcome = schema.validate_json(payload);

    if ctx.output.is_json() {
        let errors = outcome.as_ref().err().map(ValidationErrors::errors).unwrap_or(&[]);
        ctx.output.json(&json!({
            "schema": schema.as_str(),
            "valid": outcome.is_ok(),
            "errors": errors,
        }));
    }

    match outcome {
        Ok(()) => {
            ctx.output
                .success(&format!("{} is a valid {} payload", args.file, schema.as_str()));
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                ctx.output.list_item(&format!("{}: {}", error.field, error.message));
            }
            bail!("{} failed validation ({} error(s))", args.file, errors.len())
        }
    }
}

fn parse_schema(name: &str) -> Result<Schema> {
    Schema::from_str(name).ok_or_else(|| {
        let known: Vec<&str> = Schema::ALL.iter().map(Schema::as_str).collect();
        anyhow!("Unknown schema '{}'. Available: {}", name, known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_names() {
        assert_eq!(parse_schema("blog_post").unwrap(), Schema::BlogPost);
        assert_eq!(parse_schema("Coupon").unwrap(), Schema::Coupon);

        let err = parse_schema("invoice").unwrap_err().to_string();
        assert!(err.contains("invoice"));
        assert!(err.contains("product-filters"));
    }

    #[test]
    fn test_newsletter_payloads() {
        let schema = parse_schema("newsletter").unwrap();
        assert!(schema.validate_json(json!({ "email": "maker@pixel.art" })).is_ok());

        let errors = schema.validate_json(json!({ "email": "nope" })).unwrap_err();
        assert!(errors.has("email"));
    }
}
