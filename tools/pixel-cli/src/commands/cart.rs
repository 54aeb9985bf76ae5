//! Cart totals from a JSON cart file.

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, Utc};
use pixel_commerce::cart::{CartAction, CartState, Coupon, OrderSummary};
use pixel_commerce::checkout::ShippingPolicy;
use pixel_commerce::gateway::ProductGateway;
use pixel_commerce::ids::ProductId;
use serde::Deserialize;
use serde_json::json;

use super::CartArgs;
use crate::context::Context;
use crate::output::truncate;

/// Cart file contents.
#[derive(Debug, Deserialize)]
struct CartFile {
    items: Vec<CartFileItem>,
    #[serde(default)]
    coupon: Option<Coupon>,
}

#[derive(Debug, Deserialize)]
struct CartFileItem {
    product_id: ProductId,
    quantity: i64,
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let value = ctx.read_json(&args.file)?;
    let file: CartFile = serde_json::from_value(value)
        .with_context(|| format!("{} is not a cart file", args.file))?;
    let policy = ctx.config.shipping_policy()?;
    let gateway = ctx.gateway()?;

    let spinner = ctx.output.spinner("Pricing cart...");
    let result = build_cart(gateway.as_ref(), file, Utc::now()).await;
    spinner.finish_and_clear();
    let cart = result?;
    let summary = cart.summary(&policy)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "lines": cart.lines(),
            "coupon": cart.coupon().map(|c| &c.code),
            "summary": summary,
        }));
        return Ok(());
    }

    print_cart(ctx, &cart, &summary, &policy);
    Ok(())
}

/// Resolve every line against the catalog and fold it into a cart.
async fn build_cart<G: ProductGateway + ?Sized>(
    gateway: &G,
    file: CartFile,
    now: DateTime<Utc>,
) -> Result<CartState> {
    if file.items.is_empty() {
        bail!("The cart file has no items");
    }

    let mut cart = CartState::new();
    for item in file.items {
        let Some(product) = gateway.get_product(&item.product_id).await? else {
            bail!("Product {} not found", item.product_id);
        };
        let name = product.name.clone();
        cart.apply(CartAction::Add {
            product,
            quantity: item.quantity,
        })
        .with_context(|| format!("Cannot add {} x {}", item.quantity, name))?;
    }

    if let Some(coupon) = file.coupon {
        cart.apply_coupon(coupon, now)?;
    }
    Ok(cart)
}

fn print_cart(ctx: &Context, cart: &CartState, summary: &OrderSummary, policy: &ShippingPolicy) {
    ctx.output.header(&format!("Carrinho ({} itens)", summary.item_count));

    let widths = [28, 6, 12, 12];
    ctx.output
        .table_row(&["Produto", "Qtd", "Unitário", "Total"], &widths);
    for line in cart.lines() {
        let name = truncate(&line.product_name, widths[0]);
        let quantity = line.quantity.to_string();
        let unit = line.unit_price.display();
        let total = line
            .line_total()
            .map(|m| m.display())
            .unwrap_or_else(|_| "-".to_string());
        ctx.output.table_row(
            &[name.as_str(), quantity.as_str(), unit.as_str(), total.as_str()],
            &widths,
        );
    }

    println!();
    ctx.output.kv("Subtotal", &summary.subtotal.display());
    if summary.has_free_shipping() {
        ctx.output.kv("Frete", "Grátis");
    } else {
        ctx.output.kv("Frete", &summary.shipping.display());
    }
    if let Some(coupon) = cart.coupon() {
        ctx.output.kv(
            &format!("Cupom {}", coupon.code),
            &format!("-{}", summary.discount.display()),
        );
    }
    ctx.output.kv("Total", &summary.total.display());

    if !summary.has_free_shipping() {
        ctx.output.info(&format!(
            "Faltam {} para frete grátis (acima de {}).",
            summary.remaining_for_free_shipping.display(),
            policy.free_shipping_threshold().display()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pixel_commerce::gateway::MemoryGateway;
    use pixel_commerce::money::Money;

    const BENCHY: &str = "00000000-0000-4000-8000-000000000001";
    const DRAGAO: &str = "00000000-0000-4000-8000-000000000002";
    const CALIBRACAO: &str = "00000000-0000-4000-8000-000000000006";

    fn cart_file(json: serde_json::Value) -> CartFile {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_build_cart_merges_lines() {
        let gateway = MemoryGateway::with_demo_catalog();
        let file = cart_file(json!({
            "items": [
                { "product_id": BENCHY, "quantity": 1 },
                { "product_id": DRAGAO, "quantity": 2 },
                { "product_id": BENCHY, "quantity": 1 }
            ]
        }));

        let cart = build_cart(&gateway, file, Utc::now()).await.unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 4);

        let summary = cart.summary(&ShippingPolicy::default()).unwrap();
        assert_eq!(summary.subtotal, Money::brl(2 * 2990 + 2 * 4590));
        assert!(summary.has_free_shipping());
    }

    #[tokio::test]
    async fn test_build_cart_applies_coupon() {
        let gateway = MemoryGateway::with_demo_catalog();
        let now = Utc::now();
        let file = cart_file(json!({
            "items": [{ "product_id": BENCHY, "quantity": 2 }],
            "coupon": {
                "code": "PIXEL10",
                "discount_percent": 10,
                "valid_until": (now + Duration::days(7)).to_rfc3339()
            }
        }));

        let cart = build_cart(&gateway, file, now).await.unwrap();
        let summary = cart.summary(&ShippingPolicy::default()).unwrap();
        assert_eq!(summary.subtotal, Money::brl(5980));
        assert_eq!(summary.discount, Money::brl(598));
        assert_eq!(summary.shipping, Money::brl(1590));
        assert_eq!(summary.total, Money::brl(5980 - 598 + 1590));
    }

    #[tokio::test]
    async fn test_build_cart_rejects_bad_items() {
        let gateway = MemoryGateway::with_demo_catalog();

        let missing = cart_file(json!({
            "items": [{ "product_id": "00000000-0000-4000-8000-0000000000ff", "quantity": 1 }]
        }));
        assert!(build_cart(&gateway, missing, Utc::now()).await.is_err());

        let sold_out = cart_file(json!({
            "items": [{ "product_id": CALIBRACAO, "quantity": 1 }]
        }));
        assert!(build_cart(&gateway, sold_out, Utc::now()).await.is_err());

        let too_many = cart_file(json!({
            "items": [{ "product_id": DRAGAO, "quantity": 9 }]
        }));
        assert!(build_cart(&gateway, too_many, Utc::now()).await.is_err());

        let empty = cart_file(json!({ "items": [] }));
        assert!(build_cart(&gateway, empty, Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_coupon_rejected() {
        let gateway = MemoryGateway::with_demo_catalog();
        let now = Utc::now();
        let file = cart_file(json!({
            "items": [{ "product_id": BENCHY, "quantity": 1 }],
            "coupon": {
                "code": "OLD",
                "discount_percent": 10,
                "valid_until": (now - Duration::days(1)).to_rfc3339()
            }
        }));
        assert!(build_cart(&gateway, file, now).await.is_err());
    }
}
