//! Catalog listing.

use anyhow::{bail, Context as _, Result};
use pixel_commerce::catalog::{Category, Material, Product};
use pixel_commerce::gateway::ProductQuery;
use pixel_commerce::money::{Money, STORE_CURRENCY};
use pixel_commerce::search::{sort_products, FilterCriteria, Page, PageRequest, SortMode};
use serde_json::json;

use super::ProductsArgs;
use crate::context::Context;
use crate::output::{stock_badge, truncate};

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let criteria = criteria_from(&args)?;
    let sort = SortMode::from_str(&args.sort)
        .with_context(|| format!("Unknown sort '{}'; use newest, name or price", args.sort))?;
    if criteria.has_inverted_price_range() {
        ctx.output
            .warn("Minimum price is above the maximum; nothing can match.");
    }

    let gateway = ctx.gateway()?;
    let spinner = ctx.output.spinner("Loading products...");
    let result = gateway.list_products(&ProductQuery::new(criteria.clone())).await;
    spinner.finish_and_clear();
    let products = result?;

    let mut ordered: Vec<&Product> = products.iter().collect();
    sort_products(&mut ordered, sort);
    let ordered: Vec<Product> = ordered.into_iter().cloned().collect();
    let limit = args.limit.unwrap_or(ctx.config.catalog.page_size);
    let page = Page::from_slice(&ordered, PageRequest::new(args.page, limit));

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "criteria": criteria,
            "sort": sort.as_str(),
            "products": page.items,
            "pagination": page.pagination,
        }));
        return Ok(());
    }

    ctx.output.header(&format!(
        "Produtos ({} filtro(s), {})",
        criteria.active_count(),
        sort.display_name()
    ));
    if page.items.is_empty() {
        ctx.output.info("Nenhum produto encontrado.");
        return Ok(());
    }

    let widths = [28, 14, 10, 12, 10];
    ctx.output
        .table_row(&["Nome", "Categoria", "Material", "Preço", "Estoque"], &widths);
    for product in &page.items {
        let name = truncate(&product.name, widths[0]);
        let category = product
            .category
            .as_ref()
            .map(|c| c.display_name().to_string())
            .unwrap_or_default();
        let material = product
            .material
            .as_ref()
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let price = product.price.display();
        let stock = stock_badge(product);
        ctx.output.table_row(
            &[
                name.as_str(),
                category.as_str(),
                material.as_str(),
                price.as_str(),
                stock.as_str(),
            ],
            &widths,
        );
    }

    let p = &page.pagination;
    ctx.output.info(&format!(
        "Mostrando {}-{} de {} (página {}/{})",
        p.start_item(),
        p.end_item(),
        p.total,
        p.page,
        p.total_pages
    ));
    Ok(())
}

fn parse_price(flag: &str, value: Option<&str>) -> Result<Option<Money>> {
    value
        .map(|v| Money::parse(v, STORE_CURRENCY).with_context(|| format!("Invalid {}: {}", flag, v)))
        .transpose()
}

/// Build the filter from command-line flags.
fn criteria_from(args: &ProductsArgs) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();
    if let Some(term) = args.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        criteria = criteria.with_search(term);
    }
    if let Some(category) = &args.category {
        criteria = criteria.with_category(Category::parse(category));
    }
    if let Some(material) = &args.material {
        criteria = criteria.with_material(Material::parse(material));
    }
    let min = parse_price("--min-price", args.min_price.as_deref())?;
    let max = parse_price("--max-price", args.max_price.as_deref())?;
    if min.map(|m| m.is_negative()).unwrap_or(false) || max.map(|m| m.is_negative()).unwrap_or(false) {
        bail!("Prices cannot be negative");
    }
    criteria = criteria.with_price_range(min, max);
    if args.featured {
        criteria = criteria.featured();
    }
    Ok(criteria)
}
