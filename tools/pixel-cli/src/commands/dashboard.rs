//! Admin dashboard summary.

use anyhow::Result;
use pixel_commerce::dashboard::{low_stock, monthly_revenue, CatalogOverview};
use serde_json::json;

use super::DashboardArgs;
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the dashboard command.
pub async fn run(args: DashboardArgs, ctx: &Context) -> Result<()> {
    let gateway = ctx.gateway()?;

    let spinner = ctx.output.spinner("Loading dashboard...");
    let result = futures::try_join!(
        gateway.dashboard_stats(),
        gateway.top_products(args.top),
        gateway.recent_orders(args.recent),
        gateway.list_all_products(),
        gateway.all_orders(),
    );
    spinner.finish_and_clear();
    let (stats, top, recent, products, orders) = result?;

    let overview = CatalogOverview::of(&products);
    let running_low = low_stock(&products);
    let by_month = monthly_revenue(&orders, stats.total_revenue.currency)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "stats": stats,
            "catalog": overview,
            "top_products": top,
            "recent_orders": recent,
            "monthly_revenue": by_month,
            "low_stock": running_low,
        }));
        return Ok(());
    }

    ctx.output.header("Painel");
    ctx.output.kv("Produtos", &stats.total_products.to_string());
    ctx.output.kv("Pedidos", &stats.total_orders.to_string());
    ctx.output.kv("Usuários", &stats.total_users.to_string());
    ctx.output.kv("Receita", &stats.total_revenue.display());
    ctx.output.kv(
        "Catálogo",
        &format!(
            "{} ativos, {} em destaque, {} esgotados",
            overview.active, overview.featured, overview.out_of_stock
        ),
    );

    if !by_month.is_empty() {
        ctx.output.header("Receita por mês");
        for month in &by_month {
            ctx.output.kv(&month.month, &month.revenue.display());
        }
    }

    ctx.output.header("Mais vendidos");
    if top.is_empty() {
        ctx.output.info("Nenhuma venda ainda.");
    }
    for (rank, product) in top.iter().enumerate() {
        ctx.output.list_item(&format!(
            "{}. {} ({} un., {})",
            rank + 1,
            truncate(&product.name, 32),
            product.total_sales,
            product.total_revenue.display()
        ));
    }

    ctx.output.header("Pedidos recentes");
    if recent.is_empty() {
        ctx.output.info("Nenhum pedido.");
    }
    let widths = [10, 18, 12, 12];
    for order in &recent {
        let id: String = order.id.as_str().chars().take(8).collect();
        let date = order.created_at.format("%d/%m/%Y %H:%M").to_string();
        let total = order.total_price.display();
        let status = status_badge(order.status);
        ctx.output.table_row(
            &[id.as_str(), date.as_str(), total.as_str(), status.as_str()],
            &widths,
        );
    }

    if !running_low.is_empty() {
        ctx.output.header("Estoque baixo");
        for product in &running_low {
            ctx.output.list_item(&format!(
                "{} ({} restantes)",
                product.name, product.stock_quantity
            ));
        }
    }
    Ok(())
}
