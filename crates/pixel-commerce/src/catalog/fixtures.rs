//! Built-in demo catalog.
//!
//! Seeds the offline CLI mode and the in-memory gateway, and doubles as the
//! reference data set for tests.

use crate::catalog::{Category, Material, Product};
use crate::ids::ProductId;
use crate::money::Money;
use chrono::{DateTime, TimeZone, Utc};

fn demo_id(n: u8) -> ProductId {
    ProductId::new(format!("00000000-0000-4000-8000-{:012}", n))
}

fn january(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn demo(
    n: u8,
    name: &str,
    description: &str,
    cents: i64,
    stock: i64,
    category: Category,
    material: Material,
    hours: f64,
    day: u32,
    featured: bool,
) -> Product {
    Product {
        id: demo_id(n),
        name: name.to_string(),
        description: Some(description.to_string()),
        price: Money::brl(cents),
        stock_quantity: stock,
        images_url: vec!["/logo.png".to_string()],
        category: Some(category),
        material: Some(material),
        print_time_hours: Some(hours),
        is_featured: featured,
        is_active: true,
        created_at: january(day),
        updated_at: january(day),
    }
}

/// The six demo products, oldest last.
pub fn demo_products() -> Vec<Product> {
    vec![
        demo(
            1,
            "Benchy Clássico",
            "O famoso barco de teste para impressoras 3D. Perfeito para calibração e testes de qualidade.",
            2990,
            15,
            Category::Miniatures,
            Material::Pla,
            3.5,
            15,
            true,
        ),
        demo(
            2,
            "Dragão Pixel Art",
            "Dragão estilizado em pixel art, ideal para decoração e colecionadores.",
            4590,
            8,
            Category::Decorative,
            Material::Petg,
            6.0,
            14,
            true,
        ),
        demo(
            3,
            "Suporte para Celular",
            "Suporte ergonômico para celular, compatível com diversos tamanhos.",
            1990,
            25,
            Category::Functional,
            Material::Abs,
            2.0,
            13,
            false,
        ),
        demo(
            4,
            "Miniatura RPG - Guerreiro",
            "Miniatura detalhada de guerreiro para jogos de RPG de mesa.",
            3590,
            12,
            Category::Gaming,
            Material::Other("Resina".to_string()),
            4.5,
            12,
            true,
        ),
        demo(
            5,
            "Vaso Geométrico",
            "Vaso decorativo com padrões geométricos modernos.",
            3990,
            6,
            Category::Decorative,
            Material::Pla,
            5.0,
            11,
            false,
        ),
        demo(
            6,
            "Ferramenta de Calibração",
            "Kit de ferramentas para calibração precisa da impressora 3D.",
            2490,
            0,
            Category::Tools,
            Material::Abs,
            1.5,
            10,
            false,
        ),
    ]
}

/// Demo cart contents as (product, quantity): two Benchys, a dragon and a phone stand.
pub fn demo_cart() -> Vec<(Product, i64)> {
    let products = demo_products();
    [(0usize, 2i64), (1, 1), (2, 1)]
        .into_iter()
        .filter_map(|(idx, qty)| products.get(idx).cloned().map(|p| (p, qty)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_shape() {
        let products = demo_products();
        assert_eq!(products.len(), 6);
        assert!(products.iter().all(|p| p.id.is_uuid()));
        assert!(products.iter().all(|p| p.price.is_positive()));
        assert_eq!(products[0].created_at.to_rfc3339(), "2024-01-15T10:00:00+00:00");
        assert!(products[5].is_out_of_stock());
    }

    #[test]
    fn test_demo_cart() {
        let cart = demo_cart();
        assert_eq!(cart.len(), 3);
        assert_eq!(cart[0].1, 2);
        assert_eq!(cart[0].0.name, "Benchy Clássico");
    }
}
