//! Built-in catalog used when no stored product collection exists

use crate::core::pricing::SALE_PRICE;
use crate::types::{Gender, Product, SockType};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

/// Opening stock of every built-in product
pub const DEFAULT_STOCK: u32 = 100;

fn published(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}?q=80&w=800&auto=format&fit=crop")
}

/// The four launch products, in catalog order
pub fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: "am-1".to_string(),
            name: "Amanecer Oso Pink".to_string(),
            price: SALE_PRICE,
            sock_type: SockType::Zoquete,
            gender: Gender::Mujer,
            images: vec![
                unsplash("photo-1582966298601-83c44a162935"),
                unsplash("photo-1590243455799-73e48810c926"),
            ],
            stock: DEFAULT_STOCK,
            description: "Diseño Amanecer con tierno personaje de oso en fondo rosa pastel."
                .to_string(),
            sales_count: 45,
            created_at: published(2024, 1, 10),
        },
        Product {
            id: "am-2".to_string(),
            name: "Amanecer Doggy White".to_string(),
            price: SALE_PRICE,
            sock_type: SockType::Zoquete,
            gender: Gender::Unisex,
            images: vec![
                unsplash("photo-1603533273187-54890d70305a"),
                unsplash("photo-1543163521-1bf539c55dd2"),
            ],
            stock: DEFAULT_STOCK,
            description: "Personaje Snoopy-style sobre base blanca de algodón premium."
                .to_string(),
            sales_count: 120,
            created_at: published(2024, 1, 15),
        },
        Product {
            id: "am-3".to_string(),
            name: "Amanecer Seal Blue".to_string(),
            price: SALE_PRICE,
            sock_type: SockType::Quarter,
            gender: Gender::Unisex,
            images: vec![
                unsplash("photo-1542219550-37153d387c27"),
                unsplash("photo-1581655353564-df123a1ec124"),
            ],
            stock: DEFAULT_STOCK,
            description: "Medias 1/4 con diseño de foca y detalles celestes.".to_string(),
            sales_count: 30,
            created_at: published(2024, 2, 1),
        },
        Product {
            id: "st-vans".to_string(),
            name: "Street Vans Classic".to_string(),
            price: Decimal::new(2200, 0),
            sock_type: SockType::Quarter,
            gender: Gender::Unisex,
            images: vec![
                unsplash("photo-1620138546344-7b2c38516edf"),
                unsplash("photo-1525966222134-fcfa99b8ae77"),
            ],
            stock: DEFAULT_STOCK,
            description: "El clásico logo de Vans en negro profundo, ideal para skaters."
                .to_string(),
            sales_count: 200,
            created_at: published(2023, 12, 20),
        },
    ]
}
