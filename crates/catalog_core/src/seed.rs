//! Default catalog contents for fresh databases.

use crate::model::product::Product;

/// Returns the default 12-product catalog, in insertion order.
pub fn default_products() -> Vec<Product> {
    vec![
        Product::with_id("1", "Wireless Mouse", "Electronics", 50.0, true),
        Product::with_id("2", "Noise-Cancelling Headphones", "Electronics", 150.0, true),
        Product::with_id("3", "Smart Watch", "Electronics", 250.0, false),
        Product::with_id("4", "The Rust Programming Language", "Books", 39.99, true),
        Product::with_id("5", "Designing Data-Intensive Applications", "Books", 45.5, false),
        Product::with_id("6", "Espresso Machine", "Home Appliances", 320.0, true),
        Product::with_id("7", "Robot Vacuum", "Home Appliances", 199.0, false),
        Product::with_id("8", "Blender", "Home Appliances", 89.0, true),
        Product::with_id("9", "Running Shoes", "Sports", 120.0, true),
        Product::with_id("10", "Yoga Mat", "Sports", 25.0, true),
        Product::with_id("11", "Rain Jacket", "Clothing", 95.0, false),
        Product::with_id("12", "Wool Sweater", "Clothing", 70.0, true),
    ]
}
