//! Built-in document types: `product` and the `category` it references.

use super::rules::Rule;
use super::types::{Derivation, FieldDef, FieldOptions, FieldType, Schema};

pub const PRODUCT: &str = "product";
pub const CATEGORY: &str = "category";

/// Size options a product may list
pub const SIZES: &[(&str, &str)] = &[
    ("Small", "S"),
    ("Medium", "M"),
    ("Large", "L"),
    ("Extra Large", "XL"),
];

/// Color options a product may list
pub const COLORS: &[(&str, &str)] = &[
    ("Red", "#ff0000"),
    ("Blue", "#0000ff"),
    ("Green", "#00ff00"),
    ("Yellow", "#ffff00"),
    ("Black", "#000000"),
    ("White", "#ffffff"),
];

fn slug_from(source: &str) -> FieldDef {
    FieldDef::new("slug", FieldType::Slug)
        .title("Slug")
        .required()
        .rule(Rule::MaxLength(200))
        .options(FieldOptions {
            source: Some(source.to_string()),
            ..FieldOptions::default()
        })
}

/// The `product` document type
pub fn product_schema() -> Schema {
    Schema::new(
        PRODUCT,
        "Product",
        vec![
            FieldDef::new("name", FieldType::String)
                .title("Product Name")
                .required()
                .rule(Rule::MaxLength(100))
                .error("Product name is required and cannot exceed 100 characters."),
            slug_from("name")
                .description("URL-friendly identifier for the product.")
                .error("Slug is required for product identification."),
            FieldDef::new("description", FieldType::Text)
                .title("Description")
                .description("Detailed description of the product.")
                .required()
                .rule(Rule::MinLength(20))
                .rule(Rule::MaxLength(500))
                .error("Description must be between 20 and 500 characters."),
            FieldDef::new("price", FieldType::Number)
                .title("Product Price")
                .required()
                .rule(Rule::Min(0.0))
                .error("Product price must be a positive value."),
            FieldDef::new("discountPercentage", FieldType::Number)
                .title("Discount Percentage")
                .description("Percentage discount on the product.")
                .rule(Rule::Min(0.0))
                .rule(Rule::Max(100.0))
                .error("Discount percentage must be between 0 and 100."),
            FieldDef::new("priceWithoutDiscount", FieldType::Number)
                .title("Original Price")
                .description("Original price of the product before discount.")
                .derived(Derivation::OriginalPrice {
                    price: "price".into(),
                    discount: "discountPercentage".into(),
                }),
            FieldDef::new("rating", FieldType::Number)
                .title("Product Rating")
                .rule(Rule::Min(0.0))
                .rule(Rule::Max(5.0))
                .rule(Rule::Precision(1))
                .error("Rating must be between 0 and 5."),
            FieldDef::new("ratingCount", FieldType::Number)
                .title("Rating Count")
                .description("Total number of ratings received by the product.")
                .rule(Rule::Min(0.0))
                .error("Rating count must be a positive value."),
            FieldDef::new("tags", FieldType::Array)
                .title("Tags")
                .description("Tags associated with the product.")
                .options(FieldOptions {
                    layout: Some("tags".into()),
                    ..FieldOptions::default()
                }),
            FieldDef::new("sizes", FieldType::Array)
                .title("Available Sizes")
                .description("Available sizes of the product.")
                .list(SIZES),
            FieldDef::new("image", FieldType::Image)
                .title("Product Image")
                .description("Image of the product.")
                .required()
                .options(FieldOptions {
                    hotspot: true,
                    ..FieldOptions::default()
                })
                .error("Product image is required"),
            FieldDef::new("colors", FieldType::Array)
                .title("Available Colors")
                .description("Colors available for the product.")
                .list(COLORS),
            FieldDef::new("category", FieldType::Reference)
                .title("Product Category")
                .description("Category of the product.")
                .to(CATEGORY),
        ],
    )
}

/// The `category` document type
pub fn category_schema() -> Schema {
    Schema::new(
        CATEGORY,
        "Category",
        vec![
            FieldDef::new("name", FieldType::String)
                .title("Category Name")
                .required()
                .rule(Rule::MaxLength(100))
                .error("Category name is required and cannot exceed 100 characters."),
            slug_from("name").error("Slug is required for category identification."),
        ],
    )
}
