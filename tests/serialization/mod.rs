//! Serialization engine over entities, rows and custom sources.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use crate::common::{MemoryDatabase, models, search_result_schema};
use orma::prelude::*;

struct Author {
    name: String,
}

struct Book {
    title: String,
    author: Option<Author>,
}

impl Source for Author {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        match name {
            "name" => Some(Attribute::owned(self.name.as_str())),
            _ => None,
        }
    }
}

impl Source for Book {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        match name {
            "title" => Some(Attribute::owned(self.title.as_str())),
            "author" => Some(match &self.author {
                Some(author) => Attribute::Object(author),
                None => Attribute::owned(Value::Null),
            }),
            _ => None,
        }
    }
}

fn book_schemas() -> (Arc<SchemaType>, Arc<SchemaType>) {
    let author = Arc::new(
        SchemaType::builder("AuthorSchema")
            .field("name", SchemaField::string().label("full_name"))
            .build(),
    );
    let book = Arc::new(
        SchemaType::builder("BookSchema")
            .field("title", SchemaField::string().label("full_title"))
            .field(
                "author",
                SchemaField::nested(&author).label("original_author"),
            )
            .build(),
    );
    (author, book)
}

#[test]
fn labelled_fields() {
    let book = Arc::new(
        SchemaType::builder("BookSchema")
            .field("title", SchemaField::string().label("full_title"))
            .field("author", SchemaField::string().label("original_author"))
            .build(),
    );

    let input = json!({"title": "Book", "author": "John"});
    assert_eq!(
        Schema::one(&book, &input).serialize().unwrap(),
        &json!({"full_title": "Book", "original_author": "John"})
    );

    let input = json!({"title": "Book", "author": null});
    let err = Schema::one(&book, &input).serialize().unwrap_err();
    assert!(matches!(err, OrmaError::MissingRequiredField { ref field } if field == "author"));
}

#[test]
fn nested_composition() {
    let (_, book_schema) = book_schemas();
    let book = Book {
        title: "Book".to_string(),
        author: Some(Author {
            name: "John".to_string(),
        }),
    };

    let output = Schema::one(&book_schema, &book).into_json().unwrap();
    assert_eq!(
        output,
        json!({"full_title": "Book", "original_author": {"full_name": "John"}})
    );

    let orphan = Book {
        title: "Book".to_string(),
        author: None,
    };
    let err = Schema::one(&book_schema, &orphan).serialize().unwrap_err();
    assert!(matches!(err, OrmaError::MissingRequiredField { .. }));
}

#[test]
fn nested_schemas_serialize_one_instance_in_batch_mode() {
    let (_, book_schema) = book_schemas();
    let books = [
        Book {
            title: "A".to_string(),
            author: Some(Author {
                name: "X".to_string(),
            }),
        },
        Book {
            title: "B".to_string(),
            author: Some(Author {
                name: "Y".to_string(),
            }),
        },
    ];

    let output = Schema::many(&book_schema, &books).into_json().unwrap();
    assert_eq!(
        output,
        json!([
            {"full_title": "A", "original_author": {"full_name": "X"}},
            {"full_title": "B", "original_author": {"full_name": "Y"}},
        ])
    );
}

#[test]
fn search_results_from_stored_entities() {
    let db = MemoryDatabase::new();
    let models = models();
    let search_terms = Manager::new(&db, &models.search_term);
    search_terms.create_table().unwrap();

    let date = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
    let mut term = models
        .search_term
        .instantiate(fields! {
            date => date,
            ad_group_id => 7,
            campaign_id => 1578451881i64,
            clicks => 12,
            cost => Decimal::from_str("3.50").unwrap(),
            conversion_value => Decimal::from_str("10.25").unwrap(),
            conversions => 2,
            search_term => "running shoes",
        })
        .unwrap();
    search_terms.insert(&mut term).unwrap();

    let found = search_terms.find(fields! { ad_group_id => 7 }).unwrap();
    let schema = Schema::many(&search_result_schema(), &found);
    assert_eq!(
        schema.serialize().unwrap(),
        &json!([{
            "ad_group": 7,
            "campaign": 1578451881i64,
            "clicks": 12,
            "conversion_value": "10.25",
            "cost": "3.50",
            "search_term": "running shoes",
            "date": "2021-03-04",
        }])
    );
}

#[test]
fn entity_identity_and_optional_fields() {
    let models = models();
    let schema = Arc::new(
        SchemaType::builder("CampaignSchema")
            .field("id", SchemaField::integer().optional())
            .field("campaign_id", SchemaField::integer())
            .field("status", SchemaField::string())
            .build(),
    );

    let mut campaign = models
        .campaign
        .instantiate(fields! { campaign_id => 1, status => "ENABLED" })
        .unwrap();
    assert_eq!(
        Schema::one(&schema, &campaign).into_json().unwrap(),
        json!({"campaign_id": 1, "status": "ENABLED"})
    );

    campaign.assign_id(9).unwrap();
    assert_eq!(
        Schema::one(&schema, &campaign).into_json().unwrap(),
        json!({"id": 9, "campaign_id": 1, "status": "ENABLED"})
    );
}

#[test]
fn rows_with_computed_columns() {
    let schema = Arc::new(
        SchemaType::builder("RoasSchema")
            .field("search_term", SchemaField::string())
            .field("roas", SchemaField::float())
            .build(),
    );
    let rows: Vec<Row> = vec![
        Row::from_iter([("search_term", Value::from("shoes")), ("roas", Value::from(2.5))]),
        Row::from_iter([("search_term", Value::from("boots")), ("roas", Value::from(1i64))]),
    ];

    assert_eq!(
        Schema::many(&schema, &rows).into_json().unwrap(),
        json!([
            {"search_term": "shoes", "roas": 2.5},
            {"search_term": "boots", "roas": 1.0},
        ])
    );
}

#[test]
fn converter_rejection_is_a_type_conversion_error() {
    let schema = Arc::new(
        SchemaType::builder("Strict")
            .field(
                "status",
                SchemaField::custom(|value| match value.as_str() {
                    Some(s @ ("ENABLED" | "PAUSED")) => Ok(json!(s.to_lowercase())),
                    _ => Err(format!("unknown status {}", value)),
                }),
            )
            .build(),
    );

    let ok = json!({"status": "PAUSED"});
    assert_eq!(
        Schema::one(&schema, &ok).into_json().unwrap(),
        json!({"status": "paused"})
    );

    let bad = json!({"status": "REMOVED"});
    let err = Schema::one(&schema, &bad).serialize().unwrap_err();
    assert!(matches!(
        err,
        OrmaError::TypeConversion { ref field, ref message } if field == "status" && message.contains("REMOVED")
    ));
}

#[test]
fn registered_schemas_extend_each_other() {
    let mut registry = SchemaRegistry::new();
    let base = SchemaType::builder("Base")
        .field("a", SchemaField::raw())
        .field("b", SchemaField::raw())
        .register(&mut registry)
        .unwrap();
    let sub = SchemaType::builder("Sub")
        .extends(&base)
        .field("b", SchemaField::string().label("bee"))
        .field("c", SchemaField::raw().optional())
        .register(&mut registry)
        .unwrap();

    let keys: Vec<_> = sub.output_keys().collect();
    assert_eq!(keys, ["a", "bee", "c"]);
    assert!(registry.get("Sub").is_some());

    let input = json!({"a": [1, 2], "b": 3});
    assert_eq!(
        Schema::one(&sub, &input).into_json().unwrap(),
        json!({"a": [1, 2], "bee": "3"})
    );
}

#[test]
fn schema_derived_from_an_entity_type() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);
    campaigns.create_table().unwrap();

    let mut campaign = models
        .campaign
        .instantiate(fields! { campaign_id => 5, structure_value => "venum", status => "PAUSED" })
        .unwrap();
    campaigns.insert(&mut campaign).unwrap();

    let schema = Arc::new(
        SchemaTypeBuilder::from_entity(&models.campaign)
            .field("id", SchemaField::integer())
            .build(),
    );
    let found = campaigns.find(fields! {}).unwrap();
    assert_eq!(
        Schema::many(&schema, &found).into_json().unwrap(),
        json!([{"campaign_id": 5, "structure_value": "venum", "status": "PAUSED", "id": 1}])
    );
}
