//! Live PostgreSQL tests.
//!
//! Run with `ORMA_TEST_DATABASE_URL` pointing at a scratch database and
//! `cargo test -- --ignored`. Each test drops its tables first.

use std::sync::Arc;

use crate::common::models;
use orma::prelude::*;

fn database() -> Database {
    let url = std::env::var("ORMA_TEST_DATABASE_URL").unwrap_or_else(|_| {
        "host=localhost user=postgres password=postgres dbname=orma_test".into()
    });
    Database::connect_str(&url).expect("valid connection string")
}

#[test]
#[ignore = "needs a PostgreSQL server"]
fn campaign_round_trip() {
    let db = database();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);
    campaigns.drop_table().unwrap();

    campaigns.create_table().unwrap();
    assert!(campaigns.table_exists().unwrap());
    assert!(db.table_exists("campaign").unwrap());

    let mut campaign = models
        .campaign
        .instantiate(fields! {
            campaign_id => 1578451881i64,
            structure_value => "venum",
            status => "ENABLED",
        })
        .unwrap();
    campaigns.insert(&mut campaign).unwrap();
    assert_eq!(campaign.id(), Some(1));

    let found = campaigns
        .find(fields! { campaign_id => 1578451881i64 })
        .unwrap();
    assert_eq!(found, [campaign.clone()]);

    let err = campaigns.insert(&mut campaign).unwrap_err();
    assert!(matches!(err, OrmaError::AlreadyPersisted { .. }));
    assert_eq!(campaigns.find(fields! {}).unwrap().len(), 1);

    campaigns.drop_table().unwrap();
}

#[test]
#[ignore = "needs a PostgreSQL server"]
fn parameters_follow_column_types() {
    let db = database();
    let models = models();
    let search_terms = Manager::new(&db, &models.search_term);
    search_terms.drop_table().unwrap();
    search_terms.create_table().unwrap();

    let mut batch: Vec<Entity> = (1..=3)
        .map(|n| {
            models
                .search_term
                .instantiate(fields! {
                    date => "2021-03-04",
                    ad_group_id => n,
                    campaign_id => 1,
                    clicks => n * 10,
                    cost => 1.5,
                    conversion_value => "4.25",
                    conversions => 1,
                    search_term => format!("term {}", n),
                })
                .unwrap()
        })
        .collect();
    search_terms.insert_many(&mut batch).unwrap();
    assert!(batch.iter().all(Entity::is_persisted));

    let rows = search_terms
        .query_rows(
            "SELECT search_term, conversion_value / cost AS roas FROM searchterm \
             WHERE clicks >= $1 ORDER BY clicks DESC",
            &params![20],
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("search_term"), Some(&Value::from("term 3")));

    let schema = Arc::new(
        SchemaType::builder("Roas")
            .field("search_term", SchemaField::string())
            .field("roas", SchemaField::decimal())
            .build(),
    );
    let output = Schema::many(&schema, &rows).into_json().unwrap();
    let roas = output[0]["roas"].as_str().unwrap();
    assert!(roas.starts_with("2.8333"), "{}", roas);

    search_terms.drop_table().unwrap();
}
