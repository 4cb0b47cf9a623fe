//! Relational mapper behaviour against the in-memory executor.

use std::sync::Arc;

use crate::common::{MemoryDatabase, models};
use orma::prelude::*;

fn campaign_fields() -> [(&'static str, Value); 3] {
    fields! {
        campaign_id => 1578451881i64,
        structure_value => "venum",
        status => "ENABLED",
    }
}

#[test]
fn create_table_then_table_exists() {
    let db = MemoryDatabase::new();
    let models = models();

    for ty in models.registry.iter() {
        let manager = Manager::new(&db, ty);
        assert!(!manager.table_exists().unwrap());
        manager.create_table().unwrap();
        assert!(manager.table_exists().unwrap());
        assert!(orma::postgres::table_exists(&db, &ty.table_name()).unwrap());
    }

    let names: Vec<_> = models.registry.names().collect();
    assert_eq!(names, ["Campaign", "AdGroup", "SearchTerm"]);
    assert!(!orma::postgres::table_exists(&db, "campaigns").unwrap());
}

#[test]
fn campaign_round_trip() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);
    campaigns.create_table().unwrap();

    assert_eq!(
        db.statements()[0],
        "CREATE TABLE IF NOT EXISTS campaign (id serial PRIMARY KEY, \
         campaign_id bigint NOT NULL, structure_value varchar(255) NOT NULL, \
         status varchar(255) NOT NULL)"
    );

    let mut campaign = models.campaign.instantiate(campaign_fields()).unwrap();
    assert_eq!(campaign.id(), None);
    campaigns.insert(&mut campaign).unwrap();
    assert_eq!(campaign.id(), Some(1));

    let found = campaigns
        .find(fields! { campaign_id => 1578451881i64 })
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0], campaign);
    assert_eq!(found[0].get("structure_value"), Some(&Value::from("venum")));

    let by_id = campaigns.find(fields! { id => 1 }).unwrap();
    assert_eq!(by_id, [campaign]);
}

#[test]
fn reinsert_is_rejected_without_touching_storage() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);
    campaigns.create_table().unwrap();

    let mut campaign = models.campaign.instantiate(campaign_fields()).unwrap();
    campaigns.insert(&mut campaign).unwrap();
    let scopes = db.scopes();

    let err = campaigns.insert(&mut campaign).unwrap_err();
    assert!(matches!(err, OrmaError::AlreadyPersisted { id: 1, .. }));
    assert_eq!(db.scopes(), scopes);
    assert_eq!(db.row_count("campaign"), 1);
    assert_eq!(campaign.id(), Some(1));
}

#[test]
fn get_fetches_a_single_row() {
    let db = MemoryDatabase::new();
    let models = models();
    let ad_groups = Manager::new(&db, &models.ad_group);
    ad_groups.create_table().unwrap();

    for (id, alias) in [(10i64, "brand"), (11, "brand"), (12, "generic")] {
        let mut group = models
            .ad_group
            .instantiate(fields! {
                ad_group_id => id,
                campaign_id => 1,
                alias => alias,
                status => "ENABLED",
            })
            .unwrap();
        ad_groups.insert(&mut group).unwrap();
    }

    let first = ad_groups.get(fields! { alias => "brand" }).unwrap().unwrap();
    assert_eq!(first.get("ad_group_id"), Some(&Value::Integer(10)));
    assert!(db.statements().last().unwrap().ends_with(" LIMIT 1"));

    assert!(ad_groups.get(fields! { alias => "missing" }).unwrap().is_none());
    assert_eq!(ad_groups.find(fields! {}).unwrap().len(), 3);
    assert_eq!(
        ad_groups
            .find(fields! { alias => "brand", status => "ENABLED" })
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn unknown_predicate_column_fails_before_execution() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);

    let err = campaigns.find(fields! { budget => 10 }).unwrap_err();
    assert!(matches!(err, OrmaError::UnknownField { ref field, .. } if field == "budget"));
    assert_eq!(db.scopes(), 0);
}

#[test]
fn unmapped_type_fails_before_execution() {
    let db = MemoryDatabase::new();
    let wallet = EntityType::builder("Wallet")
        .field("balance", FieldDescriptor::custom("money"))
        .build();

    let err = orma::postgres::create_table(&db, &wallet).unwrap_err();
    assert!(matches!(err, OrmaError::SchemaMapping { ref field, .. } if field == "balance"));
    assert_eq!(db.scopes(), 0);

    let wallet = EntityType::builder("Wallet")
        .override_type_named("money", ColumnType::new("numeric").arg(12).arg(2))
        .field("balance", FieldDescriptor::custom("money"))
        .build();
    orma::postgres::create_table(&db, &wallet).unwrap();
    assert!(db.statements()[0].contains("balance numeric(12, 2) NOT NULL"));
}

#[test]
fn every_operation_is_one_committed_scope() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);

    campaigns.create_table().unwrap();
    let mut campaign = models.campaign.instantiate(campaign_fields()).unwrap();
    campaigns.insert(&mut campaign).unwrap();
    campaigns.find(fields! { status => "ENABLED" }).unwrap();
    campaigns.get(fields! { status => "ENABLED" }).unwrap();

    assert_eq!(db.scopes(), 4);
    assert_eq!(db.commits(), 4);
}

#[test]
fn insert_many_is_all_or_nothing() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);
    campaigns.create_table().unwrap();

    let batch = |ids: &[i64]| -> Vec<Entity> {
        ids.iter()
            .map(|id| {
                models
                    .campaign
                    .instantiate(fields! {
                        campaign_id => *id,
                        structure_value => "venum",
                        status => "PAUSED",
                    })
                    .unwrap()
            })
            .collect()
    };

    let mut failing = batch(&[1, 2, 3]);
    db.fail_at(2);
    let err = campaigns.insert_many(&mut failing).unwrap_err();
    assert!(matches!(err, OrmaError::Execution(_)));
    assert!(failing.iter().all(|c| !c.is_persisted()));
    assert_eq!(db.row_count("campaign"), 0);

    let mut entities = batch(&[1, 2, 3]);
    campaigns.insert_many(&mut entities).unwrap();
    let ids: Vec<_> = entities.iter().map(Entity::id).collect();
    assert_eq!(ids, [Some(1), Some(2), Some(3)]);
    assert_eq!(db.row_count("campaign"), 3);

    let err = campaigns.insert_many(&mut entities).unwrap_err();
    assert!(matches!(err, OrmaError::AlreadyPersisted { .. }));
    assert_eq!(db.row_count("campaign"), 3);
}

#[test]
fn insert_rejects_foreign_entity_types() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);

    let mut group = models.ad_group.instantiate(fields! { alias => "brand" }).unwrap();
    let err = campaigns.insert(&mut group).unwrap_err();
    assert!(matches!(
        err,
        OrmaError::TypeMismatch { ref expected, ref found } if expected == "Campaign" && found == "AdGroup"
    ));
}

#[test]
fn raw_queries() {
    let db = MemoryDatabase::new();
    let models = models();
    let campaigns = Manager::new(&db, &models.campaign);
    campaigns.create_table().unwrap();

    for (id, status) in [(1i64, "ENABLED"), (2, "PAUSED"), (3, "ENABLED")] {
        let mut campaign = models
            .campaign
            .instantiate(fields! { campaign_id => id, structure_value => "x", status => status })
            .unwrap();
        campaigns.insert(&mut campaign).unwrap();
    }

    let enabled = campaigns
        .query("SELECT * FROM campaign WHERE status = $1", &params!["ENABLED"])
        .unwrap();
    let ids: Vec<_> = enabled
        .iter()
        .filter_map(|c| c.get("campaign_id").and_then(Value::as_i64))
        .collect();
    assert_eq!(ids, [1, 3]);

    let rows = campaigns
        .query_rows("SELECT * FROM campaign WHERE id = $1", &params![2])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("status"), Some(&Value::from("PAUSED")));
}

#[test]
fn drop_table_removes_the_table() {
    let db = MemoryDatabase::new();
    let models = models();
    let search_terms = Manager::new(&db, &models.search_term);

    search_terms.create_table().unwrap();
    assert!(search_terms.table_exists().unwrap());
    search_terms.drop_table().unwrap();
    assert!(!search_terms.table_exists().unwrap());
    assert_eq!(search_terms.table_name(), "searchterm");
}

#[test]
fn subtype_plan_and_storage_order() {
    let db = MemoryDatabase::new();
    let base = EntityType::builder("Base")
        .field("a", FieldDescriptor::integer())
        .field("b", FieldDescriptor::integer())
        .build();
    let sub = Arc::new(
        EntityType::builder("Sub")
            .extends(&Arc::new(base))
            .field("b", FieldDescriptor::text().default("x"))
            .field("c", FieldDescriptor::boolean())
            .build(),
    );

    let names: Vec<_> = sub.plan().names().collect();
    assert_eq!(names, ["a", "b", "c"]);

    let subs = Manager::new(&db, &sub);
    subs.create_table().unwrap();
    assert_eq!(
        db.statements()[0],
        "CREATE TABLE IF NOT EXISTS sub (id serial PRIMARY KEY, a bigint NOT NULL, \
         b varchar(255) DEFAULT 'x', c boolean NOT NULL)"
    );

    let mut row = sub.instantiate(fields! { a => 1, c => true }).unwrap();
    subs.insert(&mut row).unwrap();
    let stored = subs.get(fields! { id => 1 }).unwrap().unwrap();
    assert_eq!(stored.get("b"), Some(&Value::from("x")));
    assert_eq!(stored, row);
}

#[test]
fn identity_column_clash_fails_before_execution() {
    let db = MemoryDatabase::new();
    let clash = EntityType::builder("Clash")
        .field("id", FieldDescriptor::integer())
        .build();

    let err = orma::postgres::create_table(&db, &clash).unwrap_err();
    assert!(matches!(err, OrmaError::ReservedColumn { ref field, .. } if field == "id"));
    assert_eq!(db.scopes(), 0);
}
