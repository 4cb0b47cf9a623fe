use std::sync::Arc;

use orma::prelude::*;

/// The three ad-reporting entity types, registered in declaration order.
pub struct Models {
    pub registry: TypeRegistry,
    pub campaign: Arc<EntityType>,
    pub ad_group: Arc<EntityType>,
    pub search_term: Arc<EntityType>,
}

pub fn models() -> Models {
    let mut registry = TypeRegistry::new();

    let campaign = EntityType::builder("Campaign")
        .field("campaign_id", FieldDescriptor::integer())
        .field("structure_value", FieldDescriptor::text())
        .field("status", FieldDescriptor::text())
        .register(&mut registry)
        .unwrap();

    let ad_group = EntityType::builder("AdGroup")
        .field("ad_group_id", FieldDescriptor::integer())
        .field("campaign_id", FieldDescriptor::integer())
        .field("alias", FieldDescriptor::text())
        .field("status", FieldDescriptor::text())
        .register(&mut registry)
        .unwrap();

    let search_term = EntityType::builder("SearchTerm")
        .field("date", FieldDescriptor::date())
        .field("ad_group_id", FieldDescriptor::integer())
        .field("campaign_id", FieldDescriptor::integer())
        .field("clicks", FieldDescriptor::integer())
        .field("cost", FieldDescriptor::decimal())
        .field("conversion_value", FieldDescriptor::decimal())
        .field("conversions", FieldDescriptor::integer())
        .field("search_term", FieldDescriptor::text())
        .register(&mut registry)
        .unwrap();

    Models {
        registry,
        campaign,
        ad_group,
        search_term,
    }
}

/// Output shape for search-term rows.
pub fn search_result_schema() -> Arc<SchemaType> {
    Arc::new(
        SchemaType::builder("SearchResultSchema")
            .field("ad_group", SchemaField::integer().name("ad_group_id"))
            .field("campaign", SchemaField::integer().name("campaign_id"))
            .field("clicks", SchemaField::integer())
            .field("conversion_value", SchemaField::decimal())
            .field("cost", SchemaField::decimal())
            .field("search_term", SchemaField::string())
            .field("date", SchemaField::date())
            .build(),
    )
}
