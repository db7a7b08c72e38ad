use apimodel_core::{
    build_field_schema, create_api_model, gen_api_model_from_db, Catalog, Column, ColumnType,
    Entity, FieldDescriptor, FieldType, GenerateError, GenerateOptions, ModelRef, ModelRegistry,
    Relationship, SwaggerRegistry,
};
use serde_json::json;

fn unrelated() -> Entity {
    let mut e = Entity::new("Unrelated");
    e.columns = vec![
        Column::new("id", ColumnType::new("Integer")).primary_key(),
        Column::new("string", ColumnType::new("String(30)")),
        Column::new("float", ColumnType::new("Float")),
        Column::new("boolean", ColumnType::new("Boolean")),
        Column::new("date", ColumnType::new("Date")),
    ];
    e
}

fn rel(name: &str, target: &str, uselist: bool, backref: Option<&str>) -> Relationship {
    Relationship {
        name: name.to_string(),
        target: target.to_string(),
        uselist,
        backref: backref.map(str::to_string),
        local_columns: vec![],
    }
}

/// person ──addresses──► address ──country──► country, with inverse sides declared.
fn people_catalog() -> Catalog {
    let mut person = Entity::new("person");
    person.columns = vec![
        Column::new("id", ColumnType::new("Integer")).primary_key(),
        Column::new("name", ColumnType::new("String")),
        Column::new("age", ColumnType::new("Integer")),
        Column::new("birth_date", ColumnType::new("DateTime")),
    ];
    person.relationships = vec![rel("addresses", "address", true, Some("person"))];
    person.exposed_fields = Some(
        ["id", "name", "birth_date", "addresses"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );

    let mut address = Entity::new("address");
    address.columns = vec![
        Column::new("id", ColumnType::new("Integer")).primary_key(),
        Column::new("road", ColumnType::new("String")),
        Column::new("person_id", ColumnType::new("Integer"))
            .not_null()
            .references("person", "id"),
        Column::new("country_id", ColumnType::new("Integer"))
            .not_null()
            .references("country", "id"),
    ];
    address.relationships = vec![
        rel("person", "person", false, None),
        rel("country", "country", false, None),
    ];
    address.exposed_fields = Some(["id", "road", "country"].iter().map(|s| s.to_string()).collect());

    let mut country = Entity::new("country");
    country.columns = vec![
        Column::new("id", ColumnType::new("Integer")).primary_key(),
        Column::new("name", ColumnType::new("String")),
    ];
    country.relationships = vec![rel("address", "address", true, Some("country"))];

    Catalog::new(vec![person, address, country])
}

#[test]
fn unrelated_table_scenario() {
    let catalog = Catalog::new(vec![unrelated()]);
    let schema = build_field_schema(&catalog, "Unrelated", &GenerateOptions::default()).unwrap();

    let names: Vec<&str> = schema.names().collect();
    assert_eq!(names, vec!["id", "string", "float", "boolean", "date"]);
    assert_eq!(
        schema.get("id"),
        Some(&FieldDescriptor::new(FieldType::Integer).readonly())
    );
    assert_eq!(
        schema.get("string"),
        Some(&FieldDescriptor::new(FieldType::String).with_max_length(30))
    );
    assert_eq!(schema.get("float"), Some(&FieldDescriptor::new(FieldType::Float)));
    assert_eq!(schema.get("boolean"), Some(&FieldDescriptor::new(FieldType::Boolean)));
    assert_eq!(schema.get("date"), Some(&FieldDescriptor::new(FieldType::Date)));
}

#[test]
fn create_api_model_registers_under_default_name() {
    let catalog = Catalog::new(vec![unrelated()]);
    let mut registry = SwaggerRegistry::new();
    let handle =
        create_api_model(&mut registry, &catalog, "Unrelated", &GenerateOptions::default()).unwrap();
    assert_eq!(handle, ModelRef::new("Unrelated"));
    assert_eq!(
        registry.definition("Unrelated").unwrap(),
        json!({
            "properties": {
                "id": {"type": "integer", "readOnly": true},
                "string": {"type": "string", "maxLength": 30},
                "float": {"type": "number"},
                "boolean": {"type": "boolean"},
                "date": {"type": "string", "format": "date"},
            },
            "type": "object",
        })
    );
}

#[test]
fn create_api_model_honors_explicit_name() {
    let catalog = Catalog::new(vec![unrelated()]);
    let mut registry = SwaggerRegistry::new();
    let opts = GenerateOptions::default().with_name("Thing");
    let handle = create_api_model(&mut registry, &catalog, "Unrelated", &opts).unwrap();
    assert_eq!(handle.name, "Thing");
    assert!(registry.get("Unrelated").is_none());
}

#[test]
fn flat_relationship_on_the_declaring_side() {
    let mut catalog = people_catalog();
    catalog.get_mut("person").unwrap().exposed_fields = None;
    let schema = build_field_schema(&catalog, "person", &GenerateOptions::default()).unwrap();

    let addresses = schema.get("addresses").unwrap();
    assert_eq!(addresses.item().unwrap().ty, FieldType::Integer);

    // The inverse side declares no back-reference and contributes nothing.
    let address = build_field_schema(&catalog, "address", &GenerateOptions::default()).unwrap();
    assert!(!address.contains("person"));
    assert!(!address.contains("country"));
}

#[test]
fn nested_person_with_limited_fields() {
    let catalog = people_catalog();
    let mut registry = SwaggerRegistry::new();
    let opts = GenerateOptions::nested().camel_case(true).with_show(["id"]);
    let schema = gen_api_model_from_db(&mut registry, &catalog, "person", &opts).unwrap();
    registry.register_model("Person", schema);

    assert_eq!(
        registry.definition("Person").unwrap(),
        json!({
            "required": ["id"],
            "properties": {
                "id": {"type": "integer"},
                "name": {"type": "string"},
                "birthDate": {"type": "string", "format": "date-time"},
                "addresses": {
                    "type": "array",
                    "items": {"$ref": "#/definitions/NestedAddresses"},
                },
            },
            "type": "object",
        })
    );

    // address exposes (id, road, country); its way back to person is not followed.
    let nested = registry.get("NestedAddresses").unwrap();
    let names: Vec<&str> = nested.names().collect();
    assert_eq!(names, vec!["id", "road", "country"]);
    assert_eq!(
        nested.get("country").unwrap().ty,
        FieldType::Nested(ModelRef::new("NestedCountry"))
    );

    // country → address would re-enter the chain.
    let country = registry.get("NestedCountry").unwrap();
    assert!(!country.contains("address"));
}

#[test]
fn nested_cycle_terminates() {
    let mut a = Entity::new("a");
    a.columns = vec![Column::new("id", ColumnType::new("Integer")).primary_key()];
    a.relationships = vec![rel("bs", "b", true, Some("a"))];

    let mut b = Entity::new("b");
    b.columns = vec![
        Column::new("id", ColumnType::new("Integer")).primary_key(),
        Column::new("a_id", ColumnType::new("Integer")).references("a", "id"),
    ];
    b.relationships = vec![rel("a", "a", false, None)];

    let catalog = Catalog::new(vec![a, b]);
    let mut registry = SwaggerRegistry::new();
    let schema = gen_api_model_from_db(&mut registry, &catalog, "a", &GenerateOptions::nested()).unwrap();

    assert!(schema.contains("bs"));
    let nested_b = registry.get("NestedBs").unwrap();
    assert!(nested_b.contains("a_id"));
    assert!(!nested_b.contains("a"));
    assert!(registry.get("NestedA").is_none());
}

#[test]
fn visited_chain_does_not_leak_between_calls() {
    let catalog = people_catalog();
    let opts = GenerateOptions::nested();

    let mut first = SwaggerRegistry::new();
    let from_address = gen_api_model_from_db(&mut first, &catalog, "address", &opts).unwrap();
    assert!(from_address.contains("country"));

    let mut second = SwaggerRegistry::new();
    let from_country = gen_api_model_from_db(&mut second, &catalog, "country", &opts).unwrap();
    assert!(from_country.contains("address"));
    let nested = second.get("NestedAddress").unwrap();
    assert!(!nested.contains("country"));
}

#[test]
fn depth_limit_is_a_configuration_error() {
    let catalog = people_catalog();
    let mut registry = SwaggerRegistry::new();
    let opts = GenerateOptions {
        max_depth: 0,
        ..GenerateOptions::nested()
    };
    let err = gen_api_model_from_db(&mut registry, &catalog, "person", &opts).unwrap_err();
    assert_eq!(
        err,
        GenerateError::RecursionLimit {
            limit: 0,
            chain: vec!["person".to_string(), "address".to_string()],
        }
    );
}

#[test]
fn allow_list_skips_relationship_expansion() {
    let catalog = people_catalog();
    let mut registry = SwaggerRegistry::new();
    let opts = GenerateOptions::nested().with_fields(["id", "name", "addresses"]);
    let schema = gen_api_model_from_db(&mut registry, &catalog, "person", &opts).unwrap();

    let names: Vec<&str> = schema.names().collect();
    assert_eq!(names, vec!["id", "name"]);
    assert!(registry.is_empty());
}

#[test]
fn unknown_allow_list_field_is_an_error() {
    let catalog = people_catalog();
    let opts = GenerateOptions::default().with_fields(["nickname"]);
    let err = build_field_schema(&catalog, "person", &opts).unwrap_err();
    assert_eq!(
        err,
        GenerateError::UnknownField {
            table: "person".to_string(),
            field: "nickname".to_string(),
        }
    );
}

#[test]
fn unrecognized_type_fails_generation() {
    let mut e = unrelated();
    e.columns.push(Column::new("payload", ColumnType::new("PickleType")));
    let catalog = Catalog::new(vec![e]);
    let err = build_field_schema(&catalog, "Unrelated", &GenerateOptions::default()).unwrap_err();
    assert!(matches!(err, GenerateError::UnrecognizedType { ref type_name, .. } if type_name == "PickleType"));
}

#[test]
fn unknown_table_is_an_error() {
    let catalog = people_catalog();
    let err = build_field_schema(&catalog, "nope", &GenerateOptions::default()).unwrap_err();
    assert_eq!(err, GenerateError::UnknownEntity("nope".to_string()));
}

#[test]
fn relationship_column_collision_is_reported() {
    let mut catalog = people_catalog();
    let person = catalog.get_mut("person").unwrap();
    person.exposed_fields = None;
    person
        .columns
        .push(Column::new("addresses", ColumnType::new("Text")));
    let err = build_field_schema(&catalog, "person", &GenerateOptions::default()).unwrap_err();
    assert_eq!(
        err,
        GenerateError::NameCollision {
            model: "Person".to_string(),
            field: "addresses".to_string(),
        }
    );
}

#[test]
fn camel_case_keeps_source_attribute() {
    let catalog = people_catalog();
    let opts = GenerateOptions::default().camel_case(true);
    let schema = build_field_schema(&catalog, "person", &opts).unwrap();
    let birth = schema.get("birthDate").unwrap();
    assert_eq!(birth.attribute.as_deref(), Some("birth_date"));
    assert_eq!(schema.get("name").unwrap().attribute, None);
}

fn entity_with_key(table: &str, columns: &[(&str, &str)]) -> Entity {
    let mut e = Entity::new(table);
    e.columns.push(Column::new("id", ColumnType::new("Integer")).primary_key());
    for (name, ty) in columns {
        e.columns.push(Column::new(*name, ColumnType::new(*ty)));
    }
    e
}

/// orders → customer → address and orders → seller → address, where both
/// `address` relationships lead to different tables.
fn marketplace_catalog(seller_address_table: &str) -> Catalog {
    let mut orders = entity_with_key("orders", &[("customer_id", "Integer"), ("seller_id", "Integer")]);
    orders.relationships = vec![
        rel("customer", "customer", false, None),
        rel("seller", "seller", false, None),
    ];

    let mut customer = entity_with_key("customer", &[("address_id", "Integer")]);
    customer.relationships = vec![rel("address", "customer_address", false, None)];

    let mut seller = entity_with_key("seller", &[("address_id", "Integer")]);
    seller.relationships = vec![rel("address", seller_address_table, false, None)];

    Catalog::new(vec![
        orders,
        customer,
        seller,
        entity_with_key("customer_address", &[("street", "String")]),
        entity_with_key("seller_address", &[("warehouse_code", "Integer")]),
    ])
}

#[test]
fn nested_name_reused_for_another_table_is_an_error() {
    let catalog = marketplace_catalog("seller_address");
    let mut registry = SwaggerRegistry::new();
    let err = create_api_model(&mut registry, &catalog, "orders", &GenerateOptions::nested())
        .unwrap_err();
    assert_eq!(
        err,
        GenerateError::NestedModelCollision {
            model: "NestedAddress".to_string(),
            existing: "customer_address".to_string(),
            target: "seller_address".to_string(),
        }
    );
}

#[test]
fn nested_name_reused_for_the_same_table_is_shared() {
    let catalog = marketplace_catalog("customer_address");
    let mut registry = SwaggerRegistry::new();
    create_api_model(&mut registry, &catalog, "orders", &GenerateOptions::nested()).unwrap();

    let address = registry.get("NestedAddress").unwrap();
    assert!(address.contains("street"));
    for owner in ["NestedCustomer", "NestedSeller"] {
        assert_eq!(
            registry.get(owner).unwrap().get("address").unwrap().ty,
            FieldType::Nested(ModelRef::new("NestedAddress"))
        );
    }
}

#[test]
fn nested_names_do_not_carry_between_calls() {
    let catalog = marketplace_catalog("seller_address");
    let mut registry = SwaggerRegistry::new();
    create_api_model(&mut registry, &catalog, "customer", &GenerateOptions::nested()).unwrap();
    create_api_model(&mut registry, &catalog, "seller", &GenerateOptions::nested()).unwrap();
    assert!(registry.get("NestedAddress").unwrap().contains("warehouse_code"));
}

/// Composite primary key plus a self relationship declared with a back-reference.
fn composite_key_catalog() -> Catalog {
    let mut e = Entity::new("ledger");
    e.columns = vec![
        Column::new("id", ColumnType::new("Integer")).primary_key(),
        Column::new("note", ColumnType::new("String")),
        Column::new("k2", ColumnType::new("Integer")).primary_key(),
    ];
    e.relationships = vec![Relationship {
        name: "entries".to_string(),
        target: "ledger".to_string(),
        uselist: true,
        backref: Some("ledger".to_string()),
        local_columns: vec!["id".to_string()],
    }];
    Catalog::new(vec![e])
}

#[test]
fn composite_key_keeps_columns_in_flat_mode() {
    let catalog = composite_key_catalog();
    let schema = build_field_schema(&catalog, "ledger", &GenerateOptions::default()).unwrap();
    let names: Vec<&str> = schema.names().collect();
    assert_eq!(names, vec!["id", "note", "k2"]);
}

#[test]
fn composite_key_keeps_columns_in_nested_mode() {
    let mut catalog = composite_key_catalog();
    catalog.entities.push(entity_with_key("detail", &[("memo", "Text")]));
    catalog.get_mut("ledger").unwrap().relationships[0].target = "detail".to_string();

    let mut registry = SwaggerRegistry::new();
    let schema =
        gen_api_model_from_db(&mut registry, &catalog, "ledger", &GenerateOptions::nested()).unwrap();
    let names: Vec<&str> = schema.names().collect();
    assert_eq!(names, vec!["id", "note", "k2"]);
    assert!(registry.is_empty());
}

#[test]
fn readonly_names_apply_at_every_nesting_level() {
    let catalog = people_catalog();
    let mut registry = SwaggerRegistry::new();
    let opts = GenerateOptions::nested().with_readonly(["name"]);
    let schema = gen_api_model_from_db(&mut registry, &catalog, "person", &opts).unwrap();

    assert!(schema.get("name").unwrap().readonly);
    assert!(registry.get("NestedCountry").unwrap().get("name").unwrap().readonly);
}
