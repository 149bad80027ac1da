use crate::*;

#[test]
fn entity_command_defaults_to_strong_and_formats_attributes() {
    let entity = parse_entity_command("user u.id, name, email").unwrap();
    assert_eq!(entity.name, "user");
    assert_eq!(entity.kind, EntityKind::Strong);
    assert!(entity.options.is_empty());
    assert_eq!(
        entity.attributes,
        vec![
            Attribute::new("Id", AttrRole::Primary),
            Attribute::plain("Name"),
            Attribute::plain("Email"),
        ]
    );
}

#[test]
fn entity_command_lowercases_the_name() {
    let entity = parse_entity_command("User.weak du.payment_no").unwrap();
    assert_eq!(entity.name, "user");
    assert_eq!(entity.kind, EntityKind::Weak);
    assert_eq!(
        entity.attributes,
        vec![Attribute::new("Payment_No", AttrRole::Partial)]
    );
}

#[test]
fn entity_command_carries_options_lowercased() {
    let entity = parse_entity_command("Vehicle.super.Total.Disjoint u.vin, type(d)").unwrap();
    assert_eq!(entity.kind, EntityKind::Super);
    assert_eq!(entity.options, vec!["total", "disjoint"]);
    assert_eq!(
        entity.attributes,
        vec![
            Attribute::new("Vin", AttrRole::Primary),
            Attribute::plain("Type(d)"),
        ]
    );
}

#[test]
fn entity_command_without_attributes_yields_an_empty_list() {
    let entity = parse_entity_command("lorry.sub.vehicle").unwrap();
    assert_eq!(entity.kind, EntityKind::Sub);
    assert_eq!(entity.options, vec!["vehicle"]);
    assert!(entity.attributes.is_empty());
}

#[test]
fn entity_command_tolerates_commas_inside_parentheses() {
    let entity = parse_entity_command("product u.sku, price(usd,eur)").unwrap();
    assert_eq!(
        entity.attributes,
        vec![
            Attribute::new("Sku", AttrRole::Primary),
            Attribute::plain("Price(usd,eur)"),
        ]
    );
}

#[test]
fn empty_entity_command_is_an_error() {
    let err = parse_entity_command("   ").unwrap_err();
    assert!(err.to_string().contains("empty"));
}

#[test]
fn unknown_entity_kind_is_an_error_naming_the_token() {
    let err = parse_entity_command("user.mega u.id").unwrap_err();
    assert!(err.to_string().contains("mega"));
}

#[test]
fn relationship_command_builds_mirrored_arrows() {
    let rel = parse_relationship_command("student 0m enrols_in 0m course").unwrap();
    assert_eq!(rel.name, "enrols_in");
    assert_eq!(rel.style, RelStyle::Single);
    assert_eq!(rel.arrows[0].from, NodeId::entity("student"));
    assert_eq!(rel.arrows[0].to, NodeId::entity("course"));
    assert_eq!(rel.arrows[0].cardinality, Cardinality::ZeroOrMany);
    assert_eq!(rel.arrows[1].from, NodeId::entity("course"));
    assert_eq!(rel.arrows[1].to, NodeId::entity("student"));
    assert_eq!(rel.arrows[1].cardinality, Cardinality::ZeroOrMany);
}

#[test]
fn relationship_command_carries_asymmetric_cardinalities() {
    let rel = parse_relationship_command("department 11 employs 1m employee").unwrap();
    // arrows[0] runs from -> to with the 4th token, arrows[1] mirrors with
    // the 2nd.
    assert_eq!(rel.arrows[0].cardinality, Cardinality::OneOrMany);
    assert_eq!(rel.arrows[1].cardinality, Cardinality::ExactlyOne);
}

#[test]
fn relationship_command_accepts_style_and_attribute_block() {
    let rel =
        parse_relationship_command("student 11 rates 0m course double {stars, comment}").unwrap();
    assert_eq!(rel.style, RelStyle::Double);
    assert_eq!(
        rel.attributes,
        vec![Attribute::plain("stars"), Attribute::plain("comment")]
    );
}

#[test]
fn relationship_command_preserves_qualified_endpoints() {
    let rel = parse_relationship_command("connector:Vehicle 01 CAR 01 car singleHeadless").unwrap();
    assert_eq!(rel.arrows[0].from, NodeId::connector("vehicle"));
    assert_eq!(rel.arrows[0].to, NodeId::entity("car"));
    assert_eq!(rel.style, RelStyle::SingleHeadless);
}

#[test]
fn unary_relationship_connects_a_node_to_itself() {
    let rel = parse_relationship_command("employee 01 manages 0m employee").unwrap();
    assert!(rel.is_unary());
}

#[test]
fn short_relationship_clause_is_an_error_naming_the_fragment() {
    let err = parse_relationship_command("student 0m enrols_in").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("incomplete"));
    assert!(message.contains("student 0m enrols_in"));
}

#[test]
fn empty_relationship_command_is_an_error() {
    assert!(parse_relationship_command("").is_err());
}

#[test]
fn bad_cardinality_is_an_error_naming_the_token() {
    let err = parse_relationship_command("a xx r 0m b").unwrap_err();
    assert!(err.to_string().contains("xx"));
}

#[test]
fn bad_style_token_is_an_error() {
    let err = parse_relationship_command("a 11 r 0m b dashed").unwrap_err();
    assert!(err.to_string().contains("dashed"));
}
