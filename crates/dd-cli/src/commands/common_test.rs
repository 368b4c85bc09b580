use super::*;
use std::collections::BTreeMap;

#[test]
fn test_parse_override() {
    let (column, parameter) = parse_override("Provinces.Motto=toMotto").unwrap();
    assert_eq!(column, ColumnRef::new("Provinces", "Motto"));
    assert_eq!(parameter, "toMotto");

    let (column, parameter) = parse_override("dbo.Provinces.Name = @toName").unwrap();
    assert_eq!(column, ColumnRef::new("dbo.Provinces", "Name"));
    assert_eq!(parameter, "@toName");
}

#[test]
fn test_parse_override_rejects_malformed() {
    assert!(parse_override("Provinces.Motto").is_err());
    assert!(parse_override("Motto=toMotto").is_err());
    assert!(parse_override("Provinces.Motto=").is_err());
}

#[test]
fn test_options_from_config() {
    let mut overrides = BTreeMap::new();
    overrides.insert("Provinces.Motto".to_string(), "toMotto".to_string());
    let procedure = ProcedureConfig {
        root: "Nations".to_string(),
        name: Some("CloneNation".to_string()),
        primary_key_parameter: None,
        primary_key_output_parameter: Some("newID".to_string()),
        overrides,
    };

    let options = options_from_config(&procedure);
    assert_eq!(options.procedure_name.as_deref(), Some("CloneNation"));
    assert_eq!(options.primary_key_parameter_name, None);
    assert_eq!(
        options.primary_key_output_parameter_name.as_deref(),
        Some("newID")
    );
    assert_eq!(
        options
            .update_parameter_names
            .get(&ColumnRef::new("Provinces", "Motto"))
            .map(String::as_str),
        Some("toMotto")
    );
}
