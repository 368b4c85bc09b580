use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: world").unwrap();
    assert_eq!(config.name, "world");
    assert!(config.procedures.is_empty());

    let root = PathBuf::from("/tmp/world");
    assert_eq!(config.catalog_path_absolute(&root), root.join("catalog.yml"));
    assert_eq!(config.target_path_absolute(&root), root.join("target"));
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: world
catalog: schema/world.yml
target_path: out
procedures:
  - root: Nations
  - root: Nations
    name: RootCopyNation
    primary_key_parameter: existingNationID
    primary_key_output_parameter: insertedNationID
    overrides:
      Provinces.Motto: toMotto
      Provinces.Name: "@toName"
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();

    assert_eq!(config.catalog, "schema/world.yml");
    assert_eq!(config.procedures.len(), 2);
    assert_eq!(config.procedures[0], ProcedureConfig {
        root: "Nations".into(),
        ..Default::default()
    });

    let custom = &config.procedures[1];
    assert_eq!(custom.name.as_deref(), Some("RootCopyNation"));
    assert_eq!(
        custom.override_refs(),
        vec![
            (ColumnRef::new("Provinces", "Motto"), "toMotto".to_string()),
            (ColumnRef::new("Provinces", "Name"), "@toName".to_string()),
        ]
    );
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: world\ndialect: tsql");
    assert!(result.is_err());
}

#[test]
fn test_validate_empty_name() {
    let config: Config = serde_yaml::from_str("name: ''").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_validate_bad_override_key() {
    let yaml = r#"
name: world
procedures:
  - root: Nations
    overrides:
      Motto: toMotto
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Table.Column"));
}

#[test]
fn test_validate_duplicate_procedure_name() {
    let yaml = r#"
name: world
procedures:
  - root: Nations
    name: CopyIt
  - root: Provinces
    name: CopyIt
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("deepdup.yaml"), "name: world\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "world");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let result = Config::load_from_dir(dir.path());
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}
