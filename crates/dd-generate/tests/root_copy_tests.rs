//! End-to-end procedure generation against the sample catalogs

use dd_core::testing::{rooted_world, unrooted_world};
use dd_core::ColumnRef;
use dd_generate::{generate_procedure, generate_procedure_body, ProcedureOptions};
use std::collections::BTreeMap;

#[test]
fn test_generate_procedure_default_for_rooted_world() {
    let procedure =
        generate_procedure(&rooted_world(), "Nations", &ProcedureOptions::default()).unwrap();

    assert_eq!(
        procedure,
        r#"CREATE PROCEDURE [dbo].[CopyNation]
    @id INT
AS
BEGIN
    SET NOCOUNT ON;
    SET XACT_ABORT ON;
    BEGIN TRAN;

    DECLARE @NationIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    DECLARE @ProvinceIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    MERGE INTO [dbo].[Nations] AS Target
    USING (
        SELECT *
        FROM [dbo].[Nations]
        WHERE [ID] = @id
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [Name],
        [FoundedDate])
    VALUES (
        Source.[Name],
        Source.[FoundedDate])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @NationIDPairs;

    MERGE INTO [dbo].[Provinces] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID
        FROM [dbo].[Provinces] copy
        JOIN @NationIDPairs j0
            ON copy.[NationID] = j0.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [NationID],
        [Name],
        [Motto])
    VALUES (
        j0InsertedID,
        Source.[Name],
        Source.[Motto])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @ProvinceIDPairs;

    MERGE INTO [dbo].[Residents] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID
        FROM [dbo].[Residents] copy
        JOIN @ProvinceIDPairs j0
            ON copy.[ProvinceID] = j0.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [ProvinceID],
        [Name])
    VALUES (
        j0InsertedID,
        Source.[Name]);

    COMMIT TRAN;
END;"#
    );
}

#[test]
fn test_generate_procedure_customized_for_unrooted_world() {
    let options = ProcedureOptions::new()
        .with_procedure_name("RootCopyNation")
        .with_output_parameter("insertedID");
    let procedure = generate_procedure(&unrooted_world(), "Nations", &options).unwrap();

    assert_eq!(
        procedure,
        r#"CREATE PROCEDURE [dbo].[RootCopyNation]
    @id INT,
    @insertedID INT = NULL OUTPUT
AS
BEGIN
    SET NOCOUNT ON;
    SET XACT_ABORT ON;
    BEGIN TRAN;

    DECLARE @NationIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    DECLARE @ProvinceIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    DECLARE @ResidentIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    MERGE INTO [dbo].[Nations] AS Target
    USING (
        SELECT *
        FROM [dbo].[Nations]
        WHERE [ID] = @id
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [Name],
        [FoundedDate])
    VALUES (
        Source.[Name],
        Source.[FoundedDate])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @NationIDPairs;
    SET @insertedID = SCOPE_IDENTITY();

    MERGE INTO [dbo].[Provinces] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID
        FROM [dbo].[Provinces] copy
        JOIN @NationIDPairs j0
            ON copy.[NationID] = j0.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [NationID],
        [Name],
        [Motto],
        [LeaderResidentID])
    VALUES (
        j0InsertedID,
        Source.[Name],
        Source.[Motto],
        Source.[LeaderResidentID])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @ProvinceIDPairs;

    MERGE INTO [dbo].[Residents] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID,
            j1.InsertedID j1InsertedID
        FROM [dbo].[Residents] copy
        JOIN @ProvinceIDPairs j0
            ON copy.[ProvinceID] = j0.ExistingID
        JOIN @NationIDPairs j1
            ON copy.[NationalityNationID] = j1.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [ProvinceID],
        [NationalityNationID],
        [Name],
        [SpouseResidentID],
        [FavoriteProvinceID])
    VALUES (
        j0InsertedID,
        j1InsertedID,
        Source.[Name],
        Source.[SpouseResidentID],
        Source.[FavoriteProvinceID])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @ResidentIDPairs;

    UPDATE copy
    SET
        copy.[LeaderResidentID] = j0.InsertedID
    FROM [dbo].[Provinces] copy
    JOIN @ResidentIDPairs j0
        ON copy.[LeaderResidentID] = j0.ExistingID
    WHERE copy.[ID] IN (SELECT InsertedID FROM @ProvinceIDPairs);

    UPDATE copy
    SET
        copy.[SpouseResidentID] = COALESCE(j0.InsertedID, copy.[SpouseResidentID]),
        copy.[FavoriteProvinceID] = COALESCE(j1.InsertedID, copy.[FavoriteProvinceID])
    FROM [dbo].[Residents] copy
    LEFT JOIN @ResidentIDPairs j0
        ON copy.[SpouseResidentID] = j0.ExistingID
    LEFT JOIN @ProvinceIDPairs j1
        ON copy.[FavoriteProvinceID] = j1.ExistingID
    WHERE copy.[ID] IN (SELECT InsertedID FROM @ResidentIDPairs);

    COMMIT TRAN;
END;"#
    );
}

#[test]
fn test_generate_procedure_scoped_for_rooted_world() {
    // Provinces can act as a root too, leaving Nations untouched.
    let procedure =
        generate_procedure(&rooted_world(), "Provinces", &ProcedureOptions::default()).unwrap();

    assert_eq!(
        procedure,
        r#"CREATE PROCEDURE [dbo].[CopyProvince]
    @id INT
AS
BEGIN
    SET NOCOUNT ON;
    SET XACT_ABORT ON;
    BEGIN TRAN;

    DECLARE @ProvinceIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    MERGE INTO [dbo].[Provinces] AS Target
    USING (
        SELECT *
        FROM [dbo].[Provinces]
        WHERE [ID] = @id
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [NationID],
        [Name],
        [Motto])
    VALUES (
        Source.[NationID],
        Source.[Name],
        Source.[Motto])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @ProvinceIDPairs;

    MERGE INTO [dbo].[Residents] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID
        FROM [dbo].[Residents] copy
        JOIN @ProvinceIDPairs j0
            ON copy.[ProvinceID] = j0.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [ProvinceID],
        [Name])
    VALUES (
        j0InsertedID,
        Source.[Name]);

    COMMIT TRAN;
END;"#
    );
    assert!(!procedure.contains("Nation]"));
    assert!(!procedure.contains("@NationIDPairs"));
}

#[test]
fn test_generate_procedure_body_customized_for_rooted_world() {
    let mut update_parameter_names = BTreeMap::new();
    update_parameter_names.insert(ColumnRef::new("Provinces", "Motto"), "toMotto".to_string());
    update_parameter_names.insert(ColumnRef::new("Provinces", "Name"), "@toName".to_string());

    let body = generate_procedure_body(
        &rooted_world(),
        "Nations",
        "existingNationID",
        Some("insertedNationID"),
        &update_parameter_names,
    )
    .unwrap();

    assert_eq!(
        body,
        r#"
    DECLARE @NationIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    DECLARE @ProvinceIDPairs TABLE (
        ExistingID INT NOT NULL UNIQUE,
        InsertedID INT NOT NULL UNIQUE
    );

    MERGE INTO [dbo].[Nations] AS Target
    USING (
        SELECT *
        FROM [dbo].[Nations]
        WHERE [ID] = @existingNationID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [Name],
        [FoundedDate])
    VALUES (
        Source.[Name],
        Source.[FoundedDate])
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @NationIDPairs;
    SET @insertedNationID = SCOPE_IDENTITY();

    MERGE INTO [dbo].[Provinces] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID
        FROM [dbo].[Provinces] copy
        JOIN @NationIDPairs j0
            ON copy.[NationID] = j0.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [NationID],
        [Name],
        [Motto])
    VALUES (
        j0InsertedID,
        @toName,
        @toMotto)
    OUTPUT Source.[ID], Inserted.[ID]
    INTO @ProvinceIDPairs;

    MERGE INTO [dbo].[Residents] AS Target
    USING (
        SELECT
            copy.*,
            j0.InsertedID j0InsertedID
        FROM [dbo].[Residents] copy
        JOIN @ProvinceIDPairs j0
            ON copy.[ProvinceID] = j0.ExistingID
    ) AS Source
    ON 1 = 0
    WHEN NOT MATCHED BY TARGET THEN
    INSERT (
        [ProvinceID],
        [Name])
    VALUES (
        j0InsertedID,
        Source.[Name]);
"#
    );
}

#[test]
fn test_generation_is_deterministic() {
    let catalog = unrooted_world();
    let options = ProcedureOptions::new().with_output_parameter("insertedID");
    let first = generate_procedure(&catalog, "Nations", &options).unwrap();
    for _ in 0..5 {
        assert_eq!(generate_procedure(&catalog, "Nations", &options).unwrap(), first);
    }
}

#[test]
fn test_overrides_only_change_values() {
    let catalog = unrooted_world();
    let plain = generate_procedure(&catalog, "Nations", &ProcedureOptions::default()).unwrap();
    let custom = generate_procedure(
        &catalog,
        "Nations",
        &ProcedureOptions::new().with_override("Residents", "Name", "newName"),
    )
    .unwrap();

    assert_ne!(plain, custom);
    assert_eq!(
        plain.replacen("        Source.[Name],\n        Source.[SpouseResidentID]", "        @newName,\n        Source.[SpouseResidentID]", 1),
        custom
    );
}

#[test]
fn test_generation_is_safe_across_threads() {
    let catalog = std::sync::Arc::new(unrooted_world());
    let handles: Vec<_> = ["Nations", "Provinces", "Residents"]
        .into_iter()
        .map(|root| {
            let catalog = std::sync::Arc::clone(&catalog);
            std::thread::spawn(move || {
                generate_procedure(&catalog, root, &ProcedureOptions::default()).unwrap()
            })
        })
        .collect();

    for (handle, root) in handles.into_iter().zip(["Nations", "Provinces", "Residents"]) {
        let threaded = handle.join().unwrap();
        let direct = generate_procedure(&catalog, root, &ProcedureOptions::default()).unwrap();
        assert_eq!(threaded, direct);
    }
}

#[test]
fn test_plan_serializes_for_inspection() {
    let catalog = rooted_world();
    let plan = dd_generate::plan(&catalog, "Provinces", false).unwrap();
    let json = serde_json::to_value(plan.describe(&catalog)).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            {
                "table": "dbo.Provinces",
                "mapping": "@ProvinceIDPairs",
                "references": [
                    {"column": "NationID", "target": "dbo.Nations", "kind": "external", "alias": null}
                ]
            },
            {
                "table": "dbo.Residents",
                "mapping": null,
                "references": [
                    {"column": "ProvinceID", "target": "dbo.Provinces", "kind": "containment", "alias": "j0"}
                ]
            }
        ])
    );
}

#[test]
fn test_unknown_root_table() {
    let err = generate_procedure(&rooted_world(), "Cities", &ProcedureOptions::default())
        .unwrap_err();
    assert!(matches!(err, dd_generate::GenerateError::UnknownTable { ref name } if name == "Cities"));
    assert!(err.to_string().starts_with("[G001]"));
}
