//! Sample catalogs shared by tests across the workspace.

use crate::catalog::Catalog;
use crate::catalog_file::{ColumnDef, TableDef};

/// Nations -> Provinces -> Residents, with no references beyond the chain.
pub fn rooted_world() -> Catalog {
    Catalog::builder()
        .table(
            TableDef::new("Nations")
                .column(ColumnDef::required("Name"))
                .column(ColumnDef::nullable("FoundedDate")),
        )
        .table(
            TableDef::new("Provinces")
                .column(ColumnDef::required("NationID").references("Nations"))
                .column(ColumnDef::required("Name"))
                .column(ColumnDef::nullable("Motto")),
        )
        .table(
            TableDef::new("Residents")
                .column(ColumnDef::required("ProvinceID").references("Provinces"))
                .column(ColumnDef::required("Name")),
        )
        .build()
        .expect("rooted world catalog is valid")
}

/// The rooted world plus cross references that form cycles:
/// a nullable leader on provinces, a required nationality, a nullable
/// spouse self-reference, and a nullable favorite province on residents.
pub fn unrooted_world() -> Catalog {
    Catalog::builder()
        .table(
            TableDef::new("Nations")
                .column(ColumnDef::required("Name"))
                .column(ColumnDef::nullable("FoundedDate")),
        )
        .table(
            TableDef::new("Provinces")
                .column(ColumnDef::required("NationID").references("Nations"))
                .column(ColumnDef::required("Name"))
                .column(ColumnDef::nullable("Motto"))
                .column(ColumnDef::nullable("LeaderResidentID").references("Residents")),
        )
        .table(
            TableDef::new("Residents")
                .column(ColumnDef::required("ProvinceID").references("Provinces"))
                .column(ColumnDef::required("NationalityNationID").references("Nations"))
                .column(ColumnDef::required("Name"))
                .column(ColumnDef::nullable("SpouseResidentID").references("Residents"))
                .column(ColumnDef::nullable("FavoriteProvinceID").references("Provinces")),
        )
        .build()
        .expect("unrooted world catalog is valid")
}
