// src/schema/mod.rs
//
// Fixed registry of the eight MIMIC tables: which CSV each one is read from
// and the exact column layout its cleaned output must have.

pub mod arrow;

use serde::Deserialize;
use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

use SemanticType::{Boolean, Int64, String as Utf8, Timestamp};

pub use self::arrow::{arrow_schema, map_to_arrow_type};

/// Physical type a cleaned column is persisted as. All columns are nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Int64,
    String,
    /// Naive timestamp, microsecond precision.
    Timestamp,
    Boolean,
}

/// A single column of a target schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: SemanticType,
}

const fn col(name: &'static str, ty: SemanticType) -> ColumnDef {
    ColumnDef { name, ty }
}

/// Ordered column list a cleaner must produce, no more and no fewer.
#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub table: Table,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Table {
    Patients,
    Admissions,
    ChartEvents,
    LabEvents,
    Prescriptions,
    DiagnosesIcd,
    DItems,
    DLabItems,
}

impl Table {
    /// Every registered table, in the order a full run processes them.
    pub const ALL: [Table; 8] = [
        Table::Patients,
        Table::Admissions,
        Table::ChartEvents,
        Table::LabEvents,
        Table::Prescriptions,
        Table::DiagnosesIcd,
        Table::DItems,
        Table::DLabItems,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Patients => "patients",
            Table::Admissions => "admissions",
            Table::ChartEvents => "chartevents",
            Table::LabEvents => "labevents",
            Table::Prescriptions => "prescriptions",
            Table::DiagnosesIcd => "diagnoses_icd",
            Table::DItems => "d_items",
            Table::DLabItems => "d_labitems",
        }
    }

    /// CSV file name under the data directory.
    pub fn source_file(self) -> &'static str {
        match self {
            Table::Patients => "PATIENTS.csv",
            Table::Admissions => "ADMISSIONS.csv",
            Table::ChartEvents => "CHARTEVENTS.csv",
            Table::LabEvents => "LABEVENTS.csv",
            Table::Prescriptions => "PRESCRIPTIONS.csv",
            Table::DiagnosesIcd => "DIAGNOSES_ICD.csv",
            Table::DItems => "D_ITEMS.csv",
            Table::DLabItems => "D_LABITEMS.csv",
        }
    }

    pub fn schema(self) -> &'static TableSchema {
        match self {
            Table::Patients => &PATIENTS,
            Table::Admissions => &ADMISSIONS,
            Table::ChartEvents => &CHARTEVENTS,
            Table::LabEvents => &LABEVENTS,
            Table::Prescriptions => &PRESCRIPTIONS,
            Table::DiagnosesIcd => &DIAGNOSES_ICD,
            Table::DItems => &D_ITEMS,
            Table::DLabItems => &D_LABITEMS,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::UnknownTable(s.to_string()))
    }
}

impl TryFrom<String> for Table {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Look up the target schema for a table by name.
pub fn schema_for(name: &str) -> Result<&'static TableSchema> {
    name.parse::<Table>().map(Table::schema)
}

static PRESCRIPTIONS: TableSchema = TableSchema {
    table: Table::Prescriptions,
    columns: &[
        col("row_id", Int64),
        col("subject_id", Int64),
        col("hadm_id", Int64),
        col("icustay_id", Int64),
        col("startdate", Timestamp),
        col("enddate", Timestamp),
        col("drug_type", Utf8),
        col("drug", Utf8),
        col("drug_name_poe", Utf8),
        col("drug_name_generic", Utf8),
        col("formulary_drug_cd", Utf8),
        col("gsn", Int64),
        col("ndc", Int64),
        col("prod_strength", Utf8),
        col("dose_val_rx", Utf8),
        col("dose_unit_rx", Utf8),
        col("form_val_disp", Utf8),
        col("form_unit_disp", Utf8),
        col("route", Utf8),
    ],
};

static CHARTEVENTS: TableSchema = TableSchema {
    table: Table::ChartEvents,
    columns: &[
        col("row_id", Int64),
        col("subject_id", Int64),
        col("hadm_id", Int64),
        col("icustay_id", Int64),
        col("itemid", Int64),
        col("charttime", Timestamp),
        col("cgid", Int64),
        col("value_merged", Utf8),
    ],
};

static PATIENTS: TableSchema = TableSchema {
    table: Table::Patients,
    columns: &[
        col("row_id", Int64),
        col("subject_id", Int64),
        col("gender", Utf8),
        col("dob", Timestamp),
        col("dod", Timestamp),
        col("expire_flag", Boolean),
    ],
};

static ADMISSIONS: TableSchema = TableSchema {
    table: Table::Admissions,
    columns: &[
        col("row_id", Int64),
        col("subject_id", Int64),
        col("hadm_id", Int64),
        col("admittime", Timestamp),
        col("dischtime", Timestamp),
        col("admission_type", Utf8),
        col("admission_location", Utf8),
        col("discharge_location", Utf8),
        col("insurance", Utf8),
        col("language", Utf8),
        col("religion", Utf8),
        col("marital_status", Utf8),
        col("ethnicity", Utf8),
        col("diagnosis", Utf8),
        col("hospital_expire_flag", Boolean),
        col("has_chartevents_data", Boolean),
    ],
};

static D_ITEMS: TableSchema = TableSchema {
    table: Table::DItems,
    columns: &[
        col("row_id", Int64),
        col("itemid", Int64),
        col("label", Utf8),
        col("dbsource", Utf8),
        col("linksto", Utf8),
    ],
};

static D_LABITEMS: TableSchema = TableSchema {
    table: Table::DLabItems,
    columns: &[
        col("row_id", Int64),
        col("itemid", Int64),
        col("label", Utf8),
        col("fluid", Utf8),
        col("category", Utf8),
    ],
};

static DIAGNOSES_ICD: TableSchema = TableSchema {
    table: Table::DiagnosesIcd,
    columns: &[
        col("row_id", Int64),
        col("subject_id", Int64),
        col("hadm_id", Int64),
        col("seq_num", Int64),
        col("icd9_code", Utf8),
    ],
};

static LABEVENTS: TableSchema = TableSchema {
    table: Table::LabEvents,
    columns: &[
        col("row_id", Int64),
        col("subject_id", Int64),
        col("hadm_id", Int64),
        col("itemid", Int64),
        col("charttime", Timestamp),
        col("flag", Utf8),
        col("value_merged", Utf8),
    ],
};
