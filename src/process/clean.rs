// src/process/clean.rs
//
// Per-table cleaning rules. Each cleaner takes the loosely typed table read
// from CSV and returns a batch laid out exactly as its registered schema.

use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray, TimestampMicrosecondArray},
    record_batch::RecordBatch,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::process::{
    conform::conform,
    convert::{to_utf8, Coercion},
    frame::Frame,
    timestamps::normalize_timestamps,
    utils::numeric_reading,
};
use crate::schema::{SemanticType, Table};

use Coercion::{Lenient, Strict};
use SemanticType::{Boolean, Int64, Timestamp};

/// Placeholder for missing descriptive text.
pub const NOT_RECORDED: &str = "Not recorded";

/// 2262-04-11T23:47:16.854775, the largest nanosecond-epoch instant floored to µs.
pub const MAX_TIMESTAMP_MICROS: i64 = i64::MAX / 1_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Treat prescriptions without an end date as open-ended by filling
    /// `enddate` with `MAX_TIMESTAMP_MICROS`. Off unless asked for.
    pub fill_open_end_dates: bool,
}

pub type Cleaner = fn(&RecordBatch, &CleanOptions) -> Result<RecordBatch>;

impl Table {
    pub fn cleaner(self) -> Cleaner {
        match self {
            Table::Patients => |raw, _| clean_patients(raw),
            Table::Admissions => |raw, _| clean_admissions(raw),
            Table::ChartEvents => |raw, _| clean_chartevents(raw),
            Table::LabEvents => |raw, _| clean_labevents(raw),
            Table::Prescriptions => clean_prescriptions,
            Table::DiagnosesIcd => |raw, _| clean_diagnoses_icd(raw),
            Table::DItems => |raw, _| clean_d_items(raw),
            Table::DLabItems => |raw, _| clean_d_labitems(raw),
        }
    }
}

pub fn clean(table: Table, raw: &RecordBatch, options: &CleanOptions) -> Result<RecordBatch> {
    (table.cleaner())(raw, options)
}

/// Resolve `name` and clean; an unregistered name is `UnknownTable`.
pub fn clean_by_name(name: &str, raw: &RecordBatch, options: &CleanOptions) -> Result<RecordBatch> {
    clean(name.parse()?, raw, options)
}

pub fn clean_d_items(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::DItems, raw);
    frame.drop_if_present(&[
        "abbreviation",
        "param_type",
        "unitname",
        "category",
        "conceptid",
    ]);
    frame.coerce("itemid", Int64, Strict)?;
    conform(&frame)
}

pub fn clean_d_labitems(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::DLabItems, raw);
    frame.drop_if_present(&["loinc_code"]);
    frame.coerce("itemid", Int64, Strict)?;
    conform(&frame)
}

/// Prefer the numeric reading whenever it is present, else the free-text reading.
fn merge_readings(frame: &Frame) -> Result<Vec<Option<String>>> {
    let numeric = to_utf8("valuenum", frame.require("valuenum")?)?;
    let text = to_utf8("value", frame.require("value")?)?;
    Ok(numeric
        .iter()
        .zip(text.iter())
        .map(|(n, t)| n.and_then(numeric_reading).or_else(|| t.map(str::to_string)))
        .collect())
}

pub fn clean_chartevents(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::ChartEvents, raw);
    frame.coerce("charttime", Timestamp, Strict)?;
    frame.drop_if_present(&[
        "resultstatus",
        "stopped",
        "error",
        "warning",
        "valueuom",
        "storetime",
    ]);

    let merged: StringArray = merge_readings(&frame)?.into_iter().collect();
    frame.insert("value_merged", Arc::new(merged));

    for id in ["icustay_id", "cgid", "itemid"] {
        frame.coerce(id, Int64, Strict)?;
    }
    frame.drop_if_present(&["value", "valuenum"]);

    normalize_timestamps(&mut frame, &["charttime"])?;
    conform(&frame)
}

/// Lab results without any reading are dropped; the rest get their unit
/// appended after a single space (empty when no unit was recorded).
pub fn clean_labevents(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::LabEvents, raw);
    frame.coerce("charttime", Timestamp, Strict)?;
    frame.coerce("hadm_id", Int64, Strict)?;
    frame.coerce("itemid", Int64, Strict)?;

    let merged = merge_readings(&frame)?;
    let units = frame
        .get("valueuom")
        .map(|c| to_utf8("valueuom", c))
        .transpose()?;
    let unit_at = |row: usize| match &units {
        Some(u) if u.is_valid(row) => u.value(row),
        _ => "",
    };

    let keep: BooleanArray = merged.iter().map(|v| Some(v.is_some())).collect();
    let with_unit: StringArray = merged
        .iter()
        .enumerate()
        .map(|(row, v)| v.as_ref().map(|v| format!("{} {}", v, unit_at(row))))
        .collect();
    frame.insert("value_merged", Arc::new(with_unit));
    frame.drop_if_present(&["value", "valuenum", "valueuom"]);

    let before = frame.num_rows();
    frame.retain_rows(&keep)?;
    debug!(
        dropped = before - frame.num_rows(),
        "dropped lab events without a reading"
    );

    normalize_timestamps(&mut frame, &["charttime"])?;
    conform(&frame)
}

pub fn clean_prescriptions(raw: &RecordBatch, options: &CleanOptions) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::Prescriptions, raw);
    frame.coerce("startdate", Timestamp, Strict)?;
    frame.coerce("enddate", Timestamp, Lenient)?;

    for id in ["icustay_id", "gsn", "ndc"] {
        frame.coerce(id, Int64, Lenient)?;
    }

    frame.fill_null_str(
        &[
            "drug_name_poe",
            "drug_name_generic",
            "formulary_drug_cd",
            "form_unit_disp",
        ],
        NOT_RECORDED,
    )?;

    if options.fill_open_end_dates {
        fill_open_end_dates(&mut frame)?;
    }

    normalize_timestamps(&mut frame, &["startdate", "enddate"])?;
    conform(&frame)
}

fn fill_open_end_dates(frame: &mut Frame) -> Result<()> {
    let enddate = frame.require("enddate")?;
    let Some(ends) = enddate
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
    else {
        return Ok(());
    };
    let filled: TimestampMicrosecondArray = ends
        .iter()
        .map(|v| Some(v.unwrap_or(MAX_TIMESTAMP_MICROS)))
        .collect();
    debug!(filled = ends.null_count(), "filled open-ended prescriptions");
    frame.insert("enddate", Arc::new(filled) as ArrayRef);
    Ok(())
}

pub fn clean_patients(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::Patients, raw);
    frame.coerce("dob", Timestamp, Strict)?;
    frame.coerce("dod", Timestamp, Strict)?;
    frame.drop_if_present(&["dod_hosp", "dod_ssn"]);
    frame.coerce("expire_flag", Boolean, Strict)?;

    normalize_timestamps(&mut frame, &["dob", "dod"])?;
    conform(&frame)
}

pub fn clean_admissions(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::Admissions, raw);
    frame.coerce("admittime", Timestamp, Strict)?;
    frame.coerce("dischtime", Timestamp, Strict)?;

    frame.fill_null_str(&["language", "religion", "marital_status"], NOT_RECORDED)?;

    frame.coerce("hospital_expire_flag", Boolean, Strict)?;
    frame.coerce("has_chartevents_data", Boolean, Strict)?;

    frame.drop_if_present(&["deathtime", "edregtime", "edouttime"]);

    normalize_timestamps(&mut frame, &["admittime", "dischtime"])?;
    conform(&frame)
}

pub fn clean_diagnoses_icd(raw: &RecordBatch) -> Result<RecordBatch> {
    let mut frame = Frame::new(Table::DiagnosesIcd, raw);
    frame.coerce("seq_num", Int64, Strict)?;
    conform(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::process::conform::validate;
    use arrow::{
        array::{BooleanArray, Int64Array},
        datatypes::{DataType, Field, Schema},
    };
    use chrono::NaiveDateTime;

    /// Build an all-text raw table; `None` cells are nulls.
    fn raw(columns: &[(&str, Vec<Option<&str>>)]) -> RecordBatch {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect();
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .map(|(_, values)| Arc::new(StringArray::from(values.clone())) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
    }

    fn strings(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
        let col = batch.column_by_name(name).unwrap();
        col.as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn ints(batch: &RecordBatch, name: &str) -> Vec<Option<i64>> {
        let col = batch.column_by_name(name).unwrap();
        col.as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
            .iter()
            .collect()
    }

    fn micros(s: &str) -> i64 {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
            .unwrap()
            .and_utc()
            .timestamp_micros()
    }

    fn chartevents_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("1"), Some("2"), Some("3")]),
            ("subject_id", vec![Some("10"), Some("10"), Some("11")]),
            ("hadm_id", vec![Some("100"), Some("100"), Some("101")]),
            ("icustay_id", vec![Some("1000"), None, Some("1001")]),
            ("itemid", vec![Some("223761"), Some("223761"), Some("220045")]),
            (
                "charttime",
                vec![
                    Some("2101-10-20 19:08:00"),
                    Some("2101-10-20 20:00:00.123456789"),
                    Some("2101-10-21 08:00:00"),
                ],
            ),
            ("storetime", vec![Some("2101-10-20 19:10:00"), None, None]),
            ("cgid", vec![Some("17"), None, Some("18")]),
            ("value", vec![Some("afebrile"), Some("afebrile"), None]),
            ("valuenum", vec![Some("98.6"), None, None]),
            ("valueuom", vec![Some("?F"), None, None]),
            ("warning", vec![Some("0"), Some("0"), Some("0")]),
        ])
    }

    fn labevents_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("1"), Some("2"), Some("3"), Some("4")]),
            ("subject_id", vec![Some("3"), Some("3"), Some("3"), Some("4")]),
            ("hadm_id", vec![Some("145834"), None, Some("145834"), None]),
            ("itemid", vec![Some("50868"), Some("50882"), Some("50902"), Some("51006")]),
            (
                "charttime",
                vec![
                    Some("2101-10-12 16:07:00"),
                    Some("2101-10-12 16:07:00"),
                    Some("2101-10-12 16:07:00"),
                    Some("2101-10-13 03:00:00"),
                ],
            ),
            ("value", vec![Some("13"), Some("NEG"), None, Some("27")]),
            ("valuenum", vec![Some("13"), None, None, Some("27")]),
            ("valueuom", vec![Some("mEq/L"), None, None, Some("mg/dL")]),
            ("flag", vec![None, None, Some("abnormal"), Some("abnormal")]),
        ])
    }

    fn admissions_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("21")]),
            ("subject_id", vec![Some("22")]),
            ("hadm_id", vec![Some("165315")]),
            ("admittime", vec![Some("2196-04-09 12:26:00")]),
            ("dischtime", vec![Some("2196-04-10 15:54:00")]),
            ("deathtime", vec![None]),
            ("admission_type", vec![Some("EMERGENCY")]),
            ("admission_location", vec![Some("EMERGENCY ROOM ADMIT")]),
            ("discharge_location", vec![Some("DISC-TRAN CANCER/CHLDRN H")]),
            ("insurance", vec![Some("Private")]),
            ("language", vec![None]),
            ("religion", vec![Some("UNOBTAINABLE")]),
            ("marital_status", vec![Some("MARRIED")]),
            ("ethnicity", vec![Some("WHITE")]),
            ("edregtime", vec![Some("2196-04-09 10:06:00")]),
            ("edouttime", vec![Some("2196-04-09 13:24:00")]),
            ("diagnosis", vec![Some("BENZODIAZEPINE OVERDOSE")]),
            ("hospital_expire_flag", vec![Some("0")]),
            ("has_chartevents_data", vec![Some("1")]),
        ])
    }

    fn prescriptions_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("2214776"), Some("2214777")]),
            ("subject_id", vec![Some("6"), Some("6")]),
            ("hadm_id", vec![Some("107064"), Some("107064")]),
            ("icustay_id", vec![None, Some("228232")]),
            ("startdate", vec![Some("2175-06-11 00:00:00"), Some("2175-06-11")]),
            ("enddate", vec![Some("2175-06-12 00:00:00"), Some("not a date")]),
            ("drug_type", vec![Some("MAIN"), Some("MAIN")]),
            ("drug", vec![Some("Tacrolimus"), Some("Warfarin")]),
            ("drug_name_poe", vec![Some("Tacrolimus"), None]),
            ("drug_name_generic", vec![None, Some("Warfarin")]),
            ("formulary_drug_cd", vec![Some("TACR1"), None]),
            ("gsn", vec![Some("021796"), Some("")]),
            ("ndc", vec![Some("469061711"), Some("see note")]),
            ("prod_strength", vec![Some("1mg Capsule"), Some("5mg Tab")]),
            ("dose_val_rx", vec![Some("2"), Some("5")]),
            ("dose_unit_rx", vec![Some("mg"), Some("mg")]),
            ("form_val_disp", vec![Some("2"), Some("1")]),
            ("form_unit_disp", vec![Some("CAP"), None]),
            ("route", vec![Some("PO"), Some("PO")]),
        ])
    }

    fn patients_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("234"), Some("235")]),
            ("subject_id", vec![Some("249"), Some("250")]),
            ("gender", vec![Some("F"), Some("F")]),
            ("dob", vec![Some("2075-03-13 00:00:00"), Some("2164-12-27 00:00:00")]),
            ("dod", vec![None, Some("2188-11-22 00:00:00")]),
            ("dod_hosp", vec![None, Some("2188-11-22 00:00:00")]),
            ("dod_ssn", vec![None, None]),
            ("expire_flag", vec![Some("0"), None]),
        ])
    }

    fn d_items_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("457")]),
            ("itemid", vec![Some("497")]),
            ("label", vec![Some("Patient controlled analgesia (PCA) [Inject]")]),
            ("abbreviation", vec![None]),
            ("dbsource", vec![Some("carevue")]),
            ("linksto", vec![Some("chartevents")]),
            ("category", vec![None]),
            ("unitname", vec![None]),
            ("param_type", vec![None]),
            ("conceptid", vec![None]),
        ])
    }

    fn d_labitems_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("546"), Some("547")]),
            ("itemid", vec![Some("51346"), None]),
            ("label", vec![Some("Blasts"), Some("Eosinophils")]),
            ("fluid", vec![Some("Cerebrospinal Fluid (CSF)"), Some("Blood")]),
            ("category", vec![Some("Hematology"), Some("Hematology")]),
            ("loinc_code", vec![Some("26447-3"), None]),
        ])
    }

    fn diagnoses_raw() -> RecordBatch {
        raw(&[
            ("row_id", vec![Some("1297"), Some("1298")]),
            ("subject_id", vec![Some("109"), Some("109")]),
            ("hadm_id", vec![Some("172335"), Some("172335")]),
            ("seq_num", vec![Some("1"), None]),
            ("icd9_code", vec![Some("40301"), Some("486")]),
        ])
    }

    fn all_raw() -> Vec<(Table, RecordBatch)> {
        vec![
            (Table::Patients, patients_raw()),
            (Table::Admissions, admissions_raw()),
            (Table::ChartEvents, chartevents_raw()),
            (Table::LabEvents, labevents_raw()),
            (Table::Prescriptions, prescriptions_raw()),
            (Table::DiagnosesIcd, diagnoses_raw()),
            (Table::DItems, d_items_raw()),
            (Table::DLabItems, d_labitems_raw()),
        ]
    }

    #[test]
    fn every_cleaner_matches_its_schema() {
        for (table, batch) in all_raw() {
            let out = clean(table, &batch, &CleanOptions::default())
                .unwrap_or_else(|e| panic!("{table}: {e}"));
            validate(table, &out).unwrap_or_else(|e| panic!("{table}: {e}"));
            let names: Vec<_> = out
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect();
            let expected: Vec<_> = table.schema().names().collect();
            assert_eq!(names, expected, "{table}");
        }
    }

    #[test]
    fn cleaning_twice_is_identical() {
        for (table, batch) in all_raw() {
            let options = CleanOptions::default();
            let first = clean(table, &batch, &options).unwrap();
            let second = clean(table, &batch, &options).unwrap();
            assert_eq!(first, second, "{table}");
        }
    }

    #[test]
    fn unknown_table_name() {
        let err =
            clean_by_name("nonexistent_table", &diagnoses_raw(), &CleanOptions::default())
                .unwrap_err();
        assert!(matches!(err, Error::UnknownTable(_)));
    }

    #[test]
    fn missing_identifier_is_reported() {
        let batch = raw(&[("row_id", vec![Some("1")]), ("label", vec![Some("x")])]);
        let err = clean_d_items(&batch).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumn { ref column, .. } if column == "itemid"
        ));
    }

    #[test]
    fn chartevents_merge_prefers_numeric() {
        let out = clean_chartevents(&chartevents_raw()).unwrap();
        assert_eq!(
            strings(&out, "value_merged"),
            vec![Some("98.6".to_string()), Some("afebrile".to_string()), None]
        );
        assert_eq!(ints(&out, "icustay_id"), vec![Some(1000), None, Some(1001)]);
        assert_eq!(ints(&out, "cgid"), vec![Some(17), None, Some(18)]);
    }

    #[test]
    fn chartevents_floor_charttime() {
        let out = clean_chartevents(&chartevents_raw()).unwrap();
        let charttime = out
            .column_by_name("charttime")
            .unwrap()
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .unwrap();
        assert_eq!(charttime.value(1), micros("2101-10-20 20:00:00.123456"));
    }

    #[test]
    fn labevents_drop_and_unit_suffix() {
        let out = clean_labevents(&labevents_raw()).unwrap();
        assert_eq!(out.num_rows(), 3);
        assert_eq!(ints(&out, "row_id"), vec![Some(1), Some(2), Some(4)]);
        assert_eq!(
            strings(&out, "value_merged"),
            vec![
                Some("13.0 mEq/L".to_string()),
                Some("NEG ".to_string()),
                Some("27.0 mg/dL".to_string()),
            ]
        );
        assert_eq!(ints(&out, "hadm_id"), vec![Some(145834), None, None]);
    }

    #[test]
    fn labevents_without_unit_column() {
        let batch = labevents_raw();
        let idx = batch.schema().index_of("valueuom").unwrap();
        let mut batch = batch;
        batch.remove_column(idx);
        let out = clean_labevents(&batch).unwrap();
        assert_eq!(strings(&out, "value_merged")[0].as_deref(), Some("13.0 "));
    }

    #[test]
    fn labevents_keeps_any_present_numeric_reading() {
        let batch = raw(&[
            ("row_id", vec![Some("1"), Some("2"), Some("3")]),
            ("subject_id", vec![Some("3"), Some("3"), Some("3")]),
            ("hadm_id", vec![None, None, None]),
            ("itemid", vec![Some("50868"), Some("50882"), Some("50902")]),
            (
                "charttime",
                vec![
                    Some("2101-10-12 16:07:00"),
                    Some("2101-10-12 16:07:00"),
                    Some("2101-10-12 16:07:00"),
                ],
            ),
            ("value", vec![None, None, Some("ignored")]),
            ("valuenum", vec![Some("inf"), Some("0.00001"), Some(">100")]),
            ("valueuom", vec![Some("u"), Some("u"), Some("u")]),
            ("flag", vec![None, None, None]),
        ]);
        let out = clean_labevents(&batch).unwrap();
        assert_eq!(ints(&out, "row_id"), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(
            strings(&out, "value_merged"),
            vec![
                Some("inf u".to_string()),
                Some("1e-05 u".to_string()),
                Some(">100 u".to_string()),
            ]
        );
    }

    #[test]
    fn prescriptions_coercions_and_fill() {
        let out = clean_prescriptions(&prescriptions_raw(), &CleanOptions::default()).unwrap();
        assert_eq!(ints(&out, "gsn"), vec![Some(21796), None]);
        assert_eq!(ints(&out, "ndc"), vec![Some(469061711), None]);
        assert_eq!(ints(&out, "icustay_id"), vec![None, Some(228232)]);
        assert_eq!(
            strings(&out, "drug_name_poe"),
            vec![Some("Tacrolimus".to_string()), Some(NOT_RECORDED.to_string())]
        );
        assert_eq!(
            strings(&out, "form_unit_disp")[1].as_deref(),
            Some(NOT_RECORDED)
        );

        let enddate = out.column_by_name("enddate").unwrap();
        assert!(enddate.is_valid(0));
        assert!(enddate.is_null(1));
    }

    #[test]
    fn prescriptions_open_end_dates_opt_in() {
        let options = CleanOptions {
            fill_open_end_dates: true,
        };
        let out = clean_prescriptions(&prescriptions_raw(), &options).unwrap();
        let enddate = out
            .column_by_name("enddate")
            .unwrap()
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .unwrap();
        assert_eq!(enddate.value(1), MAX_TIMESTAMP_MICROS);
        assert_eq!(
            MAX_TIMESTAMP_MICROS,
            micros("2262-04-11 23:47:16.854775")
        );
    }

    #[test]
    fn patients_flag_is_tri_state() {
        let out = clean_patients(&patients_raw()).unwrap();
        let flag = out
            .column_by_name("expire_flag")
            .unwrap()
            .as_any()
            .downcast_ref::<BooleanArray>()
            .unwrap();
        assert_eq!(flag.iter().collect::<Vec<_>>(), vec![Some(false), None]);
        assert!(out.column_by_name("dod_hosp").is_none());
        assert!(out.column_by_name("dod").unwrap().is_null(0));
    }

    #[test]
    fn admissions_fill_only_missing_demographics() {
        let out = clean_admissions(&admissions_raw()).unwrap();
        assert_eq!(strings(&out, "language")[0].as_deref(), Some(NOT_RECORDED));
        assert_eq!(strings(&out, "religion")[0].as_deref(), Some("UNOBTAINABLE"));
        assert_eq!(strings(&out, "marital_status")[0].as_deref(), Some("MARRIED"));
        assert!(out.column_by_name("deathtime").is_none());
        assert!(out.column_by_name("edregtime").is_none());
    }

    #[test]
    fn admissions_bad_flag_is_an_error() {
        let batch = admissions_raw();
        let idx = batch.schema().index_of("hospital_expire_flag").unwrap();
        let mut columns = batch.columns().to_vec();
        columns[idx] = Arc::new(StringArray::from(vec![Some("sometimes")]));
        let batch = RecordBatch::try_new(batch.schema(), columns).unwrap();
        let err = clean_admissions(&batch).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn dictionaries_keep_null_ids() {
        let out = clean_d_labitems(&d_labitems_raw()).unwrap();
        assert_eq!(ints(&out, "itemid"), vec![Some(51346), None]);
        assert_eq!(out.num_rows(), 2);

        let out = clean_d_items(&d_items_raw()).unwrap();
        assert_eq!(out.num_columns(), 5);
    }

    #[test]
    fn diagnoses_seq_num() {
        let out = clean_diagnoses_icd(&diagnoses_raw()).unwrap();
        assert_eq!(ints(&out, "seq_num"), vec![Some(1), None]);
        assert_eq!(strings(&out, "icd9_code")[1].as_deref(), Some("486"));
    }
}
