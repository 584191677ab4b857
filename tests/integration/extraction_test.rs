use std::path::Path;

use crate::utils::{delta_report, empty_report, general_attributes, instrument, report_with};
use firds_reader::document::loader::parse_document;
use firds_reader::{
    ExtractionError, ExtractionSchema, InstrumentField, InstrumentRecord, RecordExtractor,
};

fn extract(xml: &str) -> Result<Vec<InstrumentRecord>, ExtractionError> {
    let doc = parse_document(Path::new("fixture.xml"), xml).expect("fixture parses");
    RecordExtractor::default().extract(&doc)
}

#[test]
fn test_every_record_has_all_fields() {
    let records = extract(&report_with("DE000", 3)).unwrap();
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.id, format!("DE000{}", i + 1));
        assert_eq!(record.classification_type, "ESVUFR");
        assert_eq!(record.notional_currency, "EUR");
        assert_eq!(record.commodity_derivative_flag, "false");
        assert_eq!(record.issuer, "LEI0001");
        assert_eq!(record.values().len(), InstrumentField::ALL.len());
    }
}

#[test]
fn test_single_instrument_document() {
    let records = extract(&report_with("ONLY", 1)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].full_name, "ONLY instrument 1");
}

#[test]
fn test_empty_instrument_list() {
    assert!(extract(&empty_report()).unwrap().is_empty());
}

#[test]
fn test_schema_mismatch_names_the_file() {
    let xml = r#"<BizData><Pyld><Document><FinInstrmRptgRefDataRpt/></Document></Pyld></BizData>"#;
    let err = extract(xml).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::SchemaMismatch {
            file: "fixture.xml".into(),
            segment: "FinInstrmRptgRefDataDltaRpt".to_string(),
        }
    );
    assert!(err.to_string().contains("fixture.xml"));
}

#[test]
fn test_unknown_tags_are_ignored() {
    let body = format!(
        "<FinInstrm><NewRcrd>{}<TechAttrbts><RlvntCmptntAuthrty>DE</RlvntCmptntAuthrty></TechAttrbts>\
         <Issr>LEI42</Issr><DerivInstrmAttrbts><XpryDt>2030-01-01</XpryDt></DerivInstrmAttrbts></NewRcrd></FinInstrm>",
        general_attributes("XS1", "Swap")
    );
    let records = extract(&delta_report(&body)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].issuer, "LEI42");
    assert_eq!(records[0].full_name, "Swap");
}

#[test]
fn test_missing_issuer_defaults_to_empty() {
    let body = format!(
        "<FinInstrm><TermntdRcrd>{}</TermntdRcrd></FinInstrm>",
        general_attributes("TERM1", "Terminated")
    );
    let records = extract(&delta_report(&body)).unwrap();
    assert_eq!(records[0].issuer, "");
    assert_eq!(records[0].id, "TERM1");
}

/// Pins the row count for an entry that carries two record sections: one
/// row per section, each holding the entry's merged values.
#[test]
fn test_row_count_per_record_section() {
    let two_sections = format!(
        "<FinInstrm>\
           <ModfdRcrd>{}<Issr>OLD</Issr></ModfdRcrd>\
           <NewRcrd><Issr>NEW</Issr></NewRcrd>\
         </FinInstrm>",
        general_attributes("MOD1", "Modified")
    );
    let body = format!(
        "{}{}{}",
        instrument("A1", "First", "L1"),
        two_sections,
        instrument("A3", "Third", "L3")
    );
    let records = extract(&delta_report(&body)).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[1], records[2]);
    assert_eq!(records[1].id, "MOD1");
    assert_eq!(records[1].issuer, "NEW");
    assert_eq!(records[3].id, "A3");
}

#[test]
fn test_attribute_only_issuer_keeps_the_file() {
    let body = format!(
        r#"<FinInstrm>
             <NewRcrd>{}<Issr nil="true"/></NewRcrd>
           </FinInstrm>
           <FinInstrm>
             <NewRcrd>{}<Issr scheme="LEI">LEI42</Issr></NewRcrd>
           </FinInstrm>"#,
        general_attributes("NIL1", "No issuer"),
        general_attributes("ATTR1", "Issuer with scheme"),
    );
    let records = extract(&delta_report(&body)).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "NIL1");
    assert_eq!(records[0].issuer, "");
    assert_eq!(records[1].id, "ATTR1");
    assert_eq!(records[1].issuer, "LEI42");
}

#[test]
fn test_scalar_record_section_is_malformed() {
    let body = "<FinInstrm><NewRcrd>text only</NewRcrd></FinInstrm>";
    assert!(matches!(
        extract(&delta_report(body)),
        Err(ExtractionError::Malformed { .. })
    ));
}

#[test]
fn test_custom_schema_from_json() {
    let schema = ExtractionSchema::from_json_str(
        r#"{
            "version": "FULINS",
            "record_path": ["BizData", "Pyld", "Document", "FinInstrmRptgRefDataRpt", "RefData"],
            "issuer_key": "Issr",
            "attributes_key": "FinInstrmGnlAttrbts",
            "attribute_fields": [
                { "key": "Id", "field": "id" },
                { "key": "ShrtNm", "field": "full_name" }
            ]
        }"#,
    )
    .unwrap();
    let xml = format!(
        "<BizData><Pyld><Document><FinInstrmRptgRefDataRpt>\
           <RefData><NewRcrd>{}<Issr>LEI7</Issr></NewRcrd></RefData>\
         </FinInstrmRptgRefDataRpt></Document></Pyld></BizData>",
        general_attributes("FUL1", "Long name")
    );
    let doc = parse_document(Path::new("full.xml"), &xml).unwrap();
    let records = RecordExtractor::new(schema).extract(&doc).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "FUL1");
    assert_eq!(records[0].full_name, "SHORT");
    assert_eq!(records[0].notional_currency, "");
    assert_eq!(records[0].issuer, "LEI7");
}

#[test]
fn test_extraction_is_idempotent() {
    let doc = parse_document(Path::new("fixture.xml"), &report_with("I", 5)).unwrap();
    let extractor = RecordExtractor::default();
    assert_eq!(extractor.extract(&doc), extractor.extract(&doc));
}
