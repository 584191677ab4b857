use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use firds_reader::error::LoadError;
use firds_reader::{BatchConfig, DocumentLoader, RawDocument, XmlFileLoader};

/// One `FinInstrm` entry with a `NewRcrd` section
#[must_use]
pub fn instrument(id: &str, name: &str, issuer: &str) -> String {
    format!(
        "<FinInstrm><NewRcrd>{}<Issr>{issuer}</Issr></NewRcrd></FinInstrm>",
        general_attributes(id, name)
    )
}

/// `FinInstrmGnlAttrbts` block for an equity-like instrument
#[must_use]
pub fn general_attributes(id: &str, name: &str) -> String {
    format!(
        "<FinInstrmGnlAttrbts>\
           <Id>{id}</Id>\
           <FullNm>{name}</FullNm>\
           <ShrtNm>SHORT</ShrtNm>\
           <ClssfctnTp>ESVUFR</ClssfctnTp>\
           <NtnlCcy>EUR</NtnlCcy>\
           <CmmdtyDerivInd>false</CmmdtyDerivInd>\
         </FinInstrmGnlAttrbts>"
    )
}

/// Full delta report wrapping `body` inside the report element
#[must_use]
pub fn delta_report(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<BizData xmlns="urn:iso:std:iso:20022:tech:xsd:head.003.001.01">
  <Hdr><AppHdr><Fr><OrgId><Id><OrgId><Othr><Id>EU</Id></Othr></OrgId></Id></OrgId></Fr></AppHdr></Hdr>
  <Pyld>
    <Document xmlns="urn:iso:std:iso:20022:tech:xsd:auth.036.001.02">
      <FinInstrmRptgRefDataDltaRpt>
        <RptHdr><RptgNtty><NtlCmptntAuthrty>EU</NtlCmptntAuthrty></RptgNtty></RptHdr>
        {body}
      </FinInstrmRptgRefDataDltaRpt>
    </Document>
  </Pyld>
</BizData>"#
    )
}

/// Delta report containing `count` instruments with ids `<prefix>1..=count`
#[must_use]
pub fn report_with(prefix: &str, count: usize) -> String {
    let body: String = (1..=count)
        .map(|i| instrument(&format!("{prefix}{i}"), &format!("{prefix} instrument {i}"), "LEI0001"))
        .collect();
    delta_report(&body)
}

/// Delta report whose instrument list is present but empty
#[must_use]
pub fn empty_report() -> String {
    delta_report("<FinInstrm/>")
}

/// Document that does not follow the delta report layout
#[must_use]
pub fn foreign_document() -> String {
    r#"<?xml version="1.0"?><BizData><Hdr/><Other>1</Other></BizData>"#.to_string()
}

/// Feed index listing `links` as download links
#[must_use]
pub fn feed_index(links: &[String]) -> String {
    let docs: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<doc><str name="file_type">DLTINS</str><str name="download_link">{link}</str></doc>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><response><result name="response">{docs}</result></response>"#
    )
}

/// Zip archive holding `entries`
#[must_use]
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Write `content` to `dir/name`, creating `dir` if needed
pub fn write_file(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Batch configuration for tests: fixed workers, no progress bar
#[must_use]
pub fn test_batch_config(workers: usize) -> BatchConfig {
    BatchConfig {
        workers: Some(workers),
        show_progress: false,
    }
}

/// XML loader that sleeps before loading selected files
#[derive(Debug, Default)]
pub struct DelayedLoader {
    delays: HashMap<PathBuf, Duration>,
}

impl DelayedLoader {
    #[must_use]
    pub fn new(delays: HashMap<PathBuf, Duration>) -> Self {
        Self { delays }
    }
}

impl DocumentLoader for DelayedLoader {
    fn load(&self, path: &Path) -> Result<RawDocument, LoadError> {
        if let Some(delay) = self.delays.get(path) {
            thread::sleep(*delay);
        }
        XmlFileLoader::new().load(path)
    }
}
