//! KSeF XML invoice parsing.
//!
//! Parsing maps the raw XML document onto a typed [`InvoiceRecord`] in one
//! pass; nothing downstream ever traverses the XML tree.

mod xml;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::InvoiceRecord;

/// Parse a KSeF XML invoice file.
///
/// The external tracking id defaults to the file stem; a configured override
/// replaces it later in the assembler.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<InvoiceRecord> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let tracking_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_str(&content, &tracking_id)
}

/// Parse a KSeF XML invoice from a string.
pub fn parse_str(content: &str, tracking_id: &str) -> Result<InvoiceRecord> {
    xml::extract_record(content, tracking_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Faktura xmlns="http://crd.gov.pl/wzor/2023/06/29/12648/">
  <Fa>
    <KodWaluty>PLN</KodWaluty>
    <P_1>2024-03-05</P_1>
    <P_2>5/2024</P_2>
    <P_15>1230.00</P_15>
    <FaWiersz>
      <P_7>Usługa programistyczna</P_7>
      <P_8A>szt.</P_8A>
      <P_8B>1</P_8B>
      <P_9A>1000.00</P_9A>
      <P_11>1000.00</P_11>
      <P_12>23</P_12>
    </FaWiersz>
  </Fa>
  <Podmiot1>
    <DaneIdentyfikacyjne>
      <NIP>1234567890</NIP>
      <Nazwa>Świetna Firma Sp. z o.o.</Nazwa>
    </DaneIdentyfikacyjne>
    <Adres>
      <AdresL1>ul. Długa 1, 00-001 Warszawa</AdresL1>
    </Adres>
  </Podmiot1>
  <Podmiot2>
    <DaneIdentyfikacyjne>
      <Nazwa>Klient S.A.</Nazwa>
    </DaneIdentyfikacyjne>
    <Adres>
      <AdresL1>ul. Krótka 2, 00-002 Kraków</AdresL1>
    </Adres>
  </Podmiot2>
</Faktura>"#;

    #[test]
    fn test_parse_sample_invoice() {
        let record = parse_str(SAMPLE, "ksef-0001").unwrap();

        assert_eq!(record.number.sequence, "5");
        assert_eq!(record.number.year, "2024");
        assert_eq!(record.issue_date, "2024-03-05");
        // Sale date defaults to the issue date when P_6 is absent.
        assert_eq!(record.sale_date, "2024-03-05");
        assert_eq!(record.currency, "PLN");
        assert_eq!(record.total_amount, dec!(1230.00));
        assert_eq!(record.tracking_id, "ksef-0001");

        assert_eq!(record.seller.name, "Świetna Firma Sp. z o.o.");
        assert_eq!(record.seller.tax_id.as_deref(), Some("1234567890"));
        assert_eq!(record.buyer.name, "Klient S.A.");
        assert_eq!(record.buyer.tax_id, None);

        assert_eq!(record.items.len(), 1);
        let item = &record.items[0];
        assert_eq!(item.net, dec!(1000.00));
        assert_eq!(item.tax_amount, dec!(230.00));
        assert_eq!(item.gross, dec!(1230.00));
    }

    #[test]
    fn test_namespace_is_autodetected() {
        // A different schema revision only changes the namespace URI.
        let other = SAMPLE.replace("2023/06/29/12648", "2025/01/10/99999");
        let record = parse_str(&other, "t").unwrap();
        assert_eq!(record.number.sequence, "5");
    }

    #[test]
    fn test_missing_declared_total_is_fatal() {
        let broken = SAMPLE.replace("<P_15>1230.00</P_15>", "");
        let err = parse_str(&broken, "t").unwrap_err();
        assert!(matches!(err, Error::MissingField(f) if f == "P_15"));
    }

    #[test]
    fn test_malformed_declared_total_is_fatal() {
        let broken = SAMPLE.replace("1230.00", "12 30 zł");
        let err = parse_str(&broken, "t").unwrap_err();
        assert!(matches!(err, Error::MalformedNumber { .. }));
    }

    #[test]
    fn test_malformed_line_amount_is_fatal() {
        let broken = SAMPLE.replace("<P_11>1000.00</P_11>", "<P_11>x</P_11>");
        assert!(parse_str(&broken, "t").is_err());
    }

    #[test]
    fn test_missing_line_amount_defaults_to_zero() {
        let sparse = SAMPLE.replace("<P_9A>1000.00</P_9A>", "");
        let record = parse_str(&sparse, "t").unwrap();
        assert_eq!(record.items[0].unit_price, dec!(0));
    }

    #[test]
    fn test_exempt_rate_code_default() {
        let sparse = SAMPLE.replace("<P_12>23</P_12>", "");
        let record = parse_str(&sparse, "t").unwrap();
        let item = &record.items[0];
        assert_eq!(item.tax_amount, dec!(0));
        assert_eq!(item.gross, item.net);
    }
}
