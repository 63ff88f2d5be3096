//! Namespace-aware field extraction from KSeF XML documents.

use roxmltree::{Document, Node};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::model::{InvoiceNumber, InvoiceRecord, LineItem, Party, TaxRate};

/// Field extractor over one parsed XML document.
///
/// The element namespace is taken from the document root rather than
/// hardcoded, so schema revisions that only bump the namespace URI still
/// parse. Lookups walk descendant elements by local-name path; a missing
/// path is a normal condition and yields `None`.
struct Fields<'a> {
    ns: Option<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(root: Node<'a, 'a>) -> Self {
        Self {
            ns: root.tag_name().namespace(),
        }
    }

    fn matches(&self, node: &Node, name: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == name
            && node.tag_name().namespace() == self.ns
    }

    fn find(&self, scope: Node<'a, 'a>, path: &[&str]) -> Option<Node<'a, 'a>> {
        let mut cur = scope;
        for segment in path {
            cur = cur.descendants().find(|n| self.matches(n, segment))?;
        }
        Some(cur)
    }

    /// First matching non-empty text value, trimmed.
    fn text(&self, scope: Node<'a, 'a>, path: &[&str]) -> Option<&'a str> {
        self.find(scope, path)?
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn text_or(&self, scope: Node<'a, 'a>, path: &[&str], default: &str) -> String {
        self.text(scope, path).unwrap_or(default).to_string()
    }

    /// Optional amount: missing is `0`, malformed is a fatal error.
    fn decimal_or_zero(&self, scope: Node<'a, 'a>, path: &[&str]) -> Result<Decimal> {
        match self.text(scope, path) {
            None => Ok(Decimal::ZERO),
            Some(raw) => parse_decimal(raw, path),
        }
    }

    /// Required amount: missing and malformed are both fatal.
    fn required_decimal(&self, scope: Node<'a, 'a>, path: &[&str]) -> Result<Decimal> {
        match self.text(scope, path) {
            None => Err(Error::MissingField(path.join("/"))),
            Some(raw) => parse_decimal(raw, path),
        }
    }
}

fn parse_decimal(raw: &str, path: &[&str]) -> Result<Decimal> {
    raw.parse::<Decimal>().map_err(|_| Error::MalformedNumber {
        field: path.join("/"),
        value: raw.to_string(),
    })
}

/// Map a KSeF XML document onto a typed invoice record.
pub(crate) fn extract_record(content: &str, tracking_id: &str) -> Result<InvoiceRecord> {
    let doc = Document::parse(content)?;
    let root = doc.root_element();
    let fields = Fields::new(root);

    let number = InvoiceNumber::parse(&fields.text_or(root, &["P_2"], ""));
    let issue_date = fields.text_or(root, &["P_1"], "");
    let sale_date = fields.text_or(root, &["P_6"], &issue_date);
    let currency = fields.text_or(root, &["KodWaluty"], "");
    let total_amount = fields.required_decimal(root, &["P_15"])?;

    let seller = extract_party(&fields, root, "Podmiot1");
    let buyer = extract_party(&fields, root, "Podmiot2");

    let mut items = Vec::new();
    for row in root
        .descendants()
        .filter(|n| fields.matches(n, "FaWiersz"))
    {
        items.push(LineItem::new(
            fields.text_or(row, &["P_7"], ""),
            fields.text_or(row, &["P_8A"], ""),
            fields.text_or(row, &["P_8B"], ""),
            fields.decimal_or_zero(row, &["P_9A"])?,
            fields.decimal_or_zero(row, &["P_11"])?,
            TaxRate::parse(&fields.text_or(row, &["P_12"], "np.")),
        ));
    }

    Ok(InvoiceRecord {
        number,
        issue_date,
        sale_date,
        seller,
        buyer,
        currency,
        total_amount,
        tracking_id: tracking_id.to_string(),
        items,
    })
}

fn extract_party<'a>(fields: &Fields<'a>, root: Node<'a, 'a>, element: &str) -> Party {
    Party {
        name: fields.text_or(root, &[element, "DaneIdentyfikacyjne", "Nazwa"], ""),
        tax_id: fields
            .text(root, &[element, "DaneIdentyfikacyjne", "NIP"])
            .map(str::to_string),
        address: fields.text_or(root, &[element, "Adres", "AdresL1"], ""),
    }
}
