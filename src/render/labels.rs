//! Bilingual label sets.
//!
//! Every user-facing string on the document comes from one of two fixed
//! label sets. Invoices in PLN get the Polish set; any other currency code
//! (including an absent one) gets the default English set — domestic
//! invoices read natively, foreign-currency invoices address a foreign
//! buyer. Label text runs through the same per-document text preparation as
//! record text, so Polish diacritics transliterate on an ASCII-only surface.

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Polish,
}

impl Locale {
    /// Select the locale for a currency code.
    pub fn for_currency(currency: &str) -> Self {
        if currency.eq_ignore_ascii_case("PLN") {
            Locale::Polish
        } else {
            Locale::English
        }
    }

    /// The label set for this locale.
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::English => &ENGLISH,
            Locale::Polish => &POLISH,
        }
    }
}

/// Fixed set of user-facing strings for one locale.
pub struct Labels {
    pub invoice_no: &'static str,
    pub date_of_issue: &'static str,
    pub tracking_number: &'static str,
    pub seller: &'static str,
    pub buyer: &'static str,
    pub tax_id: &'static str,
    pub bank_account: &'static str,
    pub date_of_sale: &'static str,
    pub payment_method: &'static str,
    pub col_no: &'static str,
    pub col_description: &'static str,
    pub col_quantity: &'static str,
    pub col_unit: &'static str,
    pub col_unit_price: &'static str,
    pub col_net: &'static str,
    pub col_tax_rate: &'static str,
    pub col_tax: &'static str,
    /// Gross column header; takes the currency code.
    pub col_value: &'static str,
    pub total: &'static str,
    pub by_rates: &'static str,
    pub amount_due: &'static str,
}

impl Labels {
    /// Gross value column header for a currency.
    pub fn value_header(&self, currency: &str) -> String {
        self.col_value.replace("{}", currency)
    }

    /// Payment method line for a currency.
    pub fn payment_line(&self, currency: &str) -> String {
        self.payment_method.replace("{}", currency)
    }
}

static ENGLISH: Labels = Labels {
    invoice_no: "Invoice No.",
    date_of_issue: "Date of issue",
    tracking_number: "KSeF Number",
    seller: "Seller:",
    buyer: "Buyer:",
    tax_id: "NIP",
    bank_account: "Bank account",
    date_of_sale: "Date of sale",
    payment_method: "Payment method: Bank transfer in {}",
    col_no: "No.",
    col_description: "Name of service",
    col_quantity: "Quantity",
    col_unit: "Unit",
    col_unit_price: "Unit net price",
    col_net: "Net price",
    col_tax_rate: "VAT tax rate",
    col_tax: "Total Tax",
    col_value: "{} value",
    total: "Total",
    by_rates: "in that by rates",
    amount_due: "Amount due:",
};

static POLISH: Labels = Labels {
    invoice_no: "Faktura nr",
    date_of_issue: "Data wystawienia",
    tracking_number: "Numer KSeF",
    seller: "Sprzedawca:",
    buyer: "Nabywca:",
    tax_id: "NIP",
    bank_account: "Rachunek bankowy",
    date_of_sale: "Data sprzedaży",
    payment_method: "Forma płatności: przelew w {}",
    col_no: "Lp.",
    col_description: "Nazwa usługi",
    col_quantity: "Ilość",
    col_unit: "Jedn.",
    col_unit_price: "Cena jedn. netto",
    col_net: "Wartość netto",
    col_tax_rate: "Stawka VAT",
    col_tax: "Kwota VAT",
    col_value: "Wartość {}",
    total: "Razem",
    by_rates: "w tym wg stawek",
    amount_due: "Do zapłaty:",
};
