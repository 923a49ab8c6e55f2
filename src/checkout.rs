//!
//! Order-form validation for PIX checkout.
//!
//! The storefront posts a loosely typed form (Portuguese field names, amounts
//! as numbers or price strings, optional address). [`validate_order`] checks
//! the required fields and normalizes everything into a [`CheckoutOrder`]
//! with integer cents and digit-only documents.

use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

pub const DEFAULT_PRODUCT_TITLE: &str = "eBook - Rei da Foda";
pub const DEFAULT_STREET: &str = "Rua não informada";
pub const DEFAULT_STREET_NUMBER: &str = "S/N";
pub const DEFAULT_ZIP_CODE: &str = "00000000";
pub const DEFAULT_NEIGHBORHOOD: &str = "Centro";
pub const DEFAULT_CITY: &str = "São Paulo";
pub const DEFAULT_STATE: &str = "SP";

/// An amount as submitted: a JSON number or a price string such as `"R$ 19,90"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// A zero number or a blank string counts as not submitted.
    pub fn is_blank(&self) -> bool {
        match self {
            AmountInput::Number(value) => *value == 0.0,
            AmountInput::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn to_cents(&self) -> Option<i64> {
        match self {
            AmountInput::Number(value) => float_to_cents(*value),
            AmountInput::Text(text) => parse_price_cents(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressForm {
    #[serde(default, rename = "rua")]
    pub street: Option<String>,
    #[serde(default, rename = "numero")]
    pub number: Option<String>,
    #[serde(default, rename = "complemento")]
    pub complement: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default, rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(default, rename = "cidade")]
    pub city: Option<String>,
    #[serde(default, rename = "estado")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBumpForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<AmountInput>,
}

/// The checkout form as posted by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderForm {
    #[serde(default, rename = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "telefone")]
    pub phone: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default, rename = "valor")]
    pub amount: Option<AmountInput>,
    #[serde(default, rename = "produto")]
    pub product: Option<String>,
    #[serde(default, rename = "endereco")]
    pub address: Option<AddressForm>,
    #[serde(default, rename = "orderBumps")]
    pub order_bumps: Vec<OrderBumpForm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    pub street_number: String,
    pub complement: String,
    pub zip_code: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBump {
    pub name: String,
    pub price_cents: i64,
}

/// A validated, normalized order ready to be sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutOrder {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    /// Total charged, in cents. Already includes any order bumps.
    pub amount_cents: i64,
    pub product_title: String,
    pub address: Address,
    pub order_bumps: Vec<OrderBump>,
}

impl CheckoutOrder {
    /// Sum of the order bump prices, for reporting only.
    pub fn order_bumps_cents(&self) -> i64 {
        self.order_bumps.iter().map(|b| b.price_cents).sum()
    }
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Structural CPF check: 11 digits, not all the same.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = digits_only(cpf);
    if digits.len() != 11 {
        return false;
    }
    let first = digits.as_bytes()[0];
    !digits.bytes().all(|b| b == first)
}

/// Accepts `local@domain.tld` shapes without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn float_to_cents(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let cents = (value * 100.0).round();
    if cents.abs() > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Parses a price string into cents without going through floating point.
///
/// Accepts an optional `R$` prefix, surrounding spaces, and either `.` or `,`
/// as decimal separator. Extra fraction digits are rounded half up.
pub fn parse_price_cents(text: &str) -> Option<i64> {
    let cleaned: String = text.replace("R$", "").chars().filter(|c| !c.is_whitespace()).collect();
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let body = body.replace(',', ".");
    let (whole, fraction) = match body.split_once('.') {
        Some((w, f)) => (w, f),
        None => (body.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

    let cents = whole_value
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;
    Some(if negative { -cents } else { cents })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_state(state: Option<&str>) -> String {
    let letters: String = state
        .unwrap_or(DEFAULT_STATE)
        .to_uppercase()
        .chars()
        .filter(char::is_ascii_uppercase)
        .collect();
    if letters.len() == 2 {
        letters
    } else {
        DEFAULT_STATE.to_string()
    }
}

fn normalize_address(form: Option<&AddressForm>) -> Address {
    let empty = AddressForm::default();
    let form = form.unwrap_or(&empty);
    let zip = present(&form.cep).map(digits_only).filter(|z| !z.is_empty());
    Address {
        street: present(&form.street).unwrap_or(DEFAULT_STREET).to_string(),
        street_number: present(&form.number).unwrap_or(DEFAULT_STREET_NUMBER).to_string(),
        complement: present(&form.complement).unwrap_or("").to_string(),
        zip_code: zip.unwrap_or_else(|| DEFAULT_ZIP_CODE.to_string()),
        neighborhood: present(&form.neighborhood).unwrap_or(DEFAULT_NEIGHBORHOOD).to_string(),
        city: present(&form.city).unwrap_or(DEFAULT_CITY).to_string(),
        state: normalize_state(present(&form.state)),
    }
}

/// Validates and normalizes a checkout form.
pub fn validate_order(form: &OrderForm) -> Result<CheckoutOrder, CheckoutError> {
    let name = present(&form.name);
    let email = present(&form.email);
    let phone = present(&form.phone);
    let cpf = present(&form.cpf);

    let mut missing = Vec::new();
    for (field, value) in [("nome", name), ("email", email), ("telefone", phone), ("cpf", cpf)] {
        if value.is_none() {
            missing.push(field);
        }
    }
    let amount = form.amount.as_ref().filter(|a| !a.is_blank());
    if amount.is_none() {
        missing.push("valor");
    }
    let (Some(name), Some(email), Some(phone), Some(cpf), Some(amount)) =
        (name, email, phone, cpf, amount)
    else {
        return Err(CheckoutError::MissingFields(missing.join(", ")));
    };

    if !is_valid_cpf(cpf) {
        return Err(CheckoutError::InvalidCpf);
    }
    if !is_valid_email(email) {
        return Err(CheckoutError::InvalidEmail);
    }
    let amount_cents = match amount.to_cents() {
        Some(cents) if cents > 0 => cents,
        _ => return Err(CheckoutError::InvalidAmount),
    };

    let order_bumps: Vec<OrderBump> = form
        .order_bumps
        .iter()
        .map(|bump| OrderBump {
            name: bump.name.clone().unwrap_or_default(),
            price_cents: bump.price.as_ref().and_then(AmountInput::to_cents).unwrap_or(0),
        })
        .collect();
    if !order_bumps.is_empty() {
        tracing::debug!(count = order_bumps.len(), "order bumps included in total");
    }

    Ok(CheckoutOrder {
        name: name.to_string(),
        email: email.to_string(),
        phone: digits_only(phone),
        cpf: digits_only(cpf),
        amount_cents,
        product_title: present(&form.product).unwrap_or(DEFAULT_PRODUCT_TITLE).to_string(),
        address: normalize_address(form.address.as_ref()),
        order_bumps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(json: &str) -> OrderForm {
        serde_json::from_str(json).unwrap()
    }

    const BASE: &str = r#"{"nome":"João Silva","email":"joao@email.com","telefone":"(11) 98765-4321","cpf":"123.456.789-09","valor":19.9}"#;

    #[test]
    fn valid_form_is_normalized() {
        let order = validate_order(&form(BASE)).unwrap();
        assert_eq!(order.cpf, "12345678909");
        assert_eq!(order.phone, "11987654321");
        assert_eq!(order.amount_cents, 1990);
        assert_eq!(order.product_title, DEFAULT_PRODUCT_TITLE);
        assert_eq!(order.address.street, DEFAULT_STREET);
        assert_eq!(order.address.zip_code, DEFAULT_ZIP_CODE);
        assert_eq!(order.address.state, "SP");
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = validate_order(&form(r#"{"nome":"A","email":" "}"#)).unwrap_err();
        assert_eq!(err, CheckoutError::MissingFields("email, telefone, cpf, valor".into()));
    }

    #[test]
    fn cpf_rules() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("1234567890"));
        let bad = BASE.replace("123.456.789-09", "000.000.000-00");
        assert_eq!(validate_order(&form(&bad)), Err(CheckoutError::InvalidCpf));
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(!is_valid_email("a@@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(is_valid_email("a@b.com."));
        assert!(is_valid_email("a@mail.co.uk"));
        let bad = BASE.replace("joao@email.com", "joao.email.com");
        assert_eq!(validate_order(&form(&bad)), Err(CheckoutError::InvalidEmail));
    }

    #[test]
    fn price_strings_parse_to_cents() {
        assert_eq!(parse_price_cents("R$ 19,90"), Some(1990));
        assert_eq!(parse_price_cents("19.9"), Some(1990));
        assert_eq!(parse_price_cents("7"), Some(700));
        assert_eq!(parse_price_cents("0,005"), Some(1));
        assert_eq!(parse_price_cents(",5"), Some(50));
        assert_eq!(parse_price_cents("-3,00"), Some(-300));
        assert_eq!(parse_price_cents("abc"), None);
        assert_eq!(parse_price_cents("R$"), None);
        assert_eq!(parse_price_cents("1.2.3"), None);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in ["-5", "\"0,00\"", "\"grátis\""] {
            let json = BASE.replace("19.9", amount);
            assert_eq!(validate_order(&form(&json)), Err(CheckoutError::InvalidAmount), "{amount}");
        }
    }

    #[test]
    fn blank_or_zero_amount_counts_as_missing() {
        for amount in ["\"\"", "\"   \"", "0", "0.0"] {
            let json = BASE.replace("19.9", amount);
            assert_eq!(
                validate_order(&form(&json)),
                Err(CheckoutError::MissingFields("valor".into())),
                "{amount}"
            );
        }
    }

    #[test]
    fn string_amount_and_bumps() {
        let json = r#"{"nome":"A","email":"a@b.co","telefone":"1","cpf":"52998224725","valor":"R$ 47,80",
            "orderBumps":[{"name":"Extra","price":"R$ 9,90"},{"name":"Bônus","price":18},{"name":"Quebrado","price":"?"}]}"#;
        let order = validate_order(&form(json)).unwrap();
        assert_eq!(order.amount_cents, 4780);
        assert_eq!(order.order_bumps.len(), 3);
        assert_eq!(order.order_bumps_cents(), 990 + 1800);
    }

    #[test]
    fn address_cleanup() {
        let json = r#"{"nome":"A","email":"a@b.co","telefone":"1","cpf":"52998224725","valor":10,
            "endereco":{"rua":"Av. Paulista","numero":"1000","cep":"01310-100","cidade":"São Paulo","estado":"s.p."}}"#;
        let order = validate_order(&form(json)).unwrap();
        assert_eq!(order.address.street, "Av. Paulista");
        assert_eq!(order.address.street_number, "1000");
        assert_eq!(order.address.zip_code, "01310100");
        assert_eq!(order.address.neighborhood, DEFAULT_NEIGHBORHOOD);
        assert_eq!(order.address.state, "SP");

        assert_eq!(normalize_state(Some("rj")), "RJ");
        assert_eq!(normalize_state(Some("Minas")), "SP");
        assert_eq!(normalize_state(None), "SP");
    }
}
