//! Produto record, write payloads, and the typed field patch.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted product. Always satisfies the field constraints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Produto {
    #[schema(example = 1)]
    pub id: i64,
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    #[schema(example = "Caneta")]
    pub name: String,
    #[serde(rename = "descricao")]
    #[sqlx(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    #[sqlx(rename = "preco")]
    #[schema(example = 2.5)]
    pub price: f64,
    #[serde(rename = "quantidadeEstoque")]
    #[sqlx(rename = "quantidadeestoque")]
    #[schema(example = 100)]
    pub stock_quantity: i32,
}

impl Produto {
    pub fn from_fields(id: i64, fields: ProdutoFields) -> Self {
        Produto {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            stock_quantity: fields.stock_quantity,
        }
    }

    /// Copies the mutable fields; the id is kept.
    pub fn with_fields(self, fields: ProdutoFields) -> Self {
        Produto::from_fields(self.id, fields)
    }
}

/// Values that passed validation, without an id.
#[derive(Clone, Debug, PartialEq)]
pub struct ProdutoFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
}

/// Candidate payload for insert and full update. Any field may be missing;
/// validation decides. An `id` in the body is ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct ProdutoInput {
    #[serde(default, rename = "nome")]
    pub name: Option<String>,
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
    #[serde(default, rename = "preco", deserialize_with = "lenient::opt_f64")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<f64>,
    #[serde(default, rename = "quantidadeEstoque", deserialize_with = "lenient::opt_i32")]
    #[schema(value_type = Option<i32>)]
    pub stock_quantity: Option<i32>,
}

impl From<&Produto> for ProdutoInput {
    fn from(p: &Produto) -> Self {
        ProdutoInput {
            name: Some(p.name.clone()),
            description: p.description.clone(),
            price: Some(p.price),
            stock_quantity: Some(p.stock_quantity),
        }
    }
}

/// Sparse update. Outer `None`: key absent, field untouched.
/// `Some(None)`: key present with `null`, field cleared.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct ProdutoPatch {
    #[serde(default, rename = "nome", deserialize_with = "lenient::present")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, rename = "descricao", deserialize_with = "lenient::present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, rename = "preco", deserialize_with = "lenient::present_f64")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<f64>>,
    #[serde(default, rename = "quantidadeEstoque", deserialize_with = "lenient::present_i32")]
    #[schema(value_type = Option<i32>)]
    pub stock_quantity: Option<Option<i32>>,
}

impl ProdutoPatch {
    /// Overwrites the fields present in the patch.
    pub fn apply(&self, mut base: ProdutoInput) -> ProdutoInput {
        if let Some(v) = &self.name {
            base.name = v.clone();
        }
        if let Some(v) = &self.description {
            base.description = v.clone();
        }
        if let Some(v) = self.price {
            base.price = v;
        }
        if let Some(v) = self.stock_quantity {
            base.stock_quantity = v;
        }
        base
    }
}

/// Number fields accept JSON numbers or numeric strings (HTML forms post strings).
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Int(i64),
        Float(f64),
        Text(String),
    }

    /// `str::parse` accepts "inf" and "NaN", and overflows to infinity; those are refused.
    fn to_f64<E: Error>(v: NumberOrText) -> Result<f64, E> {
        let f = match v {
            NumberOrText::Int(n) => n as f64,
            NumberOrText::Float(f) => f,
            NumberOrText::Text(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => f,
                _ => return Err(E::custom(format!("'{}' is not a decimal number", s))),
            },
        };
        if f.is_finite() {
            Ok(f)
        } else {
            Err(E::custom(format!("{} is not a decimal number", f)))
        }
    }

    fn to_i32<E: Error>(v: NumberOrText) -> Result<i32, E> {
        match v {
            NumberOrText::Int(n) => {
                i32::try_from(n).map_err(|_| E::custom(format!("{} is out of range", n)))
            }
            NumberOrText::Float(f) => {
                if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
                    Ok(f as i32)
                } else {
                    Err(E::custom(format!("{} is not an integer", f)))
                }
            }
            NumberOrText::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| E::custom(format!("'{}' is not an integer", s))),
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Option::<NumberOrText>::deserialize(d)?.map(to_f64).transpose()
    }

    pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        Option::<NumberOrText>::deserialize(d)?.map(to_i32).transpose()
    }

    pub fn present<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(d).map(Some)
    }

    pub fn present_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<f64>>, D::Error> {
        opt_f64(d).map(Some)
    }

    pub fn present_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<i32>>, D::Error> {
        opt_i32(d).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caneta() -> Produto {
        Produto {
            id: 7,
            name: "Caneta".into(),
            description: Some("Azul".into()),
            price: 2.5,
            stock_quantity: 100,
        }
    }

    #[test]
    fn empty_patch_leaves_product_untouched() {
        let patch: ProdutoPatch = serde_json::from_value(json!({})).unwrap();
        let merged = patch.apply(ProdutoInput::from(&caneta()));
        assert_eq!(merged, ProdutoInput::from(&caneta()));
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: ProdutoPatch =
            serde_json::from_value(json!({"descricao": null, "preco": 3})).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.price, Some(Some(3.0)));

        let merged = patch.apply(ProdutoInput::from(&caneta()));
        assert_eq!(merged.name.as_deref(), Some("Caneta"));
        assert_eq!(merged.description, None);
        assert_eq!(merged.price, Some(3.0));
        assert_eq!(merged.stock_quantity, Some(100));
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let input: ProdutoInput = serde_json::from_value(json!({
            "nome": "Lápis",
            "preco": "1.75",
            "quantidadeEstoque": "12"
        }))
        .unwrap();
        assert_eq!(input.price, Some(1.75));
        assert_eq!(input.stock_quantity, Some(12));
    }

    #[test]
    fn price_rejects_non_finite_text() {
        for text in ["inf", "-Infinity", "NaN", "1e999"] {
            assert!(
                serde_json::from_value::<ProdutoInput>(json!({"preco": text})).is_err(),
                "{text} was accepted"
            );
            assert!(serde_json::from_value::<ProdutoPatch>(json!({"preco": text})).is_err());
        }
        let input: ProdutoInput = serde_json::from_value(json!({"preco": "1e3"})).unwrap();
        assert_eq!(input.price, Some(1000.0));
    }

    #[test]
    fn quantity_rejects_fractions_and_garbage() {
        assert!(serde_json::from_value::<ProdutoInput>(json!({"quantidadeEstoque": 2.5})).is_err());
        assert!(serde_json::from_value::<ProdutoInput>(json!({"quantidadeEstoque": "dez"})).is_err());
        let input: ProdutoInput =
            serde_json::from_value(json!({"quantidadeEstoque": 4.0})).unwrap();
        assert_eq!(input.stock_quantity, Some(4));
    }

    #[test]
    fn input_ignores_id() {
        let input: ProdutoInput =
            serde_json::from_value(json!({"id": 99, "nome": "Caneta"})).unwrap();
        assert_eq!(input.name.as_deref(), Some("Caneta"));
    }

    #[test]
    fn produto_serializes_with_wire_names() {
        let v = serde_json::to_value(caneta()).unwrap();
        assert_eq!(
            v,
            json!({
                "id": 7,
                "nome": "Caneta",
                "descricao": "Azul",
                "preco": 2.5,
                "quantidadeEstoque": 100
            })
        );
    }
}
