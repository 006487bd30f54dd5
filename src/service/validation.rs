//! Field constraints for Produto. Every write path goes through [`validate`].

use crate::model::{ProdutoFields, ProdutoInput};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    NotNull,
    MinLength,
    MinValue,
}

/// One failed constraint on one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub constraint: Constraint,
    pub message: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn contains(&self, field: &str, constraint: Constraint) -> bool {
        self.0
            .iter()
            .any(|v| v.field == field && v.constraint == constraint)
    }

    /// `"field: message"` pairs joined by `" | "`.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// First message per field.
    pub fn by_field(&self) -> BTreeMap<&'static str, &'static str> {
        let mut out = BTreeMap::new();
        for v in &self.0 {
            out.entry(v.field).or_insert(v.message);
        }
        out
    }

    fn push(&mut self, field: &'static str, constraint: Constraint, message: &'static str) {
        self.0.push(Violation {
            field,
            constraint,
            message,
        });
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

const NAME_MIN_CHARS: usize = 2;

/// Check all constraints (no short-circuit). On success returns the values
/// ready to persist.
pub fn validate(input: &ProdutoInput) -> Result<ProdutoFields, Violations> {
    let mut violations = Violations::default();

    match &input.name {
        None => violations.push("nome", Constraint::NotNull, "O nome não pode ser nulo."),
        Some(name) if name.chars().count() < NAME_MIN_CHARS => violations.push(
            "nome",
            Constraint::MinLength,
            "O nome deve ter pelo menos dois caracteres.",
        ),
        Some(_) => {}
    }

    match input.price {
        None => violations.push("preco", Constraint::NotNull, "O preço não pode ser nulo."),
        // NaN and infinity fail too
        Some(price) if !(price >= 0.0 && price.is_finite()) => violations.push(
            "preco",
            Constraint::MinValue,
            "O preço deve ser maior ou igual a 0.",
        ),
        Some(_) => {}
    }

    match input.stock_quantity {
        None => violations.push(
            "quantidadeEstoque",
            Constraint::NotNull,
            "Quantidade de estoque não pode ser nulo.",
        ),
        Some(quant) if quant < 0 => violations.push(
            "quantidadeEstoque",
            Constraint::MinValue,
            "A quantidade de estoque deve ser maior ou igual a 0.",
        ),
        Some(_) => {}
    }

    match (&input.name, input.price, input.stock_quantity) {
        (Some(name), Some(price), Some(stock_quantity)) if violations.is_empty() => {
            Ok(ProdutoFields {
                name: name.clone(),
                description: input.description.clone(),
                price,
                stock_quantity,
            })
        }
        _ => Err(violations),
    }
}
