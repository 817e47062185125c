// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RDF terms.

use std::fmt;

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// A literal value with optional datatype or language tag.
///
/// Plain strings are stored without a datatype; `xsd:string` is normalised
/// away on construction so `"x"` and `"x"^^xsd:string` are the same term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            value: value.into(),
            datatype: (datatype != XSD_STRING).then_some(datatype),
            language: None,
        }
    }

    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into().to_ascii_lowercase()),
        }
    }
}

/// An RDF term: IRI, blank node, or literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    /// Blank node label, scoped to the document it was read from.
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Plain string literal, the form identifier properties use.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(value))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

/// N-Triples rendering
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", escape_literal(&lit.value))?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Escape a literal for a short double-quoted string
pub(crate) fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xsd_string_is_plain() {
        assert_eq!(Literal::typed("abc", XSD_STRING), Literal::plain("abc"));
        assert_ne!(Literal::typed("1", XSD_INTEGER), Literal::plain("1"));
    }

    #[test]
    fn display_as_ntriples() {
        assert_eq!(Term::iri("http://x/a").to_string(), "<http://x/a>");
        assert_eq!(Term::Blank("b0".into()).to_string(), "_:b0");
        assert_eq!(
            Term::literal("say \"hi\"\n").to_string(),
            r#""say \"hi\"\n""#
        );
        assert_eq!(
            Term::Literal(Literal::lang("Ilmanvaihto", "FI")).to_string(),
            "\"Ilmanvaihto\"@fi"
        );
        assert_eq!(
            Term::Literal(Literal::typed("3", XSD_INTEGER)).to_string(),
            format!("\"3\"^^<{XSD_INTEGER}>")
        );
    }
}
