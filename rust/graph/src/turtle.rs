// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turtle reader built with [nom](https://docs.rs/nom).
//!
//! Supports the subset IFC-to-LBD converters emit: `@prefix`/`PREFIX` and
//! `@base`/`BASE` directives, predicate-object lists (`;`), object lists
//! (`,`), the `a` keyword, IRIs, prefixed names, labelled blank nodes, short
//! and long string literals with language tags or datatypes, and numeric and
//! boolean shorthand. N-Triples documents are a subset and parse as well.
//! Anonymous blank nodes (`[ ... ]`) and collections (`( ... )`) are rejected.

use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace1, not_line_ending, one_of, satisfy},
    combinator::{map, not, opt, peek, recognize, value},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::namespace::RDF;
use crate::term::{Literal, Term, XSD_BOOLEAN, XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER};

/// Unresolved term as it appears in the document
#[derive(Debug, Clone, PartialEq)]
enum RawTerm<'a> {
    Iri(&'a str),
    Prefixed(&'a str, String),
    Blank(&'a str),
    /// The `a` keyword
    A,
    Literal {
        value: String,
        language: Option<&'a str>,
        datatype: Option<Box<RawTerm<'a>>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Statement<'a> {
    Prefix(&'a str, &'a str),
    Base(&'a str),
    Triples(RawTerm<'a>, Vec<(RawTerm<'a>, Vec<RawTerm<'a>>)>),
}

/// Whitespace and `#` comments
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((multispace1, preceded(char('#'), not_line_ending)))),
    )(input)
}

/// `<http://...>`
fn iri_ref(input: &str) -> IResult<&str, &str> {
    delimited(
        char('<'),
        take_while(|c: char| !matches!(c, '>' | '<' | '"' | '{' | '}' | '|' | '^' | '`') && !c.is_whitespace()),
        char('>'),
    )(input)
}

/// Prefix label followed by `:`. The label may be empty.
fn pname_ns(input: &str) -> IResult<&str, &str> {
    let (rest, prefix) = terminated(
        take_while(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')),
        char(':'),
    )(input)?;
    // `_:` opens a blank node label, never a prefixed name
    if prefix.ends_with('.') || prefix.starts_with(|c: char| c.is_ascii_digit() || c == '_') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((rest, prefix))
}

/// Local part of a prefixed name, with `\`-escapes resolved.
///
/// A trailing unescaped `.` terminates the statement and is not consumed.
fn pn_local(input: &str) -> IResult<&str, String> {
    let mut out = String::new();
    let mut kept = (0usize, 0usize); // (out length, input offset) after last non-dot char
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        if c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '%' | '$') {
            out.push(c);
            kept = (out.len(), i + c.len_utf8());
        } else if c == '.' {
            out.push(c);
        } else if c == '\\' {
            match chars.next() {
                Some((j, e)) if "_~.-!$&'()*+,;=/?#@%".contains(e) => {
                    out.push(e);
                    kept = (out.len(), j + e.len_utf8());
                }
                _ => break,
            }
        } else {
            break;
        }
    }

    out.truncate(kept.0);
    Ok((&input[kept.1..], out))
}

fn prefixed_name(input: &str) -> IResult<&str, RawTerm<'_>> {
    map(pair(pname_ns, pn_local), |(prefix, local)| {
        RawTerm::Prefixed(prefix, local)
    })(input)
}

fn iri(input: &str) -> IResult<&str, RawTerm<'_>> {
    alt((map(iri_ref, RawTerm::Iri), prefixed_name))(input)
}

fn blank_node(input: &str) -> IResult<&str, RawTerm<'_>> {
    map(
        preceded(
            tag("_:"),
            take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-')),
        ),
        RawTerm::Blank,
    )(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    for delim in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(body) = input.strip_prefix(delim) {
            return string_body(body, delim);
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn string_body<'a>(body: &'a str, delim: &str) -> IResult<&'a str, String> {
    let fail = || nom::Err::Failure(nom::error::Error::new(body, nom::error::ErrorKind::Escaped));
    let long = delim.len() == 3;
    let mut out = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        if body[i..].starts_with(delim) {
            // a long string closes on the last three quotes of a run
            let run = if long { body[i..].chars().take_while(|&q| q == c).count() } else { 1 };
            for _ in delim.len()..run {
                out.push(c);
            }
            let end = i + run.max(delim.len()) * c.len_utf8();
            return Ok((&body[end..], out));
        }
        match c {
            '\\' => {
                let (_, escape) = chars.next().ok_or_else(fail)?;
                let decoded = match escape {
                    't' => '\t',
                    'b' => '\u{8}',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\u{c}',
                    '"' | '\'' | '\\' => escape,
                    'u' | 'U' => {
                        let width = if escape == 'u' { 4 } else { 8 };
                        let hex: String = chars.by_ref().take(width).map(|(_, h)| h).collect();
                        u32::from_str_radix(&hex, 16)
                            .ok()
                            .filter(|_| hex.len() == width)
                            .and_then(char::from_u32)
                            .ok_or_else(fail)?
                    }
                    _ => return Err(fail()),
                };
                out.push(decoded);
            }
            '\n' | '\r' if !long => return Err(fail()),
            _ => out.push(c),
        }
    }

    Err(fail())
}

fn language_tag(input: &str) -> IResult<&str, &str> {
    preceded(
        char('@'),
        recognize(pair(alpha1, many0(pair(char('-'), alphanumeric1)))),
    )(input)
}

fn string_with_suffix(input: &str) -> IResult<&str, RawTerm<'_>> {
    let (rest, value) = string_literal(input)?;
    if let Ok((rest, language)) = language_tag(rest) {
        return Ok((
            rest,
            RawTerm::Literal {
                value,
                language: Some(language),
                datatype: None,
            },
        ));
    }
    let (rest, datatype) = opt(preceded(tag("^^"), iri))(rest)?;
    Ok((
        rest,
        RawTerm::Literal {
            value,
            language: None,
            datatype: datatype.map(Box::new),
        },
    ))
}

fn numeric_literal(input: &str) -> IResult<&str, RawTerm<'_>> {
    let sign = || opt(one_of("+-"));
    let exponent = || tuple((one_of("eE"), opt(one_of("+-")), digit1));
    let double = recognize(tuple((
        sign(),
        alt((
            recognize(tuple((digit1, char('.'), digit0))),
            recognize(pair(char('.'), digit1)),
            digit1,
        )),
        exponent(),
    )));
    let decimal = recognize(tuple((sign(), digit0, char('.'), digit1)));
    let integer = recognize(pair(sign(), digit1));

    alt((
        map(double, |s| typed_shorthand(s, XSD_DOUBLE)),
        map(decimal, |s| typed_shorthand(s, XSD_DECIMAL)),
        map(integer, |s| typed_shorthand(s, XSD_INTEGER)),
    ))(input)
}

fn boolean_literal(input: &str) -> IResult<&str, RawTerm<'_>> {
    map(
        terminated(
            alt((tag("true"), tag("false"))),
            not(satisfy(|c: char| c.is_alphanumeric() || matches!(c, ':' | '_' | '-'))),
        ),
        |s| typed_shorthand(s, XSD_BOOLEAN),
    )(input)
}

fn typed_shorthand<'a>(lexical: &'a str, datatype: &'static str) -> RawTerm<'a> {
    RawTerm::Literal {
        value: lexical.to_string(),
        language: None,
        datatype: Some(Box::new(RawTerm::Iri(datatype))),
    }
}

fn verb(input: &str) -> IResult<&str, RawTerm<'_>> {
    alt((
        value(RawTerm::A, terminated(char('a'), peek(multispace1))),
        iri,
    ))(input)
}

fn object(input: &str) -> IResult<&str, RawTerm<'_>> {
    alt((
        blank_node,
        iri,
        string_with_suffix,
        numeric_literal,
        boolean_literal,
    ))(input)
}

fn object_list(input: &str) -> IResult<&str, Vec<RawTerm<'_>>> {
    separated_list1(tuple((ws, char(','), ws)), object)(input)
}

fn verb_objects(input: &str) -> IResult<&str, (RawTerm<'_>, Vec<RawTerm<'_>>)> {
    map(tuple((verb, ws, object_list)), |(v, _, objects)| (v, objects))(input)
}

fn predicate_object_list(input: &str) -> IResult<&str, Vec<(RawTerm<'_>, Vec<RawTerm<'_>>)>> {
    let (mut input, first) = verb_objects(input)?;
    let mut list = vec![first];
    while let Ok((rest, _)) = many1(preceded(ws, char(';')))(input) {
        let (rest, _) = ws(rest)?;
        match verb_objects(rest) {
            Ok((rest, vo)) => {
                list.push(vo);
                input = rest;
            }
            Err(_) => {
                input = rest;
                break;
            }
        }
    }
    Ok((input, list))
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        map(
            tuple((tag("@prefix"), ws, pname_ns, ws, iri_ref, ws, char('.'))),
            |(_, _, p, _, ns, _, _)| Statement::Prefix(p, ns),
        ),
        map(
            tuple((tag_no_case("PREFIX"), multispace1, pname_ns, ws, iri_ref)),
            |(_, _, p, _, ns)| Statement::Prefix(p, ns),
        ),
        map(
            tuple((tag("@base"), ws, iri_ref, ws, char('.'))),
            |(_, _, base, _, _)| Statement::Base(base),
        ),
        map(
            tuple((tag_no_case("BASE"), multispace1, iri_ref)),
            |(_, _, base)| Statement::Base(base),
        ),
        map(
            tuple((alt((blank_node, iri)), ws, predicate_object_list, ws, char('.'))),
            |(subject, _, pos, _, _)| Statement::Triples(subject, pos),
        ),
    ))(input)
}

/// Resolution state carried across statements
#[derive(Default)]
struct Resolver<'a> {
    prefixes: FxHashMap<&'a str, String>,
    base: Option<String>,
}

impl<'a> Resolver<'a> {
    fn absolute(&self, iri: &str) -> String {
        match &self.base {
            Some(base) if !iri.contains(':') => format!("{base}{iri}"),
            _ => iri.to_string(),
        }
    }

    fn resolve(&self, raw: RawTerm<'a>, line: usize) -> Result<Term> {
        Ok(match raw {
            RawTerm::Iri(iri) => Term::Iri(self.absolute(iri)),
            RawTerm::Prefixed(prefix, local) => {
                let ns = self
                    .prefixes
                    .get(prefix)
                    .ok_or_else(|| Error::UndeclaredPrefix {
                        prefix: prefix.to_string(),
                        line,
                    })?;
                Term::Iri(format!("{ns}{local}"))
            }
            RawTerm::Blank(label) => Term::Blank(label.to_string()),
            RawTerm::A => Term::Iri(format!("{RDF}type")),
            RawTerm::Literal {
                value,
                language,
                datatype,
            } => match (language, datatype) {
                (Some(lang), _) => Term::Literal(Literal::lang(value, lang)),
                (None, Some(dt)) => match self.resolve(*dt, line)? {
                    Term::Iri(dt) => Term::Literal(Literal::typed(value, dt)),
                    _ => {
                        return Err(Error::Syntax {
                            line,
                            message: "datatype must be an IRI".to_string(),
                        })
                    }
                },
                (None, None) => Term::Literal(Literal::plain(value)),
            },
        })
    }
}

fn line_of(full: &str, rest: &str) -> usize {
    full[..full.len() - rest.len()].matches('\n').count() + 1
}

fn syntax_error(full: &str, rest: &str) -> Error {
    let snippet: String = rest.chars().take(40).collect();
    let message = match rest.chars().next() {
        Some('[') | Some('(') => {
            "anonymous blank nodes and collections are not supported".to_string()
        }
        _ => format!("unexpected input near '{}'", snippet.trim_end()),
    };
    Error::Syntax {
        line: line_of(full, rest),
        message,
    }
}

impl Graph {
    /// Parses a Turtle document into a new graph.
    pub fn parse_turtle(input: &str) -> Result<Graph> {
        let mut graph = Graph::new();
        graph.read_turtle(input)?;
        Ok(graph)
    }

    /// Reads a Turtle document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Graph> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_turtle(&text)
    }

    /// Adds the triples of a Turtle document to this graph, returning how many
    /// were new. Prefix declarations are kept as bindings.
    pub fn read_turtle(&mut self, input: &str) -> Result<usize> {
        let mut resolver = Resolver::default();
        let mut rest = input;
        let mut added = 0;

        loop {
            rest = match ws(rest) {
                Ok((r, _)) => r,
                Err(_) => return Err(syntax_error(input, rest)),
            };
            if rest.is_empty() {
                break;
            }

            let (next, stmt) = statement(rest).map_err(|_| syntax_error(input, rest))?;
            let line = line_of(input, rest);

            match stmt {
                Statement::Prefix(prefix, ns) => {
                    let ns = resolver.absolute(ns);
                    self.bind_prefix(prefix, ns.clone());
                    resolver.prefixes.insert(prefix, ns);
                }
                Statement::Base(base) => resolver.base = Some(base.to_string()),
                Statement::Triples(subject, predicate_objects) => {
                    let subject = resolver.resolve(subject, line)?;
                    for (predicate, objects) in predicate_objects {
                        let predicate = resolver.resolve(predicate, line)?;
                        for object in objects {
                            let object = resolver.resolve(object, line)?;
                            if self.insert(subject.clone(), predicate.clone(), object) {
                                added += 1;
                            }
                        }
                    }
                }
            }
            rest = next;
        }

        Ok(added)
    }
}
