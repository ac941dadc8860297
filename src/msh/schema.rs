//! Schema-driven parsing of whitespace-delimited record lines.
//!
//! A [`LineSchema`] is plain data: an ordered field list, checked once at
//! construction, plus a build function from converted values to the record
//! type. Parsing is a pure function from the schema and one line to one
//! record.

use super::parser::{Error, ErrorKind};

/// How a raw token is converted into a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Converter {
    Int,
    Float,
}

/// A converted token.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Returns the integer value.
    ///
    /// # Panics
    ///
    /// Panics when the value came from a [`Converter::Float`] field. A build
    /// function must read each value with the type its field declares.
    pub fn to_int(self) -> i64 {
        match self {
            Value::Int(v) => v,
            Value::Float(_) => panic!("field declared as Float, read as integer"),
        }
    }

    /// Returns the float value.
    ///
    /// # Panics
    ///
    /// Panics when the value came from a [`Converter::Int`] field.
    pub fn to_float(self) -> f64 {
        match self {
            Value::Int(_) => panic!("field declared as Int, read as float"),
            Value::Float(v) => v,
        }
    }
}

/// One column of a record line.
#[derive(Copy, Clone, Debug)]
pub struct Field {
    name: &'static str,
    converter: Converter,
    optional: bool,
}

impl Field {
    pub const fn required(name: &'static str, converter: Converter) -> Field {
        Field {
            name,
            converter,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, converter: Converter) -> Field {
        Field {
            name,
            converter,
            optional: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn convert(&self, token: &str) -> Result<Value, Error> {
        match self.converter {
            Converter::Int => token.parse().map(Value::Int).map_err(|source| {
                Error::from(ErrorKind::BadInteger {
                    field: self.name,
                    source,
                })
            }),
            Converter::Float => token.parse().map(Value::Float).map_err(|source| {
                Error::from(ErrorKind::BadFloat {
                    field: self.name,
                    source,
                })
            }),
        }
    }
}

/// An ordered field list plus a record constructor.
#[derive(Debug)]
pub struct LineSchema<R> {
    fields: Vec<Field>,
    required: usize,
    build: fn(&[Value]) -> Result<R, Error>,
}

impl<R> LineSchema<R> {
    /// Fails with [`ErrorKind::MisplacedOptional`] when an optional field is
    /// declared before a required one.
    pub fn new(
        fields: Vec<Field>,
        build: fn(&[Value]) -> Result<R, Error>,
    ) -> Result<LineSchema<R>, Error> {
        let required = fields.iter().take_while(|field| !field.optional).count();
        if fields[required..].iter().any(|field| !field.optional) {
            return Err(ErrorKind::MisplacedOptional {
                field: fields[required].name,
            }
            .into());
        }
        Ok(LineSchema {
            fields,
            required,
            build,
        })
    }

    /// Parses one whitespace-delimited line into a record.
    ///
    /// The token count must be at least the number of required fields and at
    /// most the total field count. Converted values are handed to the build
    /// function positionally, required fields first. Every error returned
    /// from here carries the offending line verbatim.
    pub fn parse(&self, line: &str) -> Result<R, Error> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < self.required {
            return Err(Error::from(ErrorKind::MissingFields {
                required: self.required,
                found: tokens.len(),
            })
            .with_line(line));
        }
        if tokens.len() > self.fields.len() {
            return Err(Error::from(ErrorKind::TooManyFields {
                total: self.fields.len(),
                found: tokens.len(),
            })
            .with_line(line));
        }
        let values = self
            .fields
            .iter()
            .zip(tokens.iter().copied())
            .map(|(field, token)| field.convert(token))
            .collect::<Result<Vec<Value>, Error>>()
            .map_err(|err| err.with_line(line))?;
        (self.build)(&values).map_err(|err| err.with_line(line))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::error::Error as _;

    use super::*;

    fn pair_schema() -> LineSchema<(i64, f64)> {
        LineSchema::new(
            vec![
                Field::required("id", Converter::Int),
                Field::required("value", Converter::Float),
                Field::optional("extra", Converter::Float),
            ],
            |values| Ok((values[0].to_int(), values[1].to_float())),
        )
        .unwrap()
    }

    #[test]
    fn optional_before_required_is_rejected() {
        let err = LineSchema::new(
            vec![
                Field::optional("extra", Converter::Int),
                Field::required("id", Converter::Int),
            ],
            |values: &[Value]| Ok(values[0].to_int()),
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MisplacedOptional { field: "extra" }
        ));
    }

    #[test]
    fn parses_with_and_without_optional_tokens() {
        let schema = pair_schema();
        assert_eq!(schema.parse("4 2.5").unwrap(), (4, 2.5));
        assert_eq!(schema.parse("4 2.5 9.0").unwrap(), (4, 2.5));
    }

    #[test]
    fn too_few_tokens() {
        let err = pair_schema().parse("4").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingFields {
                required: 2,
                found: 1,
            }
        ));
        assert_eq!(err.line(), Some("4"));
        assert!(err.to_string().contains("missing required fields"));
    }

    #[test]
    fn too_many_tokens() {
        let err = pair_schema().parse("4 2.5 9.0 1.0").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TooManyFields { total: 3, found: 4 }
        ));
        assert_eq!(err.line(), Some("4 2.5 9.0 1.0"));
    }

    #[test]
    fn conversion_failure_keeps_the_cause() {
        let err = pair_schema().parse("four 2.5").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::BadInteger { field: "id", .. }
        ));
        assert_eq!(err.line(), Some("four 2.5"));
        assert!(err.source().is_some());
    }

    proptest!(
        /// Construction succeeds exactly when no optional field precedes a
        /// required one.
        #[test]
        fn field_ordering(flags in prop::collection::vec(any::<bool>(), 0..8)) {
            let fields = flags
                .iter()
                .map(|&optional| {
                    if optional {
                        Field::optional("opt", Converter::Int)
                    } else {
                        Field::required("req", Converter::Int)
                    }
                })
                .collect();
            let schema = LineSchema::new(fields, |_values: &[Value]| Ok(()));
            let well_ordered = flags.windows(2).all(|pair| pair[0] <= pair[1]);
            prop_assert_eq!(schema.is_ok(), well_ordered);
        }
    );
}
