use std::error;
use std::fmt;
use std::iter;
use std::num;

use tracing::debug;

use super::schema::{Converter, Field, LineSchema, Value};
use super::{Boundary, Element, Msh, Node};

/// One of the three fixed-order record sections of a `.msh` file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Nodes,
    Elements,
    Boundaries,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Nodes => write!(f, "nodes"),
            Section::Elements => write!(f, "elements"),
            Section::Boundaries => write!(f, "boundaries"),
        }
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    /// Malformed schema: an optional field was declared before a required
    /// one.
    MisplacedOptional { field: &'static str },
    MissingFields { required: usize, found: usize },
    TooManyFields { total: usize, found: usize },
    BadInteger {
        field: &'static str,
        source: num::ParseIntError,
    },
    BadFloat {
        field: &'static str,
        source: num::ParseFloatError,
    },
    /// An empty vertex slot is followed by a populated one, or fewer than
    /// two slots are populated.
    MisnumberedElement { num: i64 },
    MissingCount(Section),
    NegativeCount(i64),
    TruncatedSection {
        section: Section,
        declared: usize,
        found: usize,
    },
    ExtraneousData { lines: usize },
    UnknownNode { element: i64, node: i64 },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MisplacedOptional { field } => {
                write!(f, "optional field {:?} precedes a required field", field)
            }
            ErrorKind::MissingFields { required, found } => write!(
                f,
                "missing required fields: expected at least {}, found {}",
                required, found
            ),
            ErrorKind::TooManyFields { total, found } => write!(
                f,
                "too many fields: expected at most {}, found {}",
                total, found
            ),
            ErrorKind::BadInteger { field, source } => {
                write!(f, "when parsing integer field {:?}: {}", field, source)
            }
            ErrorKind::BadFloat { field, source } => {
                write!(f, "when parsing float field {:?}: {}", field, source)
            }
            ErrorKind::MisnumberedElement { num } => write!(f, "misnumbered element {}", num),
            ErrorKind::MissingCount(section) => {
                write!(f, "missing item count for the {} section", section)
            }
            ErrorKind::NegativeCount(count) => write!(f, "negative item count {}", count),
            ErrorKind::TruncatedSection {
                section,
                declared,
                found,
            } => write!(
                f,
                "truncated {} section: {} items declared, {} found",
                section, declared, found
            ),
            ErrorKind::ExtraneousData { lines } => {
                write!(f, "{} extraneous data lines after the last section", lines)
            }
            ErrorKind::UnknownNode { element, node } => {
                write!(f, "element {} references unknown node {}", element, node)
            }
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    line: Option<String>,
    lineno: Option<usize>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The offending line, verbatim, when the error concerns a single line.
    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    /// 1-based line number in the original input, when known.
    pub fn lineno(&self) -> Option<usize> {
        self.lineno
    }

    pub(crate) fn with_line(mut self, line: &str) -> Error {
        self.line.get_or_insert_with(|| line.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            line: None,
            lineno: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lineno) = self.lineno {
            write!(f, "at line {}: ", lineno)?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(line) = &self.line {
            write!(f, " in line {:?}", line)?;
        }
        Ok(())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::BadInteger { source, .. } => Some(source),
            ErrorKind::BadFloat { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn with_lineno(lineno: usize) -> impl Fn(Error) -> Error {
    move |mut err| {
        err.lineno = Some(lineno);
        err
    }
}

/// Trimmed data lines with their 1-based input line numbers; blank lines and
/// `#` comments are dropped anywhere in the input.
struct Lines<I> {
    inner: iter::Enumerate<I>,
}

impl<I> Lines<I>
where
    I: Iterator,
{
    fn new(inner: I) -> Lines<I> {
        Lines {
            inner: inner.enumerate(),
        }
    }
}

impl<'a, I> Iterator for Lines<I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.inner
            .by_ref()
            .map(|(i, line)| (i + 1, line.trim()))
            .find(|(_, line)| !line.is_empty() && !line.starts_with('#'))
    }
}

fn count_schema() -> Result<LineSchema<usize>, Error> {
    LineSchema::new(
        vec![Field::required("total", Converter::Int)],
        |values| {
            let total = values[0].to_int();
            usize::try_from(total).map_err(|_| ErrorKind::NegativeCount(total).into())
        },
    )
}

fn node_schema() -> Result<LineSchema<Node>, Error> {
    LineSchema::new(
        vec![
            Field::required("num", Converter::Int),
            Field::required("x", Converter::Float),
            Field::required("y", Converter::Float),
        ],
        |values| {
            Ok(Node {
                num: values[0].to_int(),
                x: values[1].to_float(),
                y: values[2].to_float(),
            })
        },
    )
}

fn element_schema() -> Result<LineSchema<Element>, Error> {
    LineSchema::new(
        vec![
            Field::required("num", Converter::Int),
            Field::required("i", Converter::Int),
            Field::required("j", Converter::Int),
            Field::optional("k", Converter::Int),
            Field::optional("l", Converter::Int),
        ],
        |values| {
            // absent trailing slots default to the format's zero sentinel
            let k = values.get(3).copied().map_or(0, Value::to_int);
            let l = values.get(4).copied().map_or(0, Value::to_int);
            Element::new(
                values[0].to_int(),
                values[1].to_int(),
                values[2].to_int(),
                k,
                l,
            )
        },
    )
}

fn boundary_schema() -> Result<LineSchema<Boundary>, Error> {
    LineSchema::new(
        vec![
            Field::required("num", Converter::Int),
            Field::required("node", Converter::Int),
        ],
        |values| {
            Ok(Boundary {
                num: values[0].to_int(),
                node: values[1].to_int(),
            })
        },
    )
}

/// Reads one count-prefixed run of records.
///
/// The count line declares how many record lines follow; exactly that many
/// are consumed, however many more the stream holds. A stream that ends
/// short of the declared count fails with
/// [`ErrorKind::TruncatedSection`].
fn read_section<'a, I, R>(
    lines: &mut Lines<I>,
    section: Section,
    schema: &LineSchema<R>,
) -> Result<Vec<R>, Error>
where
    I: Iterator<Item = &'a str>,
{
    let (lineno, line) = lines
        .next()
        .ok_or_else(|| Error::from(ErrorKind::MissingCount(section)))?;
    let declared = count_schema()?
        .parse(line)
        .map_err(with_lineno(lineno))?;

    let mut records = Vec::with_capacity(declared);
    for _ in 0..declared {
        match lines.next() {
            Some((lineno, line)) => {
                records.push(schema.parse(line).map_err(with_lineno(lineno))?);
            }
            None => {
                return Err(ErrorKind::TruncatedSection {
                    section,
                    declared,
                    found: records.len(),
                }
                .into());
            }
        }
    }
    Ok(records)
}

/// Parses a whole `.msh` document: the nodes, elements and boundaries
/// sections in that order, then a check that no data lines remain.
pub(super) fn from_lines<'a, I>(input: I) -> Result<Msh, Error>
where
    I: Iterator<Item = &'a str>,
{
    let mut lines = Lines::new(input);

    let nodes = read_section(&mut lines, Section::Nodes, &node_schema()?)?;
    let elements = read_section(&mut lines, Section::Elements, &element_schema()?)?;
    let boundaries = read_section(&mut lines, Section::Boundaries, &boundary_schema()?)?;

    let leftover = lines.count();
    if leftover != 0 {
        return Err(ErrorKind::ExtraneousData { lines: leftover }.into());
    }

    debug!(
        nodes = nodes.len(),
        elements = elements.len(),
        boundaries = boundaries.len(),
        "loaded .msh document"
    );
    Ok(Msh::from_raw_parts(nodes, elements, boundaries))
}
