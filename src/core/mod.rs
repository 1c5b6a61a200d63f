pub mod suffix;
pub mod version;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// How far the declared version must move to cover an observed change.
///
/// The order is total: merging two requirements always keeps the larger one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bump {
    None,
    Patch,
    Minor,
    Major,
}

impl Bump {
    /// Numeric rank, `NONE(0) < PATCH(1) < MINOR(2) < MAJOR(3)`.
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Bump::None => "NONE",
            Bump::Patch => "PATCH",
            Bump::Minor => "MINOR",
            Bump::Major => "MAJOR",
        }
    }

    /// Combine two requirements; the stricter one wins.
    pub fn merge(self, other: Bump) -> Bump {
        self.max(other)
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Process exit status of a finished check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    Ok = 0,
    Ko = 1,
}

impl Exit {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A default value reduced from source syntax.
///
/// Literals compare structurally. Expressions that are not literals keep
/// their raw source text, so two revisions agree on such a default exactly
/// when the expression text is unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DefaultValue {
    Literal(Literal),
    Unrepresentable(String),
}

/// A normalized Python literal. Numbers keep their canonical textual form
/// so that equality and hashing stay structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Literal {
    None,
    Ellipsis,
    Bool(bool),
    Int(String),
    Float(String),
    Complex(String),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Literal>),
    List(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

/// One declared argument: its name and, when present, its default.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Argument {
    pub name: String,
    pub default: Option<DefaultValue>,
}

impl Argument {
    pub fn new(name: impl Into<String>, default: Option<DefaultValue>) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Normalized identity of a public function declaration.
///
/// Equality is structural over all three fields. A function whose argument
/// list changes shape therefore yields two distinct signatures, one only in
/// the old revision and one only in the new.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Signature {
    pub name: String,
    pub file: PathBuf,
    pub arguments: Vec<Argument>,
}

impl Signature {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, arguments: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            arguments,
        }
    }
}

/// Direction of a signature diff item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
}

/// One itemized diff entry, reportable as a `+`/`-` line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignatureChange {
    pub kind: ChangeKind,
    pub signature: Signature,
}

impl SignatureChange {
    /// The severity this single item would trigger on its own.
    pub fn bump(&self) -> Bump {
        match self.kind {
            ChangeKind::Added => Bump::Minor,
            ChangeKind::Removed => Bump::Major,
        }
    }

    pub fn report_line(&self) -> String {
        let sign = match self.kind {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
        };
        format!("{sign} {} => {}", self.signature.name, self.bump())
    }
}
