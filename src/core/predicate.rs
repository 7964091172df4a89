//! Declarative predicates over flag values and platform settings.
//!
//! A predicate never names a dependency, so inclusion decisions can only
//! depend on validated options and the platform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::platform::Platform;

/// Read access to flag values.
///
/// A flag that is absent (undeclared or removed by a constraint) reads as `false`.
pub trait FlagSource {
    fn flag(&self, name: &str) -> bool;
}

/// Boolean expression over flags and platform settings.
///
/// In TOML: `when = "always"`, `when = { flag = "with_npu" }`,
/// `when = { all = [{ flag = "a" }, { not = { os = "Windows" } }] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    #[default]
    Always,
    Never,
    /// True iff the flag is present and enabled.
    Flag(String),
    Os(String),
    Arch(String),
    Compiler(String),
    BuildType(String),
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn flag(name: impl Into<String>) -> Self {
        Predicate::Flag(name.into())
    }

    pub fn os(os: impl Into<String>) -> Self {
        Predicate::Os(os.into())
    }

    pub fn arch(arch: impl Into<String>) -> Self {
        Predicate::Arch(arch.into())
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Evaluate against a flag source and a platform.
    ///
    /// Setting comparisons ignore ASCII case. `all([])` is true, `any([])` is false.
    pub fn eval(&self, flags: &dyn FlagSource, platform: &Platform) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Never => false,
            Predicate::Flag(name) => flags.flag(name),
            Predicate::Os(os) => platform.os.eq_ignore_ascii_case(os),
            Predicate::Arch(arch) => platform.arch.eq_ignore_ascii_case(arch),
            Predicate::Compiler(c) => platform.compiler.eq_ignore_ascii_case(c),
            Predicate::BuildType(b) => platform.build_type.eq_ignore_ascii_case(b),
            Predicate::Not(inner) => !inner.eval(flags, platform),
            Predicate::All(items) => items.iter().all(|p| p.eval(flags, platform)),
            Predicate::Any(items) => items.iter().any(|p| p.eval(flags, platform)),
        }
    }

    /// Flag names referenced anywhere in this predicate.
    pub fn referenced_flags(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_flags(&mut out);
        out
    }

    fn collect_flags<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Flag(name) => out.push(name),
            Predicate::Not(inner) => inner.collect_flags(out),
            Predicate::All(items) | Predicate::Any(items) => {
                for p in items {
                    p.collect_flags(out);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => write!(f, "always"),
            Predicate::Never => write!(f, "never"),
            Predicate::Flag(name) => write!(f, "{}", name),
            Predicate::Os(os) => write!(f, "os == {}", os),
            Predicate::Arch(arch) => write!(f, "arch == {}", arch),
            Predicate::Compiler(c) => write!(f, "compiler == {}", c),
            Predicate::BuildType(b) => write!(f, "build_type == {}", b),
            Predicate::Not(inner) => write!(f, "not({})", inner),
            Predicate::All(items) => write_list(f, "all", items),
            Predicate::Any(items) => write_list(f, "any", items),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, op: &str, items: &[Predicate]) -> fmt::Result {
    write!(f, "{}(", op)?;
    for (i, p) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, ")")
}
