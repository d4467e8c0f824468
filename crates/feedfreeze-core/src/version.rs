//! Feed version parsing, ordering, and range computation.
//!
//! Versions are split on `.` and `-` into components:
//! - Numeric components are releases and compare as numbers
//! - Lettered components (`pre1`, `rc2`, `beta`) are pre-releases and sort
//!   before any release at the same position
//! - The literal `post` is a successor sentinel and may only come last
//! - A shorter version is padded with zero releases when compared, so
//!   `1.2` == `1.2.0`
//!
//! The `post` sentinel compares against the remaining tail of the other
//! version rather than a single component: `v-post` is greater than `v` (and
//! anything equal to it) and smaller than every version that extends `v` with
//! a positive release, which makes it the immediate successor of `v`.

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroI32;
use std::str::FromStr;

use feedfreeze_util::errors::FreezeError;

/// One segment of a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    /// A released segment such as `3`.
    Release(u64),
    /// A pre-release segment such as `rc2` or `beta`.
    Pre { label: String, number: Option<u64> },
    /// The `post` successor sentinel.
    Post,
}

static ZERO: Component = Component::Release(0);

impl Component {
    pub fn is_release(&self) -> bool {
        matches!(self, Component::Release(_))
    }

    fn is_zero(&self) -> bool {
        matches!(self, Component::Release(0))
    }

    /// The same kind of component with a value one greater, or `None` if
    /// the value is already `u64::MAX`.
    ///
    /// The sentinel has no value of its own and becomes `Release(1)`.
    pub fn incremented(&self) -> Option<Component> {
        match self {
            Component::Release(n) => n.checked_add(1).map(Component::Release),
            Component::Pre { label, number } => {
                number.unwrap_or(0).checked_add(1).map(|n| Component::Pre {
                    label: label.clone(),
                    number: Some(n),
                })
            }
            Component::Post => Some(Component::Release(1)),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Release(n) => write!(f, "{n}"),
            Component::Pre {
                label,
                number: Some(n),
            } => write!(f, "{label}{n}"),
            Component::Pre {
                label,
                number: None,
            } => f.write_str(label),
            Component::Post => f.write_str("post"),
        }
    }
}

/// A parsed feed version.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<Component>,
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// How the upper bound of a frozen dependency range is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// Pin exactly the selected version.
    Exact,
    /// Positive: keep the first N components fixed.
    /// Negative: allow the trailing -N components to vary.
    Components(NonZeroI32),
}

impl RangeMode {
    /// Build a mode from the `--exact` and `--components` options.
    ///
    /// A component count of zero is rejected even when `exact` is set.
    pub fn new(exact: bool, components: i32) -> Result<Self, FreezeError> {
        let Some(count) = NonZeroI32::new(components) else {
            return Err(FreezeError::InvalidOption {
                message: "--components must not be 0".to_string(),
            });
        };
        if exact {
            Ok(RangeMode::Exact)
        } else {
            Ok(RangeMode::Components(count))
        }
    }
}

/// Default `--components` value: everything but the last component is fixed.
pub const DEFAULT_COMPONENTS: i32 = -1;

impl Default for RangeMode {
    fn default() -> Self {
        const ALL_BUT_LAST: NonZeroI32 = match NonZeroI32::new(DEFAULT_COMPONENTS) {
            Some(n) => n,
            None => panic!("default component count is zero"),
        };
        RangeMode::Components(ALL_BUT_LAST)
    }
}

impl Version {
    pub fn parse(text: &str) -> Result<Self, FreezeError> {
        let text = text.trim();
        let err = |message: String| FreezeError::Parse {
            input: text.to_string(),
            message,
        };
        if text.is_empty() {
            return Err(err("empty version".to_string()));
        }

        let pieces: Vec<&str> = text.split(|c: char| c == '.' || c == '-').collect();
        let mut components = Vec::with_capacity(pieces.len());
        for (i, piece) in pieces.iter().enumerate() {
            let component = classify(piece).map_err(err)?;
            if component == Component::Post && i + 1 != pieces.len() {
                return Err(err("'post' must be the last component".to_string()));
            }
            components.push(component);
        }

        Ok(Self { components })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Exactly `n` components, truncating or padding with zero releases.
    ///
    /// At least one component is always kept.
    pub fn resize(&self, n: usize) -> Version {
        let mut components = self.components.clone();
        components.resize(n.max(1), Component::Release(0));
        Version { components }
    }

    /// Increment the component `offset_from_end` places from the end
    /// (1 = last) and zero everything after it.
    ///
    /// An offset larger than the version increments the leading component,
    /// as if the version had been padded with zeros first.
    pub fn increment(&self, offset_from_end: usize) -> Result<Version, FreezeError> {
        if offset_from_end == 0 {
            return Err(FreezeError::InvalidOption {
                message: "increment offset must be positive".to_string(),
            });
        }
        let base = if self.is_empty() {
            self.resize(1)
        } else {
            self.clone()
        };
        let index = base.len().saturating_sub(offset_from_end);
        base.bump_at(index)
    }

    /// The smallest version strictly greater than this one.
    ///
    /// This appends the `post` sentinel. A version that already ends in the
    /// sentinel has no immediate successor; its last component is incremented
    /// instead.
    pub fn next(&self) -> Version {
        match self.components.last() {
            Some(Component::Post) => {
                let mut components = self.components.clone();
                components.pop();
                components.push(Component::Release(1));
                Version { components }
            }
            _ => {
                let mut components = self.components.clone();
                components.push(Component::Post);
                Version { components }
            }
        }
    }

    /// The exclusive upper bound of the range that freezes this version.
    pub fn upper_bound(&self, mode: RangeMode) -> Result<Version, FreezeError> {
        match mode {
            RangeMode::Exact => Ok(self.next()),
            RangeMode::Components(count) if count.get() > 0 => {
                let keep = count.get().unsigned_abs() as usize;
                let padded = if self.len() < keep {
                    self.resize(keep)
                } else {
                    self.clone()
                };
                padded.bump_at(keep - 1)
            }
            RangeMode::Components(count) => self.increment(count.get().unsigned_abs() as usize),
        }
    }

    fn bump_at(&self, index: usize) -> Result<Version, FreezeError> {
        let len = self.components.len();
        let bumped = self.components[index]
            .incremented()
            .ok_or_else(|| FreezeError::Parse {
                input: self.to_string(),
                message: format!("component {} is too large to increment", index + 1),
            })?;
        let mut components = Vec::with_capacity(len);
        components.extend_from_slice(&self.components[..index]);
        components.push(bumped);
        components.extend(std::iter::repeat(Component::Release(0)).take(len - index - 1));
        Ok(Version { components })
    }
}

impl FromStr for Version {
    type Err = FreezeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(if component.is_release() { "." } else { "-" })?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = &self.components;
        let b = &other.components;
        let max_len = a.len().max(b.len());
        for i in 0..max_len {
            let x = a.get(i);
            let y = b.get(i);
            let ord = match (x, y) {
                (Some(Component::Post), _) => compare_post_to_tail(b.get(i..).unwrap_or(&[])),
                (_, Some(Component::Post)) => {
                    compare_post_to_tail(a.get(i..).unwrap_or(&[])).reverse()
                }
                (x, y) => compare_components(x.unwrap_or(&ZERO), y.unwrap_or(&ZERO)),
            };
            if ord != Ordering::Equal {
                return ord;
            }
            // the sentinel is always last, so an equal comparison against it settles both tails
            if matches!(x, Some(Component::Post)) || matches!(y, Some(Component::Post)) {
                return Ordering::Equal;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_components(a: &Component, b: &Component) -> Ordering {
    match (a, b) {
        (Component::Release(a), Component::Release(b)) => a.cmp(b),
        (Component::Pre { .. }, Component::Release(_)) => Ordering::Less,
        (Component::Release(_), Component::Pre { .. }) => Ordering::Greater,
        (
            Component::Pre {
                label: la,
                number: na,
            },
            Component::Pre {
                label: lb,
                number: nb,
            },
        ) => la
            .to_ascii_lowercase()
            .cmp(&lb.to_ascii_lowercase())
            .then(na.unwrap_or(0).cmp(&nb.unwrap_or(0))),
        // sentinels are compared against whole tails by the caller
        (Component::Post, _) | (_, Component::Post) => Ordering::Equal,
    }
}

/// Where the sentinel sits relative to the rest of another version.
fn compare_post_to_tail(tail: &[Component]) -> Ordering {
    match tail.iter().find(|c| !c.is_zero()) {
        None | Some(Component::Pre { .. }) => Ordering::Greater,
        Some(Component::Release(_)) => Ordering::Less,
        Some(Component::Post) => Ordering::Equal,
    }
}

fn classify(piece: &str) -> Result<Component, String> {
    if piece.is_empty() {
        return Err("empty component".to_string());
    }
    if piece.bytes().all(|b| b.is_ascii_digit()) {
        return piece
            .parse::<u64>()
            .map(Component::Release)
            .map_err(|_| format!("component '{piece}' is too large"));
    }
    if piece == "post" {
        return Ok(Component::Post);
    }

    let split = piece
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(piece.len());
    let (label, digits) = piece.split_at(split);
    if label.is_empty()
        || !label.bytes().all(|b| b.is_ascii_alphabetic())
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(format!("unrecognised component '{piece}'"));
    }

    let number = if digits.is_empty() {
        None
    } else {
        Some(
            digits
                .parse::<u64>()
                .map_err(|_| format!("component '{piece}' is too large"))?,
        )
    };
    Ok(Component::Pre {
        label: label.to_string(),
        number,
    })
}
