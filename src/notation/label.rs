//! Label types for the subscript compiler.

use core::fmt;

use smallvec::SmallVec;

/// Size of the per-call label occurrence table (one slot per ASCII code).
pub const LABEL_TABLE_SIZE: usize = 128;

/// A single subscript letter (`a-z`, `A-Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(u8);

impl Label {
    /// Returns the label for an ASCII letter.
    #[inline]
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Label(c as u8))
        } else {
            None
        }
    }

    /// Returns the label for an ASCII letter code.
    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        if code.is_ascii_alphabetic() {
            Some(Label(code))
        } else {
            None
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// What one operand axis carries in the label plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisLabel {
    /// First occurrence of a label on this operand.
    Label(Label),
    /// Same label as the axis `offset` positions earlier on this operand
    /// (an implicit diagonal).
    Repeat { offset: usize },
    /// Broadcast dimension inserted by ellipsis expansion.
    Broadcast,
}

impl AxisLabel {
    /// Signed compact code: the ASCII letter for a fresh label, the negated
    /// back-reference distance for a repeat, zero for broadcast.
    ///
    /// ```
    /// use einsum_sumprod::notation::{AxisLabel, Label};
    ///
    /// assert_eq!(AxisLabel::Label(Label::new('a').unwrap()).code(), 97);
    /// assert_eq!(AxisLabel::Repeat { offset: 3 }.code(), -3);
    /// assert_eq!(AxisLabel::Broadcast.code(), 0);
    /// ```
    pub fn code(self) -> i8 {
        match self {
            AxisLabel::Label(label) => label.code() as i8,
            // Rank is bounded well below 128, so the distance always fits.
            AxisLabel::Repeat { offset } => -(offset as i8),
            AxisLabel::Broadcast => 0,
        }
    }

    /// Inverse of [`AxisLabel::code`]. Positive codes must be ASCII letters.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(AxisLabel::Broadcast),
            c if c < 0 => Some(AxisLabel::Repeat {
                offset: c.unsigned_abs() as usize,
            }),
            c => Label::from_code(c as u8).map(AxisLabel::Label),
        }
    }

    #[inline]
    pub fn is_broadcast(self) -> bool {
        matches!(self, AxisLabel::Broadcast)
    }

    /// The label of a fresh axis.
    #[inline]
    pub fn label(self) -> Option<Label> {
        match self {
            AxisLabel::Label(label) => Some(label),
            _ => None,
        }
    }
}

/// Label plan of one operand: one entry per axis, in axis order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandLabels {
    axes: SmallVec<[AxisLabel; 8]>,
    ellipsis: Option<usize>,
}

impl OperandLabels {
    pub(crate) fn new(axes: SmallVec<[AxisLabel; 8]>, ellipsis: Option<usize>) -> Self {
        Self { axes, ellipsis }
    }

    /// Number of axes, always the operand's rank.
    #[inline]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[AxisLabel] {
        &self.axes
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisLabel> {
        self.axes.iter()
    }

    /// Axis position where the ellipsis stood, if the segment had one.
    #[inline]
    pub fn ellipsis_position(&self) -> Option<usize> {
        self.ellipsis
    }

    /// Compact signed codes, see [`AxisLabel::code`].
    pub fn codes(&self) -> Vec<i8> {
        self.axes.iter().map(|a| a.code()).collect()
    }

    /// Number of broadcast axes.
    pub fn broadcast_count(&self) -> usize {
        self.axes.iter().filter(|a| a.is_broadcast()).count()
    }

    /// Label carried by `axis`, following repeat references.
    pub fn resolve(&self, axis: usize) -> Option<Label> {
        match *self.axes.get(axis)? {
            AxisLabel::Label(label) => Some(label),
            AxisLabel::Repeat { offset } => self.resolve(axis.checked_sub(offset)?),
            AxisLabel::Broadcast => None,
        }
    }

    /// Returns true if any label repeats on this operand.
    pub fn has_repeats(&self) -> bool {
        self.axes.iter().any(|a| matches!(a, AxisLabel::Repeat { .. }))
    }

    /// Distinct labels in axis order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.axes.iter().filter_map(|a| a.label())
    }

    pub fn contains(&self, label: Label) -> bool {
        self.labels().any(|l| l == label)
    }
}

impl fmt::Display for OperandLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in 0..self.axes.len() {
            match self.resolve(axis) {
                Some(label) => write!(f, "{}", label)?,
                None => write!(f, "_")?,
            }
        }
        Ok(())
    }
}

/// Occurrence count of every label across all input segments.
///
/// Scoped to one parse; nothing survives between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCounts {
    counts: [u32; LABEL_TABLE_SIZE],
    min: u8,
    max: u8,
}

impl LabelCounts {
    pub fn new() -> Self {
        Self {
            counts: [0; LABEL_TABLE_SIZE],
            min: u8::MAX,
            max: 0,
        }
    }

    pub(crate) fn record(&mut self, label: Label) {
        let code = label.code();
        self.counts[code as usize] += 1;
        self.min = self.min.min(code);
        self.max = self.max.max(code);
    }

    #[inline]
    pub fn count(&self, label: Label) -> u32 {
        self.counts[label.code() as usize]
    }

    /// Smallest label seen, if any.
    pub fn min_label(&self) -> Option<Label> {
        Label::from_code(self.min)
    }

    /// Largest label seen, if any.
    pub fn max_label(&self) -> Option<Label> {
        if self.max == 0 { None } else { Label::from_code(self.max) }
    }

    /// Labels seen at least once, ascending by code.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        let (lo, hi) = if self.max == 0 { (1, 0) } else { (self.min, self.max) };
        (lo..=hi).filter_map(move |code| {
            if self.counts[code as usize] > 0 {
                Label::from_code(code)
            } else {
                None
            }
        })
    }
}

impl Default for LabelCounts {
    fn default() -> Self {
        Self::new()
    }
}
