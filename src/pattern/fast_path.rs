//! Kernel variants recognized from an inner-block stride pattern.

/// A recognized sum-of-products specialization.
///
/// Variants are listed from most to least specialized; `Strided` accepts
/// every stride pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FastPath {
    /// One contiguous operand reduced into a scalar output.
    /// `i->`, inner loop of `ij->i`
    SumContig,

    /// Two contiguous operands reduced into a scalar output.
    /// `i,i->`
    DotContig,

    /// A fixed scalar times the sum of a contiguous operand.
    /// `,i->`, `i,->`
    ScalarDotContig {
        /// Which of the two operands has stride 0.
        scalar_operand: usize,
    },

    /// A fixed scalar times a contiguous operand into a contiguous output.
    /// `,i->i`, inner loop of `i,j->ij`
    ScalarTimesContig {
        /// Which of the two operands has stride 0.
        scalar_operand: usize,
    },

    /// Element-wise product of contiguous operands into a contiguous output.
    /// `i,i->i`, `i,i,i->i`
    ContigOutContig,

    /// Arbitrary strides and operand counts.
    Strided,
}

impl FastPath {
    /// Returns true if the output does not advance within a block.
    pub fn reduces(&self) -> bool {
        matches!(
            self,
            FastPath::SumContig | FastPath::DotContig | FastPath::ScalarDotContig { .. }
        )
    }

    /// Returns a human-readable name for this kernel.
    pub fn name(&self) -> &'static str {
        match self {
            FastPath::SumContig => "sum_contig_outstride0",
            FastPath::DotContig => "dot_contig_outstride0",
            FastPath::ScalarDotContig { .. } => "scalar_dot_contig",
            FastPath::ScalarTimesContig { .. } => "scalar_times_contig",
            FastPath::ContigOutContig => "contig_outcontig",
            FastPath::Strided => "strided",
        }
    }
}

impl core::fmt::Display for FastPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
