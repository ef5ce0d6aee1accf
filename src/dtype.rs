//! Element type tags, casting rules and memory order.

use serde::{Deserialize, Serialize};

/// Closed set of element types the sum-of-products kernels know about.
///
/// `Custom` stands for anything outside that set. It has no kernel and
/// callers must fall back to their own element-wise loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    F32,
    F64,
    Complex32,
    Complex64,
    Custom,
}

/// Coarse type category, ordered for same-kind casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Category {
    Bool,
    Unsigned,
    Signed,
    Float,
    Complex,
}

impl ScalarKind {
    /// Size of one element in bytes, `None` for `Custom`.
    pub const fn size(self) -> Option<usize> {
        match self {
            ScalarKind::Bool | ScalarKind::I8 | ScalarKind::U8 => Some(1),
            ScalarKind::I16 | ScalarKind::U16 | ScalarKind::F16 => Some(2),
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => Some(4),
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 | ScalarKind::Complex32 => Some(8),
            ScalarKind::Complex64 => Some(16),
            ScalarKind::Custom => None,
        }
    }

    /// Returns true if a specialized sum-of-products kernel exists.
    pub const fn has_kernel(self) -> bool {
        !matches!(self, ScalarKind::Custom)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, ScalarKind::Complex32 | ScalarKind::Complex64)
    }

    pub const fn is_float(self) -> bool {
        matches!(
            self,
            ScalarKind::F16 | ScalarKind::F32 | ScalarKind::F64
        ) || self.is_complex()
    }

    /// Short name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F16 => "f16",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Complex32 => "complex32",
            ScalarKind::Complex64 => "complex64",
            ScalarKind::Custom => "custom",
        }
    }

    fn category(self) -> Option<Category> {
        match self {
            ScalarKind::Bool => Some(Category::Bool),
            ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64 => {
                Some(Category::Unsigned)
            }
            ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64 => {
                Some(Category::Signed)
            }
            ScalarKind::F16 | ScalarKind::F32 | ScalarKind::F64 => Some(Category::Float),
            ScalarKind::Complex32 | ScalarKind::Complex64 => Some(Category::Complex),
            ScalarKind::Custom => None,
        }
    }

    /// Bytes of one real component (the element size for non-complex kinds).
    fn component_size(self) -> usize {
        let size = self.size().unwrap_or(0);
        if self.is_complex() { size / 2 } else { size }
    }

    /// Returns true if every value of `self` is representable in `to`.
    fn safe_cast(self, to: ScalarKind) -> bool {
        let (Some(from_cat), Some(to_cat)) = (self.category(), to.category()) else {
            return false;
        };
        let from_size = self.component_size();
        let to_size = to.component_size();

        match (from_cat, to_cat) {
            (Category::Bool, _) => true,
            (_, Category::Bool) => false,
            (Category::Unsigned, Category::Unsigned) | (Category::Signed, Category::Signed) => {
                to_size >= from_size
            }
            (Category::Unsigned, Category::Signed) => to_size > from_size,
            (Category::Signed, Category::Unsigned) => false,
            // 8-bit integers fit a half, 16-bit a single, anything wider a double.
            (Category::Unsigned | Category::Signed, Category::Float | Category::Complex) => {
                let needed = match from_size {
                    1 => 2,
                    2 => 4,
                    _ => 8,
                };
                to_size >= needed
            }
            (Category::Float, Category::Float | Category::Complex)
            | (Category::Complex, Category::Complex) => to_size >= from_size,
            (Category::Float | Category::Complex, _) => false,
        }
    }

    /// NumPy-style casting check between two kinds under `casting`.
    pub fn can_cast(self, to: ScalarKind, casting: CastingPolicy) -> bool {
        match casting {
            CastingPolicy::No | CastingPolicy::Equiv => self == to,
            CastingPolicy::Safe => self == to || self.safe_cast(to),
            CastingPolicy::SameKind => {
                if self == to || self.safe_cast(to) {
                    return true;
                }
                match (self.category(), to.category()) {
                    (Some(from), Some(to)) => from <= to,
                    _ => false,
                }
            }
            CastingPolicy::Unsafe => true,
        }
    }
}

/// What kind of data conversions may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CastingPolicy {
    No,
    Equiv,
    #[default]
    Safe,
    SameKind,
    Unsafe,
}

/// Memory layout for newly allocated outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemoryOrder {
    /// C order, last axis fastest.
    RowMajor,
    /// Fortran order, first axis fastest.
    ColumnMajor,
    /// Column-major when every operand is column-contiguous only, else row-major.
    #[default]
    Native,
}
