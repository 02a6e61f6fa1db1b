//! The four-bit result flag shared by every search entry point.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// `NONE`, `SOLUTION`, `OPTIMUM`, `END` as described in the external
/// interface: `SOLUTION | OPTIMUM` is a proven-optimal solution, `SOLUTION`
/// alone is merely "better than any previously returned", and `END` is
/// terminal.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultFlag(u8);

impl ResultFlag {
    pub const NONE: ResultFlag = ResultFlag(0);
    pub const SOLUTION: ResultFlag = ResultFlag(1);
    pub const OPTIMUM: ResultFlag = ResultFlag(2);
    pub const END: ResultFlag = ResultFlag(4);

    #[inline]
    pub fn contains(self, other: ResultFlag) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_solution(self) -> bool {
        self.contains(Self::SOLUTION)
    }

    #[inline]
    pub fn is_optimum(self) -> bool {
        self.contains(Self::OPTIMUM)
    }

    #[inline]
    pub fn is_end(self) -> bool {
        self.contains(Self::END)
    }
}

impl BitOr for ResultFlag {
    type Output = ResultFlag;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        ResultFlag(self.0 | rhs.0)
    }
}

impl BitOrAssign for ResultFlag {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ResultFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::SOLUTION) {
            parts.push("SOLUTION");
        }
        if self.contains(Self::OPTIMUM) {
            parts.push("OPTIMUM");
        }
        if self.contains(Self::END) {
            parts.push("END");
        }
        if parts.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", parts.join("|"))
        }
    }
}
